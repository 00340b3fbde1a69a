use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct StatusPanelProps {
    #[prop_or_default]
    pub player_name: Option<AttrValue>,
    #[prop_or_default]
    pub consumed: Option<i64>,
    #[prop_or_default]
    pub budget: Option<i64>,
    /// Shown only once the server reports a balance.
    #[prop_or_default]
    pub money: Option<f64>,
}

fn stat_row(label: &str, id: &'static str, value: Option<String>) -> Html {
    html! {
        <div class="stat-row">
            <span class="stat-label">{ label }</span>
            <span class="stat-value" {id}>{ value.unwrap_or_default() }</span>
        </div>
    }
}

/// Player status: who is flying and how much budget is left.
#[function_component(StatusPanel)]
pub fn status_panel(props: &StatusPanelProps) -> Html {
    let player = props
        .player_name
        .as_ref()
        .map_or_else(String::new, |name| format!("Player: {name}"));
    html! {
        <section class="panel status-panel" aria-label="Game status">
            <h2>{ "Status" }</h2>
            <p id="player-name">{ player }</p>
            { stat_row("Consumed", "consumed", props.consumed.map(|value| value.to_string())) }
            { stat_row("Budget", "budget", props.budget.map(|value| value.to_string())) }
            if let Some(money) = props.money {
                <p id="money">{ format!("Money: ${money}") }</p>
            }
        </section>
    }
}
