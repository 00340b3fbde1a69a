use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct PlayerFormProps {
    pub on_submit: Callback<String>,
    /// Disables the start button while the app is still booting.
    #[prop_or_default]
    pub busy: bool,
}

/// Modal shown until a game starts: one name field, one button.
#[function_component(PlayerForm)]
pub fn player_form(props: &PlayerFormProps) -> Html {
    let name = use_state(AttrValue::default);

    let oninput = {
        let name = name.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                name.set(AttrValue::from(input.value()));
            }
        })
    };

    let onsubmit = {
        let name = name.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            on_submit.emit(name.to_string());
        })
    };

    html! {
        <div class="modal-backdrop">
            <form class="panel player-form" {onsubmit}>
                <h2>{ "Ready for departure?" }</h2>
                <p>{ "Spend your CO2 budget wisely and see the world." }</p>
                <label for="player-name-input">{ "Player name" }</label>
                <input
                    id="player-name-input"
                    type="text"
                    placeholder="Enter your name"
                    value={(*name).clone()}
                    {oninput}
                />
                <button type="submit" disabled={props.busy}>{ "Start game" }</button>
            </form>
        </div>
    }
}
