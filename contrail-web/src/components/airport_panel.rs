use contrail_game::WeatherSnapshot;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct AirportPanelProps {
    #[prop_or_default]
    pub airport_name: Option<AttrValue>,
    #[prop_or_default]
    pub weather: Option<WeatherSnapshot>,
}

/// Current airport with its live weather, when both are known.
#[function_component(AirportPanel)]
pub fn airport_panel(props: &AirportPanelProps) -> Html {
    let name = props
        .airport_name
        .clone()
        .unwrap_or_else(|| AttrValue::from("No airport selected"));
    html! {
        <section class="panel airport-panel" aria-label="Current airport">
            <h2 id="airport-name">{ name }</h2>
            {
                props.weather.as_ref().map_or_else(
                    || html! { <p class="muted">{ "Weather unavailable" }</p> },
                    |weather| html! {
                        <div class="weather-row">
                            <img
                                id="weather-icon"
                                src={weather.icon_url.clone()}
                                alt={weather.description.clone()}
                            />
                            <div class="weather-copy">
                                <p id="airport-temp">{ format!("{} °C", weather.temp_c) }</p>
                                <p id="airport-conditions">{ weather.description.clone() }</p>
                                <p id="airport-wind">{ format!("Wind {} m/s", weather.wind_speed) }</p>
                            </div>
                        </div>
                    },
                )
            }
        </section>
    }
}
