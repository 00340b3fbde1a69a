//! Root component and its supporting modules.

pub mod bootstrap;
pub mod handlers;
pub mod state;

#[cfg(target_arch = "wasm32")]
use yew::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::components::{AirportPanel, PlayerForm, StatusPanel};
#[cfg(target_arch = "wasm32")]
use crate::map::{LeafletMap, MAP_CONTAINER_ID};

/// Application root: boots configuration, mounts the map once, and renders
/// the panels around it.
#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let state = state::use_app_state();
    bootstrap::use_bootstrap(&state);
    let app_handlers = handlers::AppHandlers::new(&state);

    {
        let map_handle = state.map.clone();
        let config_handle = state.config.clone();
        let on_fly = app_handlers.on_fly.clone();
        use_effect_with(*state.boot_ready, move |ready| {
            if *ready && map_handle.is_none() {
                let config = (*config_handle).clone();
                let map = LeafletMap::mount(
                    MAP_CONTAINER_ID,
                    config.initial_center,
                    config.initial_zoom,
                );
                map.set_fly_handler(on_fly);
                map_handle.set(Some(map));
            }
            || {}
        });
    }

    html! {
        <>
            if !*state.game_started {
                <PlayerForm on_submit={app_handlers.on_start.clone()} busy={!*state.boot_ready} />
            }
            <main class="game-shell">
                <div id={MAP_CONTAINER_ID} class="map-canvas"></div>
                <aside class="side-panel">
                    <StatusPanel
                        player_name={(*state.player_name).clone()}
                        consumed={*state.consumed}
                        budget={*state.budget}
                        money={*state.money}
                    />
                    <AirportPanel
                        airport_name={(*state.airport_name).clone()}
                        weather={(*state.weather).clone()}
                    />
                </aside>
            </main>
        </>
    }
}
