//! Callback factories that bridge UI events to session operations.

use std::cell::RefCell;
use std::rc::Rc;

use contrail_game::{GameSession, GameView};
use wasm_bindgen_futures::spawn_local;
use yew::Callback;

use crate::app::state::AppState;
use crate::http::WebTransport;
use crate::map::FlyRequest;
use crate::view::PanelView;

pub const NAME_REQUIRED_NOTICE: &str = "Player name is required!";
pub const STILL_LOADING_NOTICE: &str = "The map is still loading. Try again in a moment.";

/// Everything the component tree can ask the session to do.
pub struct AppHandlers {
    pub on_start: Callback<String>,
    pub on_fly: Callback<FlyRequest>,
}

impl AppHandlers {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            on_start: build_start(state),
            on_fly: build_fly(state),
        }
    }
}

/// Start a game for the submitted player name.
///
/// The session borrow is held across the whole run on purpose: a second
/// trigger fails `try_borrow_mut` instead of interleaving requests.
#[allow(clippy::await_holding_refcell_ref)]
#[must_use]
pub fn build_start(state: &AppState) -> Callback<String> {
    let session_handle = state.session.clone();
    let map_handle = state.map.clone();
    let config_handle = state.config.clone();
    let game_started = state.game_started.clone();
    let view = PanelView::from_state(state);
    Callback::from(move |submitted: String| {
        let player_name = submitted.trim().to_string();
        if player_name.is_empty() {
            view.notify(NAME_REQUIRED_NOTICE);
            return;
        }
        let Some(map) = (*map_handle).clone() else {
            view.notify(STILL_LOADING_NOTICE);
            return;
        };
        let session = (*session_handle).clone().unwrap_or_else(|| {
            let session = Rc::new(RefCell::new(GameSession::new(
                WebTransport,
                view.clone(),
                map,
                (*config_handle).clone(),
            )));
            session_handle.set(Some(Rc::clone(&session)));
            session
        });
        game_started.set(true);
        spawn_local(async move {
            let Ok(mut session) = session.try_borrow_mut() else {
                log::warn!("an operation is already in flight; start ignored");
                return;
            };
            let _ = session.start(&player_name).await;
        });
    })
}

/// Fly to the airport a marker's button named.
#[allow(clippy::await_holding_refcell_ref)]
#[must_use]
pub fn build_fly(state: &AppState) -> Callback<FlyRequest> {
    let session_handle = state.session.clone();
    Callback::from(move |request: FlyRequest| {
        let Some(session) = (*session_handle).clone() else {
            log::warn!("fly to {} requested with no session", request.icao);
            return;
        };
        spawn_local(async move {
            let Ok(mut session) = session.try_borrow_mut() else {
                log::warn!(
                    "an operation is already in flight; fly to {} ignored",
                    request.icao
                );
                return;
            };
            let _ = session.fly_to(&request.icao, request.consumption).await;
        });
    })
}
