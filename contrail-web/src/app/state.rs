use std::cell::RefCell;
use std::rc::Rc;

use contrail_game::{GameConfig, GameSession, WeatherSnapshot};
use yew::prelude::*;

use crate::http::WebTransport;
use crate::map::LeafletMap;
use crate::view::PanelView;

/// The concrete session type the browser runs.
pub type WebSession = GameSession<WebTransport, PanelView, LeafletMap>;

/// Application state shared across the component tree.
///
/// The session lives behind `Rc<RefCell<..>>`: flights and starts borrow it
/// mutably for their whole run, which is also what rejects a second trigger
/// while one is still in flight.
#[derive(Clone)]
pub struct AppState {
    pub config: UseStateHandle<GameConfig>,
    pub boot_ready: UseStateHandle<bool>,
    pub game_started: UseStateHandle<bool>,
    pub player_name: UseStateHandle<Option<AttrValue>>,
    pub consumed: UseStateHandle<Option<i64>>,
    pub budget: UseStateHandle<Option<i64>>,
    pub money: UseStateHandle<Option<f64>>,
    pub airport_name: UseStateHandle<Option<AttrValue>>,
    pub weather: UseStateHandle<Option<WeatherSnapshot>>,
    pub map: UseStateHandle<Option<LeafletMap>>,
    pub session: UseStateHandle<Option<Rc<RefCell<WebSession>>>>,
}

/// Hook that owns every state handle the app needs.
#[hook]
pub fn use_app_state() -> AppState {
    AppState {
        config: use_state(GameConfig::default_config),
        boot_ready: use_state(|| false),
        game_started: use_state(|| false),
        player_name: use_state(|| None),
        consumed: use_state(|| None),
        budget: use_state(|| None),
        money: use_state(|| None),
        airport_name: use_state(|| None),
        weather: use_state(|| None),
        map: use_state(|| None),
        session: use_state(|| None),
    }
}
