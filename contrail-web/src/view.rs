//! Yew-backed implementation of the core view port.

use contrail_game::{GameView, WeatherSnapshot};
use yew::prelude::*;

use crate::app::state::AppState;
use crate::dom;

/// Writes session output into the panel state handles. Cloning is cheap;
/// every clone drives the same handles.
#[derive(Clone)]
pub struct PanelView {
    player_name: UseStateHandle<Option<AttrValue>>,
    consumed: UseStateHandle<Option<i64>>,
    budget: UseStateHandle<Option<i64>>,
    money: UseStateHandle<Option<f64>>,
    airport_name: UseStateHandle<Option<AttrValue>>,
    weather: UseStateHandle<Option<WeatherSnapshot>>,
}

impl PanelView {
    #[must_use]
    pub fn from_state(state: &AppState) -> Self {
        Self {
            player_name: state.player_name.clone(),
            consumed: state.consumed.clone(),
            budget: state.budget.clone(),
            money: state.money.clone(),
            airport_name: state.airport_name.clone(),
            weather: state.weather.clone(),
        }
    }
}

impl GameView for PanelView {
    fn set_player_name(&self, name: &str) {
        self.player_name.set(Some(AttrValue::from(name.to_string())));
    }

    fn set_consumed(&self, co2_points: i64) {
        self.consumed.set(Some(co2_points));
    }

    fn set_budget(&self, remaining: i64) {
        self.budget.set(Some(remaining));
    }

    fn set_money(&self, money: f64) {
        self.money.set(Some(money));
    }

    fn set_airport_name(&self, name: &str) {
        self.airport_name.set(Some(AttrValue::from(name.to_string())));
    }

    fn set_weather(&self, snapshot: &WeatherSnapshot) {
        self.weather.set(Some(snapshot.clone()));
    }

    fn notify(&self, message: &str) {
        log::warn!("notice: {message}");
        dom::alert(message);
    }
}
