//! Live weather at the current airport.
//!
//! Payloads come from OpenWeatherMap; only the fields the airport panel
//! shows are modeled. A payload that parses but lacks those fields is
//! rejected before anything reaches the view.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::fetch::fetch_json;
use crate::ports::{GameView, Transport};

/// Base URL for condition icons.
pub const WEATHER_ICON_BASE: &str = "http://openweathermap.org/img/wn";

/// Notice shown when a weather payload cannot be used.
pub const WEATHER_INVALID_NOTICE: &str = "Unable to fetch live weather data.";

/// Wire shape of a current-weather response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(default)]
    pub main: Option<WeatherMain>,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    #[serde(default)]
    pub wind: Option<WeatherWind>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherMain {
    pub temp: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherWind {
    pub speed: f64,
}

/// What the airport panel actually displays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temp_c: f64,
    pub description: String,
    pub wind_speed: f64,
    pub icon_url: String,
}

impl WeatherReport {
    /// Reduce a wire payload to the displayed snapshot.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWeatherData` naming the first missing piece.
    pub fn validate(&self) -> Result<WeatherSnapshot, GameError> {
        let main = self
            .main
            .as_ref()
            .ok_or(GameError::InvalidWeatherData("missing main block"))?;
        let condition = self
            .weather
            .first()
            .ok_or(GameError::InvalidWeatherData("missing conditions list"))?;
        let wind = self
            .wind
            .as_ref()
            .ok_or(GameError::InvalidWeatherData("missing wind block"))?;
        Ok(WeatherSnapshot {
            temp_c: main.temp,
            description: condition.description.clone(),
            wind_speed: wind.speed,
            icon_url: format!("{WEATHER_ICON_BASE}/{}@2x.png", condition.icon),
        })
    }
}

/// Fetch current weather for the coordinates and write it to the view.
///
/// An empty API key disables live weather entirely: nothing is fetched and
/// the slots keep their previous contents. Transport and parse failures are
/// reported by the fetch helper; a payload that fails validation is reported
/// here. Either way the weather slots keep their previous contents and the
/// session continues.
///
/// # Errors
///
/// Fetch failures pass through; an unusable payload is `InvalidWeatherData`.
pub async fn update_weather<TR, V>(
    transport: &TR,
    view: &V,
    config: &GameConfig,
    latitude: f64,
    longitude: f64,
) -> Result<(), GameError>
where
    TR: Transport,
    V: GameView,
{
    if config.weather_api_key.is_empty() {
        log::info!("no weather api key configured; skipping live weather");
        return Ok(());
    }
    let url = config.weather_query_url(latitude, longitude);
    let report: WeatherReport = fetch_json(transport, view, &url).await?;
    match report.validate() {
        Ok(snapshot) => {
            view.set_weather(&snapshot);
            Ok(())
        }
        Err(err) => {
            log::error!("weather payload for ({latitude}, {longitude}) rejected: {err}");
            view.notify(WEATHER_INVALID_NOTICE);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::fetch::FETCH_FAILED_NOTICE;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    const METAR_HELSINKI: &str = r#"{
        "main": {"temp": -3.4, "humidity": 86},
        "weather": [{"description": "light snow", "icon": "13d", "main": "Snow"}],
        "wind": {"speed": 5.2, "deg": 230}
    }"#;

    #[test]
    fn full_payload_reduces_to_a_snapshot() {
        let report: WeatherReport = serde_json::from_str(METAR_HELSINKI).unwrap();
        let snapshot = report.validate().unwrap();
        assert!((snapshot.temp_c - -3.4).abs() < f64::EPSILON);
        assert_eq!(snapshot.description, "light snow");
        assert!((snapshot.wind_speed - 5.2).abs() < f64::EPSILON);
        assert_eq!(
            snapshot.icon_url,
            "http://openweathermap.org/img/wn/13d@2x.png"
        );
    }

    #[test]
    fn each_missing_block_is_named() {
        let no_main: WeatherReport =
            serde_json::from_str(r#"{"weather": [{"description": "clear", "icon": "01d"}], "wind": {"speed": 1.0}}"#)
                .unwrap();
        assert!(no_main.validate().unwrap_err().to_string().contains("main"));

        let no_conditions: WeatherReport =
            serde_json::from_str(r#"{"main": {"temp": 10.0}, "wind": {"speed": 1.0}}"#).unwrap();
        assert!(
            no_conditions
                .validate()
                .unwrap_err()
                .to_string()
                .contains("conditions")
        );

        let no_wind: WeatherReport = serde_json::from_str(
            r#"{"main": {"temp": 10.0}, "weather": [{"description": "clear", "icon": "01d"}]}"#,
        )
        .unwrap();
        assert!(no_wind.validate().unwrap_err().to_string().contains("wind"));
    }

    struct OneShotTransport {
        body: Option<String>,
        requests: Rc<RefCell<Vec<String>>>,
    }

    #[async_trait(?Send)]
    impl Transport for OneShotTransport {
        async fn get_text(&self, url: &str) -> Result<String, GameError> {
            self.requests.borrow_mut().push(url.to_string());
            self.body.clone().ok_or_else(|| GameError::Transport {
                url: url.to_string(),
                detail: "connection refused".to_string(),
            })
        }
    }

    #[derive(Clone, Default)]
    struct WeatherBoard {
        weather: Rc<RefCell<Option<WeatherSnapshot>>>,
        notices: Rc<RefCell<Vec<String>>>,
    }

    impl GameView for WeatherBoard {
        fn set_player_name(&self, _name: &str) {}
        fn set_consumed(&self, _co2_points: i64) {}
        fn set_budget(&self, _remaining: i64) {}
        fn set_money(&self, _money: f64) {}
        fn set_airport_name(&self, _name: &str) {}
        fn set_weather(&self, weather: &WeatherSnapshot) {
            *self.weather.borrow_mut() = Some(weather.clone());
        }
        fn notify(&self, message: &str) {
            self.notices.borrow_mut().push(message.to_string());
        }
    }

    fn config_with_key() -> GameConfig {
        let mut config = GameConfig::default_config();
        config.weather_api_key = "k3y".to_string();
        config
    }

    #[test]
    fn update_writes_the_snapshot_through_the_view() {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let transport = OneShotTransport {
            body: Some(METAR_HELSINKI.to_string()),
            requests: requests.clone(),
        };
        let view = WeatherBoard::default();
        block_on(update_weather(
            &transport,
            &view,
            &config_with_key(),
            60.3172,
            24.9633,
        ))
        .unwrap();

        assert_eq!(
            requests.borrow().as_slice(),
            ["https://api.openweathermap.org/data/2.5/weather?lat=60.3172&lon=24.9633&units=metric&appid=k3y"]
        );
        let written = view.weather.borrow().clone().unwrap();
        assert_eq!(written.description, "light snow");
        assert!(view.notices.borrow().is_empty());
    }

    #[test]
    fn an_empty_api_key_fetches_nothing() {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let transport = OneShotTransport {
            body: Some(METAR_HELSINKI.to_string()),
            requests: requests.clone(),
        };
        let view = WeatherBoard::default();
        block_on(update_weather(
            &transport,
            &view,
            &GameConfig::default_config(),
            60.3172,
            24.9633,
        ))
        .unwrap();

        assert!(requests.borrow().is_empty());
        assert!(view.weather.borrow().is_none());
        assert!(view.notices.borrow().is_empty());
    }

    #[test]
    fn unusable_payload_notifies_and_leaves_the_slot_alone() {
        let transport = OneShotTransport {
            body: Some(r#"{"wind": {"speed": 3.0}}"#.to_string()),
            requests: Rc::default(),
        };
        let view = WeatherBoard::default();
        let err = block_on(update_weather(
            &transport,
            &view,
            &config_with_key(),
            60.0,
            24.0,
        ))
        .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Validation);
        assert!(view.weather.borrow().is_none());
        assert_eq!(view.notices.borrow().as_slice(), [WEATHER_INVALID_NOTICE]);
    }

    #[test]
    fn transport_failure_is_reported_by_the_fetch_helper_only() {
        let transport = OneShotTransport {
            body: None,
            requests: Rc::default(),
        };
        let view = WeatherBoard::default();
        let err = block_on(update_weather(
            &transport,
            &view,
            &config_with_key(),
            60.0,
            24.0,
        ))
        .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Transport);
        assert!(view.weather.borrow().is_none());
        assert_eq!(view.notices.borrow().as_slice(), [FETCH_FAILED_NOTICE]);
    }
}
