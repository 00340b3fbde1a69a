//! Client configuration: service endpoints, the weather key, and the fixed
//! gameplay constants. The reference deployment compiled all of these in;
//! here they load from JSON with compiled-in defaults as the fallback.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::is_valid_icao;

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Everything the client needs to reach its services and render the game.
/// Map tile internals stay in the web layer; this covers behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Base URL of the game server, without a trailing slash.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Current-weather endpoint, queried with lat/lon/units/appid.
    #[serde(default = "default_weather_url")]
    pub weather_url: String,
    /// OpenWeatherMap API key. Empty disables live weather.
    #[serde(default)]
    pub weather_api_key: String,
    /// ICAO code of the airport new games start from.
    #[serde(default = "default_start_airport")]
    pub start_airport: String,
    /// Total CO2 budget shown to the player.
    #[serde(default = "default_total_budget")]
    pub total_budget: i64,
    /// Fixed CO2 cost charged per flight, regardless of distance.
    #[serde(default = "default_flight_cost")]
    pub flight_cost: i64,
    /// Initial map center, latitude then longitude.
    #[serde(default = "default_initial_center")]
    pub initial_center: (f64, f64),
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: u8,
    /// Zoom applied when the map animates to an airport.
    #[serde(default = "default_fly_zoom")]
    pub fly_zoom: u8,
}

fn default_api_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_weather_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_start_airport() -> String {
    "EFHK".to_string()
}

const fn default_total_budget() -> i64 {
    10_000
}

const fn default_flight_cost() -> i64 {
    100
}

const fn default_initial_center() -> (f64, f64) {
    (60.0, 24.0)
}

const fn default_initial_zoom() -> u8 {
    7
}

const fn default_fly_zoom() -> u8 {
    10
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl GameConfig {
    /// Embedded default configuration, used when no config asset loads.
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            api_url: default_api_url(),
            weather_url: default_weather_url(),
            weather_api_key: String::new(),
            start_airport: default_start_airport(),
            total_budget: default_total_budget(),
            flight_cost: default_flight_cost(),
            initial_center: default_initial_center(),
            initial_zoom: default_initial_zoom(),
            fly_zoom: default_fly_zoom(),
        }
    }

    /// Load a configuration from a JSON string, filling gaps with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or validation fails.
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants a hand-edited config can break.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "api_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.weather_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "weather_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !is_valid_icao(&self.start_airport) {
            return Err(ConfigError::Invalid {
                field: "start_airport",
                reason: format!("'{}' is not an ICAO code", self.start_airport),
            });
        }
        if self.total_budget <= 0 {
            return Err(ConfigError::Invalid {
                field: "total_budget",
                reason: format!("must be positive (got {})", self.total_budget),
            });
        }
        if self.flight_cost <= 0 {
            return Err(ConfigError::Invalid {
                field: "flight_cost",
                reason: format!("must be positive (got {})", self.flight_cost),
            });
        }
        Ok(())
    }

    /// URL that starts a new game for `player` at the configured airport.
    /// The name is inserted verbatim; the transport layer owns URL encoding.
    #[must_use]
    pub fn newgame_url(&self, player: &str) -> String {
        format!(
            "{}/newgame?player={}&loc={}",
            self.api_url, player, self.start_airport
        )
    }

    /// URL of the airport list.
    #[must_use]
    pub fn airports_url(&self) -> String {
        format!("{}/airports", self.api_url)
    }

    /// URL for flying `game_id` to `dest`. The id is empty when the server
    /// never issued one; the reference server ignores the parameter.
    #[must_use]
    pub fn flyto_url(&self, game_id: Option<&str>, dest: &str, consumption: i64) -> String {
        format!(
            "{}/flyto?game={}&dest={}&consumption={}",
            self.api_url,
            game_id.unwrap_or(""),
            dest,
            consumption
        )
    }

    /// Weather query for the given coordinates, metric units.
    #[must_use]
    pub fn weather_query_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}?lat={latitude}&lon={longitude}&units=metric&appid={}",
            self.weather_url, self.weather_api_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_deployment() {
        let config = GameConfig::default_config();
        assert_eq!(config.api_url, "http://127.0.0.1:5000");
        assert_eq!(config.start_airport, "EFHK");
        assert_eq!(config.total_budget, 10_000);
        assert_eq!(config.flight_cost, 100);
        assert_eq!(config.initial_center, (60.0, 24.0));
        assert_eq!(config.initial_zoom, 7);
        assert_eq!(config.fly_zoom, 10);
        config.validate().unwrap();
    }

    #[test]
    fn partial_json_fills_gaps_with_defaults() {
        let config = GameConfig::from_json(r#"{"weather_api_key": "abc123"}"#).unwrap();
        assert_eq!(config.weather_api_key, "abc123");
        assert_eq!(config.api_url, "http://127.0.0.1:5000");
        assert_eq!(config.flight_cost, 100);
    }

    #[test]
    fn invalid_fields_are_named() {
        let err = GameConfig::from_json(r#"{"start_airport": "helsinki"}"#).unwrap_err();
        assert!(err.to_string().contains("start_airport"));

        let err = GameConfig::from_json(r#"{"flight_cost": 0}"#).unwrap_err();
        assert!(err.to_string().contains("flight_cost"));

        let err = GameConfig::from_json(r#"{"api_url": "  "}"#).unwrap_err();
        assert!(err.to_string().contains("api_url"));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = GameConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn urls_match_the_wire_contract() {
        let mut config = GameConfig::default_config();
        config.weather_api_key = "k3y".to_string();

        assert_eq!(
            config.newgame_url("Ana"),
            "http://127.0.0.1:5000/newgame?player=Ana&loc=EFHK"
        );
        assert_eq!(config.airports_url(), "http://127.0.0.1:5000/airports");
        assert_eq!(
            config.flyto_url(Some("7"), "ESSA", 100),
            "http://127.0.0.1:5000/flyto?game=7&dest=ESSA&consumption=100"
        );
        assert_eq!(
            config.flyto_url(None, "ESSA", 100),
            "http://127.0.0.1:5000/flyto?game=&dest=ESSA&consumption=100"
        );
        assert_eq!(
            config.weather_query_url(60.3172, 24.9633),
            "https://api.openweathermap.org/data/2.5/weather?lat=60.3172&lon=24.9633&units=metric&appid=k3y"
        );
    }
}
