//! Contrail client core
//!
//! Platform-agnostic session logic for the Contrail flight game client.
//! Everything here runs identically in the browser, in the native QA
//! harness, and in unit tests; platform specifics enter through the port
//! traits in [`ports`].

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod ports;
pub mod session;
pub mod weather;

// Re-export commonly used types
pub use api::{Airport, AirportList, GameData, GameStatus, Goal, Location, is_valid_icao};
pub use config::{ConfigError, GameConfig};
pub use error::{FailureKind, GameError};
pub use fetch::{FETCH_FAILED_NOTICE, fetch_json};
pub use ports::{AirportMarker, GameView, MapView, Transport};
pub use session::{
    GameSession, INVALID_GAME_NOTICE, NO_SESSION_NOTICE, UNNAMED_AIRPORT, UNNAMED_PLAYER,
};
pub use weather::{
    WEATHER_ICON_BASE, WEATHER_INVALID_NOTICE, WeatherReport, WeatherSnapshot, update_weather,
};
