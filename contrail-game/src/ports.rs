//! Seams between the session core and its platform.
//!
//! The web crate implements these over fetch, Yew state, and Leaflet; the QA
//! tester implements them with scripted transports and recording surfaces.

use async_trait::async_trait;

use crate::error::GameError;
use crate::weather::WeatherSnapshot;

/// One airport marker as handed to the map layer.
#[derive(Debug, Clone, PartialEq)]
pub struct AirportMarker {
    pub name: String,
    pub icao_code: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Fixed CO2 cost advertised on the marker's fly action.
    pub consumption: i64,
}

/// HTTP GET seam. Implementations map their native failures into
/// [`GameError::Transport`] / [`GameError::Status`] and return the body text.
#[async_trait(?Send)]
pub trait Transport {
    /// Fetch `url` and return the response body.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent, the connection
    /// drops, or the response status is outside the success range.
    async fn get_text(&self, url: &str) -> Result<String, GameError>;
}

/// Widget surface the session writes through. Implementations decide what a
/// slot looks like; the session only promises the call ordering documented
/// on [`crate::session::GameSession`].
pub trait GameView {
    fn set_player_name(&self, name: &str);
    fn set_consumed(&self, co2_points: i64);
    fn set_budget(&self, remaining: i64);
    /// Only called when the server reports money; the slot keeps its
    /// previous contents otherwise.
    fn set_money(&self, money: f64);
    fn set_airport_name(&self, name: &str);
    fn set_weather(&self, weather: &WeatherSnapshot);
    /// Surface a user-visible notification.
    fn notify(&self, message: &str);
}

/// Map surface. `render_airports` replaces the whole airport layer; stale
/// markers and their fly handlers must not survive a render.
pub trait MapView {
    fn render_airports(&self, markers: &[AirportMarker]);
    /// Animate to a position at the given zoom.
    fn fly_to(&self, latitude: f64, longitude: f64, zoom: u8);
    /// Drop a "visited" marker and open its popup immediately.
    fn place_visited_marker(&self, name: &str, latitude: f64, longitude: f64);
}
