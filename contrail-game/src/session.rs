//! The game session: one player, one snapshot, sequential operations.
//!
//! [`GameSession`] owns the platform ports and the single snapshot slot. All
//! state-changing operations take `&mut self`, so overlapping mutations are
//! unrepresentable here; the UI layer is responsible for rejecting a trigger
//! that arrives while another operation is still awaiting.

use crate::api::{Airport, AirportList, GameData, GameStatus, Location, is_valid_icao};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::fetch::fetch_json;
use crate::ports::{AirportMarker, GameView, MapView, Transport};
use crate::weather::update_weather;

/// Placeholder shown when the server does not name the player.
pub const UNNAMED_PLAYER: &str = "Undefined";

/// Label used when a reported location has coordinates but no name.
pub const UNNAMED_AIRPORT: &str = "Unknown";

/// Notice for a game payload the client cannot use.
pub const INVALID_GAME_NOTICE: &str =
    "The game data received was invalid. Check the console for details.";

/// Notice for a fly attempt before any game has started.
pub const NO_SESSION_NOTICE: &str = "Start a game before flying.";

/// One running game.
pub struct GameSession<T, V, M>
where
    T: Transport,
    V: GameView,
    M: MapView,
{
    transport: T,
    view: V,
    map: M,
    config: GameConfig,
    snapshot: Option<GameData>,
}

impl<T, V, M> GameSession<T, V, M>
where
    T: Transport,
    V: GameView,
    M: MapView,
{
    pub const fn new(transport: T, view: V, map: M, config: GameConfig) -> Self {
        Self {
            transport,
            view,
            map,
            config,
            snapshot: None,
        }
    }

    /// Latest full game payload, if a game has started.
    #[must_use]
    pub fn snapshot(&self) -> Option<&GameData> {
        self.snapshot.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a new game for `player_name` at the configured home airport.
    ///
    /// On success: the snapshot is stored, the status panel is written, the
    /// airport details (name, then weather) are refreshed, the map animates
    /// to the start location and gets a visited marker with an open popup,
    /// and the destination list is loaded.
    ///
    /// # Errors
    ///
    /// Fetch failures propagate from the fetch helper. A payload without a
    /// status, or whose location lacks numeric coordinates, is
    /// `InvalidGameData`; nothing is stored or displayed in that case.
    pub async fn start(&mut self, player_name: &str) -> Result<(), GameError> {
        let url = self.config.newgame_url(player_name);
        let data: GameData = fetch_json(&self.transport, &self.view, &url).await?;

        let Some(status) = data.status.clone() else {
            return Err(self.reject_game_data("newgame response carries no status"));
        };
        let Some(location) = status.location.clone() else {
            return Err(self.reject_game_data("newgame status carries no location"));
        };
        let Some((lat, lon)) = location.coordinates() else {
            return Err(self.reject_game_data("start location has no coordinates"));
        };

        log::info!(
            "game started for '{}' at {}",
            status.name.as_deref().unwrap_or(UNNAMED_PLAYER),
            self.config.start_airport
        );
        self.snapshot = Some(data);
        self.update_status_view(&status);
        self.refresh_airport_details(&location).await;
        self.map.fly_to(lat, lon, self.config.fly_zoom);
        self.map
            .place_visited_marker(location.name.as_deref().unwrap_or(UNNAMED_AIRPORT), lat, lon);
        self.load_destinations().await
    }

    /// Fetch the airport list and render one fly marker per airport.
    ///
    /// A payload without an airports collection logs and keeps the existing
    /// markers; there is nothing new to show, so the player is not notified.
    ///
    /// # Errors
    ///
    /// Propagates fetch failures (already logged and notified).
    pub async fn load_destinations(&self) -> Result<(), GameError> {
        let url = self.config.airports_url();
        let list: AirportList = fetch_json(&self.transport, &self.view, &url).await?;
        let Some(airports) = list.airports else {
            log::error!("airports response carries no airport list; markers unchanged");
            return Ok(());
        };
        self.render_airports(&airports);
        Ok(())
    }

    /// Fly the current game to `dest_icao` for `consumption` CO2 points.
    ///
    /// On success: the snapshot's status is replaced wholesale (goals carry
    /// over), the status panel is written, the map animates to the new
    /// location and gets a visited marker with an open popup, and the
    /// airport details are refreshed. A failed fetch leaves the previous
    /// snapshot active with no partial mutation.
    ///
    /// # Errors
    ///
    /// `NoSession` before any game has started, `InvalidDestination` for a
    /// malformed code, `InvalidGameData` for a response without a status,
    /// otherwise whatever the fetch helper raised.
    pub async fn fly_to(&mut self, dest_icao: &str, consumption: i64) -> Result<(), GameError> {
        if self.snapshot.is_none() {
            log::error!("fly to {dest_icao} requested before any game started");
            self.view.notify(NO_SESSION_NOTICE);
            return Err(GameError::NoSession);
        }
        if !is_valid_icao(dest_icao) {
            log::error!("fly destination '{dest_icao}' is not an ICAO code");
            return Err(GameError::InvalidDestination(dest_icao.to_string()));
        }

        let game_id = self
            .snapshot
            .as_ref()
            .and_then(|data| data.status.as_ref())
            .and_then(|status| status.id.clone());
        let url = self
            .config
            .flyto_url(game_id.as_deref(), dest_icao, consumption);
        let data: GameData = fetch_json(&self.transport, &self.view, &url).await?;

        let Some(status) = data.status else {
            return Err(self.reject_game_data("flyto response carries no status"));
        };

        log::info!("flew to {dest_icao} for {consumption} CO2 points");
        if let Some(snapshot) = self.snapshot.as_mut() {
            snapshot.status = Some(status.clone());
        }
        self.update_status_view(&status);
        if let Some(location) = status.location {
            if let Some((lat, lon)) = location.coordinates() {
                self.map.fly_to(lat, lon, self.config.fly_zoom);
                self.map.place_visited_marker(
                    location.name.as_deref().unwrap_or(UNNAMED_AIRPORT),
                    lat,
                    lon,
                );
            }
            self.refresh_airport_details(&location).await;
        }
        Ok(())
    }

    /// Write the status panel: player name, consumed points, remaining
    /// budget, and money when the server reports it.
    pub fn update_status_view(&self, status: &GameStatus) {
        self.view
            .set_player_name(status.name.as_deref().unwrap_or(UNNAMED_PLAYER));
        self.view.set_consumed(status.co2_points);
        self.view
            .set_budget(self.config.total_budget - status.co2_points);
        if let Some(money) = status.money {
            self.view.set_money(money);
        }
    }

    /// Show `location`'s name and its live weather, in that order, so the
    /// name is never displayed beside the previous airport's weather.
    ///
    /// A location missing its name or either coordinate leaves the panel
    /// untouched and fetches nothing. Weather failures are already reported
    /// and do not interrupt the caller.
    pub async fn refresh_airport_details(&self, location: &Location) {
        let Some((name, lat, lon)) = location.described() else {
            log::error!("location lacks name or coordinates; details not refreshed");
            return;
        };
        self.view.set_airport_name(name);
        if let Err(err) = update_weather(&self.transport, &self.view, &self.config, lat, lon).await
        {
            log::warn!("weather for '{name}' unavailable: {err}");
        }
    }

    /// Hand the full airport list to the map, replacing the previous marker
    /// set and every fly handler along with it.
    pub fn render_airports(&self, airports: &[Airport]) {
        let markers: Vec<AirportMarker> = airports
            .iter()
            .map(|airport| AirportMarker {
                name: airport.name.clone(),
                icao_code: airport.icao_code.clone(),
                latitude: airport.latitude,
                longitude: airport.longitude,
                consumption: self.config.flight_cost,
            })
            .collect();
        log::info!("rendering {} airport markers", markers.len());
        self.map.render_airports(&markers);
    }

    fn reject_game_data(&self, reason: &'static str) -> GameError {
        log::error!("{reason}");
        self.view.notify(INVALID_GAME_NOTICE);
        GameError::InvalidGameData(reason)
    }
}
