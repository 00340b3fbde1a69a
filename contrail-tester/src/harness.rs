//! In-process stand-ins for the game server and the browser surfaces.
//!
//! [`MockServer`] answers the client's four endpoints from a seeded airport
//! fleet and tracks a running game the way the reference server does, so
//! scenarios can hammer the session core without any network in the loop.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use contrail_game::{
    AirportMarker, GameConfig, GameError, GameSession, GameView, MapView, Transport,
    WeatherSnapshot,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::json;

/// Airports the mock fleet draws from. The home airport comes first and is
/// always included.
const FLEET: [(&str, &str, f64, f64); 10] = [
    ("EFHK", "Helsinki-Vantaa Airport", 60.3172, 24.9633),
    ("ESSA", "Stockholm-Arlanda Airport", 59.6519, 17.9186),
    ("EKCH", "Copenhagen Kastrup Airport", 55.6179, 12.656),
    ("ENGM", "Oslo Gardermoen Airport", 60.1939, 11.1004),
    ("EETN", "Tallinn Lennart Meri Airport", 59.4133, 24.8328),
    ("EVRA", "Riga International Airport", 56.9236, 23.9711),
    ("EYVI", "Vilnius International Airport", 54.6341, 25.2858),
    ("BIKF", "Keflavik International Airport", 63.985, -22.6056),
    ("EFRO", "Rovaniemi Airport", 66.5648, 25.8304),
    ("EFOU", "Oulu Airport", 64.9301, 25.3546),
];

/// What the mock server should get wrong, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fault {
    #[default]
    None,
    /// Weather requests fail with a 500.
    WeatherDown,
    /// Weather responds with a body missing every block.
    WeatherGarbled,
    /// The airports payload carries no list.
    AirportsMissingList,
    /// `/newgame` responds without a status.
    NewgameNoStatus,
    /// `/flyto` responds with an empty object.
    FlytoBroken,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockAirport {
    pub icao_code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub has_charging_station: bool,
}

#[derive(Debug)]
struct RunningGame {
    co2_points: i64,
    flights: i64,
    location_icao: String,
}

struct ServerInner {
    airports: RefCell<Vec<MockAirport>>,
    game: RefCell<Option<RunningGame>>,
    game_id: u32,
    fault: RefCell<Fault>,
    requests: RefCell<Vec<String>>,
}

/// Deterministic in-process server. Cloning is cheap; every clone serves the
/// same fleet and the same running game.
#[derive(Clone)]
pub struct MockServer {
    inner: Rc<ServerInner>,
}

impl MockServer {
    /// Build a server whose fleet and game id derive from `seed` alone.
    #[must_use]
    pub fn generate(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let home = FLEET[0];
        let mut airports = vec![MockAirport {
            icao_code: home.0.to_string(),
            name: home.1.to_string(),
            latitude: home.2,
            longitude: home.3,
            has_charging_station: true,
        }];
        let mut rest: Vec<_> = FLEET[1..].to_vec();
        rest.shuffle(&mut rng);
        let extra = rng.gen_range(4..=rest.len());
        airports.extend(rest.into_iter().take(extra).map(|(icao, name, lat, lon)| {
            MockAirport {
                icao_code: icao.to_string(),
                name: name.to_string(),
                latitude: lat,
                longitude: lon,
                has_charging_station: rng.gen_bool(0.5),
            }
        }));
        let game_id = rng.gen_range(1000..10_000);

        Self {
            inner: Rc::new(ServerInner {
                airports: RefCell::new(airports),
                game: RefCell::new(None),
                game_id,
                fault: RefCell::new(Fault::None),
                requests: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn set_fault(&self, fault: Fault) {
        *self.inner.fault.borrow_mut() = fault;
    }

    /// Shrink the fleet to its first `keep` airports.
    pub fn retain_airports(&self, keep: usize) {
        self.inner.airports.borrow_mut().truncate(keep);
    }

    #[must_use]
    pub fn airports(&self) -> Vec<MockAirport> {
        self.inner.airports.borrow().clone()
    }

    #[must_use]
    pub fn airport_count(&self) -> usize {
        self.inner.airports.borrow().len()
    }

    #[must_use]
    pub fn game_id(&self) -> u32 {
        self.inner.game_id
    }

    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.inner.requests.borrow().clone()
    }

    /// Money the running game would report right now.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn money(&self) -> f64 {
        let flights = self
            .inner
            .game
            .borrow()
            .as_ref()
            .map_or(0, |game| game.flights);
        1000.0 - 50.0 * flights as f64
    }

    fn respond(&self, url: &str) -> Result<String, GameError> {
        let fault = *self.inner.fault.borrow();
        if url.contains("/newgame") {
            return self.respond_newgame(url, fault);
        }
        if url.contains("/airports") {
            return Ok(self.respond_airports(fault));
        }
        if url.contains("/flyto") {
            return self.respond_flyto(url, fault);
        }
        if url.contains("openweathermap") {
            return respond_weather(url, fault);
        }
        Err(GameError::Status {
            url: url.to_string(),
            status: 404,
        })
    }

    fn respond_newgame(&self, url: &str, fault: Fault) -> Result<String, GameError> {
        if fault == Fault::NewgameNoStatus {
            return Ok("{}".to_string());
        }
        let player = query_param(url, "player").unwrap_or_default();
        let home = query_param(url, "loc").unwrap_or_else(|| "EFHK".to_string());
        let Some(airport) = self.find_airport(&home) else {
            return Err(GameError::Status {
                url: url.to_string(),
                status: 404,
            });
        };
        *self.inner.game.borrow_mut() = Some(RunningGame {
            co2_points: 0,
            flights: 0,
            location_icao: home,
        });
        let body = json!({
            "status": {
                "id": self.inner.game_id,
                "name": player,
                "co2_points": 0,
                "money": self.money(),
                "location": airport_json(&airport),
            },
            "goals": [
                {
                    "name": "Frequent Flyer",
                    "description": "Visit five different airports",
                    "icon": "plane",
                    "reached": false
                },
                {
                    "name": "Green Lightning",
                    "description": "Finish with half the budget left",
                    "icon": "bolt",
                    "reached": false
                }
            ]
        });
        Ok(body.to_string())
    }

    fn respond_airports(&self, fault: Fault) -> String {
        if fault == Fault::AirportsMissingList {
            return json!({"message": "maintenance"}).to_string();
        }
        let airports: Vec<_> = self
            .inner
            .airports
            .borrow()
            .iter()
            .map(|airport| {
                json!({
                    "icao_code": airport.icao_code,
                    "name": airport.name,
                    "country": "FI",
                    "latitude": airport.latitude,
                    "longitude": airport.longitude,
                    "has_charging_station": airport.has_charging_station,
                })
            })
            .collect();
        json!({ "airports": airports }).to_string()
    }

    fn respond_flyto(&self, url: &str, fault: Fault) -> Result<String, GameError> {
        if fault == Fault::FlytoBroken {
            return Ok("{}".to_string());
        }
        let dest = query_param(url, "dest").unwrap_or_default();
        let consumption: i64 = query_param(url, "consumption")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(100);
        let Some(airport) = self.find_airport(&dest) else {
            return Err(GameError::Status {
                url: url.to_string(),
                status: 404,
            });
        };
        {
            let mut game = self.inner.game.borrow_mut();
            let Some(game) = game.as_mut() else {
                return Err(GameError::Status {
                    url: url.to_string(),
                    status: 400,
                });
            };
            game.co2_points += consumption;
            game.flights += 1;
            game.location_icao = dest;
        }
        let co2_points = self
            .inner
            .game
            .borrow()
            .as_ref()
            .map_or(0, |game| game.co2_points);
        // Like the reference server, fly responses never name the player.
        let body = json!({
            "status": {
                "id": self.inner.game_id,
                "co2_points": co2_points,
                "money": self.money(),
                "location": airport_json(&airport),
            }
        });
        Ok(body.to_string())
    }

    fn find_airport(&self, icao: &str) -> Option<MockAirport> {
        self.inner
            .airports
            .borrow()
            .iter()
            .find(|airport| airport.icao_code == icao)
            .cloned()
    }
}

#[async_trait(?Send)]
impl Transport for MockServer {
    async fn get_text(&self, url: &str) -> Result<String, GameError> {
        self.inner.requests.borrow_mut().push(url.to_string());
        self.respond(url)
    }
}

fn airport_json(airport: &MockAirport) -> serde_json::Value {
    json!({
        "name": airport.name,
        "icao_code": airport.icao_code,
        "latitude": airport.latitude,
        "longitude": airport.longitude,
    })
}

fn respond_weather(url: &str, fault: Fault) -> Result<String, GameError> {
    match fault {
        Fault::WeatherDown => Err(GameError::Status {
            url: url.to_string(),
            status: 500,
        }),
        Fault::WeatherGarbled => Ok(json!({"cod": 200}).to_string()),
        _ => {
            let latitude: f64 = query_param(url, "lat")
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(60.0);
            let longitude: f64 = query_param(url, "lon")
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(24.0);
            let kinds = [
                ("01d", "clear sky"),
                ("02d", "few clouds"),
                ("10d", "light rain"),
                ("13d", "light snow"),
            ];
            let pick = (latitude.to_bits() ^ longitude.to_bits()) as usize % kinds.len();
            let (icon, description) = kinds[pick];
            let temp = ((25.0 - (latitude - 50.0)) * 10.0).round() / 10.0;
            let wind = ((longitude.abs() % 9.0) * 10.0).round() / 10.0;
            Ok(json!({
                "main": {"temp": temp},
                "weather": [{"description": description, "icon": icon}],
                "wind": {"speed": wind},
            })
            .to_string())
        }
    }
}

fn query_param(url: &str, key: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then(|| v.to_string())
    })
}

/// Records everything the session writes to the status and airport panels.
#[derive(Clone, Default)]
pub struct RecordingView {
    player_name: Rc<RefCell<Option<String>>>,
    consumed: Rc<RefCell<Option<i64>>>,
    budget: Rc<RefCell<Option<i64>>>,
    money: Rc<RefCell<Option<f64>>>,
    airport_name: Rc<RefCell<Option<String>>>,
    weather: Rc<RefCell<Option<WeatherSnapshot>>>,
    notices: Rc<RefCell<Vec<String>>>,
}

impl RecordingView {
    #[must_use]
    pub fn player_name(&self) -> Option<String> {
        self.player_name.borrow().clone()
    }

    #[must_use]
    pub fn consumed(&self) -> Option<i64> {
        *self.consumed.borrow()
    }

    #[must_use]
    pub fn budget(&self) -> Option<i64> {
        *self.budget.borrow()
    }

    #[must_use]
    pub fn money(&self) -> Option<f64> {
        *self.money.borrow()
    }

    #[must_use]
    pub fn airport_name(&self) -> Option<String> {
        self.airport_name.borrow().clone()
    }

    #[must_use]
    pub fn weather(&self) -> Option<WeatherSnapshot> {
        self.weather.borrow().clone()
    }

    #[must_use]
    pub fn notices(&self) -> Vec<String> {
        self.notices.borrow().clone()
    }
}

impl GameView for RecordingView {
    fn set_player_name(&self, name: &str) {
        *self.player_name.borrow_mut() = Some(name.to_string());
    }

    fn set_consumed(&self, co2_points: i64) {
        *self.consumed.borrow_mut() = Some(co2_points);
    }

    fn set_budget(&self, remaining: i64) {
        *self.budget.borrow_mut() = Some(remaining);
    }

    fn set_money(&self, money: f64) {
        *self.money.borrow_mut() = Some(money);
    }

    fn set_airport_name(&self, name: &str) {
        *self.airport_name.borrow_mut() = Some(name.to_string());
    }

    fn set_weather(&self, weather: &WeatherSnapshot) {
        *self.weather.borrow_mut() = Some(weather.clone());
    }

    fn notify(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }
}

/// Records marker renders, animations, and visited pins.
#[derive(Clone, Default)]
pub struct RecordingMap {
    markers: Rc<RefCell<Vec<AirportMarker>>>,
    renders: Rc<RefCell<usize>>,
    fly_calls: Rc<RefCell<Vec<(f64, f64, u8)>>>,
    visited: Rc<RefCell<Vec<(String, f64, f64)>>>,
}

impl RecordingMap {
    #[must_use]
    pub fn markers(&self) -> Vec<AirportMarker> {
        self.markers.borrow().clone()
    }

    #[must_use]
    pub fn render_count(&self) -> usize {
        *self.renders.borrow()
    }

    #[must_use]
    pub fn fly_calls(&self) -> Vec<(f64, f64, u8)> {
        self.fly_calls.borrow().clone()
    }

    #[must_use]
    pub fn visited(&self) -> Vec<(String, f64, f64)> {
        self.visited.borrow().clone()
    }
}

impl MapView for RecordingMap {
    fn render_airports(&self, markers: &[AirportMarker]) {
        *self.renders.borrow_mut() += 1;
        *self.markers.borrow_mut() = markers.to_vec();
    }

    fn fly_to(&self, latitude: f64, longitude: f64, zoom: u8) {
        self.fly_calls.borrow_mut().push((latitude, longitude, zoom));
    }

    fn place_visited_marker(&self, name: &str, latitude: f64, longitude: f64) {
        self.visited
            .borrow_mut()
            .push((name.to_string(), latitude, longitude));
    }
}

/// One fully wired session over mock surfaces.
pub struct TestRig {
    pub server: MockServer,
    pub view: RecordingView,
    pub map: RecordingMap,
    pub session: GameSession<MockServer, RecordingView, RecordingMap>,
}

impl TestRig {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let server = MockServer::generate(seed);
        let view = RecordingView::default();
        let map = RecordingMap::default();
        let mut config = GameConfig::default_config();
        config.weather_api_key = "qa-key".to_string();
        let session = GameSession::new(server.clone(), view.clone(), map.clone(), config);
        Self {
            server,
            view,
            map,
            session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn the_same_seed_yields_the_same_fleet() {
        let first = MockServer::generate(7).airports();
        let second = MockServer::generate(7).airports();
        assert_eq!(first, second);
        assert!(first.len() >= 5);
        assert_eq!(first[0].icao_code, "EFHK");
    }

    #[test]
    fn different_seeds_usually_differ() {
        let first = MockServer::generate(1).airports();
        let second = MockServer::generate(2).airports();
        assert_ne!(first, second);
    }

    #[test]
    fn newgame_resets_the_running_game() {
        let server = MockServer::generate(7);
        let newgame = server
            .respond("http://x/newgame?player=Ana&loc=EFHK")
            .unwrap();
        let parsed: Value = serde_json::from_str(&newgame).unwrap();
        assert_eq!(parsed["status"]["co2_points"], 0);
        assert_eq!(parsed["status"]["name"], "Ana");
        assert!(parsed["goals"].as_array().is_some_and(|g| !g.is_empty()));

        let dest = &server.airports()[1].icao_code.clone();
        let flyto = server
            .respond(&format!("http://x/flyto?game=1&dest={dest}&consumption=100"))
            .unwrap();
        let parsed: Value = serde_json::from_str(&flyto).unwrap();
        assert_eq!(parsed["status"]["co2_points"], 100);
        assert!(parsed["status"].get("name").is_none());

        let again = server
            .respond("http://x/newgame?player=Ana&loc=EFHK")
            .unwrap();
        let parsed: Value = serde_json::from_str(&again).unwrap();
        assert_eq!(parsed["status"]["co2_points"], 0);
    }

    #[test]
    fn flying_to_an_unknown_airport_is_a_404() {
        let server = MockServer::generate(7);
        server
            .respond("http://x/newgame?player=Ana&loc=EFHK")
            .unwrap();
        let err = server
            .respond("http://x/flyto?game=1&dest=ZZZZ&consumption=100")
            .unwrap_err();
        assert!(matches!(err, GameError::Status { status: 404, .. }));
    }

    #[test]
    fn weather_is_deterministic_for_a_coordinate() {
        let one = respond_weather("http://w?lat=60.3&lon=24.9&appid=k", Fault::None).unwrap();
        let two = respond_weather("http://w?lat=60.3&lon=24.9&appid=k", Fault::None).unwrap();
        assert_eq!(one, two);
        let parsed: Value = serde_json::from_str(&one).unwrap();
        assert!(parsed["main"]["temp"].is_number());
    }

    #[test]
    fn query_params_come_out_verbatim() {
        let url = "http://x/flyto?game=42&dest=ESSA&consumption=100";
        assert_eq!(query_param(url, "game").as_deref(), Some("42"));
        assert_eq!(query_param(url, "dest").as_deref(), Some("ESSA"));
        assert_eq!(query_param(url, "missing"), None);
        assert_eq!(query_param("http://x/airports", "dest"), None);
    }
}
