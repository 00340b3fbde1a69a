//! Wire types for the game server API.
//!
//! These mirror the JSON shapes the server produces. Fields a server may omit
//! stay `Option` so their absence surfaces as a validation failure at the
//! point of use rather than a parse failure.

use serde::{Deserialize, Deserializer, Serialize};

/// One airport as listed by `/airports`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub name: String,
    pub icao_code: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub has_charging_station: Option<bool>,
}

/// Response wrapper for `/airports`. A missing collection means
/// "nothing new to show", not a protocol error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirportList {
    #[serde(default)]
    pub airports: Option<Vec<Airport>>,
}

/// Where the player currently is, as reported inside a status payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icao_code: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub has_charging_station: Option<bool>,
}

impl Location {
    /// Both coordinates, or nothing.
    #[must_use]
    pub const fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Name plus both coordinates, or nothing. Detail updates refuse
    /// partially described locations.
    #[must_use]
    pub fn described(&self) -> Option<(&str, f64, f64)> {
        match (self.name.as_deref(), self.coordinates()) {
            (Some(name), Some((lat, lon))) => Some((name, lat, lon)),
            _ => None,
        }
    }
}

/// Player state portion of a game payload. Replaced wholesale on every
/// state-changing call, never edited field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStatus {
    #[serde(default, deserialize_with = "id_from_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub co2_points: i64,
    #[serde(default)]
    pub diamonds: Option<i64>,
    #[serde(default)]
    pub money: Option<f64>,
    #[serde(default)]
    pub location: Option<Location>,
}

/// One game goal as returned by `/newgame`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub reached: bool,
}

/// Full game payload: the session snapshot type. Fly responses carry only a
/// status, so the goals from `/newgame` persist across transitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    #[serde(default)]
    pub status: Option<GameStatus>,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

/// Servers disagree on whether a game id is a number or a string.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|id| match id {
        RawId::Text(text) => text,
        RawId::Number(n) => n.to_string(),
    }))
}

/// Returns true when `code` has the shape of an ICAO airport identifier.
#[must_use]
pub fn is_valid_icao(code: &str) -> bool {
    regex::Regex::new(r"^[A-Z0-9]{4}$")
        .map(|re| re.is_match(code))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEWGAME_BODY: &str = r#"{
        "status": {
            "name": "Ana",
            "co2_points": 0,
            "diamonds": 0,
            "money": 1000,
            "location": {
                "name": "Helsinki Vantaa Airport",
                "icao_code": "EFHK",
                "latitude": 60.3172,
                "longitude": 24.9633,
                "country": "FI",
                "has_charging_station": true
            }
        },
        "goals": [
            {"name": "Low Emissions", "description": "Finish under budget", "icon": "leaf", "reached": false}
        ]
    }"#;

    #[test]
    fn parses_a_full_newgame_payload() {
        let data: GameData = serde_json::from_str(NEWGAME_BODY).unwrap();
        let status = data.status.expect("status present");
        assert_eq!(status.name.as_deref(), Some("Ana"));
        assert_eq!(status.co2_points, 0);
        assert_eq!(status.money, Some(1000.0));
        assert!(status.id.is_none());
        let location = status.location.expect("location present");
        assert_eq!(location.icao_code.as_deref(), Some("EFHK"));
        assert_eq!(location.has_charging_station, Some(true));
        assert_eq!(data.goals.len(), 1);
        assert!(!data.goals[0].reached);
    }

    #[test]
    fn game_id_tolerates_numbers_and_strings() {
        let numeric: GameStatus = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(numeric.id.as_deref(), Some("7"));
        let text: GameStatus = serde_json::from_str(r#"{"id": "7f3a"}"#).unwrap();
        assert_eq!(text.id.as_deref(), Some("7f3a"));
        let absent: GameStatus = serde_json::from_str("{}").unwrap();
        assert!(absent.id.is_none());
    }

    #[test]
    fn empty_objects_parse_to_absent_fields() {
        let data: GameData = serde_json::from_str("{}").unwrap();
        assert!(data.status.is_none());
        assert!(data.goals.is_empty());
        let list: AirportList = serde_json::from_str("{}").unwrap();
        assert!(list.airports.is_none());
    }

    #[test]
    fn airport_list_parses_optional_fields() {
        let body = r#"{"airports": [
            {"name": "Arlanda", "icao_code": "ESSA", "latitude": 59.65, "longitude": 17.92}
        ]}"#;
        let list: AirportList = serde_json::from_str(body).unwrap();
        let airports = list.airports.unwrap();
        assert_eq!(airports.len(), 1);
        assert_eq!(airports[0].icao_code, "ESSA");
        assert!(airports[0].country.is_none());
    }

    #[test]
    fn described_requires_name_and_both_coordinates() {
        let full = Location {
            name: Some("Arlanda".into()),
            latitude: Some(59.65),
            longitude: Some(17.92),
            ..Location::default()
        };
        assert_eq!(full.described(), Some(("Arlanda", 59.65, 17.92)));

        let missing_latitude = Location {
            name: Some("Arlanda".into()),
            longitude: Some(17.92),
            ..Location::default()
        };
        assert!(missing_latitude.described().is_none());
        assert!(missing_latitude.coordinates().is_none());

        let missing_name = Location {
            latitude: Some(59.65),
            longitude: Some(17.92),
            ..Location::default()
        };
        assert!(missing_name.described().is_none());
        assert!(missing_name.coordinates().is_some());
    }

    #[test]
    fn icao_codes_are_four_uppercase_characters() {
        assert!(is_valid_icao("EFHK"));
        assert!(is_valid_icao("ESSA"));
        assert!(is_valid_icao("K1G4"));
        assert!(!is_valid_icao("efhk"));
        assert!(!is_valid_icao("EFH"));
        assert!(!is_valid_icao("EFHKX"));
        assert!(!is_valid_icao(""));
    }
}
