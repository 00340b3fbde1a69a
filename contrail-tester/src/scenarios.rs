//! Scenario catalog: each scenario drives a real [`GameSession`] over the
//! mock server and asserts what the panels, the map, and the wire saw.
//!
//! [`GameSession`]: contrail_game::GameSession

use std::time::{Duration, Instant};

use anyhow::{Result, bail, ensure};
use contrail_game::{
    FETCH_FAILED_NOTICE, FailureKind, GameError, INVALID_GAME_NOTICE, NO_SESSION_NOTICE,
    UNNAMED_PLAYER, WEATHER_INVALID_NOTICE,
};
use serde::Serialize;

use crate::harness::{Fault, TestRig};

/// One named scenario from the catalog.
#[derive(Debug)]
pub struct Scenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    kind: ScenarioKind,
}

#[derive(Debug, Clone, Copy)]
enum ScenarioKind {
    StartFlow,
    FlyChain,
    ValidationPolicy,
    NoSessionGuard,
    WeatherOutage,
    MarkerReplacement,
}

const CATALOG: [Scenario; 6] = [
    Scenario {
        key: "start-flow",
        name: "Start flow",
        description: "Starting a game fills the panels and renders one marker per airport",
        kind: ScenarioKind::StartFlow,
    },
    Scenario {
        key: "fly-chain",
        name: "Fly chain",
        description: "Consecutive flights burn the budget leg by leg and pin every stop",
        kind: ScenarioKind::FlyChain,
    },
    Scenario {
        key: "validation-policy",
        name: "Validation policy",
        description: "Unusable payloads are rejected with one notice and no partial state",
        kind: ScenarioKind::ValidationPolicy,
    },
    Scenario {
        key: "no-session-guard",
        name: "No-session guard",
        description: "Flying before a game starts never reaches the server",
        kind: ScenarioKind::NoSessionGuard,
    },
    Scenario {
        key: "weather-outage",
        name: "Weather outage",
        description: "A dead weather service costs one notice per landing, nothing else",
        kind: ScenarioKind::WeatherOutage,
    },
    Scenario {
        key: "marker-replacement",
        name: "Marker replacement",
        description: "Reloading destinations replaces the marker set and keeps visited pins",
        kind: ScenarioKind::MarkerReplacement,
    },
];

#[must_use]
pub fn catalog() -> &'static [Scenario] {
    &CATALOG
}

#[must_use]
pub fn find(key: &str) -> Option<&'static Scenario> {
    CATALOG.iter().find(|scenario| scenario.key == key)
}

/// `(key, description)` pairs for `--list-scenarios`.
#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG
        .iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

impl Scenario {
    async fn run(&self, seed: u64) -> Result<()> {
        match self.kind {
            ScenarioKind::StartFlow => start_flow(seed).await,
            ScenarioKind::FlyChain => fly_chain(seed).await,
            ScenarioKind::ValidationPolicy => validation_policy(seed).await,
            ScenarioKind::NoSessionGuard => no_session_guard(seed).await,
            ScenarioKind::WeatherOutage => weather_outage(seed).await,
            ScenarioKind::MarkerReplacement => marker_replacement(seed).await,
        }
    }
}

/// Outcome of running one scenario for a number of iterations.
#[derive(Debug, Serialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    pub average_duration: Duration,
    pub passed: bool,
}

/// Run `scenario` once per iteration, each with its own derived seed.
pub async fn run_scenario(
    scenario: &Scenario,
    base_seed: u64,
    iterations: usize,
    verbose: bool,
) -> ScenarioResult {
    let mut failures = Vec::new();
    let mut total = Duration::ZERO;

    for iteration in 0..iterations {
        let seed = base_seed.wrapping_add(iteration as u64);
        let started = Instant::now();
        let outcome = scenario.run(seed).await;
        total += started.elapsed();
        match outcome {
            Ok(()) => {
                if verbose {
                    log::info!("{}: seed {seed} passed", scenario.key);
                }
            }
            Err(err) => failures.push(format!("seed {seed}: {err:#}")),
        }
    }

    let successful_iterations = iterations - failures.len();
    let average_duration = u32::try_from(iterations.max(1))
        .map(|count| total / count)
        .unwrap_or_default();
    ScenarioResult {
        scenario_name: scenario.name.to_string(),
        iterations_run: iterations,
        successful_iterations,
        failures,
        average_duration,
        passed: successful_iterations == iterations,
    }
}

/// A clean start writes every panel, animates to the home airport, and
/// renders the whole fleet, with requests in newgame, weather, airports
/// order.
async fn start_flow(seed: u64) -> Result<()> {
    let mut rig = TestRig::new(seed);
    rig.session.start("Ana").await?;

    let budget = rig.session.config().total_budget;
    let cost = rig.session.config().flight_cost;
    ensure!(
        rig.view.player_name().as_deref() == Some("Ana"),
        "player name missing from the status panel"
    );
    ensure!(rig.view.consumed() == Some(0), "consumption should start at zero");
    ensure!(
        rig.view.budget() == Some(budget),
        "the budget should start untouched"
    );
    ensure!(
        rig.view.money() == Some(1000.0),
        "starting money not shown"
    );
    ensure!(
        rig.view.airport_name().as_deref() == Some("Helsinki-Vantaa Airport"),
        "home airport name missing"
    );
    let Some(weather) = rig.view.weather() else {
        bail!("weather never reached the panel");
    };
    ensure!(
        weather.icon_url.ends_with("@2x.png"),
        "weather icon url looks wrong: {}",
        weather.icon_url
    );
    ensure!(
        rig.view.notices().is_empty(),
        "a clean start raised notices: {:?}",
        rig.view.notices()
    );

    let markers = rig.map.markers();
    ensure!(
        markers.len() == rig.server.airport_count(),
        "expected {} markers, rendered {}",
        rig.server.airport_count(),
        markers.len()
    );
    ensure!(
        markers.iter().all(|marker| marker.consumption == cost),
        "every marker should quote the fixed flight cost"
    );
    let fly_calls = rig.map.fly_calls();
    ensure!(fly_calls.len() == 1, "expected one map animation");
    ensure!(
        fly_calls[0].2 == rig.session.config().fly_zoom,
        "animation should use the configured fly zoom"
    );
    ensure!(
        rig.map.visited().len() == 1,
        "the home airport should be pinned as visited"
    );

    let Some(snapshot) = rig.session.snapshot() else {
        bail!("no snapshot after a successful start");
    };
    let reported_id = snapshot.status.as_ref().and_then(|status| status.id.clone());
    ensure!(
        reported_id == Some(rig.server.game_id().to_string()),
        "numeric game ids should arrive as strings, got {reported_id:?}"
    );

    let requests = rig.server.requests();
    ensure!(
        requests.len() == 3,
        "expected newgame, weather, airports; got {requests:?}"
    );
    ensure!(
        requests[0].contains("/newgame") && requests[0].contains("player=Ana"),
        "first request should start the game: {}",
        requests[0]
    );
    ensure!(
        requests[1].contains("openweathermap") && requests[1].contains("appid=qa-key"),
        "second request should fetch weather with the configured key: {}",
        requests[1]
    );
    ensure!(
        requests[2].contains("/airports"),
        "third request should list airports: {}",
        requests[2]
    );
    Ok(())
}

/// Three consecutive flights: consumption accumulates, the budget shrinks by
/// the fixed cost per leg, goals persist, and every stop gets a visited pin.
async fn fly_chain(seed: u64) -> Result<()> {
    let mut rig = TestRig::new(seed);
    rig.session.start("Vera").await?;
    let budget = rig.session.config().total_budget;
    let cost = rig.session.config().flight_cost;

    let destinations: Vec<String> = rig
        .server
        .airports()
        .iter()
        .skip(1)
        .take(3)
        .map(|airport| airport.icao_code.clone())
        .collect();
    ensure!(destinations.len() == 3, "fleet too small for a three-leg chain");

    let mut flown: i64 = 0;
    for dest in &destinations {
        rig.session.fly_to(dest, cost).await?;
        flown += 1;
        ensure!(
            rig.view.consumed() == Some(cost * flown),
            "after {flown} legs the panel shows {:?} consumed",
            rig.view.consumed()
        );
        ensure!(
            rig.view.budget() == Some(budget - cost * flown),
            "after {flown} legs the panel shows {:?} remaining",
            rig.view.budget()
        );
    }

    // Fly responses never carry the player, so the panel shows the
    // placeholder from then on.
    ensure!(
        rig.view.player_name().as_deref() == Some(UNNAMED_PLAYER),
        "fly responses should blank the player name to the placeholder"
    );
    ensure!(
        rig.view.money() == Some(850.0),
        "three flights should cost 150 in fees, money shows {:?}",
        rig.view.money()
    );
    let Some(snapshot) = rig.session.snapshot() else {
        bail!("the snapshot vanished mid-game");
    };
    ensure!(
        !snapshot.goals.is_empty(),
        "goals from the start should survive every flight"
    );
    ensure!(
        rig.map.visited().len() == 4,
        "expected the start pin plus one per leg, got {}",
        rig.map.visited().len()
    );
    let last = rig.server.airports()[3].clone();
    ensure!(
        rig.view.airport_name().as_deref() == Some(last.name.as_str()),
        "the airport panel should show the last stop"
    );

    let requests = rig.server.requests();
    let fly_requests: Vec<_> = requests
        .iter()
        .filter(|url| url.contains("/flyto"))
        .collect();
    ensure!(fly_requests.len() == 3, "expected one request per leg");
    let issued_id = format!("game={}", rig.server.game_id());
    ensure!(
        fly_requests.iter().all(|url| url.contains(&issued_id)),
        "every fly request should carry the issued game id"
    );
    Ok(())
}

/// Unusable payloads all land on the same policy: reject the operation,
/// notify the player once, and leave the previous state untouched.
async fn validation_policy(seed: u64) -> Result<()> {
    // A newgame response without a status is rejected loudly.
    let mut rig = TestRig::new(seed);
    rig.server.set_fault(Fault::NewgameNoStatus);
    let Err(err) = rig.session.start("Noel").await else {
        bail!("start accepted a payload without a status");
    };
    ensure!(
        err.kind() == FailureKind::Validation,
        "expected a validation failure, got {err}"
    );
    ensure!(
        matches!(err, GameError::InvalidGameData(_)),
        "expected InvalidGameData, got {err}"
    );
    ensure!(
        rig.view.notices() == vec![INVALID_GAME_NOTICE.to_string()],
        "a rejected start should notify exactly once: {:?}",
        rig.view.notices()
    );
    ensure!(
        rig.map.render_count() == 0,
        "no markers may render on a rejected start"
    );

    // An airports payload without a list keeps the old markers, silently.
    let mut rig = TestRig::new(seed);
    rig.server.set_fault(Fault::AirportsMissingList);
    rig.session.start("Noel").await?;
    ensure!(
        rig.map.render_count() == 0,
        "a listless airports payload must not clear the map"
    );
    ensure!(
        rig.view.notices().is_empty(),
        "a missing airport list is not the player's problem"
    );

    // Garbled weather costs one notice and nothing else.
    let mut rig = TestRig::new(seed);
    rig.server.set_fault(Fault::WeatherGarbled);
    rig.session.start("Noel").await?;
    ensure!(
        rig.view.notices() == vec![WEATHER_INVALID_NOTICE.to_string()],
        "garbled weather should notify exactly once: {:?}",
        rig.view.notices()
    );
    ensure!(rig.view.weather().is_none(), "garbled weather must not render");
    ensure!(
        rig.map.render_count() == 1,
        "airports should still render after bad weather"
    );

    // A malformed destination code never reaches the wire.
    let mut rig = TestRig::new(seed);
    rig.session.start("Noel").await?;
    let requests_before = rig.server.requests().len();
    let Err(err) = rig.session.fly_to("ef", 100).await else {
        bail!("a lowercase two-letter code was accepted as a destination");
    };
    ensure!(
        matches!(&err, GameError::InvalidDestination(code) if code == "ef"),
        "expected InvalidDestination(\"ef\"), got {err}"
    );
    ensure!(
        rig.server.requests().len() == requests_before,
        "an invalid code must not hit the server"
    );
    ensure!(
        rig.view.notices().is_empty(),
        "destination typos are not alert-worthy"
    );

    // A flyto response without a status leaves the previous game running.
    let mut rig = TestRig::new(seed);
    rig.session.start("Noel").await?;
    rig.server.set_fault(Fault::FlytoBroken);
    let dest = rig.server.airports()[1].icao_code.clone();
    let Err(err) = rig.session.fly_to(&dest, 100).await else {
        bail!("fly accepted a payload without a status");
    };
    ensure!(
        matches!(err, GameError::InvalidGameData(_)),
        "expected InvalidGameData, got {err}"
    );
    ensure!(
        rig.session.snapshot().is_some(),
        "the previous game must survive a broken fly response"
    );
    ensure!(
        rig.view.consumed() == Some(0),
        "the status panel must keep the pre-fly numbers"
    );
    Ok(())
}

/// Flying before any game exists is refused locally.
async fn no_session_guard(seed: u64) -> Result<()> {
    let mut rig = TestRig::new(seed);
    let Err(err) = rig.session.fly_to("ESSA", 100).await else {
        bail!("fly succeeded without a started game");
    };
    ensure!(
        err.kind() == FailureKind::Precondition,
        "expected a precondition failure, got {err}"
    );
    ensure!(
        matches!(err, GameError::NoSession),
        "expected NoSession, got {err}"
    );
    ensure!(
        rig.view.notices() == vec![NO_SESSION_NOTICE.to_string()],
        "the player should be told to start a game first"
    );
    ensure!(
        rig.server.requests().is_empty(),
        "no request may leave the client without a session"
    );
    ensure!(
        rig.map.fly_calls().is_empty(),
        "the map must not animate without a session"
    );
    Ok(())
}

/// A dead weather service never blocks play: starts and flights succeed,
/// each landing costs exactly one fetch notice, and the weather slot stays
/// empty.
async fn weather_outage(seed: u64) -> Result<()> {
    let mut rig = TestRig::new(seed);
    rig.server.set_fault(Fault::WeatherDown);
    rig.session.start("Saga").await?;

    ensure!(
        rig.view.weather().is_none(),
        "no snapshot may render while the weather service is down"
    );
    ensure!(
        rig.view.airport_name().is_some(),
        "the airport name is written before the weather attempt"
    );
    ensure!(
        rig.view.notices() == vec![FETCH_FAILED_NOTICE.to_string()],
        "a weather outage should notify exactly once per landing: {:?}",
        rig.view.notices()
    );
    ensure!(
        rig.map.render_count() == 1,
        "airports should render despite the outage"
    );

    let cost = rig.session.config().flight_cost;
    let dest = rig.server.airports()[1].icao_code.clone();
    rig.session.fly_to(&dest, cost).await?;
    ensure!(
        rig.view.notices().len() == 2,
        "each landing should add one notice, got {:?}",
        rig.view.notices()
    );
    ensure!(
        rig.view.consumed() == Some(cost),
        "flying should still update the status panel"
    );
    Ok(())
}

/// Reloading destinations replaces the marker set wholesale while visited
/// pins stay where they are.
async fn marker_replacement(seed: u64) -> Result<()> {
    let mut rig = TestRig::new(seed);
    rig.session.start("Rene").await?;

    let before = rig.map.markers().len();
    ensure!(before > 2, "fleet too small to observe replacement");

    rig.server.retain_airports(2);
    rig.session.load_destinations().await?;
    ensure!(
        rig.map.render_count() == 2,
        "expected exactly two marker renders"
    );
    ensure!(
        rig.map.markers().len() == 2,
        "the marker set should be replaced, not appended to"
    );
    ensure!(
        rig.map.visited().len() == 1,
        "visited pins must outlive marker replacement"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_resolves() {
        for scenario in catalog() {
            assert!(find(scenario.key).is_some(), "{} not found", scenario.key);
        }
        assert!(find("no-such-scenario").is_none());
    }

    #[test]
    fn listing_matches_the_catalog() {
        let listed = list_scenarios();
        assert_eq!(listed.len(), catalog().len());
        assert_eq!(listed[0].0, "start-flow");
    }

    #[tokio::test]
    async fn the_whole_catalog_passes_on_a_clean_server() {
        for scenario in catalog() {
            let result = run_scenario(scenario, 2026, 3, false).await;
            assert_eq!(result.iterations_run, 3);
            assert!(
                result.passed,
                "{} failed: {:?}",
                scenario.key, result.failures
            );
        }
    }
}
