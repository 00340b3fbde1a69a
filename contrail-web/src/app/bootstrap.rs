//! Boot-time configuration loading.

use contrail_game::GameConfig;

#[cfg(target_arch = "wasm32")]
use yew::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::app::state::AppState;

/// Where the deployable configuration lives relative to the site root.
/// Editing that file retargets the client without a rebuild.
pub const CONFIG_ASSET_URL: &str = "/static/assets/data/config.json";

/// Decode a fetched config asset, falling back to the built-in defaults
/// when the body does not parse or fails validation.
#[must_use]
pub fn parse_config_asset(body: &str) -> GameConfig {
    match GameConfig::from_json(body) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("config asset rejected: {err}; using defaults");
            GameConfig::default_config()
        }
    }
}

/// Fetch the config asset. Missing or unreadable assets are not an error;
/// the built-in defaults keep the game playable.
#[cfg(target_arch = "wasm32")]
pub async fn load_game_config() -> GameConfig {
    use gloo::net::http::Request;

    if let Ok(response) = Request::get(CONFIG_ASSET_URL).send().await
        && response.ok()
        && let Ok(body) = response.text().await
    {
        return parse_config_asset(&body);
    }
    log::info!("no config asset; using built-in defaults");
    GameConfig::default_config()
}

/// Load configuration once on mount and flip `boot_ready` when done.
#[cfg(target_arch = "wasm32")]
#[hook]
pub fn use_bootstrap(state: &AppState) {
    let config = state.config.clone();
    let boot_ready = state.boot_ready.clone();
    use_effect_with((), move |()| {
        wasm_bindgen_futures::spawn_local(async move {
            config.set(load_game_config().await);
            boot_ready.set(true);
        });
        || {}
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_valid_asset_overrides_the_defaults() {
        let config = parse_config_asset(
            r#"{ "api_url": "https://game.example.net", "weather_api_key": "abc123" }"#,
        );
        assert_eq!(config.api_url, "https://game.example.net");
        assert_eq!(config.weather_api_key, "abc123");
        assert_eq!(config.start_airport, "EFHK");
    }

    #[test]
    fn a_broken_asset_falls_back_to_defaults() {
        let config = parse_config_asset("not json at all");
        assert_eq!(config, GameConfig::default_config());
    }
}
