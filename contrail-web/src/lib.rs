#![forbid(unsafe_code)]
//! Browser front end for the Contrail flight game.
//!
//! The crate wires the platform-agnostic core from `contrail-game` to a
//! Leaflet map and a Yew component tree. Everything here is an adapter:
//! the rules about budgets, validation, and request ordering live in the
//! core crate.

pub mod app;
pub mod components;
pub mod dom;
pub mod http;
pub mod leaflet;
pub mod logger;
pub mod map;
pub mod view;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;

/// Entry point invoked by the generated JS glue once the module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logger::init();
    yew::Renderer::<app::App>::new().render();
}
