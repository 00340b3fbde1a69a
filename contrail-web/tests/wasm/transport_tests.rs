//! Browser-only checks for the fetch transport.

use contrail_game::{GameError, Transport};
use contrail_web::http::WebTransport;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
async fn data_urls_round_trip_through_get_text() {
    let body = WebTransport
        .get_text("data:application/json,{\"ok\":true}")
        .await
        .expect("data url fetch");
    assert_eq!(body, "{\"ok\":true}");
}

#[wasm_bindgen_test]
async fn unreachable_schemes_map_to_transport_errors() {
    let err = WebTransport
        .get_text("nope://unroutable")
        .await
        .expect_err("scheme should be rejected");
    assert!(matches!(err, GameError::Transport { .. }));
}

#[wasm_bindgen_test]
async fn missing_paths_map_to_status_errors() {
    let err = WebTransport
        .get_text("/there-is-no-such-path")
        .await
        .expect_err("expected a 404");
    match err {
        GameError::Status { status, .. } => assert_eq!(status, 404),
        other => panic!("expected a status error, got {other}"),
    }
}
