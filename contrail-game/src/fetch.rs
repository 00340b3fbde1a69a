//! Fetch-and-decode helper shared by every server call.

use serde::de::DeserializeOwned;

use crate::error::GameError;
use crate::ports::{GameView, Transport};

/// Notice shown whenever a server call cannot produce usable data.
pub const FETCH_FAILED_NOTICE: &str =
    "Failed to fetch data from the server. Check the console for details.";

/// GET `url` and decode the JSON body into `T`.
///
/// Any failure is logged, surfaced through [`GameView::notify`], and then
/// returned, so callers never proceed with undefined data.
///
/// # Errors
///
/// `Transport`/`Status` from the transport layer, `Parse` for a body that is
/// not valid JSON.
pub async fn fetch_json<T, TR, V>(transport: &TR, view: &V, url: &str) -> Result<T, GameError>
where
    T: DeserializeOwned,
    TR: Transport,
    V: GameView,
{
    let body = match transport.get_text(url).await {
        Ok(body) => body,
        Err(err) => return Err(report(view, err)),
    };
    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(err) => Err(report(
            view,
            GameError::Parse {
                url: url.to_string(),
                detail: err.to_string(),
            },
        )),
    }
}

fn report<V: GameView>(view: &V, err: GameError) -> GameError {
    log::error!("fetch failed ({:?}): {err}", err.kind());
    view.notify(FETCH_FAILED_NOTICE);
    err
}
