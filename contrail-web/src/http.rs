//! Browser transport over the fetch API.

use async_trait::async_trait;
use contrail_game::{GameError, Transport};
use gloo::net::http::Request;

/// [`Transport`] implementation backed by `fetch`. Stateless; copy freely.
#[derive(Clone, Copy, Default)]
pub struct WebTransport;

#[async_trait(?Send)]
impl Transport for WebTransport {
    async fn get_text(&self, url: &str) -> Result<String, GameError> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|err| GameError::Transport {
                url: url.to_string(),
                detail: err.to_string(),
            })?;
        if !response.ok() {
            return Err(GameError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }
        response.text().await.map_err(|err| GameError::Transport {
            url: url.to_string(),
            detail: err.to_string(),
        })
    }
}
