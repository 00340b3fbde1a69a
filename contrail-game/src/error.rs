//! Error taxonomy for client operations.

use thiserror::Error;

/// Coarse failure classes, used for logging and QA reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never produced a usable response.
    Transport,
    /// The response body was not valid JSON.
    Parse,
    /// Well-formed payload missing the fields an operation needs.
    Validation,
    /// Operation attempted without the state it requires.
    Precondition,
}

/// Errors produced by session operations.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("request to {url} failed: {detail}")]
    Transport { url: String, detail: String },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("response from {url} is not valid JSON: {detail}")]
    Parse { url: String, detail: String },

    #[error("game data is unusable: {0}")]
    InvalidGameData(&'static str),

    #[error("weather data is unusable: {0}")]
    InvalidWeatherData(&'static str),

    #[error("'{0}' is not an ICAO airport code")]
    InvalidDestination(String),

    #[error("no active game session")]
    NoSession,
}

impl GameError {
    /// Classify this error for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Transport { .. } | Self::Status { .. } => FailureKind::Transport,
            Self::Parse { .. } => FailureKind::Parse,
            Self::InvalidGameData(_)
            | Self::InvalidWeatherData(_)
            | Self::InvalidDestination(_) => FailureKind::Validation,
            Self::NoSession => FailureKind::Precondition,
        }
    }
}
