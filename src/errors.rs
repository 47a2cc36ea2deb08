//! Classification of Discord API failures during a message fetch.
//!
//! The store maps serenity errors into this small taxonomy so the rest of
//! the pipeline never handles serenity types directly. The taxonomy exists
//! for logging only: the resolver collapses every variant to one
//! `Unavailable` outcome.

use serenity::http::HttpError;
use thiserror::Error;

/// Why a message fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Message deleted or never existed (HTTP 404).
    #[error("message not found")]
    NotFound,
    /// Visible but unauthorized (HTTP 403).
    #[error("missing permission to view message")]
    Forbidden,
    /// Any other network or protocol failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Classify a serenity error from a message fetch.
pub fn classify_fetch(err: serenity::Error) -> FetchError {
    match &err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)) => {
            classify_status(resp.status_code.as_u16(), &err)
        }
        _ => FetchError::Transport(err.to_string()),
    }
}

fn classify_status(status: u16, err: &serenity::Error) -> FetchError {
    match status {
        404 => FetchError::NotFound,
        403 => FetchError::Forbidden,
        _ => FetchError::Transport(err.to_string()),
    }
}
