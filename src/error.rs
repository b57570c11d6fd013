use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The server answered with a non-success status. `reason` is the
    /// human-readable text from the JSON body when the server provided
    /// one, otherwise a status-derived message.
    #[error("API error {status}: {reason}")]
    Api { status: u16, reason: String },

    /// An authenticated resource was requested without a token. Raised
    /// locally, before any network activity.
    #[error("endpoint requires authentication")]
    AuthenticationRequired,

    /// The configured cache path exists but is not a directory.
    #[error("cache path is not a directory: {0}")]
    CacheDir(PathBuf),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The response parsed, but did not have the promised shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("malformed chat link: {0}")]
    ChatLink(String),

    #[error("unknown chat link type {0:#04x}")]
    UnknownLinkType(u8),

    /// A lookup was invoked without any of its identifying parameters.
    #[error("missing parameter: specify {0}")]
    MissingParameter(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
