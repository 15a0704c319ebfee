//! Error type shared by the fetch, decode, select and render stages.
//!
//! Every variant is fatal to a run: nothing is retried or recovered locally.

use thiserror::Error;

/// Errors produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The query service answered with a non-200 HTTP status.
    #[error("request failed with HTTP {status} (GET {url})")]
    Fetch { status: u16, url: String },

    /// The request never produced a response (DNS, TLS, connection reset, ...).
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered 200 but the body is an ArcGIS error document.
    #[error("query service error {code}: {message}")]
    Service { code: i64, message: String },

    /// The body is not a usable GeoJSON FeatureCollection.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// A selection was requested from a collection with no features.
    #[error("empty collection: {0}")]
    EmptyCollection(String),

    /// Identifier lookup found no matching feature.
    #[error("not found: {0}")]
    NotFound(String),

    /// A caller-supplied code or option is invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("render failed: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand used by the decoder.
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedPayload(msg.into())
    }

    /// Wraps any drawing backend failure.
    pub(crate) fn render<E: std::fmt::Debug>(e: E) -> Self {
        Error::Render(format!("{e:?}"))
    }
}
