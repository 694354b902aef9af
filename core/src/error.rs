//! Error types for the geo API client.
//!
//! # Design
//! Transport and JSON faults are wrapped transparently so callers see the
//! underlying `ureq` / `serde_json` error unchanged. A non-200 status becomes
//! `Api` carrying the server's `message` field. Records that lack a required
//! key surface as `MissingField`; no field is ever defaulted silently.

/// Errors returned by `GeoClient` and `GeoApi`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP round-trip itself failed (DNS, connect, I/O, timeout).
    #[error(transparent)]
    Transport(#[from] ureq::Error),

    /// The server answered with a status other than 200.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A key the record requires was absent from the response object.
    #[error("missing field `{0}`")]
    MissingField(String),

    /// A key was present but its value had the wrong shape.
    #[error("field `{field}` is not a valid {expected}")]
    InvalidField { field: String, expected: &'static str },

    /// Client configuration could not be assembled.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
