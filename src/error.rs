//! Error types for the gallery store and server

use thiserror::Error;

/// Result type alias for store and server operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the store/server boundary.
///
/// The drawing core (codec, paint, fill) never produces these; it degrades
/// malformed input to a valid drawing instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Drawing JSON failed the shape check
    #[error("Invalid drawing shape: {0}")]
    InvalidShape(String),

    /// Submission rejected (artist name, drawing)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Rotation secret missing or wrong
    #[error("Unauthorized")]
    Unauthorized,

    /// Rotation requested with an empty gallery
    #[error("No artworks in the gallery")]
    NoArtworks,

    /// Request body exceeded the configured limit
    #[error("Payload too large (limit {0} bytes)")]
    PayloadTooLarge(usize),

    /// Client exceeded the submission rate
    #[error("Rate limited, retry in {0}s")]
    RateLimited(u64),

    /// Filesystem failure in the store
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// JSON (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store worker thread has shut down
    #[error("Store worker unavailable: {0}")]
    WorkerGone(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// HTTP status the server answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::NotFound(_) | Error::NoArtworks => 404,
            Error::InvalidShape(_) | Error::InvalidInput(_) | Error::Serialization(_) => 400,
            Error::Unauthorized => 401,
            Error::PayloadTooLarge(_) => 413,
            Error::RateLimited(_) => 429,
            Error::Storage(_) | Error::WorkerGone(_) | Error::ConfigError(_) | Error::Other(_) => {
                500
            }
        }
    }
}
