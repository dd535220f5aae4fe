/// Shown when the location permission is not granted.
pub const PERMISSION_DENIED_MESSAGE: &str = "Access to location is needed to run the app";

/// Everything that can go wrong in one load cycle.
///
/// All variants end up as a single `ViewState::Error` carrying `to_string()`.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{}", PERMISSION_DENIED_MESSAGE)]
    PermissionDenied,

    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failure reported by the weather API; the text is the body's `message`.
    #[error("{0}")]
    Api(String),

    #[error("Failed to parse weather response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid weather API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
