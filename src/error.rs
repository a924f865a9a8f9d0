#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Registry request failed with status {status}")]
    Status { status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Geolocation unavailable: {0}")]
    GeolocationUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl MarketError {
    /// True for failures of the registry request itself (transport or
    /// non-success status).
    pub fn is_network(&self) -> bool {
        matches!(self, MarketError::Http(_) | MarketError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
