use thiserror::Error;

/// Message shown for every failed fetch, whatever the cause.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch user data.";

/// Message shown when the API answered with a well-formed but empty batch.
pub const NO_DATA_MESSAGE: &str = "no data";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("unexpected response status {status}")]
    Status { status: u16 },
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Non-2xx answers count as transport failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }
}
