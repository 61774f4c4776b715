use thiserror::Error;

/// Failures talking to the complaints API
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded with HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
