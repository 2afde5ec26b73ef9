use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Malformed bridge message: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("{0}")]
    Location(String),

    #[error("Push token registration failed: {0}")]
    Push(#[from] api::ApiError),
}
