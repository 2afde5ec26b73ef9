use thiserror::Error;

/// Errors raised by the client store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize client state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
