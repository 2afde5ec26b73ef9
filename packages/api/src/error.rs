use thiserror::Error;

/// Errors raised while talking to the storefront backend or a third-party service.
///
/// `Display` is the text shown to the customer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error. Please try again.")]
    Network(#[from] reqwest::Error),

    #[error("Server returned status {0}")]
    Status(u16),

    #[error("Unexpected response from server")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Rejected(String),

    #[error("Unexpected response from server")]
    MissingData,
}
