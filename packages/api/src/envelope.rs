//! The `{ success, data, message }` wrapper every backend response uses.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

const DEFAULT_FAILURE: &str = "Request failed. Please try again.";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// The payload of a successful response.
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(self.rejection());
        }
        self.data.ok_or(ApiError::MissingData)
    }

    /// Succeed without requiring a payload.
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.success {
            Ok(())
        } else {
            Err(self.rejection())
        }
    }

    fn rejection(&self) -> ApiError {
        ApiError::Rejected(
            self.message
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE.to_string()),
        )
    }
}

/// Decode a response body. A non-2xx status always yields `success == false`.
pub fn decode<T: DeserializeOwned>(status: u16, body: &str) -> Result<ApiResponse<T>, ApiError> {
    let ok = (200..300).contains(&status);
    match serde_json::from_str::<ApiResponse<T>>(body) {
        Ok(mut envelope) => {
            if !ok {
                envelope.success = false;
            }
            Ok(envelope)
        }
        Err(_) if !ok => Err(ApiError::Status(status)),
        Err(e) => Err(ApiError::Decode(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success() {
        let env: ApiResponse<Vec<u32>> = decode(200, r#"{"success":true,"data":[1,2]}"#).unwrap();
        assert_eq!(env.into_data().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_non_2xx_forces_failure() {
        let env: ApiResponse<u32> =
            decode(401, r#"{"success":true,"data":1,"message":"Token expired"}"#).unwrap();
        assert!(!env.success);
        assert_eq!(env.into_data().unwrap_err().to_string(), "Token expired");
    }

    #[test]
    fn test_non_json_error_body() {
        let err = decode::<u32>(502, "<html>Bad gateway</html>").unwrap_err();
        assert!(matches!(err, ApiError::Status(502)));
    }

    #[test]
    fn test_missing_data() {
        let env: ApiResponse<u32> = decode(200, r#"{"success":true}"#).unwrap();
        assert!(matches!(env.into_data(), Err(ApiError::MissingData)));

        let env: ApiResponse<u32> = decode(200, r#"{"success":true,"data":null}"#).unwrap();
        assert!(env.into_result().is_ok());
    }

    #[test]
    fn test_rejection_without_message() {
        let env: ApiResponse<u32> = decode(200, r#"{"success":false}"#).unwrap();
        assert_eq!(env.into_result().unwrap_err().to_string(), DEFAULT_FAILURE);
    }
}
