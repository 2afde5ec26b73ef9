//! # Firebase phone authentication over the Identity Toolkit REST API
//!
//! [`FirebasePhoneAuth`] implements [`PhoneAuthProvider`] with two calls:
//!
//! - `accounts:sendVerificationCode` takes the E.164 number and the reCAPTCHA
//!   token from the invisible widget, and returns a `sessionInfo` handle.
//! - `accounts:signInWithPhoneNumber` takes that handle and the SMS code, and
//!   returns the `idToken` the storefront backend verifies.
//!
//! Error codes in the response body are mapped to customer-readable text by
//! [`readable_error`].

use serde::Deserialize;
use serde_json::json;

use crate::auth::{AuthError, PhoneAuthProvider};
use crate::error::ApiError;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendCodeResponse {
    session_info: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Map an Identity Toolkit error code to the text shown in the dialog.
///
/// Codes may carry a detail suffix (`"TOO_MANY_ATTEMPTS_TRY_LATER : ..."`);
/// only the leading code is matched.
pub fn readable_error(message: &str) -> String {
    let code = message.split([' ', ':']).next().unwrap_or_default();
    let text = match code {
        "INVALID_CODE" => "Invalid OTP. Please try again.",
        "SESSION_EXPIRED" | "INVALID_SESSION_INFO" => "OTP expired. Please request a new one.",
        "INVALID_PHONE_NUMBER" | "MISSING_PHONE_NUMBER" => {
            "Please enter a valid 10-digit phone number."
        }
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts. Please try again later.",
        "QUOTA_EXCEEDED" => "SMS quota exceeded. Please try again later.",
        "CAPTCHA_CHECK_FAILED" | "MISSING_RECAPTCHA_TOKEN" | "INVALID_RECAPTCHA_TOKEN" => {
            "Verification failed. Please try again."
        }
        _ => return format!("Authentication failed: {message}"),
    };
    text.to_string()
}

#[derive(Clone, Debug)]
pub struct FirebasePhoneAuth {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl FirebasePhoneAuth {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: IDENTITY_TOOLKIT_URL.to_string(),
        }
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<T, AuthError> {
        if self.api_key.is_empty() {
            tracing::error!("Firebase API key is not configured");
            return Err(AuthError::Provider(
                "Phone sign-in is not available right now.".to_string(),
            ));
        }
        let response = self
            .http
            .post(format!("{}/accounts:{method}", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(ApiError::from)?;
        let ok = response.status().is_success();
        let text = response.text().await.map_err(ApiError::from)?;

        if !ok {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| text.clone());
            tracing::warn!("Identity Toolkit {method} failed: {message}");
            return Err(AuthError::Provider(readable_error(&message)));
        }
        serde_json::from_str(&text).map_err(|e| AuthError::Api(ApiError::Decode(e)))
    }
}

impl PhoneAuthProvider for FirebasePhoneAuth {
    async fn send_code(&self, phone_number: &str, challenge_token: &str) -> Result<String, AuthError> {
        let response: SendCodeResponse = self
            .call(
                "sendVerificationCode",
                json!({ "phoneNumber": phone_number, "recaptchaToken": challenge_token }),
            )
            .await?;
        Ok(response.session_info)
    }

    async fn confirm_code(&self, verification_id: &str, code: &str) -> Result<String, AuthError> {
        let response: SignInResponse = self
            .call(
                "signInWithPhoneNumber",
                json!({ "sessionInfo": verification_id, "code": code }),
            )
            .await?;
        Ok(response.id_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readable_error() {
        assert_eq!(readable_error("INVALID_CODE"), "Invalid OTP. Please try again.");
        assert_eq!(
            readable_error("TOO_MANY_ATTEMPTS_TRY_LATER : Try again later."),
            "Too many attempts. Please try again later."
        );
        assert_eq!(
            readable_error("SESSION_EXPIRED"),
            "OTP expired. Please request a new one."
        );
        assert_eq!(readable_error("WEIRD"), "Authentication failed: WEIRD");
    }

    #[test]
    fn test_error_body_shape() {
        let body: ErrorBody = serde_json::from_str(
            r#"{ "error": { "code": 400, "message": "INVALID_CODE", "errors": [] } }"#,
        )
        .unwrap();
        assert_eq!(body.error.message, "INVALID_CODE");
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let auth = FirebasePhoneAuth::new("");
        let err = auth.send_code("+919999999999", "token").await.unwrap_err();
        assert_eq!(err.to_string(), "Phone sign-in is not available right now.");
    }
}
