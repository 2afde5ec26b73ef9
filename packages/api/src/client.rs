//! # REST client for the storefront backend
//!
//! [`ApiClient`] wraps a [`reqwest::Client`], the configured base URL and the
//! optional bearer token of the signed-in customer. Every call decodes the
//! `{ success, data, message }` envelope through [`crate::envelope::decode`].
//!
//! | Method | Endpoint |
//! |--------|----------|
//! | [`phone_exists`](StorefrontBackend::phone_exists) | `GET /auth/phoneexist?phone=` |
//! | [`verify_id_token`](StorefrontBackend::verify_id_token) | `POST /auth/verify-firebase-token` |
//! | [`register`](StorefrontBackend::register) | `POST /auth/register` |
//! | [`restaurants`](ApiClient::restaurants) | `GET /restaurants` |
//! | [`areas`](ApiClient::areas) | `GET /areas` |
//! | [`customer`](ApiClient::customer) | `GET /customers/{id}` |
//! | [`update_address`](ApiClient::update_address) | `PATCH /customers/{id}/address` |
//! | [`update_push_token`](ApiClient::update_push_token) | `PATCH /customers/{id}/push-token` |

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use store::{Area, Customer, Restaurant, Session, UpdateAddressPayload};

use crate::envelope::{self, ApiResponse};
use crate::error::ApiError;

/// `data` of `GET /auth/phoneexist`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoneExistence {
    pub phone_exist: Option<bool>,
}

/// Body of `POST /auth/register`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// What the backend hands back for a verified provider token.
#[derive(Clone, Debug, PartialEq)]
pub struct VerifiedSession {
    pub session: Session,
    pub customer: Option<Customer>,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    session: Option<WireSession>,
    user: Option<Customer>,
}

#[derive(Debug, Deserialize)]
struct WireSession {
    #[serde(rename = "authToken")]
    auth_token: Option<String>,
    expires_at: Option<Value>,
}

/// Accepts unix seconds as a number or string, or an RFC 3339 timestamp.
fn parse_expiry(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok().or_else(|| {
            chrono::DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|t| t.timestamp())
        }),
        _ => None,
    }
}

impl VerifyData {
    fn into_verified(self) -> Option<VerifiedSession> {
        let wire = self.session?;
        let token = wire.auth_token.filter(|t| !t.is_empty())?;
        Some(VerifiedSession {
            session: Session::new(token, wire.expires_at.as_ref().and_then(parse_expiry)),
            customer: self.user,
        })
    }
}

const VERIFY_FAILED: &str = "OTP verification failed. Please try again.";

/// The backend calls the sign-in and sign-up flows depend on.
pub trait StorefrontBackend {
    fn phone_exists(
        &self,
        phone: &str,
    ) -> impl Future<Output = Result<ApiResponse<PhoneExistence>, ApiError>>;

    fn verify_id_token(
        &self,
        id_token: &str,
    ) -> impl Future<Output = Result<VerifiedSession, ApiError>>;

    fn register(&self, registration: &Registration) -> impl Future<Output = Result<(), ApiError>>;
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// A copy of this client that authenticates as `token`.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = self.authorized(builder).send().await.map_err(|e| {
            tracing::warn!("Request failed: {e}");
            ApiError::Network(e)
        })?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        envelope::decode(status, &body)
    }

    pub async fn restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        self.send(self.http.get(self.url("/restaurants")))
            .await?
            .into_data()
    }

    pub async fn areas(&self) -> Result<Vec<Area>, ApiError> {
        self.send(self.http.get(self.url("/areas"))).await?.into_data()
    }

    pub async fn customer(&self, id: &str) -> Result<Customer, ApiError> {
        self.send(self.http.get(self.url(&format!("/customers/{id}"))))
            .await?
            .into_data()
    }

    /// Replace the customer's address. Returns the updated profile.
    pub async fn update_address(
        &self,
        id: &str,
        payload: &UpdateAddressPayload,
    ) -> Result<Customer, ApiError> {
        let request = self
            .http
            .patch(self.url(&format!("/customers/{id}/address")))
            .json(payload);
        self.send(request).await?.into_data()
    }

    pub async fn update_push_token(&self, id: &str, push_token: &str) -> Result<(), ApiError> {
        let request = self
            .http
            .patch(self.url(&format!("/customers/{id}/push-token")))
            .json(&serde_json::json!({ "pushToken": push_token }));
        self.send::<Value>(request).await?.into_result()
    }
}

impl StorefrontBackend for ApiClient {
    async fn phone_exists(&self, phone: &str) -> Result<ApiResponse<PhoneExistence>, ApiError> {
        let request = self
            .http
            .get(self.url("/auth/phoneexist"))
            .query(&[("phone", phone)]);
        self.send(request).await
    }

    async fn verify_id_token(&self, id_token: &str) -> Result<VerifiedSession, ApiError> {
        let request = self
            .http
            .post(self.url("/auth/verify-firebase-token"))
            .json(&serde_json::json!({ "idToken": id_token }));
        let envelope: ApiResponse<VerifyData> = self.send(request).await?;
        if !envelope.success {
            return Err(ApiError::Rejected(
                envelope
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| VERIFY_FAILED.to_string()),
            ));
        }
        envelope
            .data
            .and_then(VerifyData::into_verified)
            .ok_or_else(|| ApiError::Rejected(VERIFY_FAILED.to_string()))
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let request = self.http.post(self.url("/auth/register")).json(registration);
        self.send::<Value>(request).await?.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verify_data(json: &str) -> Option<VerifiedSession> {
        serde_json::from_str::<VerifyData>(json).unwrap().into_verified()
    }

    #[test]
    fn test_verify_data_with_numeric_expiry() {
        let verified = verify_data(
            r#"{ "session": { "authToken": "tok", "expires_at": 1700000000 },
                 "user": { "id": "c1", "name": "Ravi" } }"#,
        )
        .unwrap();
        assert_eq!(verified.session, Session::new("tok", Some(1_700_000_000)));
        assert_eq!(verified.customer.unwrap().id, "c1");
    }

    #[test]
    fn test_verify_data_with_timestamp_expiry() {
        let verified = verify_data(
            r#"{ "session": { "authToken": "tok", "expires_at": "2023-11-14T22:13:20Z" } }"#,
        )
        .unwrap();
        assert_eq!(verified.session.expires_at, Some(1_700_000_000));
        assert!(verified.customer.is_none());
    }

    #[test]
    fn test_verify_data_without_token() {
        assert!(verify_data(r#"{ "session": { "authToken": "" } }"#).is_none());
        assert!(verify_data(r#"{ "user": { "id": "c1" } }"#).is_none());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://localhost:3000/api/");
        assert_eq!(client.url("/areas"), "http://localhost:3000/api/areas");
    }

    #[test]
    fn test_registration_wire_shape() {
        let json = serde_json::to_value(Registration {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: "9999999999".into(),
        })
        .unwrap();
        assert_eq!(json["phone"], "9999999999");
    }
}
