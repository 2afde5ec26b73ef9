//! # Push-token pairing
//!
//! The host mints a push token once at start-up. The page reports the
//! signed-in customer id whenever it knows it. Registration happens when both
//! are known, at most once per session, and is never retried.
//!
//! [`PushPairing::pending`] is the single place that decides readiness.

use std::future::Future;

use crate::error::BridgeError;

/// Where a paired token is registered.
pub trait PushTokenSink {
    fn register_push_token(
        &self,
        customer_id: &str,
        token: &str,
    ) -> impl Future<Output = Result<(), BridgeError>>;
}

impl PushTokenSink for api::ApiClient {
    async fn register_push_token(&self, customer_id: &str, token: &str) -> Result<(), BridgeError> {
        Ok(self.update_push_token(customer_id, token).await?)
    }
}

/// Source of the device push token.
pub trait PushService {
    fn token(&self) -> impl Future<Output = Option<String>>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct PushRegistration {
    pub customer_id: String,
    pub token: String,
}

#[derive(Clone, Debug, Default)]
pub struct PushPairing {
    token: Option<String>,
    customer_id: Option<String>,
    attempted: bool,
}

impl PushPairing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into()).filter(|t: &String| !t.is_empty());
    }

    pub fn set_customer_id(&mut self, customer_id: impl Into<String>) {
        self.customer_id = Some(customer_id.into()).filter(|id: &String| !id.is_empty());
    }

    pub fn attempted(&self) -> bool {
        self.attempted
    }

    /// The registration to perform, if both halves are known and none has been tried.
    pub fn pending(&self) -> Option<PushRegistration> {
        if self.attempted {
            return None;
        }
        Some(PushRegistration {
            customer_id: self.customer_id.clone()?,
            token: self.token.clone()?,
        })
    }

    /// Register the token if ready. Returns `None` when nothing was sent.
    pub async fn register_if_ready<S: PushTokenSink>(
        &mut self,
        sink: &S,
    ) -> Option<Result<(), BridgeError>> {
        let registration = self.pending()?;
        self.attempted = true;
        let result = sink
            .register_push_token(&registration.customer_id, &registration.token)
            .await;
        match &result {
            Ok(()) => tracing::info!("Push token registered for {}", registration.customer_id),
            Err(e) => tracing::warn!("{e}"),
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        calls: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl PushTokenSink for RecordingSink {
        async fn register_push_token(&self, customer_id: &str, token: &str) -> Result<(), BridgeError> {
            self.calls
                .lock()
                .unwrap()
                .push((customer_id.to_string(), token.to_string()));
            if self.fail {
                Err(BridgeError::Push(api::ApiError::Status(500)))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_pending_needs_both_halves() {
        let mut pairing = PushPairing::new();
        assert!(pairing.pending().is_none());
        pairing.set_customer_id("c1");
        assert!(pairing.pending().is_none());
        pairing.set_token("tok");
        assert_eq!(
            pairing.pending(),
            Some(PushRegistration {
                customer_id: "c1".to_string(),
                token: "tok".to_string()
            })
        );
    }

    #[test]
    fn test_empty_values_do_not_count() {
        let mut pairing = PushPairing::new();
        pairing.set_customer_id("");
        pairing.set_token("tok");
        assert!(pairing.pending().is_none());
    }

    #[tokio::test]
    async fn test_registers_at_most_once() {
        let sink = RecordingSink::default();
        let mut pairing = PushPairing::new();
        pairing.set_token("tok");
        assert!(pairing.register_if_ready(&sink).await.is_none());

        pairing.set_customer_id("c1");
        assert!(pairing.register_if_ready(&sink).await.unwrap().is_ok());

        // Reporting the id again, or a different one, does not register again
        pairing.set_customer_id("c1");
        assert!(pairing.register_if_ready(&sink).await.is_none());
        pairing.set_customer_id("c2");
        assert!(pairing.register_if_ready(&sink).await.is_none());

        assert_eq!(sink.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_not_retried() {
        let sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        let mut pairing = PushPairing::new();
        pairing.set_token("tok");
        pairing.set_customer_id("c1");

        assert!(pairing.register_if_ready(&sink).await.unwrap().is_err());
        assert!(pairing.attempted());
        assert!(pairing.register_if_ready(&sink).await.is_none());
        assert_eq!(sink.calls.lock().unwrap().len(), 1);
    }
}
