//! Import of session data written outside the client store.
//!
//! Two sources predate [`ClientState`]:
//!
//! - **Browser storage keys** left by earlier clients: `authToken`,
//!   `expiresAt`, `customerData`, `customerId` and `availableAreas`.
//!   [`from_legacy_keys`] folds them into one state document.
//! - **Cookies** set by the hosting page when the app runs embedded:
//!   `auth_token`, `customerId` and `customerData`. [`CookieImport`] parses
//!   them.
//!
//! Both take plain lookups so they can be exercised without a browser.

use crate::models::{Area, Customer, Session};
use crate::state::ClientState;

pub const LEGACY_AUTH_TOKEN: &str = "authToken";
pub const LEGACY_EXPIRES_AT: &str = "expiresAt";
pub const LEGACY_CUSTOMER_DATA: &str = "customerData";
pub const LEGACY_CUSTOMER_ID: &str = "customerId";
pub const LEGACY_AVAILABLE_AREAS: &str = "availableAreas";

/// Every legacy key, for callers that clean up after a migration.
pub const LEGACY_KEYS: [&str; 5] = [
    LEGACY_AUTH_TOKEN,
    LEGACY_EXPIRES_AT,
    LEGACY_CUSTOMER_DATA,
    LEGACY_CUSTOMER_ID,
    LEGACY_AVAILABLE_AREAS,
];

/// Build a client state from the legacy storage keys.
///
/// Returns `None` when none of the keys hold anything usable.
pub fn from_legacy_keys(lookup: impl Fn(&str) -> Option<String>) -> Option<ClientState> {
    let session = lookup(LEGACY_AUTH_TOKEN)
        .filter(|t| !t.is_empty())
        .map(|token| {
            let expires_at = lookup(LEGACY_EXPIRES_AT).and_then(|v| v.trim().parse::<i64>().ok());
            Session::new(token, expires_at)
        });

    let customer = lookup(LEGACY_CUSTOMER_DATA)
        .and_then(|raw| parse_customer(&raw))
        .or_else(|| {
            lookup(LEGACY_CUSTOMER_ID)
                .filter(|id| !id.is_empty())
                .map(Customer::with_id)
        });

    let areas = lookup(LEGACY_AVAILABLE_AREAS)
        .and_then(|raw| match serde_json::from_str::<Vec<Area>>(&raw) {
            Ok(areas) => Some(areas),
            Err(e) => {
                tracing::warn!("Ignoring unreadable legacy area list: {e}");
                None
            }
        })
        .unwrap_or_default();

    if session.is_none() && customer.is_none() && areas.is_empty() {
        return None;
    }

    Some(ClientState {
        session,
        customer,
        areas,
        ..ClientState::default()
    })
}

fn parse_customer(raw: &str) -> Option<Customer> {
    match serde_json::from_str::<Customer>(raw) {
        Ok(customer) if !customer.id.is_empty() => Some(customer),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("Ignoring unreadable customer snapshot: {e}");
            None
        }
    }
}

/// Read one cookie value out of a `document.cookie` style header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then_some(value)
    })
}

/// A session handed over by the embedding page through cookies.
#[derive(Clone, Debug, PartialEq)]
pub struct CookieImport {
    pub session: Session,
    pub customer: Option<Customer>,
}

impl CookieImport {
    /// Parse the embedding cookies.
    ///
    /// `auth_token` is required. The profile comes from the `customerData`
    /// cookie when it parses, otherwise a minimal profile is built from
    /// `customerId`. The imported session expires `lifetime_secs` after `now`.
    pub fn from_cookie_header(header: &str, now: i64, lifetime_secs: i64) -> Option<Self> {
        let token = cookie_value(header, "auth_token")?;
        let customer = cookie_value(header, "customerData")
            .and_then(parse_customer)
            .or_else(|| cookie_value(header, "customerId").map(Customer::with_id));

        Some(Self {
            session: Session::new(token, Some(now + lifetime_secs)),
            customer,
        })
    }

    pub fn apply(self, state: &mut ClientState) {
        state.sign_in(self.session, self.customer);
    }
}
