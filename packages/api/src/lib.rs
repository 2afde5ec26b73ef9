//! # API crate: remote services the storefront client talks to
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | [`ApiClient`], the bearer-authenticated REST client for the storefront backend |
//! | [`envelope`] | The `{ success, data, message }` response wrapper |
//! | [`auth`] | Phone validation and the sign-in / sign-up OTP flows |
//! | [`firebase`] | SMS codes through the Firebase Identity Toolkit REST API |
//! | [`geocode`] | Reverse geocoding of map coordinates |
//!
//! The flows in [`auth`] depend only on the [`StorefrontBackend`] and
//! [`auth::PhoneAuthProvider`] traits, so they are tested with in-memory fakes.

pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod firebase;
pub mod geocode;

pub use auth::{AuthError, BotChallenge, CodeRequest, LoginFlow, PendingVerification, SignupFlow};
pub use client::{ApiClient, Registration, StorefrontBackend, VerifiedSession};
pub use envelope::ApiResponse;
pub use error::ApiError;
pub use firebase::FirebasePhoneAuth;
pub use geocode::ReverseGeocoder;
