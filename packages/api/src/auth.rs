//! # Phone sign-in and sign-up
//!
//! Both flows follow the same shape:
//!
//! 1. validate input locally;
//! 2. ask the backend whether the phone is already registered;
//! 3. solve a [`BotChallenge`] and send an SMS code through the
//!    [`PhoneAuthProvider`]. The challenge is only solved once the phone has
//!    passed step 2;
//! 4. confirm the code, then either exchange the provider ID token for a
//!    session ([`LoginFlow::verify`]) or register the customer
//!    ([`SignupFlow::complete`]).
//!
//! The flows hold no state of their own. Step 3 returns a
//! [`PendingVerification`] that the caller keeps until step 4, so the UI can
//! store it in a signal without holding a borrow across awaits.

use std::future::Future;

use store::UnknownPhonePolicy;
use thiserror::Error;

use crate::client::{PhoneExistence, Registration, StorefrontBackend, VerifiedSession};
use crate::envelope::ApiResponse;
use crate::error::ApiError;

pub const PHONE_DIGITS: usize = 10;
pub const OTP_DIGITS: usize = 6;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please enter a valid 10-digit phone number.")]
    InvalidPhone,

    #[error("Please enter a valid 6-digit OTP.")]
    InvalidOtp,

    #[error("Please enter valid name, email, and 10-digit phone number.")]
    InvalidSignup,

    #[error("Phone number not registered. Please signup first.")]
    PhoneNotRegistered,

    #[error("Phone number already registered. Please login.")]
    PhoneAlreadyRegistered,

    #[error("Failed to check phone number. Please try again.")]
    PhoneCheckFailed,

    #[error("No OTP request found. Please request OTP again.")]
    NoPendingVerification,

    /// A readable message from the SMS provider.
    #[error("{0}")]
    Provider(String),

    /// The bot-challenge widget failed or is unavailable.
    #[error("{0}")]
    Challenge(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Keep only digits, at most ten of them.
pub fn sanitize_phone_input(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_DIGITS)
        .collect()
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn validate_phone(phone: &str) -> Result<(), AuthError> {
    if is_digits(phone, PHONE_DIGITS) {
        Ok(())
    } else {
        Err(AuthError::InvalidPhone)
    }
}

pub fn validate_otp(code: &str) -> Result<(), AuthError> {
    if is_digits(code, OTP_DIGITS) {
        Ok(())
    } else {
        Err(AuthError::InvalidOtp)
    }
}

/// SMS one-time-code provider.
pub trait PhoneAuthProvider {
    /// Send a code to `phone_number` (E.164). Returns the verification id.
    fn send_code(
        &self,
        phone_number: &str,
        challenge_token: &str,
    ) -> impl Future<Output = Result<String, AuthError>>;

    /// Confirm `code` for a verification id. Returns the provider ID token.
    fn confirm_code(
        &self,
        verification_id: &str,
        code: &str,
    ) -> impl Future<Output = Result<String, AuthError>>;
}

/// Source of bot-challenge tokens for [`PhoneAuthProvider::send_code`].
pub trait BotChallenge {
    fn solve(&self) -> impl Future<Output = Result<String, AuthError>>;
}

/// A token solved ahead of time.
impl BotChallenge for str {
    async fn solve(&self) -> Result<String, AuthError> {
        Ok(self.to_string())
    }
}

/// An SMS code that has been sent and not yet confirmed.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingVerification {
    pub phone: String,
    pub verification_id: String,
}

/// Result of [`LoginFlow::request_code`].
#[derive(Clone, Debug, PartialEq)]
pub enum CodeRequest {
    Sent(PendingVerification),
    /// The phone is unknown and the caller should open sign-up instead.
    RedirectToSignup,
}

async fn phone_registered<B: StorefrontBackend>(backend: &B, phone: &str) -> Result<bool, AuthError> {
    let envelope: ApiResponse<PhoneExistence> = backend.phone_exists(phone).await?;
    match envelope {
        ApiResponse {
            success: true,
            data: Some(PhoneExistence {
                phone_exist: Some(exists),
            }),
            ..
        } => Ok(exists),
        other => {
            tracing::warn!("Unexpected phone check response: {:?}", other.message);
            Err(AuthError::PhoneCheckFailed)
        }
    }
}

async fn send_code<P: PhoneAuthProvider, C: BotChallenge + ?Sized>(
    provider: &P,
    country_code: &str,
    phone: &str,
    challenge: &C,
) -> Result<PendingVerification, AuthError> {
    let token = challenge.solve().await?;
    let verification_id = provider
        .send_code(&format!("{country_code}{phone}"), &token)
        .await?;
    tracing::info!("OTP sent");
    Ok(PendingVerification {
        phone: phone.to_string(),
        verification_id,
    })
}

pub struct LoginFlow<'a, B, P> {
    backend: &'a B,
    provider: &'a P,
    country_code: String,
    unknown_phone: UnknownPhonePolicy,
}

impl<'a, B: StorefrontBackend, P: PhoneAuthProvider> LoginFlow<'a, B, P> {
    pub fn new(
        backend: &'a B,
        provider: &'a P,
        country_code: impl Into<String>,
        unknown_phone: UnknownPhonePolicy,
    ) -> Self {
        Self {
            backend,
            provider,
            country_code: country_code.into(),
            unknown_phone,
        }
    }

    pub async fn request_code<C: BotChallenge + ?Sized>(
        &self,
        phone: &str,
        challenge: &C,
    ) -> Result<CodeRequest, AuthError> {
        validate_phone(phone)?;
        if !phone_registered(self.backend, phone).await? {
            return match self.unknown_phone {
                UnknownPhonePolicy::ShowError => Err(AuthError::PhoneNotRegistered),
                UnknownPhonePolicy::RedirectToSignup => Ok(CodeRequest::RedirectToSignup),
            };
        }
        let pending = send_code(self.provider, &self.country_code, phone, challenge).await?;
        Ok(CodeRequest::Sent(pending))
    }

    /// Confirm the code and exchange the provider token for a session.
    pub async fn verify(
        &self,
        pending: Option<&PendingVerification>,
        otp: &str,
    ) -> Result<VerifiedSession, AuthError> {
        validate_otp(otp)?;
        let pending = pending.ok_or(AuthError::NoPendingVerification)?;
        let id_token = self
            .provider
            .confirm_code(&pending.verification_id, otp)
            .await?;
        let verified = self.backend.verify_id_token(&id_token).await?;
        tracing::info!("Signed in");
        Ok(verified)
    }
}

pub struct SignupFlow<'a, B, P> {
    backend: &'a B,
    provider: &'a P,
    country_code: String,
}

impl<'a, B: StorefrontBackend, P: PhoneAuthProvider> SignupFlow<'a, B, P> {
    pub fn new(backend: &'a B, provider: &'a P, country_code: impl Into<String>) -> Self {
        Self {
            backend,
            provider,
            country_code: country_code.into(),
        }
    }

    fn validate(registration: &Registration) -> Result<(), AuthError> {
        let complete = !registration.name.trim().is_empty()
            && !registration.email.trim().is_empty()
            && validate_phone(&registration.phone).is_ok();
        if complete {
            Ok(())
        } else {
            Err(AuthError::InvalidSignup)
        }
    }

    pub async fn request_code<C: BotChallenge + ?Sized>(
        &self,
        registration: &Registration,
        challenge: &C,
    ) -> Result<PendingVerification, AuthError> {
        Self::validate(registration)?;
        if phone_registered(self.backend, &registration.phone).await? {
            return Err(AuthError::PhoneAlreadyRegistered);
        }
        send_code(
            self.provider,
            &self.country_code,
            &registration.phone,
            challenge,
        )
        .await
    }

    /// Confirm the code, then create the account.
    pub async fn complete(
        &self,
        pending: Option<&PendingVerification>,
        registration: &Registration,
        otp: &str,
    ) -> Result<(), AuthError> {
        validate_otp(otp)?;
        let pending = pending.ok_or(AuthError::NoPendingVerification)?;
        self.provider
            .confirm_code(&pending.verification_id, otp)
            .await?;
        let registration = Registration {
            name: registration.name.trim().to_string(),
            email: registration.email.trim().to_string(),
            phone: pending.phone.clone(),
        };
        self.backend.register(&registration).await?;
        tracing::info!("Registered new customer");
        Ok(())
    }
}
