//! Authentication service module
//!
//! Gateway for the OTP-verified account flows: signup, password reset and
//! login.

pub mod email_utils;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use service::{AuthService, MIN_PASSWORD_LENGTH};
pub use traits::{PasswordHasherTrait, TokenIssuerTrait};
pub use types::{
    PendingSignup, ResetOutcome, ResetRequestOutcome, SignupOutcome, SignupRequest,
    VerifyRejection,
};
