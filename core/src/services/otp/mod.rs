//! OTP lifecycle module shared by the signup and password-reset flows
//!
//! This module provides the complete one-time passcode workflow:
//! - Cryptographically secure code generation
//! - Hashed-at-rest storage with a single-active-code invariant
//! - Resend cooldown and brute-force lockout policies
//! - Issue/verify orchestration with compensating rollback on delivery failure

mod config;
mod generator;
mod lifecycle;
mod throttle;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::OtpConfig;
pub use generator::CodeGenerator;
pub use lifecycle::OtpLifecycle;
pub use throttle::ThrottleGuard;
pub use traits::EmailServiceTrait;
pub use types::{IssueOutcome, IssuedOtp, VerifyOutcome};
