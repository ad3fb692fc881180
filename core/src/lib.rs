//! # AITrade Core
//!
//! Core business logic and domain layer for the AITrade backend.
//! This crate contains domain entities, the OTP verification lifecycle,
//! repository interfaces, and error types shared by the signup and
//! password-reset flows.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod errors;

// Re-export commonly used types for convenience
pub use domain::entities::{OtpCode, OtpLockout, OtpPurpose, OtpStatus, User};
pub use domain::value_objects::{AuthResponse, UserSummary};
pub use errors::{AuthError, DomainError, DomainResult};
pub use repositories::{LockoutRepository, OtpRepository, UserRepository};
pub use services::auth::AuthService;
pub use services::otp::{IssueOutcome, OtpConfig, OtpLifecycle, VerifyOutcome};
