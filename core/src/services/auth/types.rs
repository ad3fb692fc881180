//! Request and outcome types for the authentication flows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::AuthResponse;
use crate::services::otp::IssueOutcome;

/// Data collected when a signup is requested
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Profile data parked on the OTP record until the signup code is verified
///
/// The password is hashed before it enters the payload; plaintext never
/// reaches the record store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingSignup {
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// Why a verification was refused, reduced to what the caller may learn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyRejection {
    InvalidCode,
    Expired,
    AttemptsExceeded,
}

impl VerifyRejection {
    /// Fixed caller-facing message; deliberately no more specific than this
    pub fn message(&self) -> &'static str {
        match self {
            VerifyRejection::InvalidCode => "invalid",
            VerifyRejection::Expired => "expired, request a new one",
            VerifyRejection::AttemptsExceeded => "too many attempts, request a new one",
        }
    }
}

/// Result of completing a signup with a verification code
#[derive(Debug, Clone)]
pub enum SignupOutcome {
    /// The account was created and logged in
    Completed(AuthResponse),
    /// The code was refused; the account was not created
    Rejected(VerifyRejection),
}

/// Result of requesting a password-reset code
///
/// Unknown email addresses get `Accepted` without any code being issued, so
/// the outcome never reveals whether an account exists. `Blocked` and
/// `Locked` can only surface for identities that already have OTP history.
#[derive(Debug, Clone)]
pub enum ResetRequestOutcome {
    /// The request was taken; if the account exists, a code is on its way
    Accepted,
    /// The resend cooldown is still running
    Blocked { retry_after_seconds: i64 },
    /// The identity is locked out after too many failed verifications
    Locked { locked_until: DateTime<Utc> },
}

impl From<IssueOutcome> for ResetRequestOutcome {
    fn from(outcome: IssueOutcome) -> Self {
        match outcome {
            IssueOutcome::Sent(_) => ResetRequestOutcome::Accepted,
            IssueOutcome::Blocked {
                retry_after_seconds,
            } => ResetRequestOutcome::Blocked {
                retry_after_seconds,
            },
            IssueOutcome::Locked { locked_until } => ResetRequestOutcome::Locked { locked_until },
        }
    }
}

/// Result of resetting a password with a verification code
#[derive(Debug, Clone)]
pub enum ResetOutcome {
    /// The password was replaced; the code is consumed
    PasswordUpdated,
    /// The code was refused; the password is unchanged
    Rejected(VerifyRejection),
}
