//! Outcome types for the OTP lifecycle service.
//!
//! Blocked, invalid, expired and exhausted are expected branches of normal
//! operation, so they are `Ok` values, never errors. None of them carry
//! codes, hashes or attempt counters.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Details of a successfully issued code
#[derive(Debug, Clone)]
pub struct IssuedOtp {
    /// Identifier of the new code record
    pub otp_id: Uuid,
    /// When the code expires
    pub expires_at: DateTime<Utc>,
    /// When the caller may request another code
    pub next_resend_at: DateTime<Utc>,
    /// Delivery message id from the notifier
    pub message_id: String,
}

/// Result of asking for a code to be issued
#[derive(Debug, Clone)]
pub enum IssueOutcome {
    /// A new code was stored and handed to the notifier
    Sent(IssuedOtp),
    /// The resend cooldown is still running; try again later
    Blocked {
        /// Seconds until issuance will be accepted again
        retry_after_seconds: i64,
    },
    /// The identity is locked out after too many failed verifications
    Locked {
        /// When the lock expires
        locked_until: DateTime<Utc>,
    },
}

impl IssueOutcome {
    /// Whether a code was actually sent
    pub fn is_sent(&self) -> bool {
        matches!(self, IssueOutcome::Sent(_))
    }
}

/// Result of verifying a submitted code
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyOutcome {
    /// The code matched; the record is consumed and can never match again
    Success {
        /// Opaque completion data stored at issue time
        payload: Option<serde_json::Value>,
    },
    /// No active code matched the submission
    InvalidCode,
    /// The code matched but its lifetime had already passed
    Expired,
    /// The attempt budget is spent; a fresh code must be requested
    AttemptsExceeded,
}

impl VerifyOutcome {
    /// Whether verification succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, VerifyOutcome::Success { .. })
    }
}
