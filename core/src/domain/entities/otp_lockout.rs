//! Identity-level lockout record for cross-code brute-force tracking.
//!
//! Unlike the per-record attempt counter on [`OtpCode`], this counter
//! survives reissued codes: five wrong guesses spread over three codes still
//! lock the identity out.
//!
//! [`OtpCode`]: super::otp_code::OtpCode

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Failed verifications before the identity is locked
pub const LOCKOUT_THRESHOLD: u32 = 5;

/// How long an identity stays locked once the threshold is reached
pub const LOCKOUT_MINUTES: i64 = 15;

/// Cross-code failure counter for one identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpLockout {
    /// Email address being tracked
    pub email: String,

    /// Failed verification attempts since the last reset
    pub failure_count: u32,

    /// When set and in the future, the identity is locked until this instant
    pub locked_until: Option<DateTime<Utc>>,

    /// Timestamp of the last update
    pub updated_at: DateTime<Utc>,
}

impl OtpLockout {
    /// Creates a fresh record with a single recorded failure
    pub fn first_failure(email: String, now: DateTime<Utc>) -> Self {
        Self {
            email,
            failure_count: 1,
            locked_until: None,
            updated_at: now,
        }
    }

    /// Records another failure, starting the timed lock at the threshold
    pub fn record_failure(&mut self, now: DateTime<Utc>) {
        self.failure_count += 1;
        if self.failure_count >= LOCKOUT_THRESHOLD {
            self.locked_until = Some(now + Duration::minutes(LOCKOUT_MINUTES));
        }
        self.updated_at = now;
    }

    /// Whether the identity is locked at the given instant
    ///
    /// A lock whose window has passed no longer counts; callers should treat
    /// an expired lock as a cleared counter.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        matches!(self.locked_until, Some(until) if now < until)
    }

    /// Whether the lock window has been set and has already passed
    pub fn lock_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.locked_until, Some(until) if now >= until)
    }
}
