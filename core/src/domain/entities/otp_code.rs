//! One-time passcode entity shared by the signup and password-reset flows.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Maximum number of verification attempts allowed per code
pub const MAX_ATTEMPTS: u32 = 5;

/// Length of the one-time passcode
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for codes (5 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 5;

/// The reason a code was issued; signup and password reset authorize
/// different side effects and never share codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    Signup,
    PasswordReset,
}

impl OtpPurpose {
    /// Stable string form, used as the purpose tag in notifications and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Signup => "signup",
            OtpPurpose::PasswordReset => "password_reset",
        }
    }
}

/// Lifecycle state of a code. `Active` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpStatus {
    Active,
    Consumed,
    Expired,
    Locked,
}

/// One-time passcode record
///
/// The plaintext code is never stored; only its SHA-256 digest is kept so a
/// leaked record store cannot be replayed against the verification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpCode {
    /// Unique identifier for the code record
    pub id: Uuid,

    /// Email address the code was issued for
    pub email: String,

    /// What a successful verification authorizes
    pub purpose: OtpPurpose,

    /// Hex-encoded SHA-256 digest of the 6-digit code
    pub code_hash: String,

    /// Number of verification attempts made against this record
    pub attempts: u32,

    /// Timestamp when the code was issued
    pub issued_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,

    /// Current lifecycle state
    pub status: OtpStatus,

    /// Opaque data needed to complete the purpose after verification
    /// (signup carries the pending profile; password reset carries nothing)
    pub pending_payload: Option<serde_json::Value>,
}

impl OtpCode {
    /// Creates a new active code record from a freshly generated plaintext code
    ///
    /// # Arguments
    ///
    /// * `email` - The identity the code is issued for
    /// * `purpose` - Signup or password reset
    /// * `code` - The plaintext 6-digit code (hashed before storage)
    /// * `pending_payload` - Opaque completion data, if the purpose needs any
    /// * `now` - Issue timestamp from the caller's clock
    /// * `expiration_minutes` - Minutes until the code expires
    pub fn new(
        email: String,
        purpose: OtpPurpose,
        code: &str,
        pending_payload: Option<serde_json::Value>,
        now: DateTime<Utc>,
        expiration_minutes: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            purpose,
            code_hash: Self::hash_code(code),
            attempts: 0,
            issued_at: now,
            expires_at: now + Duration::minutes(expiration_minutes),
            status: OtpStatus::Active,
            pending_payload,
        }
    }

    /// Computes the hex-encoded SHA-256 digest of a plaintext code
    pub fn hash_code(code: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(code.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Checks a submitted code against the stored digest in constant time
    ///
    /// Hashing the submission first keeps the comparison length-independent
    /// of the real code.
    pub fn matches(&self, submitted: &str) -> bool {
        let submitted_hash = Self::hash_code(submitted);
        constant_time_eq(submitted_hash.as_bytes(), self.code_hash.as_bytes())
    }

    /// Checks whether the code has expired at the given instant
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether the record is still the live code for its (email, purpose)
    pub fn is_active(&self) -> bool {
        self.status == OtpStatus::Active
    }

    /// Whether the per-record attempt budget is already spent
    pub fn attempts_exhausted(&self) -> bool {
        self.attempts >= MAX_ATTEMPTS
    }

    /// Remaining verification attempts (0 if exhausted)
    pub fn remaining_attempts(&self) -> u32 {
        MAX_ATTEMPTS.saturating_sub(self.attempts)
    }

    /// Time remaining until expiration, or zero if already expired
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}
