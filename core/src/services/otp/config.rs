//! Configuration for the OTP lifecycle service

use crate::domain::entities::otp_code::{DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS};

/// Configuration for the OTP lifecycle service
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Number of minutes before a code expires
    pub code_expiration_minutes: i64,
    /// Maximum number of verification attempts allowed per code
    pub max_attempts: u32,
    /// Minimum seconds between code resend requests
    pub resend_cooldown_seconds: i64,
    /// Whether to track failures per identity across reissued codes
    ///
    /// The per-code attempt budget is always enforced; this overlay
    /// additionally locks an identity out for a fixed window once its
    /// cross-code failure count reaches the threshold.
    pub identity_lockout_enabled: bool,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            max_attempts: MAX_ATTEMPTS,
            resend_cooldown_seconds: 60,
            identity_lockout_enabled: false,
        }
    }
}
