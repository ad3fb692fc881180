//! Domain entities representing core business objects.

pub mod otp_code;
pub mod otp_lockout;
pub mod user;

// Re-export commonly used types
pub use otp_code::{OtpCode, OtpPurpose, OtpStatus, CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS};
pub use otp_lockout::{OtpLockout, LOCKOUT_MINUTES, LOCKOUT_THRESHOLD};
pub use user::User;
