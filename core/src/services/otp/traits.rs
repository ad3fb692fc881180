//! Traits for email notification integration

use async_trait::async_trait;

use crate::domain::entities::otp_code::OtpPurpose;

/// Trait for email delivery integration
#[async_trait]
pub trait EmailServiceTrait: Send + Sync {
    /// Send a one-time passcode to an email address, returning the
    /// provider's message id
    async fn send_otp_email(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<String, String>;

    /// Check if the email address format is valid
    fn is_valid_email(&self, email: &str) -> bool;
}
