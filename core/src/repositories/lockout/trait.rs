//! Lockout store trait for the identity-level brute-force overlay.

use async_trait::async_trait;

use crate::domain::entities::otp_lockout::OtpLockout;
use crate::errors::DomainError;

/// Repository trait for identity-level lockout records
#[async_trait]
pub trait LockoutRepository: Send + Sync {
    /// Fetch the lockout record for an email, if any failures are on file
    async fn find(&self, email: &str) -> Result<Option<OtpLockout>, DomainError>;

    /// Insert or replace the lockout record for its email
    async fn upsert(&self, lockout: OtpLockout) -> Result<OtpLockout, DomainError>;

    /// Remove the lockout record for an email (after a successful
    /// verification or an expired lock window)
    async fn clear(&self, email: &str) -> Result<(), DomainError>;
}
