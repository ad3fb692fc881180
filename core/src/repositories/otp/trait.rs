//! OTP record store trait defining the interface for code persistence.
//!
//! Each method is an individually atomic operation; the lifecycle service
//! layers its own per-identity serialization on top so that compound steps
//! (supersede-then-insert, increment-then-lock) do not interleave.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::otp_code::{OtpCode, OtpPurpose, OtpStatus};
use crate::errors::DomainError;

/// Repository trait for OTP code persistence operations
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Find the active record for an (email, purpose) pair
    ///
    /// At most one record can be active per pair at any time, so this
    /// returns a single record or nothing.
    async fn find_active(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpCode>, DomainError>;

    /// Find the most recently issued record for an (email, purpose) pair,
    /// regardless of status
    ///
    /// Used by the resend-cooldown check, which must see superseded and
    /// consumed records too.
    async fn find_most_recent(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpCode>, DomainError>;

    /// Insert a new record
    ///
    /// Fails if an active record already exists for the same (email,
    /// purpose); callers must supersede first.
    async fn insert(&self, code: OtpCode) -> Result<OtpCode, DomainError>;

    /// Mark every active record for an (email, purpose) pair as consumed
    ///
    /// Returns the number of records superseded.
    async fn supersede_active(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<u64, DomainError>;

    /// Transition a record to a new status
    async fn update_status(&self, id: Uuid, status: OtpStatus) -> Result<(), DomainError>;

    /// Increment the attempt counter of an active record, returning the new
    /// count
    ///
    /// Attempt counts only move while a record is active; incrementing a
    /// terminal record is an error.
    async fn increment_attempts(&self, id: Uuid) -> Result<u32, DomainError>;

    /// Physically remove a record
    ///
    /// Only used by the issue path to roll back a record whose notification
    /// could not be delivered. Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
