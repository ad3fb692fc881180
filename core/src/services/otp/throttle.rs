//! Issuance and verification throttling policies.
//!
//! Two independent policies gate the lifecycle: a resend cooldown that
//! stops mailbox flooding, and a brute-force lockout that stops online
//! guessing of the six-digit space within a code's short lifetime. Both are
//! evaluated before any code comparison, so a throttled caller never learns
//! whether a guess was correct.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

use crate::domain::entities::otp_code::OtpCode;
use crate::domain::entities::otp_lockout::OtpLockout;
use crate::errors::DomainResult;
use crate::repositories::LockoutRepository;
use crate::services::auth::email_utils::mask_email;

use super::config::OtpConfig;

/// Throttling policy evaluator
pub struct ThrottleGuard<L: LockoutRepository> {
    /// Lockout store backing the identity-level overlay
    lockout_repository: Arc<L>,
    /// Lifecycle configuration (cooldown length, overlay switch)
    config: OtpConfig,
}

impl<L: LockoutRepository> ThrottleGuard<L> {
    /// Create a new throttle guard
    pub fn new(lockout_repository: Arc<L>, config: OtpConfig) -> Self {
        Self {
            lockout_repository,
            config,
        }
    }

    /// Evaluate the resend cooldown against the most recent record,
    /// regardless of its status
    ///
    /// Returns the seconds remaining if issuance must be refused, `None` if
    /// it may proceed. Being refused here is a normal outcome, not a
    /// failure.
    pub fn cooldown_remaining(
        &self,
        most_recent: Option<&OtpCode>,
        now: DateTime<Utc>,
    ) -> Option<i64> {
        let last = most_recent?;
        let elapsed = (now - last.issued_at).num_seconds();
        let remaining = self.config.resend_cooldown_seconds - elapsed;
        if remaining > 0 {
            warn!(
                email = %mask_email(&last.email),
                retry_after_seconds = remaining,
                event = "otp_resend_throttled",
                "Code request inside the resend cooldown window"
            );
            Some(remaining)
        } else {
            None
        }
    }

    /// Check whether the identity is locked out
    ///
    /// Returns the lock expiry when locked. A lock whose window has passed
    /// is cleared here, which also resets the failure counter.
    pub async fn identity_locked_until(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<DateTime<Utc>>> {
        if !self.config.identity_lockout_enabled {
            return Ok(None);
        }

        match self.lockout_repository.find(email).await? {
            Some(lockout) if lockout.is_locked(now) => Ok(lockout.locked_until),
            Some(lockout) if lockout.lock_expired(now) => {
                self.lockout_repository.clear(email).await?;
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// Record a failed verification against the identity
    ///
    /// Returns the lock expiry if this failure tripped the threshold.
    pub async fn record_identity_failure(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<DateTime<Utc>>> {
        if !self.config.identity_lockout_enabled {
            return Ok(None);
        }

        let mut lockout = match self.lockout_repository.find(email).await? {
            Some(existing) => existing,
            None => {
                let fresh = OtpLockout::first_failure(email.to_string(), now);
                self.lockout_repository.upsert(fresh.clone()).await?;
                return Ok(None);
            }
        };

        lockout.record_failure(now);
        let locked_until = lockout.locked_until.filter(|_| lockout.is_locked(now));
        if locked_until.is_some() {
            warn!(
                email = %mask_email(email),
                failure_count = lockout.failure_count,
                event = "otp_identity_locked",
                "Identity locked out after repeated failed verifications"
            );
        }
        self.lockout_repository.upsert(lockout).await?;
        Ok(locked_until)
    }

    /// Forget the identity's failure history after a successful verification
    pub async fn clear_identity_failures(&self, email: &str) -> DomainResult<()> {
        if !self.config.identity_lockout_enabled {
            return Ok(());
        }
        self.lockout_repository.clear(email).await
    }
}
