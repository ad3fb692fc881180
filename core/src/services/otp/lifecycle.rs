//! OTP lifecycle service: issuance, verification and invalidation.
//!
//! Each record moves `Active -> {Consumed, Expired, Locked}` and every
//! right-hand state is terminal. Issue and verify calls for the same
//! (email, purpose) pair serialize through an internal key-lock table, so
//! the supersede-then-insert step and the increment-then-lock step never
//! interleave; distinct pairs do not contend.

use chrono::Duration;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{error, info, warn};

use crate::domain::entities::otp_code::{OtpCode, OtpPurpose, OtpStatus, CODE_LENGTH};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{LockoutRepository, OtpRepository};
use crate::services::auth::email_utils::mask_email;
use crate::services::clock::Clock;

use super::config::OtpConfig;
use super::generator::CodeGenerator;
use super::throttle::ThrottleGuard;
use super::traits::EmailServiceTrait;
use super::types::{IssueOutcome, IssuedOtp, VerifyOutcome};

type KeyLocks = Mutex<HashMap<(String, OtpPurpose), Arc<Mutex<()>>>>;

/// Service orchestrating the OTP state machine
pub struct OtpLifecycle<R, L, E, K>
where
    R: OtpRepository,
    L: LockoutRepository,
    E: EmailServiceTrait,
    K: Clock,
{
    /// Record store for code persistence
    otp_repository: Arc<R>,
    /// Email delivery for issued codes
    email_service: Arc<E>,
    /// Time source for every expiry and cooldown decision
    clock: Arc<K>,
    /// Cooldown and lockout policies
    throttle: ThrottleGuard<L>,
    /// Service configuration
    config: OtpConfig,
    /// Per-(email, purpose) serialization locks
    key_locks: KeyLocks,
}

impl<R, L, E, K> OtpLifecycle<R, L, E, K>
where
    R: OtpRepository,
    L: LockoutRepository,
    E: EmailServiceTrait,
    K: Clock,
{
    /// Create a new lifecycle service
    ///
    /// # Arguments
    ///
    /// * `otp_repository` - Record store for OTP codes
    /// * `lockout_repository` - Store backing the identity-level lockout overlay
    /// * `email_service` - Email delivery implementation
    /// * `clock` - Time source
    /// * `config` - Service configuration
    pub fn new(
        otp_repository: Arc<R>,
        lockout_repository: Arc<L>,
        email_service: Arc<E>,
        clock: Arc<K>,
        config: OtpConfig,
    ) -> Self {
        Self {
            otp_repository,
            email_service,
            clock,
            throttle: ThrottleGuard::new(lockout_repository, config.clone()),
            config,
            key_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Issue a new code for an (email, purpose) pair
    ///
    /// This method:
    /// 1. Refuses if the identity is locked out (overlay enabled)
    /// 2. Refuses while the resend cooldown is running, without mutating storage
    /// 3. Marks any outstanding active code as consumed (superseded)
    /// 4. Stores a fresh active record with a hashed code
    /// 5. Hands the plaintext code to the notifier; a delivery failure rolls
    ///    the record back so the identity is not left holding an
    ///    undeliverable code that blocks the cooldown window
    ///
    /// # Arguments
    ///
    /// * `email` - The identity to issue for
    /// * `purpose` - Signup or password reset
    /// * `pending_payload` - Opaque completion data carried to verification
    ///
    /// # Returns
    ///
    /// * `Ok(IssueOutcome)` - Sent, Blocked or Locked
    /// * `Err(DomainError)` - Store or notifier infrastructure failure
    pub async fn issue(
        &self,
        email: &str,
        purpose: OtpPurpose,
        pending_payload: Option<serde_json::Value>,
    ) -> DomainResult<IssueOutcome> {
        let _guard = self.serialize(email, purpose).await;
        let now = self.clock.now();

        if let Some(locked_until) = self.throttle.identity_locked_until(email, now).await? {
            return Ok(IssueOutcome::Locked { locked_until });
        }

        let most_recent = self
            .otp_repository
            .find_most_recent(email, purpose)
            .await?;
        if let Some(retry_after_seconds) =
            self.throttle.cooldown_remaining(most_recent.as_ref(), now)
        {
            return Ok(IssueOutcome::Blocked {
                retry_after_seconds,
            });
        }

        let superseded = self.otp_repository.supersede_active(email, purpose).await?;
        if superseded > 0 {
            info!(
                email = %mask_email(email),
                purpose = purpose.as_str(),
                superseded = superseded,
                event = "otp_superseded",
                "Replaced outstanding active code"
            );
        }

        let code = CodeGenerator::generate();
        let record = OtpCode::new(
            email.to_string(),
            purpose,
            &code,
            pending_payload,
            now,
            self.config.code_expiration_minutes,
        );
        let record = self.otp_repository.insert(record).await?;

        info!(
            email = %mask_email(email),
            purpose = purpose.as_str(),
            otp_id = %record.id,
            event = "otp_issued",
            "Issued new verification code"
        );

        let message_id = match self.email_service.send_otp_email(email, &code, purpose).await {
            Ok(id) => id,
            Err(e) => {
                // Compensating delete: an unsent code must not survive
                let _ = self.otp_repository.delete(record.id).await;
                error!(
                    email = %mask_email(email),
                    purpose = purpose.as_str(),
                    error = %e,
                    event = "otp_send_failed",
                    "Rolled back code after notification failure"
                );
                return Err(DomainError::Notification {
                    message: format!("Failed to send verification code: {}", e),
                });
            }
        };

        Ok(IssueOutcome::Sent(IssuedOtp {
            otp_id: record.id,
            expires_at: record.expires_at,
            next_resend_at: now + Duration::seconds(self.config.resend_cooldown_seconds),
            message_id,
        }))
    }

    /// Verify a submitted code for an (email, purpose) pair
    ///
    /// Check order: identity lock, then record lock, then code equality,
    /// then expiry. The throttling checks run before any comparison so a
    /// locked-out caller never learns whether the guess was correct, and an
    /// expired-but-correct code reports `Expired`, never `Success`.
    ///
    /// A wrong guess costs an attempt against whatever code is outstanding;
    /// reaching the budget locks the record irreversibly.
    ///
    /// # Arguments
    ///
    /// * `email` - The identity being verified
    /// * `purpose` - Signup or password reset
    /// * `submitted` - The code as typed by the caller
    ///
    /// # Returns
    ///
    /// * `Ok(VerifyOutcome)` - Success, InvalidCode, Expired or AttemptsExceeded
    /// * `Err(DomainError)` - Store infrastructure failure
    pub async fn verify(
        &self,
        email: &str,
        purpose: OtpPurpose,
        submitted: &str,
    ) -> DomainResult<VerifyOutcome> {
        let _guard = self.serialize(email, purpose).await;
        let now = self.clock.now();

        // A malformed submission can never equal a real code; reject it
        // without spending an attempt
        if submitted.len() != CODE_LENGTH || !submitted.chars().all(|c| c.is_ascii_digit()) {
            return Ok(VerifyOutcome::InvalidCode);
        }

        if self
            .throttle
            .identity_locked_until(email, now)
            .await?
            .is_some()
        {
            return Ok(VerifyOutcome::AttemptsExceeded);
        }

        let record = match self.otp_repository.find_active(email, purpose).await? {
            Some(record) => record,
            None => {
                // A locked record keeps failing closed even for the true code
                if let Some(recent) = self
                    .otp_repository
                    .find_most_recent(email, purpose)
                    .await?
                {
                    if recent.status == OtpStatus::Locked {
                        return Ok(VerifyOutcome::AttemptsExceeded);
                    }
                }
                self.throttle.record_identity_failure(email, now).await?;
                return Ok(VerifyOutcome::InvalidCode);
            }
        };

        if record.attempts >= self.config.max_attempts {
            self.otp_repository
                .update_status(record.id, OtpStatus::Locked)
                .await?;
            return Ok(VerifyOutcome::AttemptsExceeded);
        }

        if !record.matches(submitted) {
            let attempts = self.otp_repository.increment_attempts(record.id).await?;
            self.throttle.record_identity_failure(email, now).await?;

            if attempts >= self.config.max_attempts {
                self.otp_repository
                    .update_status(record.id, OtpStatus::Locked)
                    .await?;
                warn!(
                    email = %mask_email(email),
                    purpose = purpose.as_str(),
                    otp_id = %record.id,
                    event = "otp_attempts_exhausted",
                    "Code locked after too many failed attempts"
                );
                return Ok(VerifyOutcome::AttemptsExceeded);
            }

            warn!(
                email = %mask_email(email),
                purpose = purpose.as_str(),
                otp_id = %record.id,
                event = "otp_verify_failed",
                "Submitted code did not match"
            );
            return Ok(VerifyOutcome::InvalidCode);
        }

        if record.is_expired(now) {
            self.otp_repository
                .update_status(record.id, OtpStatus::Expired)
                .await?;
            return Ok(VerifyOutcome::Expired);
        }

        self.otp_repository
            .update_status(record.id, OtpStatus::Consumed)
            .await?;
        self.throttle.clear_identity_failures(email).await?;

        info!(
            email = %mask_email(email),
            purpose = purpose.as_str(),
            otp_id = %record.id,
            event = "otp_verified",
            "Verification code accepted"
        );

        Ok(VerifyOutcome::Success {
            payload: record.pending_payload,
        })
    }

    /// Acquire the serialization lock for an (email, purpose) pair
    async fn serialize(&self, email: &str, purpose: OtpPurpose) -> OwnedMutexGuard<()> {
        let lock = {
            let mut table = self.key_locks.lock().await;
            table
                .entry((email.to_string(), purpose))
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
