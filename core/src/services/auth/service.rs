//! Authentication service orchestrating signup, password reset and login.
//!
//! Both verified flows lean on the same OTP lifecycle: signup parks the
//! pending profile on the code record and only creates the account once the
//! code is verified; password reset only touches the stored hash after the
//! reset code is consumed.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::otp_code::OtpPurpose;
use crate::domain::entities::user::User;
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{LockoutRepository, OtpRepository, UserRepository};
use crate::services::clock::Clock;
use crate::services::otp::{EmailServiceTrait, IssueOutcome, OtpLifecycle, VerifyOutcome};

use super::email_utils::{mask_email, validate_email};
use super::traits::{PasswordHasherTrait, TokenIssuerTrait};
use super::types::{
    PendingSignup, ResetOutcome, ResetRequestOutcome, SignupOutcome, SignupRequest,
    VerifyRejection,
};

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service for the OTP-verified account flows
pub struct AuthService<U, R, L, E, K, P, T>
where
    U: UserRepository,
    R: OtpRepository,
    L: LockoutRepository,
    E: EmailServiceTrait,
    K: Clock,
    P: PasswordHasherTrait,
    T: TokenIssuerTrait,
{
    /// User account storage
    user_repository: Arc<U>,
    /// Shared OTP lifecycle used by both flows
    otp_lifecycle: Arc<OtpLifecycle<R, L, E, K>>,
    /// Time source for account timestamps
    clock: Arc<K>,
    /// Password hashing implementation
    password_hasher: Arc<P>,
    /// Access-token issuance implementation
    token_issuer: Arc<T>,
}

impl<U, R, L, E, K, P, T> AuthService<U, R, L, E, K, P, T>
where
    U: UserRepository,
    R: OtpRepository,
    L: LockoutRepository,
    E: EmailServiceTrait,
    K: Clock,
    P: PasswordHasherTrait,
    T: TokenIssuerTrait,
{
    /// Create a new authentication service
    pub fn new(
        user_repository: Arc<U>,
        otp_lifecycle: Arc<OtpLifecycle<R, L, E, K>>,
        clock: Arc<K>,
        password_hasher: Arc<P>,
        token_issuer: Arc<T>,
    ) -> Self {
        Self {
            user_repository,
            otp_lifecycle,
            clock,
            password_hasher,
            token_issuer,
        }
    }

    /// Start a signup by issuing a verification code
    ///
    /// Validates the request, hashes the password, and parks the pending
    /// profile on the code record. No account exists until the code is
    /// verified with [`complete_signup`](Self::complete_signup).
    ///
    /// # Arguments
    ///
    /// * `request` - The signup form data
    ///
    /// # Returns
    ///
    /// * `Ok(IssueOutcome)` - Sent, Blocked or Locked
    /// * `Err(DomainError)` - Validation failure, duplicate account, or
    ///   infrastructure failure
    pub async fn request_signup_otp(&self, request: SignupRequest) -> DomainResult<IssueOutcome> {
        if !validate_email(&request.email) {
            return Err(AuthError::InvalidEmailFormat.into());
        }
        if request.password != request.confirm_password {
            return Err(AuthError::PasswordMismatch.into());
        }
        if request.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::PasswordTooShort {
                min_length: MIN_PASSWORD_LENGTH,
            }
            .into());
        }
        if self.user_repository.exists_by_email(&request.email).await? {
            warn!(
                email = %mask_email(&request.email),
                event = "signup_duplicate_email",
                "Signup requested for an existing account"
            );
            return Err(AuthError::UserAlreadyExists.into());
        }

        let password_hash = self
            .password_hasher
            .hash(&request.password)
            .map_err(|_| DomainError::from(AuthError::PasswordHashingFailed))?;
        let pending = PendingSignup {
            first_name: request.first_name,
            last_name: request.last_name,
            password_hash,
        };
        let payload = serde_json::to_value(&pending).map_err(|e| DomainError::Internal {
            message: format!("Failed to encode pending signup: {}", e),
        })?;

        self.otp_lifecycle
            .issue(&request.email, OtpPurpose::Signup, Some(payload))
            .await
    }

    /// Complete a signup by verifying the emailed code
    ///
    /// On success the parked profile becomes a verified account and the user
    /// is logged in. A rejected code leaves no account behind.
    pub async fn complete_signup(&self, email: &str, code: &str) -> DomainResult<SignupOutcome> {
        let outcome = self
            .otp_lifecycle
            .verify(email, OtpPurpose::Signup, code)
            .await?;

        let payload = match outcome {
            VerifyOutcome::Success { payload } => payload,
            VerifyOutcome::InvalidCode => {
                return Ok(SignupOutcome::Rejected(VerifyRejection::InvalidCode))
            }
            VerifyOutcome::Expired => {
                return Ok(SignupOutcome::Rejected(VerifyRejection::Expired))
            }
            VerifyOutcome::AttemptsExceeded => {
                return Ok(SignupOutcome::Rejected(VerifyRejection::AttemptsExceeded))
            }
        };

        let payload = payload.ok_or_else(|| DomainError::Internal {
            message: "Signup code record carried no pending profile".to_string(),
        })?;
        let pending: PendingSignup =
            serde_json::from_value(payload).map_err(|e| DomainError::Internal {
                message: format!("Failed to decode pending signup: {}", e),
            })?;

        let user = User::new(
            pending.first_name,
            pending.last_name,
            email.to_string(),
            pending.password_hash,
            self.clock.now(),
        );
        let user = self.user_repository.create(user).await?;

        info!(
            email = %mask_email(email),
            user_id = %user.id,
            event = "signup_completed",
            "Account created after verification"
        );

        let token = self
            .token_issuer
            .issue(&user)
            .map_err(|_| DomainError::from(AuthError::TokenGenerationFailed))?;
        Ok(SignupOutcome::Completed(AuthResponse::new(token, &user)))
    }

    /// Request a password-reset code
    ///
    /// Unknown email addresses are accepted without issuing anything, so the
    /// response never reveals whether an account exists.
    pub async fn request_password_reset_otp(
        &self,
        email: &str,
    ) -> DomainResult<ResetRequestOutcome> {
        if !validate_email(email) {
            return Err(AuthError::InvalidEmailFormat.into());
        }

        if self.user_repository.find_by_email(email).await?.is_none() {
            info!(
                email = %mask_email(email),
                event = "password_reset_unknown_email",
                "Reset requested for unknown email; accepted without issuing"
            );
            return Ok(ResetRequestOutcome::Accepted);
        }

        let outcome = self
            .otp_lifecycle
            .issue(email, OtpPurpose::PasswordReset, None)
            .await?;
        Ok(ResetRequestOutcome::from(outcome))
    }

    /// Reset a password by verifying the emailed code
    ///
    /// The new password is validated before the code is checked, so a weak
    /// password never burns a valid code.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> DomainResult<ResetOutcome> {
        if new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::PasswordTooShort {
                min_length: MIN_PASSWORD_LENGTH,
            }
            .into());
        }

        let outcome = self
            .otp_lifecycle
            .verify(email, OtpPurpose::PasswordReset, code)
            .await?;
        match outcome {
            VerifyOutcome::Success { .. } => {}
            VerifyOutcome::InvalidCode => {
                return Ok(ResetOutcome::Rejected(VerifyRejection::InvalidCode))
            }
            VerifyOutcome::Expired => return Ok(ResetOutcome::Rejected(VerifyRejection::Expired)),
            VerifyOutcome::AttemptsExceeded => {
                return Ok(ResetOutcome::Rejected(VerifyRejection::AttemptsExceeded))
            }
        }

        let mut user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::from(AuthError::UserNotFound))?;
        let password_hash = self
            .password_hasher
            .hash(new_password)
            .map_err(|_| DomainError::from(AuthError::PasswordHashingFailed))?;
        user.set_password_hash(password_hash, self.clock.now());
        self.user_repository.update(user).await?;

        info!(
            email = %mask_email(email),
            event = "password_reset_completed",
            "Password replaced after verification"
        );

        Ok(ResetOutcome::PasswordUpdated)
    }

    /// Authenticate with email and password
    ///
    /// Unknown emails and wrong passwords fail the same way so the response
    /// does not reveal which of the two was at fault.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResponse> {
        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::from(AuthError::InvalidCredentials))?;

        let matches = self
            .password_hasher
            .verify(password, &user.password_hash)
            .map_err(|_| DomainError::from(AuthError::PasswordHashingFailed))?;
        if !matches {
            warn!(
                email = %mask_email(email),
                event = "login_failed",
                "Password did not match"
            );
            return Err(AuthError::InvalidCredentials.into());
        }
        if !user.is_verified {
            return Err(AuthError::EmailNotVerified.into());
        }

        let token = self
            .token_issuer
            .issue(&user)
            .map_err(|_| DomainError::from(AuthError::TokenGenerationFailed))?;

        info!(
            email = %mask_email(email),
            user_id = %user.id,
            event = "login_succeeded",
            "User authenticated"
        );

        Ok(AuthResponse::new(token, &user))
    }
}
