//! Authentication-specific error types.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email format")]
    InvalidEmailFormat,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {min_length} characters")]
    PasswordTooShort { min_length: usize },

    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Please verify your email first")]
    EmailNotVerified,

    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Password hashing failed")]
    PasswordHashingFailed,
}

impl AuthError {
    /// Stable error code for programmatic handling at the API layer
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidEmailFormat => "INVALID_EMAIL_FORMAT",
            AuthError::PasswordMismatch => "PASSWORD_MISMATCH",
            AuthError::PasswordTooShort { .. } => "PASSWORD_TOO_SHORT",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::UserAlreadyExists => "USER_ALREADY_EXISTS",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            AuthError::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
            AuthError::PasswordHashingFailed => "PASSWORD_HASHING_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_messages() {
        let error = AuthError::PasswordTooShort { min_length: 8 };
        assert!(error.to_string().contains("at least 8 characters"));
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AuthError::UserAlreadyExists.error_code(), "USER_ALREADY_EXISTS");
        assert_eq!(AuthError::InvalidCredentials.error_code(), "INVALID_CREDENTIALS");
    }
}
