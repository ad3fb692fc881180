//! Traits for password hashing and token issuance integration

use crate::domain::entities::user::User;

/// Trait for password hashing integration
pub trait PasswordHasherTrait: Send + Sync {
    /// Hash a plaintext password into its opaque storable form
    fn hash(&self, plain: &str) -> Result<String, String>;

    /// Check a plaintext password against a stored hash
    fn verify(&self, plain: &str, hashed: &str) -> Result<bool, String>;
}

/// Trait for access-token issuance integration
pub trait TokenIssuerTrait: Send + Sync {
    /// Issue an access token for an authenticated user
    fn issue(&self, user: &User) -> Result<String, String>;
}
