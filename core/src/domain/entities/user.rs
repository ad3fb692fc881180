//! User entity representing a registered AITrade account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Email address, unique across accounts
    pub email: String,

    /// bcrypt hash of the account password
    pub password_hash: String,

    /// Whether the email address has been verified via OTP
    pub is_verified: bool,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user account
    ///
    /// Accounts are created only after OTP verification, so they start out
    /// verified.
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email,
            password_hash,
            is_verified: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the stored password hash
    pub fn set_password_hash(&mut self, password_hash: String, now: DateTime<Utc>) {
        self.password_hash = password_hash;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_verified() {
        let user = User::new(
            "Alice".to_string(),
            "Nguyen".to_string(),
            "alice@example.com".to_string(),
            "$2b$12$hash".to_string(),
            Utc::now(),
        );
        assert!(user.is_verified);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_set_password_hash_touches_updated_at() {
        let now = Utc::now();
        let mut user = User::new(
            "Alice".to_string(),
            "Nguyen".to_string(),
            "alice@example.com".to_string(),
            "$2b$12$old".to_string(),
            now,
        );
        let later = now + chrono::Duration::minutes(1);
        user.set_password_hash("$2b$12$new".to_string(), later);
        assert_eq!(user.password_hash, "$2b$12$new");
        assert_eq!(user.updated_at, later);
    }
}
