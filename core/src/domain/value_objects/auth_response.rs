//! Authentication response value object returned after signup or login.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::user::User;

/// Safe projection of a [`User`] for responses; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Email address
    pub email: String,

    /// Whether the email address has been verified
    pub is_verified: bool,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

/// Authentication response containing the access token and user metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Token type, always "bearer"
    pub token_type: String,

    /// The authenticated user
    pub user: UserSummary,
}

impl AuthResponse {
    /// Creates a new authentication response for a user and their token
    pub fn new(access_token: String, user: &User) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user: UserSummary::from(user),
        }
    }
}
