//! User repository trait defining the interface for account persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by email address
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Create a new user account
    ///
    /// Fails if the email address is already registered.
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user account
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// Check whether an email address is already registered
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;
}
