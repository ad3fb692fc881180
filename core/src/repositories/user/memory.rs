//! In-memory reference implementation of the user repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};

use super::trait_::UserRepository;

/// In-memory user store
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::Auth(AuthError::UserAlreadyExists));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == email))
    }
}
