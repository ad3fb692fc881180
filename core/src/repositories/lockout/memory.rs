//! In-memory reference implementation of the lockout store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::otp_lockout::OtpLockout;
use crate::errors::DomainError;

use super::trait_::LockoutRepository;

/// In-memory lockout store keyed by email
#[derive(Clone, Default)]
pub struct InMemoryLockoutRepository {
    records: Arc<RwLock<HashMap<String, OtpLockout>>>,
}

impl InMemoryLockoutRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LockoutRepository for InMemoryLockoutRepository {
    async fn find(&self, email: &str) -> Result<Option<OtpLockout>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(email).cloned())
    }

    async fn upsert(&self, lockout: OtpLockout) -> Result<OtpLockout, DomainError> {
        let mut records = self.records.write().await;
        records.insert(lockout.email.clone(), lockout.clone());
        Ok(lockout)
    }

    async fn clear(&self, email: &str) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        records.remove(email);
        Ok(())
    }
}
