//! In-memory reference implementation of the OTP record store.
//!
//! Backs the test suite and serves as the behavioral reference for SQL
//! implementations. A single `RwLock` over the record table makes every
//! trait method atomic.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::otp_code::{OtpCode, OtpPurpose, OtpStatus};
use crate::errors::DomainError;

use super::trait_::OtpRepository;

/// In-memory OTP record store
#[derive(Clone, Default)]
pub struct InMemoryOtpRepository {
    records: Arc<RwLock<HashMap<Uuid, OtpCode>>>,
}

impl InMemoryOtpRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held, for test assertions
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Fetch a record by id, for test assertions
    pub async fn get(&self, id: Uuid) -> Option<OtpCode> {
        self.records.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl OtpRepository for InMemoryOtpRepository {
    async fn find_active(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpCode>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.email == email && r.purpose == purpose && r.is_active())
            .cloned())
    }

    async fn find_most_recent(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpCode>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.email == email && r.purpose == purpose)
            .max_by_key(|r| r.issued_at)
            .cloned())
    }

    async fn insert(&self, code: OtpCode) -> Result<OtpCode, DomainError> {
        let mut records = self.records.write().await;

        // Enforce the single-active invariant at the store boundary
        if records
            .values()
            .any(|r| r.email == code.email && r.purpose == code.purpose && r.is_active())
        {
            return Err(DomainError::Store {
                message: format!(
                    "active code already exists for {} ({})",
                    code.email,
                    code.purpose.as_str()
                ),
            });
        }

        records.insert(code.id, code.clone());
        Ok(code)
    }

    async fn supersede_active(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<u64, DomainError> {
        let mut records = self.records.write().await;
        let mut count = 0;
        for record in records.values_mut() {
            if record.email == email && record.purpose == purpose && record.is_active() {
                record.status = OtpStatus::Consumed;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn update_status(&self, id: Uuid, status: OtpStatus) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(record) => {
                record.status = status;
                Ok(())
            }
            None => Err(DomainError::NotFound {
                resource: format!("OtpCode {}", id),
            }),
        }
    }

    async fn increment_attempts(&self, id: Uuid) -> Result<u32, DomainError> {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(record) if record.is_active() => {
                record.attempts += 1;
                Ok(record.attempts)
            }
            Some(_) => Err(DomainError::Store {
                message: format!("cannot count attempts against terminal record {}", id),
            }),
            None => Err(DomainError::NotFound {
                resource: format!("OtpCode {}", id),
            }),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        Ok(records.remove(&id).is_some())
    }
}
