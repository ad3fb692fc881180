//! bcrypt password hashing

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::services::auth::PasswordHasherTrait;

/// Password hasher backed by bcrypt
#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl BcryptPasswordHasher {
    /// Create a hasher using the bcrypt default cost
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Create a hasher with an explicit cost, mainly for fast tests
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl PasswordHasherTrait for BcryptPasswordHasher {
    fn hash(&self, plain: &str) -> Result<String, String> {
        hash(plain, self.cost).map_err(|e| e.to_string())
    }

    fn verify(&self, plain: &str, hashed: &str) -> Result<bool, String> {
        verify(plain, hashed).map_err(|e| e.to_string())
    }
}
