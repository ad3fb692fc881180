//! JWT access-token issuance

use chrono::Duration;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::services::auth::TokenIssuerTrait;
use crate::services::clock::Clock;
use std::sync::Arc;

/// Access-token lifetime in minutes
pub const ACCESS_TOKEN_EXPIRATION_MINUTES: i64 = 30;

/// JWT claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject, the user's email address
    pub sub: String,
    /// The user's identifier
    pub user_id: Uuid,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

/// HS256 token issuer
pub struct JwtTokenIssuer<K: Clock> {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    clock: Arc<K>,
}

impl<K: Clock> JwtTokenIssuer<K> {
    /// Create an issuer signing with the given secret
    pub fn new(secret: &str, clock: Arc<K>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            clock,
        }
    }

    /// Decode and validate a token, returning its claims
    pub fn decode(&self, token: &str) -> Result<Claims, String> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| e.to_string())
    }
}

impl<K: Clock> TokenIssuerTrait for JwtTokenIssuer<K> {
    fn issue(&self, user: &User) -> Result<String, String> {
        let now = self.clock.now();
        let claims = Claims {
            sub: user.email.clone(),
            user_id: user.id,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ACCESS_TOKEN_EXPIRATION_MINUTES)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| e.to_string())
    }
}
