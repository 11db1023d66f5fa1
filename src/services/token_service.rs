use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::AppError;

/// Tokens stay valid this long after issuance
pub const TOKEN_TTL_DAYS: i64 = 30;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user _id (hex)
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub iss: String,
}

/// Issues and verifies HS256 identity tokens. No revocation: expiry is the
/// only way a token stops being valid.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, issuer: &str) -> Self {
        Self::with_ttl(secret, issuer, Duration::days(TOKEN_TTL_DAYS))
    }

    pub fn with_ttl(secret: &str, issuer: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.to_string(),
            ttl,
        }
    }

    pub fn issue(&self, user_id: &ObjectId) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_hex(),
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp().max(0) as usize,
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Returns the user id the token was issued for.
    pub fn verify(&self, token: &str) -> Result<ObjectId, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            log::debug!("Token rejected: {}", e);
            AppError::InvalidToken
        })?;

        ObjectId::parse_str(&data.claims.sub).map_err(|_| AppError::InvalidToken)
    }
}
