use crate::core::errors::MedipassError;
use crate::core::models::user::Role;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub id: String,
    pub role: Role,
    pub iat: u64,
    pub exp: u64,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        JwtService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn generate_token(&self, user_id: &str, role: Role) -> Result<String, MedipassError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| MedipassError::InternalServerError(format!("Time error: {}", e)))?;
        self.generate_token_at(user_id, role, now.as_secs())
    }

    /// Issues a token as if it had been signed at `issued_at` (unix seconds).
    pub fn generate_token_at(&self, user_id: &str, role: Role, issued_at: u64) -> Result<String, MedipassError> {
        let exp = issued_at
            .checked_add(self.ttl.as_secs())
            .ok_or_else(|| MedipassError::InternalServerError("Token expiry out of range".to_string()))?;
        let claims = Claims {
            id: user_id.to_string(),
            role,
            iat: issued_at,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| MedipassError::InternalServerError(format!("JWT encoding error: {}", e)))
    }

    /// Accepts a token up to and including its `exp` second.
    pub fn validate_token(&self, token: &str) -> Result<Claims, MedipassError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| MedipassError::InvalidToken(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}
