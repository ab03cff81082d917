use actix_web::HttpRequest;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::models::{Role, ServiceError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (username)
    pub uid: i64,
    pub role: Role,
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued at
}

#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtManager {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl.num_seconds().max(0) as u64
    }

    pub fn generate_token(
        &self,
        user_id: i64,
        username: &str,
        role: Role,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();

        let claims = Claims {
            sub: username.to_string(),
            uid: user_id,
            role,
            exp: (now + self.ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn verify_token(
        &self,
        token: &str,
    ) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
    }
}

pub fn extract_token_from_header(req: &HttpRequest) -> Option<String> {
    let auth_header = req
        .headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;

    // Swagger UI sometimes sends the scheme twice
    if auth_header.starts_with("bearer ") {
        Some(auth_header.strip_prefix("bearer ")?.to_string())
    } else {
        Some(auth_header.to_string())
    }
}

pub fn verify_jwt(req: &HttpRequest, jwt_manager: &JwtManager) -> Result<Claims, ServiceError> {
    let token = extract_token_from_header(req).ok_or_else(|| {
        ServiceError::AuthenticationError("Missing Authorization header".to_string())
    })?;

    jwt_manager
        .verify_token(&token)
        .map(|data| data.claims)
        .map_err(|_| ServiceError::AuthenticationError("Invalid or expired token".to_string()))
}

pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::InternalError(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
