use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id
    pub sub: Uuid,
    /// Issued-at timestamp
    pub iat: i64,
    /// Expiry timestamp
    pub exp: i64,
}

/// Issues and verifies HS256 access tokens.
///
/// Tokens are signed and expiring; the raw user id is never used as a
/// credential.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_secs: config.token_ttl.as_secs() as i64,
        }
    }

    /// Sign a token for the user. Returns the token and its lifetime in
    /// seconds (reported to the client as `expires_in`).
    pub fn issue(&self, user_id: Uuid) -> Result<(String, i64)> {
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: user_id,
            iat: now,
            exp: now + self.ttl_secs,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok((token, self.ttl_secs))
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<AccessClaims> {
        let validation = Validation::new(Algorithm::HS256);

        let data =
            decode::<AccessClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        AppError::Unauthorized("Token expired".to_string())
                    }
                    _ => AppError::Unauthorized("Invalid token".to_string()),
                }
            })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(ttl: Duration) -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-that-is-long-enough!".to_string(),
            token_ttl: ttl,
            admin_username: None,
            admin_email: None,
            admin_password: None,
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = TokenService::new(&config(Duration::from_secs(3600)));
        let user_id = Uuid::new_v4();

        let (token, expires_in) = service.issue(user_id).unwrap();
        assert_eq!(expires_in, 3600);

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let service = TokenService::new(&config(Duration::from_secs(3600)));
        assert!(service.verify("not-a-token").is_err());
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let issuer = TokenService::new(&config(Duration::from_secs(3600)));
        let verifier = TokenService::new(&AuthConfig {
            jwt_secret: "a-completely-different-secret!!!".to_string(),
            token_ttl: Duration::from_secs(3600),
            admin_username: None,
            admin_email: None,
            admin_password: None,
        });

        let (token, _) = issuer.issue(Uuid::new_v4()).unwrap();
        assert!(verifier.verify(&token).is_err());
    }
}
