use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::TokenService;
use crate::storage::Store;

/// Resolves bearer tokens to authenticated users for the middleware.
///
/// Verifies the token signature and expiry, then loads the user from the
/// store so revoked/unknown subjects fail closed.
pub struct JwtValidator {
    tokens: TokenService,
    store: Arc<dyn Store>,
}

impl JwtValidator {
    pub fn new(tokens: TokenService, store: Arc<dyn Store>) -> Self {
        Self { tokens, store }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        let claims = self.tokens.verify(token)?;

        let user = self
            .store
            .get_user(claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{memory_store, seed_user, test_token_service};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_validate_token_resolves_user() {
        let store = memory_store();
        let user = seed_user(&store, "maria", false).await;
        let tokens = test_token_service();
        let validator = JwtValidator::new(tokens.clone(), store);

        let (token, _) = tokens.issue(user.id).unwrap();
        let authenticated = validator.validate_token(&token).await.unwrap();
        assert_eq!(authenticated.id, user.id);
        assert_eq!(authenticated.username, "maria");
    }

    #[tokio::test]
    async fn test_validate_token_rejects_unknown_subject() {
        let store = memory_store();
        let tokens = test_token_service();
        let validator = JwtValidator::new(tokens.clone(), store);

        let (token, _) = tokens.issue(Uuid::new_v4()).unwrap();
        assert!(validator.validate_token(&token).await.is_err());
    }
}
