use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::core::config::AdminBootstrap;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto, RegisterRequestDto, UserDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::TokenService;
use crate::storage::{NewUser, Store};

/// Service for registration, login and current-user lookup
pub struct AuthService {
    store: Arc<dyn Store>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Register a new user
    ///
    /// Username and email must be unique; duplicates are a conflict and
    /// create nothing.
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        if let Some(confirm) = &dto.confirm_password {
            if confirm != &dto.password {
                return Err(AppError::Validation("Passwords do not match".to_string()));
            }
        }

        if self
            .store
            .get_user_by_username(&dto.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }

        if self.store.get_user_by_email(&dto.email).await?.is_some() {
            return Err(AppError::Conflict(
                "Email is already registered".to_string(),
            ));
        }

        let password_hash = hash_password(&dto.password)?;
        let user = self
            .store
            .create_user(NewUser {
                username: dto.username,
                email: dto.email,
                password_hash,
                is_admin: false,
            })
            .await?;

        tracing::info!("User registered: id={}, username={}", user.id, user.username);

        self.auth_response(user.into())
    }

    /// Login with username and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = self
            .store
            .get_user_by_username(&dto.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(&dto.password, &user.password_hash) {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        self.auth_response(user.into())
    }

    /// Current-user lookup for `/api/auth/me`
    pub async fn current_user(&self, user: &AuthenticatedUser) -> Result<UserDto> {
        let user = self
            .store
            .get_user(user.id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        Ok(user.into())
    }

    /// Create the configured admin account unless the username is taken.
    /// Called once at startup.
    pub async fn ensure_admin(&self, bootstrap: AdminBootstrap) -> Result<()> {
        if self
            .store
            .get_user_by_username(&bootstrap.username)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let password_hash = hash_password(&bootstrap.password)?;
        let admin = self
            .store
            .create_user(NewUser {
                username: bootstrap.username,
                email: bootstrap.email,
                password_hash,
                is_admin: true,
            })
            .await?;

        tracing::info!("Admin account bootstrapped: username={}", admin.username);
        Ok(())
    }

    fn auth_response(&self, user: UserDto) -> Result<AuthResponseDto> {
        let (access_token, expires_in) = self.tokens.issue(user.id)?;
        Ok(AuthResponseDto {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        })
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{memory_store, test_token_service};

    fn register_dto(username: &str, email: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            username: username.to_string(),
            email: email.to_string(),
            password: "hunter2hunter2".to_string(),
            confirm_password: None,
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let store = memory_store();
        let service = AuthService::new(Arc::clone(&store), test_token_service());

        let response = service
            .register(register_dto("maria", "maria@example.com"))
            .await
            .unwrap();

        let user = store.get_user(response.user.id).await.unwrap().unwrap();
        assert_ne!(user.password_hash, "hunter2hunter2");
        assert!(verify_password("hunter2hunter2", &user.password_hash));
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let store = memory_store();
        let service = AuthService::new(Arc::clone(&store), test_token_service());

        service
            .register(register_dto("maria", "maria@example.com"))
            .await
            .unwrap();

        let err = service
            .register(register_dto("maria", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // No second user was created
        assert!(store
            .get_user_by_email("other@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let store = memory_store();
        let service = AuthService::new(Arc::clone(&store), test_token_service());

        service
            .register(register_dto("maria", "maria@example.com"))
            .await
            .unwrap();

        let err = service
            .register(register_dto("carla", "maria@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_mismatched_confirmation() {
        let store = memory_store();
        let service = AuthService::new(store, test_token_service());

        let mut dto = register_dto("maria", "maria@example.com");
        dto.confirm_password = Some("something-else".to_string());

        let err = service.register(dto).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let store = memory_store();
        let service = AuthService::new(store, test_token_service());

        service
            .register(register_dto("maria", "maria@example.com"))
            .await
            .unwrap();

        let response = service
            .login(LoginRequestDto {
                username: "maria".to_string(),
                password: "hunter2hunter2".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.username, "maria");
        assert_eq!(response.token_type, "Bearer");

        let err = service
            .login(LoginRequestDto {
                username: "maria".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let store = memory_store();
        let service = AuthService::new(Arc::clone(&store), test_token_service());

        let bootstrap = AdminBootstrap {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "super-secret-admin".to_string(),
        };

        service.ensure_admin(bootstrap.clone()).await.unwrap();
        service.ensure_admin(bootstrap).await.unwrap();

        let admin = store.get_user_by_username("admin").await.unwrap().unwrap();
        assert!(admin.is_admin);
    }
}
