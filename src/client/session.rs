use std::sync::Arc;

use tokio::sync::RwLock;

use crate::client::api::{ApiClient, Result};
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto, RegisterRequestDto, UserDto};

/// Client-side session state.
///
/// Register/login call the API, cache the returned user and install the
/// bearer token on the shared `ApiClient`; logout clears both.
pub struct SessionStore {
    api: Arc<ApiClient>,
    user: RwLock<Option<UserDto>>,
}

impl SessionStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            user: RwLock::new(None),
        }
    }

    pub async fn register(&self, dto: RegisterRequestDto) -> Result<UserDto> {
        let auth: AuthResponseDto = self.api.post("/api/auth/register", &dto).await?;
        Ok(self.install(auth).await)
    }

    pub async fn login(&self, dto: LoginRequestDto) -> Result<UserDto> {
        let auth: AuthResponseDto = self.api.post("/api/auth/login", &dto).await?;
        Ok(self.install(auth).await)
    }

    /// Clear the cached user and the bearer token
    pub async fn logout(&self) {
        *self.user.write().await = None;
        self.api.clear_token().await;
    }

    /// The cached user, if a session is active
    pub async fn current_user(&self) -> Option<UserDto> {
        self.user.read().await.clone()
    }

    /// Re-fetch the session user from the server
    pub async fn refresh(&self) -> Result<UserDto> {
        let user: UserDto = self.api.get("/api/auth/me").await?;
        *self.user.write().await = Some(user.clone());
        Ok(user)
    }

    async fn install(&self, auth: AuthResponseDto) -> UserDto {
        self.api.set_token(auth.access_token).await;
        *self.user.write().await = Some(auth.user.clone());
        auth.user
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::api::ClientError;
    use crate::shared::test_helpers::spawn_app;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    fn register_dto(username: &str, email: String) -> RegisterRequestDto {
        RegisterRequestDto {
            username: username.to_string(),
            email,
            password: "hunter2hunter2".to_string(),
            confirm_password: Some("hunter2hunter2".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_installs_session() {
        let (base_url, _services, _store) = spawn_app().await;
        let api = Arc::new(ApiClient::new(base_url));
        let session = SessionStore::new(Arc::clone(&api));

        let email: String = SafeEmail().fake();
        let user = session.register(register_dto("maria", email)).await.unwrap();
        assert_eq!(user.username, "maria");

        // The token is installed: /api/auth/me resolves
        let me = session.refresh().await.unwrap();
        assert_eq!(me.id, user.id);
        assert_eq!(session.current_user().await.unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_token() {
        let (base_url, _services, _store) = spawn_app().await;
        let api = Arc::new(ApiClient::new(base_url));
        let session = SessionStore::new(Arc::clone(&api));

        let email: String = SafeEmail().fake();
        session.register(register_dto("maria", email)).await.unwrap();
        session.logout().await;

        assert!(session.current_user().await.is_none());
        // Without the token the refresh is rejected by the server
        let err = session.refresh().await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_fails() {
        let (base_url, _services, _store) = spawn_app().await;
        let api = Arc::new(ApiClient::new(base_url));
        let session = SessionStore::new(Arc::clone(&api));

        let email: String = SafeEmail().fake();
        session.register(register_dto("maria", email)).await.unwrap();
        session.logout().await;

        let err = session
            .login(LoginRequestDto {
                username: "maria".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 401, .. }));
        assert!(session.current_user().await.is_none());
    }
}
