use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response carried no data")]
    MissingData,
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Thin typed wrapper over the REST API.
///
/// Holds the base URL and the current bearer token; decodes the
/// `ApiResponse` envelope and turns non-success statuses into
/// `ClientError::Api`.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: RwLock::new(None),
        }
    }

    /// Install the bearer token used for subsequent requests
    pub async fn set_token(&self, token: String) {
        *self.token.write().await = Some(token);
    }

    /// Drop the bearer token (logout)
    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let data = self.execute(self.http.get(self.url(path))).await?;
        data.ok_or(ClientError::MissingData)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let data = self
            .execute(self.http.post(self.url(path)).json(body))
            .await?;
        data.ok_or(ClientError::MissingData)
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let data = self
            .execute(self.http.patch(self.url(path)).json(body))
            .await?;
        data.ok_or(ClientError::MissingData)
    }

    /// DELETE endpoints acknowledge without a data payload
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute::<serde_json::Value>(self.http.delete(self.url(path)))
            .await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>> {
        let request = match self.token.read().await.as_ref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiResponse<serde_json::Value>>()
                .await
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope = response.json::<ApiResponse<T>>().await?;
        Ok(envelope.data)
    }
}
