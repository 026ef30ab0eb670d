//! HTTP client for the content service REST API.

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use super::{RemoteContent, StoreError};
use crate::models::{LoginRequest, LoginResult, SiteContent};

/// Talks to the content service at `base_url` (routes live under `/api`).
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: String,
}

/// Error body shape shared by the service's failure responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(remote_error(response).await)
        }
    }
}

/// Build a `Remote` error from a failed response, preferring the body's message.
async fn remote_error(response: Response) -> StoreError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| reason(status));
    StoreError::Remote {
        status: status.as_u16(),
        message,
    }
}

fn reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown status")
        .to_string()
}

async fn read_json(response: Response) -> Result<Value, StoreError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| StoreError::Network(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode(e.to_string()))
}

#[async_trait]
impl RemoteContent for HttpRemote {
    async fn get_content(&self) -> Result<SiteContent, StoreError> {
        let response = self.send(self.client.get(self.url("/content"))).await?;
        let value = read_json(response).await?;
        SiteContent::from_value(value).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn put_content(&self, content: &SiteContent) -> Result<(), StoreError> {
        self.send(self.client.post(self.url("/content")).json(content))
            .await?;
        Ok(())
    }

    async fn reset_content(&self) -> Result<(), StoreError> {
        self.send(self.client.post(self.url("/content/reset"))).await?;
        Ok(())
    }

    /// Login failures (401, 500) come back as `Ok` with `success == false`;
    /// only transport and decoding problems are errors.
    async fn login(&self, password: &str) -> Result<LoginResult, StoreError> {
        let response = self
            .client
            .post(self.url("/admin/login"))
            .json(&LoginRequest {
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let accepted = response.status().is_success();
        let body: LoginResult = serde_json::from_value(read_json(response).await?)
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(LoginResult {
            success: accepted && body.success,
            message: body.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_api_prefix() {
        let remote = HttpRemote::new("http://localhost:3001/");
        assert_eq!(remote.url("/content"), "http://localhost:3001/api/content");
        assert_eq!(
            remote.url("/admin/login"),
            "http://localhost:3001/api/admin/login"
        );
    }
}
