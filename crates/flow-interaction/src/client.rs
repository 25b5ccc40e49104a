//! The HTTP client for the Footage Flow backend.
//!
//! One `BackendClient` is shared by all endpoint groups. Transport failures
//! and non-2xx statuses both map to [`FlowError::Backend`]; a 2xx body that
//! reports `success: false` is handled per endpoint, since the payload
//! shapes differ.

use reqwest::{multipart::Form, Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use flow_core::error::{FlowError, Result};
use flow_infrastructure::settings::ClientSettings;

/// Client for one backend instance.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Creates a client for the backend at `base_url` (trailing slashes are
    /// tolerated).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(settings.backend_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute form of a media path the backend returned relative to
    /// itself (rendered videos arrive as `/renders/<id>.mp4`).
    pub fn absolute_media_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|err| transport_error(path, &err))?;

        Self::read_json(path, response).await
    }

    pub(crate) async fn post_multipart<R>(&self, path: &str, form: Form) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .map_err(|err| transport_error(path, &err))?;

        Self::read_json(path, response).await
    }

    pub(crate) async fn get_json<R>(&self, path: &str, query: &[(&str, &str)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|err| transport_error(path, &err))?;

        Self::read_json(path, response).await
    }

    async fn read_json<R>(path: &str, response: reqwest::Response) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            tracing::debug!(%path, %status, "Backend request failed");
            return Err(map_http_error(status, body));
        }

        response.json::<R>().await.map_err(|err| {
            FlowError::Serialization {
                format: "JSON".to_string(),
                message: format!("Unexpected response from {path}: {err}"),
            }
        })
    }
}

/// Error payload envelope the backend uses for failures.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: String,
}

fn transport_error(path: &str, err: &reqwest::Error) -> FlowError {
    FlowError::Backend {
        status: None,
        message: format!("Request to {path} failed: {err}"),
        retryable: err.is_connect() || err.is_timeout(),
    }
}

fn map_http_error(status: StatusCode, body: String) -> FlowError {
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error)
        .unwrap_or(body);

    let retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    FlowError::Backend {
        status: Some(status.as_u16()),
        message,
        retryable,
    }
}
