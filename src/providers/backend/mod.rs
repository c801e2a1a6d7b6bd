//! Client for the route backend REST API.
//!
//! The backend is a black-box collaborator: JSON bodies, bearer tokens
//! supplied by the session layer, and a response envelope that is
//! sometimes flat and sometimes nested under a `data` key — both shapes
//! are accepted everywhere.

pub mod auth;
pub mod error;
pub mod routes;

pub use auth::{AuthPayload, GoogleMode, LoginRequest, RegisterRequest};
pub use error::BackendError;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("rutero/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let mut base_url = base_url.trim_end_matches('/').to_string();
        base_url.push('/');
        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str, token: Option<&str>) -> reqwest::RequestBuilder {
        self.attach(self.http.get(self.url(path)), token)
    }

    fn post<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        self.attach(self.http.post(self.url(path)).json(body), token)
    }

    fn put<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        self.attach(self.http.put(self.url(path)).json(body), token)
    }

    fn attach(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request, map error statuses, and return the raw JSON body.
    async fn request_value(&self, request: reqwest::RequestBuilder) -> Result<Value, BackendError> {
        let response = request.timeout(REQUEST_TIMEOUT).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let value = self.request_value(request).await?;
        unwrap_envelope(value)
    }
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Decode a payload that may arrive flat or nested under `data`.
fn unwrap_envelope<T: DeserializeOwned>(value: Value) -> Result<T, BackendError> {
    if let Some(inner) = value.get("data") {
        if !inner.is_null() {
            if let Ok(parsed) = serde_json::from_value(inner.clone()) {
                return Ok(parsed);
            }
        }
    }
    serde_json::from_value(value).map_err(BackendError::from)
}
