//! Authentication endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::User;

use super::{BackendClient, BackendError};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Whether a federated credential should sign in an existing account or
/// create one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoogleMode {
    Login,
    Register,
}

/// Token and user record produced by every successful sign-in path.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
struct GoogleRequest<'a> {
    credential: &'a str,
    mode: GoogleMode,
}

impl BackendClient {
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, BackendError> {
        let value = self.request_value(self.post("user/login", request, None)).await?;
        auth_payload_from(value)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, BackendError> {
        let value = self
            .request_value(self.post("user/register", request, None))
            .await?;
        auth_payload_from(value)
    }

    pub async fn google_sign_in(
        &self,
        credential: &str,
        mode: GoogleMode,
    ) -> Result<AuthPayload, BackendError> {
        let body = GoogleRequest { credential, mode };
        let value = self.request_value(self.post("user/google", &body, None)).await?;
        auth_payload_from(value)
    }

    /// Confirm a stored session with the backend. Returns the refreshed user
    /// record when the backend includes one.
    pub async fn verify_session(&self, token: &str) -> Result<Option<User>, BackendError> {
        let value = self
            .request_value(self.get("user/verify", Some(token)))
            .await?;
        let data = data_or_root(&value);
        match data.get("user") {
            Some(user) if !user.is_null() => Ok(Some(serde_json::from_value(user.clone())?)),
            _ => Ok(None),
        }
    }
}

fn data_or_root(value: &Value) -> &Value {
    match value.get("data") {
        Some(data) if !data.is_null() => data,
        _ => value,
    }
}

/// Extract `{token, user}` from an auth response, wherever the backend put
/// them: both may sit at the top level or under `data`.
fn auth_payload_from(value: Value) -> Result<AuthPayload, BackendError> {
    let data = data_or_root(&value);
    let token = data
        .get("token")
        .or_else(|| value.get("token"))
        .and_then(Value::as_str);
    let user = data.get("user").or_else(|| value.get("user"));

    match (token, user) {
        (Some(token), Some(user)) if !user.is_null() => Ok(AuthPayload {
            token: token.to_string(),
            user: serde_json::from_value(user.clone())?,
        }),
        _ => Err(BackendError::Payload(
            "auth response missing token or user".to_string(),
        )),
    }
}
