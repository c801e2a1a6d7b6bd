use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Backend HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Malformed backend payload: {0}")]
    Payload(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401: the backend rejected the session credentials themselves.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Any backend-side authorization rejection (401 or 403). The session
    /// layer drops to ANONYMOUS on these — local expiry checks are only
    /// advisory.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_includes_code_and_message() {
        let err = BackendError::Status {
            status: 404,
            message: "route not found".to_string(),
        };
        assert_eq!(err.to_string(), "Backend HTTP 404: route not found");
    }

    #[test]
    fn auth_rejection_classification() {
        let unauthorized = BackendError::Status {
            status: 401,
            message: String::new(),
        };
        let forbidden = BackendError::Status {
            status: 403,
            message: String::new(),
        };
        let server_error = BackendError::Status {
            status: 500,
            message: String::new(),
        };

        assert!(unauthorized.is_unauthorized());
        assert!(unauthorized.is_auth_rejection());
        assert!(!forbidden.is_unauthorized());
        assert!(forbidden.is_auth_rejection());
        assert!(!server_error.is_auth_rejection());
    }

    #[test]
    fn payload_error_display() {
        let err = BackendError::Payload("auth response missing token or user".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed backend payload: auth response missing token or user"
        );
    }
}
