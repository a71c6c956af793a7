use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Summary line carried by every rejected-parameters response.
pub const INVALID_REQUEST: &str = "Invalid request";

/// The main error type for paramguard
#[derive(Debug, thiserror::Error)]
pub enum ParamGuardError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// One or more request parameters failed validation.
    #[error("Invalid request: {}", .messages.join("; "))]
    Invalid { messages: Vec<String> },

    /// A validator or binding was declared inconsistently.
    ///
    /// Raised while routes are being built, never while serving a request.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    messages: Option<Vec<String>>,
}

impl ParamGuardError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Aggregate field messages into a single bad-request error.
    pub fn invalid<I, M>(messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self::Invalid {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Invalid { .. } => StatusCode::BAD_REQUEST,
            Self::Configuration(_) | Self::Internal(_) | Self::Anyhow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns a message that is safe to show to clients.
    ///
    /// Server-side failures are reduced to a generic message; their details
    /// only reach the logs.
    fn safe_message(&self) -> String {
        match self {
            Self::NotFound(msg) => format!("Not found: {}", msg),
            Self::BadRequest(msg) => format!("Bad request: {}", msg),
            Self::Invalid { .. } => INVALID_REQUEST.to_string(),
            Self::Configuration(_) | Self::Internal(_) | Self::Anyhow(_) => {
                "Internal server error".to_string()
            }
        }
    }

    /// Convert the error into a response, attaching `error_id` when given.
    pub fn into_response_with_id(self, error_id: Option<String>) -> Response {
        let status = self.status_code();
        let error_id = error_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                error_id = %error_id,
                error = %self,
                "Request failed"
            );
        } else {
            tracing::debug!(
                status = status.as_u16(),
                error_id = %error_id,
                error = %self,
                "Request rejected"
            );
        }

        let error = self.safe_message();
        let messages = match self {
            Self::Invalid { messages } => Some(messages),
            _ => None,
        };

        let body = ErrorResponse {
            error,
            error_id: Some(error_id),
            messages,
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for ParamGuardError {
    fn into_response(self) -> Response {
        self.into_response_with_id(None)
    }
}

/// Result type alias for paramguard operations and handlers
pub type Result<T> = std::result::Result<T, ParamGuardError>;

impl From<serde_json::Error> for ParamGuardError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            ParamGuardError::BadRequest(format!("JSON error: {}", err))
        } else {
            ParamGuardError::Internal(format!("JSON serialization error: {}", err))
        }
    }
}

impl From<regex::Error> for ParamGuardError {
    fn from(err: regex::Error) -> Self {
        ParamGuardError::Configuration(format!("Invalid pattern: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_renders_messages() {
        let response = ParamGuardError::invalid(["Missing parameter: name"]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid request");
        assert_eq!(body["messages"], serde_json::json!(["Missing parameter: name"]));
        assert!(body["error_id"].is_string());
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let response = ParamGuardError::internal("connection pool exhausted")
            .into_response_with_id(Some("e-1".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["error_id"], "e-1");
        assert!(body.get("messages").is_none());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ParamGuardError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ParamGuardError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ParamGuardError::configuration("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_regex_error_is_configuration() {
        let err: ParamGuardError = regex::Regex::new("[a").unwrap_err().into();
        assert!(matches!(err, ParamGuardError::Configuration(_)));
    }
}
