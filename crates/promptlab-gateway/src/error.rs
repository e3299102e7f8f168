use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use promptlab_providers::ProxyError;
use serde_json::json;
use thiserror::Error;

/// Everything the chat route can answer with instead of an upstream body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The inbound body is not a JSON object.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Proxy(#[from] ProxyError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Proxy(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::InvalidBody(message) => {
                tracing::warn!(error = %message, "chat_request_rejected");
            }
            ApiError::Proxy(e) => {
                tracing::error!(error = %e, kind = e.kind(), "chat_request_failed");
            }
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::InvalidBody("x".into()).status(),
            StatusCode::BAD_REQUEST
        );

        let proxy = ApiError::from(ProxyError::MalformedUpstreamBody {
            provider: "DeepSeek".into(),
            message: "expected value at line 1 column 1".into(),
        });
        assert_eq!(proxy.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            proxy.to_string(),
            "DeepSeek returned a malformed body: expected value at line 1 column 1"
        );
    }
}
