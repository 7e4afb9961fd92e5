//! Unified error handling for API calls.
//!
//! Every failed call maps to one `ApiError` variant keyed on the response
//! status, with the message pulled from the server's error envelope when one
//! is present. Transport and decode failures get their own variants so
//! callers can tell "the server said no" apart from "the wire broke".

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: connection refused, DNS, timeout.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("failed to decode server response: {0}")]
    Decode(#[source] reqwest::Error),

    /// 400: the request body failed server-side validation.
    #[error("{0}")]
    Validation(String),

    /// 401: missing or invalid credentials. The session has already been
    /// cleared by the time the caller sees this.
    #[error("{0}")]
    Unauthorized(String),

    /// 403: authenticated, but not the owner of the resource.
    #[error("{0}")]
    Forbidden(String),

    /// 404
    #[error("{0}")]
    NotFound(String),

    /// 409: the resource already exists.
    #[error("{0}")]
    Conflict(String),

    /// 422: semantically invalid input (e.g. a weak password).
    #[error("{0}")]
    Unprocessable(String),

    /// Any other non-success status.
    #[error("server returned {status}: {message}")]
    Unexpected { status: u16, message: String },
}

/// Error envelope used by the service: `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<String>,
    message: String,
}

/// FastAPI-style fallback: `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
struct DetailResponse {
    detail: String,
}

impl ApiError {
    /// Map a non-success response to its taxonomy variant, consuming the body.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::from_parts(status, &body)
    }

    /// Pure mapping from status + raw body. Split out so it can be tested
    /// without a live server.
    pub fn from_parts(status: StatusCode, body: &str) -> Self {
        let message =
            extract_message(body).unwrap_or_else(|| default_message(status).to_string());

        match status {
            StatusCode::BAD_REQUEST => ApiError::Validation(message),
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::CONFLICT => ApiError::Conflict(message),
            StatusCode::UNPROCESSABLE_ENTITY => ApiError::Unprocessable(message),
            other => ApiError::Unexpected {
                status: other.as_u16(),
                message,
            },
        }
    }

    /// The message carried by the variant, for screens that render it directly.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

fn extract_message(body: &str) -> Option<String> {
    if let Ok(envelope) = serde_json::from_str::<ErrorResponse>(body) {
        return Some(envelope.error.message);
    }
    if let Ok(detail) = serde_json::from_str::<DetailResponse>(body) {
        return Some(detail.detail);
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn default_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Invalid request",
        StatusCode::UNAUTHORIZED => "Authentication required",
        StatusCode::FORBIDDEN => "Permission denied",
        StatusCode::NOT_FOUND => "Not found",
        StatusCode::CONFLICT => "Resource already exists",
        StatusCode::UNPROCESSABLE_ENTITY => "Invalid input",
        _ => "Request failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ApiError::from_parts(StatusCode::BAD_REQUEST, ""),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from_parts(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from_parts(StatusCode::FORBIDDEN, ""),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from_parts(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_parts(StatusCode::CONFLICT, ""),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from_parts(StatusCode::UNPROCESSABLE_ENTITY, ""),
            ApiError::Unprocessable(_)
        ));
        assert!(matches!(
            ApiError::from_parts(StatusCode::INTERNAL_SERVER_ERROR, ""),
            ApiError::Unexpected { status: 500, .. }
        ));
    }

    #[test]
    fn test_envelope_message_is_extracted() {
        let body = r#"{"error": {"code": "conflict", "message": "Email already registered"}}"#;
        let err = ApiError::from_parts(StatusCode::CONFLICT, body);
        assert_eq!(err.message(), "Email already registered");
    }

    #[test]
    fn test_detail_message_is_extracted() {
        let body = r#"{"detail": "Task not found"}"#;
        let err = ApiError::from_parts(StatusCode::NOT_FOUND, body);
        assert_eq!(err.message(), "Task not found");
    }

    #[test]
    fn test_plain_body_used_as_message() {
        let err = ApiError::from_parts(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(err.message(), "server returned 500: boom");
    }

    #[test]
    fn test_empty_body_falls_back_to_default() {
        let err = ApiError::from_parts(StatusCode::UNAUTHORIZED, "");
        assert_eq!(err.message(), "Authentication required");
    }
}
