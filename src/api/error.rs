//! Transport error taxonomy
//!
//! Every server call fails with one of these; actions catch them
//! individually and report, never retry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success response with a parseable `detail` payload.
    #[error("{detail}")]
    Server { status: u16, detail: String },

    /// Non-success response without a parseable body.
    #[error("HTTP {0}")]
    Status(u16),

    /// The bounded request lifetime elapsed.
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure before any response.
    #[error("request failed: {0}")]
    Transport(String),
}

impl ApiError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(err.to_string())
        }
    }

    /// Build the error for a non-success status from the raw body:
    /// extract `detail` when the body parses as JSON, else fall back to
    /// the bare status code.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from));
        match detail {
            Some(detail) => ApiError::Server { status, detail },
            None => ApiError::Status(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_extracted_from_json_body() {
        let err = ApiError::from_response(409, r#"{"detail": "Slot already reserved"}"#);
        assert_eq!(err.to_string(), "Slot already reserved");
        assert!(matches!(err, ApiError::Server { status: 409, .. }));
    }

    #[test]
    fn test_unparseable_body_falls_back_to_status() {
        let err = ApiError::from_response(502, "<html>bad gateway</html>");
        assert_eq!(err.to_string(), "HTTP 502");
    }

    #[test]
    fn test_json_body_without_detail_falls_back_to_status() {
        let err = ApiError::from_response(500, r#"{"error": "boom"}"#);
        assert!(matches!(err, ApiError::Status(500)));
    }

    #[test]
    fn test_timeout_maps_distinctly() {
        // Non-timeout transport failures keep their message; the timeout
        // variant has its own. Constructed directly since reqwest errors
        // cannot be built by hand.
        assert_eq!(ApiError::Timeout.to_string(), "request timed out");
        assert_eq!(
            ApiError::Transport("connection refused".into()).to_string(),
            "request failed: connection refused"
        );
    }
}
