use serde::Serialize;

/// Boxed error type accepted from caller-supplied callback handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while verifying and parsing IPN callbacks
#[derive(Debug, thiserror::Error)]
pub enum IpnError {
    /// The IPN secret was not configured when verification was attempted.
    #[error("IPN secret is not configured")]
    Configuration,

    /// The callback body is not valid JSON.
    #[error("Invalid JSON payload: {0}")]
    MalformedPayload(String),

    /// The signature header is absent or does not match the payload.
    #[error("Invalid IPN signature")]
    InvalidSignature,

    /// The caller-supplied callback handler failed.
    #[error("Callback handler failed: {0}")]
    Handler(#[source] BoxError),

    /// A configuration value failed validation in `ConfigBuilder::build`.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Body sent back to the provider when a callback is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectionBody {
    pub success: bool,
    pub error: String,
}

impl IpnError {
    pub fn malformed_payload(msg: impl Into<String>) -> Self {
        Self::MalformedPayload(msg.into())
    }

    pub fn handler(err: impl Into<BoxError>) -> Self {
        Self::Handler(err.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// HTTP status used when this error rejects a callback.
    ///
    /// Every rejection is reported as `400 Bad Request` so the provider
    /// retries the delivery on its own schedule.
    pub fn status_code(&self) -> u16 {
        400
    }

    /// Returns a message that is safe to send back to the caller.
    ///
    /// Handler failures come from application code and may carry internal
    /// details, so only a generic message is exposed for them. The full
    /// error is logged server-side.
    pub fn safe_message(&self) -> String {
        match self {
            Self::Configuration | Self::InvalidSignature => self.to_string(),
            Self::InvalidConfig(_) => "Invalid configuration".to_string(),
            Self::MalformedPayload(_) => "Invalid JSON payload".to_string(),
            Self::Handler(_) => "Callback handler failed".to_string(),
        }
    }

    /// JSON body describing this rejection.
    pub fn rejection_body(&self) -> RejectionBody {
        RejectionBody {
            success: false,
            error: self.safe_message(),
        }
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for IpnError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status_code())
            .unwrap_or(axum::http::StatusCode::BAD_REQUEST);

        tracing::warn!(
            status = status.as_u16(),
            error = %self,
            "IPN callback rejected"
        );

        (status, axum::Json(self.rejection_body())).into_response()
    }
}

/// Result type alias for IPN operations
pub type Result<T> = std::result::Result<T, IpnError>;

impl From<serde_json::Error> for IpnError {
    fn from(err: serde_json::Error) -> Self {
        IpnError::MalformedPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let err = IpnError::Configuration;
        assert_eq!(err.to_string(), "IPN secret is not configured");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.safe_message(), "IPN secret is not configured");
    }

    #[test]
    fn test_malformed_payload_hides_parser_detail() {
        let err = IpnError::malformed_payload("expected value at line 1 column 1");
        assert!(matches!(err, IpnError::MalformedPayload(_)));
        assert!(err.to_string().contains("line 1 column 1"));
        assert_eq!(err.safe_message(), "Invalid JSON payload");
    }

    #[test]
    fn test_invalid_config_message() {
        let err = IpnError::invalid_config("Invalid log level: verbose");
        assert_eq!(err.to_string(), "Invalid configuration: Invalid log level: verbose");
        assert_eq!(err.safe_message(), "Invalid configuration");
    }

    #[test]
    fn test_invalid_signature_error() {
        let err = IpnError::InvalidSignature;
        assert_eq!(err.to_string(), "Invalid IPN signature");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_handler_error_keeps_source() {
        let err = IpnError::handler("database unavailable");
        assert_eq!(err.to_string(), "Callback handler failed: database unavailable");
        assert_eq!(err.safe_message(), "Callback handler failed");

        let source = std::error::Error::source(&err).expect("should have source");
        assert_eq!(source.to_string(), "database unavailable");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: IpnError = json_err.into();
        assert!(matches!(err, IpnError::MalformedPayload(_)));
    }

    #[test]
    fn test_rejection_body_serialization() {
        let body = IpnError::InvalidSignature.rejection_body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Invalid IPN signature"})
        );
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_into_response_is_bad_request() {
        use axum::response::IntoResponse;

        let response = IpnError::InvalidSignature.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
