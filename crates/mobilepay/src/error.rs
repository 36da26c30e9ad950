use std::time::Duration;

use http::StatusCode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
    #[error("cryptographic primitive failed: {0}")]
    Computation(String),
    #[error("{field} is invalid because {reason}")]
    InvalidArgument { field: &'static str, reason: String },
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to encode request: {0}")]
    Encode(String),
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// Status a webhook handler should answer with when this error ends a request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Configuration(ConfigurationError::MissingVerifierProperties)
            | Error::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            Error::Integrity(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Defects in keys, secrets or client settings. Never transient.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("missing verifier properties: webhook url and signature header must be set")]
    MissingVerifierProperties,
    #[error("invalid signing key: {0}")]
    InvalidKey(String),
    #[error("signature failed self-verification against the configured public key: {0}")]
    SelfVerification(String),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum IntegrityError {
    /// Carries the locally computed value for diagnostics. It is never sent back.
    #[error("Computed unexpected signature of: {computed}")]
    SignatureMismatch { computed: String },
}

/// Typed failure returned by the MobilePay APIs.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Auth { status_code: u16, message: String },
    #[error("{reason}")]
    BadRequest { reason: String },
    #[error("MobilePay rate limit exceeded")]
    RateLimit { retry_after: Option<Duration> },
    #[error(
        "mobilepay server error detected. Message: {message} Type: {error_type} CorrelationId {correlation_id}"
    )]
    Server {
        correlation_id: String,
        error_type: String,
        message: String,
    },
    #[error("{message}")]
    Decoding {
        status: u16,
        body: Vec<u8>,
        message: String,
    },
    #[error("Unknown error. Status {status} Body: {body}")]
    Unknown { status: u16, body: String },
    #[error(transparent)]
    Response(#[from] ErrorResponse),
}

/// Error body of the payments API. 400 and 500 responses share this shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: String,
    pub conflict: Option<ConflictError>,
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.conflict {
            Some(conflict) => write!(f, "{} {}: {}", self.status_code, conflict.code, conflict.message),
            None => write!(f, "{} {}", self.status_code, self.message),
        }
    }
}

impl std::error::Error for ErrorResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConflictError {
    pub code: String,
    pub message: String,
    pub correlation_id: String,
    pub origin: String,
}

impl ConflictError {
    pub(crate) fn is_empty(&self) -> bool {
        *self == ConflictError::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_verifier_properties_returns_400() {
        let error = Error::from(ConfigurationError::MissingVerifierProperties);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn signature_mismatch_returns_401() {
        let error = Error::from(IntegrityError::SignatureMismatch {
            computed: "abc=".into(),
        });
        assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn self_verification_failure_returns_500() {
        let error = Error::from(ConfigurationError::SelfVerification("bad pair".into()));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn computation_error_returns_500() {
        let error = Error::Computation("hmac".into());
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_argument_message() {
        let error = Error::invalid_argument("paymentId", "paymentId is empty");
        assert_eq!(error.to_string(), "paymentId is invalid because paymentId is empty");
    }

    #[test]
    fn mismatch_message_includes_computed_value() {
        let error = Error::from(IntegrityError::SignatureMismatch {
            computed: "HIcf0Ivp0HwjB2qVIwU1vIdf/60=".into(),
        });
        assert_eq!(
            error.to_string(),
            "Computed unexpected signature of: HIcf0Ivp0HwjB2qVIwU1vIdf/60="
        );
    }
}
