//! Maps non-2xx responses to [`ApiError`].
//!
//! AppSwitch and the payments API use different error bodies, so each has
//! its own classifier.

use std::time::Duration;

use http::header::RETRY_AFTER;
use http::{HeaderMap, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ConflictError, ErrorResponse};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuthErrorBody {
    #[serde(rename = "statusCode")]
    status_code: u16,
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BadRequestBody {
    #[serde(rename = "Reason")]
    reason: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerErrorBody {
    #[serde(rename = "CorrelationId")]
    correlation_id: String,
    #[serde(rename = "Errortype")]
    error_type: String,
    #[serde(rename = "Message")]
    message: String,
}

pub fn check_app_switch_response(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(auth_error(status, body));
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = headers
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        return Err(ApiError::RateLimit { retry_after });
    }

    if status.is_client_error() {
        return Err(bad_request_error(status, body));
    }

    Err(server_error(status, body))
}

pub fn check_payments_response(status: StatusCode, body: &[u8]) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }

    let mut response = ErrorResponse {
        status_code: status.as_u16(),
        message: String::new(),
        conflict: None,
    };

    if !body.is_empty() {
        match serde_json::from_slice::<ConflictError>(body) {
            Ok(conflict) if !conflict.is_empty() => response.conflict = Some(conflict),
            _ => response.message = String::from_utf8_lossy(body).into_owned(),
        }
    }

    Err(response.into())
}

fn auth_error(status: StatusCode, body: &[u8]) -> ApiError {
    match decode::<AuthErrorBody>(status, body) {
        Ok(auth) if auth.status_code == 0 && auth.message.is_empty() => unknown(status, body),
        Ok(auth) => ApiError::Auth {
            status_code: auth.status_code,
            message: auth.message,
        },
        Err(error) => error,
    }
}

fn bad_request_error(status: StatusCode, body: &[u8]) -> ApiError {
    match decode::<BadRequestBody>(status, body) {
        Ok(bad_request) if bad_request.reason.is_empty() => unknown(status, body),
        Ok(bad_request) => ApiError::BadRequest {
            reason: bad_request.reason,
        },
        Err(error) => error,
    }
}

// A 500 can also carry `{"Reason": ...}`, so fall back to the 4xx shape.
fn server_error(status: StatusCode, body: &[u8]) -> ApiError {
    match decode::<ServerErrorBody>(status, body) {
        Ok(server)
            if server.correlation_id.is_empty()
                && server.error_type.is_empty()
                && server.message.is_empty() =>
        {
            bad_request_error(status, body)
        }
        Ok(server) => ApiError::Server {
            correlation_id: server.correlation_id,
            error_type: server.error_type,
            message: server.message,
        },
        Err(error) => error,
    }
}

fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decoding {
        status: status.as_u16(),
        body: body.to_vec(),
        message: e.to_string(),
    })
}

fn unknown(status: StatusCode, body: &[u8]) -> ApiError {
    ApiError::Unknown {
        status: status.as_u16(),
        body: String::from_utf8_lossy(body).into_owned(),
    }
}
