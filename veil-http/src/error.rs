//! Hook rejections and their wire format

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use veil_transform::TransformError;

/// Reasons the inbound hooks reject a request.
///
/// Every variant maps to HTTP 400 with a fixed machine-readable code, so
/// clients can rely on the shape without parsing prose.
#[derive(Debug, Error)]
pub enum VeilRejection {
    /// An identifier-bearing field did not hold a decodable token.
    #[error("Invalid identifier token under key '{key}'")]
    InvalidIdentifier {
        /// The identifier-bearing key whose value failed to decode.
        key: String,
    },
    /// The request body could not be buffered for decoding.
    #[error("Request body could not be read")]
    UnreadableBody,
    /// Route parameters were not available on the request.
    #[error("Route parameters could not be decoded")]
    PathParams,
}

impl From<TransformError> for VeilRejection {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::InvalidIdentifier { key } => Self::InvalidIdentifier { key },
        }
    }
}

impl IntoResponse for VeilRejection {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            Self::InvalidIdentifier { key } => {
                tracing::debug!(key = %key, "rejecting request with undecodable identifier");
                ("VEIL_INVALID_ID", "The provided ID is invalid")
            }
            Self::UnreadableBody => ("VEIL_BODY_READ", "Request body could not be read"),
            Self::PathParams => ("VEIL_PATH_PARAMS", "Route parameters could not be decoded"),
        };
        let body = Json(json!({
            "statusCode": StatusCode::BAD_REQUEST.as_u16(),
            "code": code,
            "error": "Bad Request",
            "message": message,
        }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
