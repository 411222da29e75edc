//! Error types for payload transformation

use thiserror::Error;

/// Errors raised while decoding an inbound payload.
///
/// Encoding has no failure mode; only the inbound direction can reject a
/// payload, and it does so before any handler logic runs.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A value classified as an identifier did not hold a decodable token.
    #[error("Invalid identifier token under key '{key}'")]
    InvalidIdentifier {
        /// The identifier-bearing key whose value failed to decode.
        key: String,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TransformError>;
