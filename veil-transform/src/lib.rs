//! Veil Transform - traversal and classification engine
//!
//! This crate provides the core engine of idveil:
//!
//! - [`KeyMatcher`] decides, per field name, whether a value carries an
//!   identifier
//! - [`Encoder`] walks an outbound payload and rewrites identifier leaves
//!   into tokens
//! - [`Decoder`] walks an inbound payload and rewrites tokens back into
//!   identifiers, failing fast on undecodable tokens
//!
//! Both directions share the same depth-first, order-preserving traversal
//! over `serde_json::Value` and always build fresh containers bottom-up;
//! the caller-owned input is never mutated.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod decode;
pub mod encode;
pub mod error;
pub mod matcher;
pub mod value;

// Re-export commonly used types
pub use decode::Decoder;
pub use encode::Encoder;
pub use error::{Result, TransformError};
pub use matcher::{KeyMatcher, KeyPattern, DEFAULT_ID_PATTERN};
pub use value::json_type_name;

// Re-export the codec contract so downstream crates need only one import
pub use veil_codec::{CodecConfig, ConfigError, IdCodec, VeilCodec};
