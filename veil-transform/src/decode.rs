//! Inbound payload decoding

use crate::error::{Result, TransformError};
use crate::matcher::KeyMatcher;
use serde_json::{Map, Value};
use std::sync::Arc;
use veil_codec::IdCodec;

/// Recursive inbound transform: the mirror of [`crate::Encoder`] with the
/// codec direction reversed and one added failure mode: a token that does
/// not decode rejects the whole payload.
#[derive(Clone)]
pub struct Decoder {
    matcher: Arc<KeyMatcher>,
    codec: Arc<dyn IdCodec>,
}

impl Decoder {
    /// Build a decoder over shared classifier and codec handles.
    pub fn new(matcher: Arc<KeyMatcher>, codec: Arc<dyn IdCodec>) -> Self {
        Self { matcher, codec }
    }

    /// Transform an arbitrary payload.
    ///
    /// The first undecodable identifier aborts the traversal; the caller
    /// never observes a partially decoded payload.
    pub fn decode_payload(&self, payload: &Value) -> Result<Value> {
        match payload {
            Value::Object(map) => Ok(Value::Object(self.decode_object(map)?)),
            Value::Array(items) => Ok(Value::Array(self.decode_array(items)?)),
            scalar => Ok(scalar.clone()),
        }
    }

    /// Transform an object, preserving key order.
    pub fn decode_object(&self, map: &Map<String, Value>) -> Result<Map<String, Value>> {
        let mut out = Map::with_capacity(map.len());
        for (key, value) in map {
            let decoded = match value {
                Value::Object(inner) => Value::Object(self.decode_object(inner)?),
                // Flat array-of-ids mode, mirroring the encoder: every
                // element is checked as a scalar token and any invalid
                // element rejects the whole field.
                Value::Array(items) if self.matcher.is_id_key(key) => Value::Array(
                    items
                        .iter()
                        .map(|item| self.decode_scalar(key, item))
                        .collect::<Result<_>>()?,
                ),
                Value::Array(items) => Value::Array(self.decode_array(items)?),
                scalar if self.matcher.is_id_key(key) => self.decode_scalar(key, scalar)?,
                scalar => scalar.clone(),
            };
            out.insert(key.clone(), decoded);
        }
        Ok(out)
    }

    /// Generic array rule: recurse into containers, copy scalars.
    pub fn decode_array(&self, items: &[Value]) -> Result<Vec<Value>> {
        items
            .iter()
            .map(|item| match item {
                Value::Object(map) => Ok(Value::Object(self.decode_object(map)?)),
                Value::Array(inner) => Ok(Value::Array(self.decode_array(inner)?)),
                scalar => Ok(scalar.clone()),
            })
            .collect()
    }

    /// Decode one value already classified as an identifier.
    ///
    /// String tokens must decode. `null` passes through (nullable
    /// identifiers) and containers pass through (flat array-of-ids mode);
    /// any other scalar is not a token and rejects the payload.
    fn decode_scalar(&self, key: &str, value: &Value) -> Result<Value> {
        match value {
            Value::String(token) => match self.codec.decode(token) {
                Some(id) => Ok(Value::Number(id.into())),
                None => Err(TransformError::InvalidIdentifier {
                    key: key.to_string(),
                }),
            },
            Value::Null => Ok(Value::Null),
            Value::Object(_) | Value::Array(_) => Ok(value.clone()),
            _ => Err(TransformError::InvalidIdentifier {
                key: key.to_string(),
            }),
        }
    }
}
