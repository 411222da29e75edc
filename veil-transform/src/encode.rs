//! Outbound payload encoding

use crate::matcher::KeyMatcher;
use serde_json::{Map, Value};
use std::sync::Arc;
use veil_codec::IdCodec;

/// Recursive outbound transform: rewrites identifier-bearing leaves into
/// tokens while preserving container shape, key order, and every
/// non-identifier value.
///
/// Encoding is total. The classifier and codec are immutable shared
/// handles, so one encoder serves any number of concurrent payloads.
#[derive(Clone)]
pub struct Encoder {
    matcher: Arc<KeyMatcher>,
    codec: Arc<dyn IdCodec>,
}

impl Encoder {
    /// Build an encoder over shared classifier and codec handles.
    pub fn new(matcher: Arc<KeyMatcher>, codec: Arc<dyn IdCodec>) -> Self {
        Self { matcher, codec }
    }

    /// Transform an arbitrary payload.
    ///
    /// Objects and arrays are rebuilt with identifiers encoded; a bare
    /// scalar payload is returned unchanged (callers that need to encode
    /// a lone identifier invoke the codec directly).
    pub fn encode_payload(&self, payload: &Value) -> Value {
        match payload {
            Value::Object(map) => Value::Object(self.encode_object(map)),
            Value::Array(items) => Value::Array(self.encode_array(items)),
            scalar => scalar.clone(),
        }
    }

    /// Transform an object, preserving key order.
    pub fn encode_object(&self, map: &Map<String, Value>) -> Map<String, Value> {
        let mut out = Map::with_capacity(map.len());
        for (key, value) in map {
            let encoded = match value {
                Value::Object(inner) => Value::Object(self.encode_object(inner)),
                // An identifier-bearing key owning an array puts the array
                // in flat array-of-ids mode: every element is treated as a
                // scalar identifier, without recursing into containers.
                Value::Array(items) if self.matcher.is_id_key(key) => {
                    Value::Array(items.iter().map(|item| self.encode_scalar(item)).collect())
                }
                Value::Array(items) => Value::Array(self.encode_array(items)),
                scalar if self.matcher.is_id_key(key) => self.encode_scalar(scalar),
                scalar => scalar.clone(),
            };
            out.insert(key.clone(), encoded);
        }
        out
    }

    /// Generic array rule: recurse into containers, copy scalars.
    ///
    /// The array-of-ids shortcut never applies here; it only triggers at
    /// the point an identifier-bearing key directly owns the array.
    pub fn encode_array(&self, items: &[Value]) -> Vec<Value> {
        items
            .iter()
            .map(|item| match item {
                Value::Object(map) => Value::Object(self.encode_object(map)),
                Value::Array(inner) => Value::Array(self.encode_array(inner)),
                scalar => scalar.clone(),
            })
            .collect()
    }

    /// Encode one value already classified as an identifier.
    ///
    /// Only u64-representable numbers become tokens; `null` and every
    /// other value pass through unchanged, keeping encode total.
    fn encode_scalar(&self, value: &Value) -> Value {
        match value.as_u64() {
            Some(id) => Value::String(self.codec.encode(id)),
            None => value.clone(),
        }
    }
}
