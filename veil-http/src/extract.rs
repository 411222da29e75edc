//! Route-parameter extraction with identifier decoding
//!
//! axum materializes path parameters at extraction time and their storage
//! is not writable from middleware, so the inbound hook for the params
//! section is an extractor: a drop-in replacement for
//! `axum::extract::Path` that decodes identifier-bearing parameters
//! first.

use crate::error::VeilRejection;
use crate::Veil;
use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts, RawPathParams};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Decoded route parameters.
///
/// Identifier-bearing parameter names are decoded from tokens before `T`
/// is deserialized, so handlers declare plain numeric fields:
///
/// ```rust,ignore
/// #[derive(serde::Deserialize)]
/// struct UserParams {
///     #[serde(rename = "userId")]
///     user_id: u64,
/// }
///
/// async fn get_user(VeilPath(params): VeilPath<UserParams>) { /* ... */ }
/// ```
///
/// `T` may be a named-field struct, a map, or (when the route captures
/// exactly one parameter) a single value such as `u64`.
#[derive(Debug, Clone, Copy)]
pub struct VeilPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for VeilPath<T>
where
    S: Send + Sync,
    Veil: FromRef<S>,
    T: DeserializeOwned + Send,
{
    type Rejection = VeilRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let veil = Veil::from_ref(state);
        let raw = RawPathParams::from_request_parts(parts, state)
            .await
            .map_err(|_| VeilRejection::PathParams)?;

        let mut params = Map::new();
        for (key, value) in &raw {
            params.insert(key.to_string(), Value::String(value.to_string()));
        }
        let decoded = veil.decoder().decode_object(&params)?;

        if let Ok(value) = serde_json::from_value::<T>(Value::Object(decoded.clone())) {
            return Ok(VeilPath(value));
        }
        // Single-capture shorthand: `VeilPath<u64>` on `/users/:id`.
        if decoded.len() == 1 {
            let (_, single) = decoded.into_iter().next().expect("len checked");
            if let Ok(value) = serde_json::from_value::<T>(single) {
                return Ok(VeilPath(value));
            }
        }
        Err(VeilRejection::PathParams)
    }
}
