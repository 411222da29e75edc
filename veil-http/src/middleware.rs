//! Request/response hooks
//!
//! One middleware covers both directions: inbound it rewrites the query
//! string and JSON body with identifiers decoded (before validation or
//! handler logic can observe them), outbound it rewrites the serialized
//! JSON response with identifiers encoded. Route parameters cannot be
//! rewritten in place in axum; they go through [`crate::VeilPath`].

use crate::error::VeilRejection;
use crate::Veil;
use axum::body::{to_bytes, Body, Bytes};
use axum::extract::{MatchedPath, Request, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::uri::PathAndQuery;
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};
use url::form_urlencoded;
use veil_transform::json_type_name;

/// The veil hook pair, registered with
/// `axum::middleware::from_fn_with_state`.
///
/// Skipped entirely for routes listed in
/// [`crate::VeilOptions::skip_routes`].
pub async fn veil_middleware(State(veil): State<Veil>, request: Request, next: Next) -> Response {
    if is_route_skipped(&veil, &request) {
        return next.run(request).await;
    }

    let request = match decode_request(&veil, request).await {
        Ok(request) => request,
        Err(rejection) => return rejection.into_response(),
    };

    let response = next.run(request).await;
    encode_response(&veil, response).await
}

fn is_route_skipped(veil: &Veil, request: &Request) -> bool {
    if veil.skip_routes().is_empty() {
        return false;
    }
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| veil.skip_routes().contains(matched.as_str()))
        .unwrap_or(false)
}

/// Decode the query string and JSON body of `request`, rebuilding both so
/// downstream extractors observe plain identifiers.
async fn decode_request(veil: &Veil, request: Request) -> Result<Request, VeilRejection> {
    let (mut parts, body) = request.into_parts();

    let decoded_query = match parts.uri.query() {
        Some(query) if !query.is_empty() => Some(decode_query(veil, query)?),
        _ => None,
    };
    if let Some(decoded) = decoded_query {
        parts.uri = replace_query(&parts.uri, &decoded);
    }

    let body = if is_json(&parts.headers) {
        let bytes = to_bytes(body, veil.max_buffer_bytes())
            .await
            .map_err(|_| VeilRejection::UnreadableBody)?;
        decode_body(veil, &mut parts.headers, bytes)?
    } else {
        body
    };

    Ok(Request::from_parts(parts, body))
}

/// Decode a raw query string. Repeated keys are grouped into arrays, so a
/// repeated identifier-bearing key gets the flat array-of-ids treatment.
fn decode_query(veil: &Veil, query: &str) -> Result<String, VeilRejection> {
    let mut map = Map::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = Value::String(value.into_owned());
        match map.get_mut(key.as_ref()) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key.into_owned(), value);
            }
        }
    }

    let decoded = veil.decoder().decode_object(&map)?;

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &decoded {
        match value {
            Value::Array(items) => {
                for item in items {
                    serializer.append_pair(key, &query_value(item));
                }
            }
            other => {
                serializer.append_pair(key, &query_value(other));
            }
        }
    }
    Ok(serializer.finish())
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn replace_query(uri: &Uri, query: &str) -> Uri {
    let path_and_query = if query.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), query)
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(
        PathAndQuery::try_from(path_and_query.as_str())
            .expect("percent-encoded query is a valid path-and-query"),
    );
    Uri::from_parts(parts).expect("rebuilt uri keeps its original scheme and authority")
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false)
}

/// Decode a buffered JSON body and refresh `Content-Length`.
///
/// Bodies that are not parseable JSON, or parse to a bare scalar, pass
/// through untouched; the transform only owns containers.
fn decode_body(
    veil: &Veil,
    headers: &mut HeaderMap,
    bytes: Bytes,
) -> Result<Body, VeilRejection> {
    if bytes.is_empty() {
        return Ok(Body::from(bytes));
    }
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(payload) if payload.is_object() || payload.is_array() => {
            let decoded = veil.decoder().decode_payload(&payload)?;
            let buf = serde_json::to_vec(&decoded).expect("decoded payload serializes");
            headers.insert(CONTENT_LENGTH, HeaderValue::from(buf.len()));
            Ok(Body::from(buf))
        }
        Ok(payload) => {
            tracing::trace!(kind = json_type_name(&payload), "skipping non-container body");
            Ok(Body::from(bytes))
        }
        Err(_) => Ok(Body::from(bytes)),
    }
}

/// Encode identifiers in a serialized JSON response.
///
/// Encoding is total, so the only failure here is an unbufferable body;
/// that aborts the response rather than emitting a partially encoded one.
async fn encode_response(veil: &Veil, response: Response) -> Response {
    if !is_json(response.headers()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, veil.max_buffer_bytes()).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "failed to buffer response body for encoding");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let body = match serde_json::from_slice::<Value>(&bytes) {
        Ok(payload) => {
            let encoded = veil.encoder().encode_payload(&payload);
            let buf = serde_json::to_vec(&encoded).expect("encoded payload serializes");
            parts.headers.insert(CONTENT_LENGTH, HeaderValue::from(buf.len()));
            Body::from(buf)
        }
        Err(_) => Body::from(bytes),
    };

    Response::from_parts(parts, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VeilOptions;

    fn veil() -> Veil {
        Veil::new(VeilOptions {
            codec: crate::CodecConfig {
                salt: "mw-test".to_string(),
                min_length: 8,
                ..crate::CodecConfig::default()
            },
            ..VeilOptions::default()
        })
        .unwrap()
    }

    #[test]
    fn query_with_tokens_is_rewritten() {
        use veil_codec::IdCodec;
        let veil = veil();
        let codec = crate::VeilCodec::new(&crate::CodecConfig {
            salt: "mw-test".to_string(),
            min_length: 8,
            ..crate::CodecConfig::default()
        })
        .unwrap();

        let token = codec.encode(42);
        let query = format!("userId={token}&name=ada");
        let decoded = decode_query(&veil, &query).unwrap();
        assert_eq!(decoded, "userId=42&name=ada");
    }

    #[test]
    fn repeated_identifier_keys_decode_as_arrays() {
        use veil_codec::IdCodec;
        let veil = veil();
        let codec = crate::VeilCodec::new(&crate::CodecConfig {
            salt: "mw-test".to_string(),
            min_length: 8,
            ..crate::CodecConfig::default()
        })
        .unwrap();

        let query = format!("ids={}&ids={}", codec.encode(1), codec.encode(2));
        let decoded = decode_query(&veil, &query).unwrap();
        assert_eq!(decoded, "ids=1&ids=2");
    }

    #[test]
    fn invalid_query_token_is_rejected() {
        let veil = veil();
        let result = decode_query(&veil, "userId=not-a-token!");
        assert!(matches!(
            result,
            Err(VeilRejection::InvalidIdentifier { ref key }) if key == "userId"
        ));
    }

    #[test]
    fn non_identifier_query_keys_are_preserved() {
        let veil = veil();
        let decoded = decode_query(&veil, "name=ada&role=admin").unwrap();
        assert_eq!(decoded, "name=ada&role=admin");
    }

    #[test]
    fn replace_query_keeps_the_path() {
        let uri: Uri = "/users?userId=42".parse().unwrap();
        let rebuilt = replace_query(&uri, "userId=7");
        assert_eq!(rebuilt.path(), "/users");
        assert_eq!(rebuilt.query(), Some("userId=7"));
    }

    #[test]
    fn json_content_types_are_recognized() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(is_json(&headers));

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(is_json(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json(&headers));
    }
}
