//! Veil HTTP - host-pipeline integration for axum
//!
//! This crate wires the transform engine into an axum service so endpoint
//! authors never write encoding or decoding code:
//!
//! - [`veil_middleware`] decodes query strings and JSON request bodies
//!   before handlers run, and encodes JSON response bodies after them
//! - [`VeilPath`] decodes route parameters at extraction time
//! - [`VeilOptions::skip_routes`] opts individual routes out of both hooks
//!
//! The shared [`Veil`] state is built once at registration; codec
//! construction failure is fatal at startup, never per request.
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{middleware, routing::get, Router};
//! use veil_http::{veil_middleware, Veil, VeilOptions};
//!
//! let veil = Veil::new(VeilOptions::default())?;
//! let app: Router = Router::new()
//!     .route("/users/:userId", get(get_user))
//!     .layer(middleware::from_fn_with_state(veil.clone(), veil_middleware))
//!     .with_state(veil);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod extract;
pub mod middleware;

// Re-export commonly used types
pub use error::VeilRejection;
pub use extract::VeilPath;
pub use middleware::veil_middleware;
pub use veil_codec::{CodecConfig, ConfigError, IdCodec, VeilCodec};
pub use veil_transform::{Decoder, Encoder, KeyMatcher, KeyPattern, TransformError};

use std::collections::HashSet;
use std::sync::Arc;

/// Registration-time configuration for the veil hooks.
#[derive(Debug, Clone)]
pub struct VeilOptions {
    /// Parameters for the default codec. Opaque to the traversal engine.
    pub codec: CodecConfig,
    /// Naming-pattern half of the classifier.
    pub pattern: KeyPattern,
    /// Explicit key names always treated as identifier-bearing.
    pub key_list: Vec<String>,
    /// Route templates (as registered with the router, e.g.
    /// `/internal/:id`) for which both hooks are skipped. Routes listed
    /// here should use the plain `axum::extract::Path` extractor.
    pub skip_routes: Vec<String>,
    /// Largest request or response body the hooks will buffer.
    pub max_buffer_bytes: usize,
}

impl Default for VeilOptions {
    fn default() -> Self {
        Self {
            codec: CodecConfig::default(),
            pattern: KeyPattern::Default,
            key_list: Vec::new(),
            skip_routes: Vec::new(),
            max_buffer_bytes: 16 * 1024 * 1024,
        }
    }
}

struct VeilInner {
    encoder: Encoder,
    decoder: Decoder,
    skip_routes: HashSet<String>,
    max_buffer_bytes: usize,
}

/// Shared hook state: one encoder/decoder pair over immutable classifier
/// and codec handles, cloned cheaply into every request.
#[derive(Clone)]
pub struct Veil {
    inner: Arc<VeilInner>,
}

impl Veil {
    /// Build the hook state with the default codec.
    ///
    /// Fails only on invalid codec configuration.
    pub fn new(options: VeilOptions) -> Result<Self, ConfigError> {
        let codec = Arc::new(VeilCodec::new(&options.codec)?);
        Ok(Self::with_codec(options, codec))
    }

    /// Build the hook state around an injected codec implementation.
    pub fn with_codec(options: VeilOptions, codec: Arc<dyn IdCodec>) -> Self {
        let matcher = Arc::new(KeyMatcher::new(options.pattern, options.key_list));
        Self {
            inner: Arc::new(VeilInner {
                encoder: Encoder::new(matcher.clone(), codec.clone()),
                decoder: Decoder::new(matcher, codec),
                skip_routes: options.skip_routes.into_iter().collect(),
                max_buffer_bytes: options.max_buffer_bytes,
            }),
        }
    }

    /// The outbound transform.
    pub fn encoder(&self) -> &Encoder {
        &self.inner.encoder
    }

    /// The inbound transform.
    pub fn decoder(&self) -> &Decoder {
        &self.inner.decoder
    }

    /// Route templates excluded from both hooks.
    pub fn skip_routes(&self) -> &HashSet<String> {
        &self.inner.skip_routes
    }

    /// Largest body the hooks will buffer.
    pub fn max_buffer_bytes(&self) -> usize {
        self.inner.max_buffer_bytes
    }
}
