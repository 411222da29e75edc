//! Veil Codec - identifier ⇄ token primitives
//!
//! This crate provides the codec half of idveil with no I/O or traversal
//! dependencies. It includes:
//!
//! - Codec configuration and validation
//! - Salt-keyed alphabet shuffling and the guard/digit split
//! - The [`IdCodec`] contract and the default [`VeilCodec`] implementation
//!
//! Tokens produced here are reversible obfuscation, not encryption: anyone
//! holding the salt can decode them.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod alphabet;
pub mod codec;
pub mod config;
pub mod constants;

// Re-export commonly used types
pub use codec::{IdCodec, VeilCodec};
pub use config::{CodecConfig, ConfigError};
