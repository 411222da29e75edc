//! Default codec parameters

/// Default encoding alphabet (62 alphanumeric characters).
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// Minimum number of unique characters a usable alphabet must provide.
pub const MIN_ALPHABET_LEN: usize = 16;

/// Number of characters reserved as padding guards.
pub const GUARD_COUNT: usize = 2;

/// Upper bound for [`crate::CodecConfig::min_length`].
pub const MAX_MIN_LENGTH: usize = 255;
