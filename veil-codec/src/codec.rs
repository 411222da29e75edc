//! Identifier ⇄ token codec

use crate::alphabet::{consistent_shuffle, Alphabet};
use crate::config::{CodecConfig, ConfigError};

/// Bidirectional identifier ⇄ token transform.
///
/// Implementations must be stateless and safe to share across concurrent
/// traversals; the engine constructs one instance per registration and
/// reuses it behind an `Arc` for every request.
pub trait IdCodec: Send + Sync {
    /// Encode an identifier into its opaque token. Total: never fails.
    fn encode(&self, id: u64) -> String;

    /// Decode a token back into the identifier it encodes.
    ///
    /// Returns `None` when the token is malformed, tampered with, or not
    /// the canonical encoding of any identifier.
    fn decode(&self, token: &str) -> Option<u64>;
}

/// Default codec: positional encoding over a salt-shuffled alphabet, with
/// guard-delimited filler padding tokens up to a minimum length.
///
/// Decoding is strict: after stripping padding and mapping digits back, the
/// candidate identifier is re-encoded and compared byte-for-byte against the
/// input, so non-canonical tokens never decode.
#[derive(Debug, Clone)]
pub struct VeilCodec {
    alphabet: Alphabet,
    min_length: usize,
}

impl VeilCodec {
    /// Build a codec from its configuration.
    pub fn new(config: &CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            alphabet: Alphabet::new(&config.alphabet, &config.salt),
            min_length: config.min_length,
        })
    }

    /// Positional encoding of `id` over the digit alphabet, most
    /// significant position first. Zero encodes as the single first digit.
    fn encode_core(&self, id: u64) -> String {
        let digits = self.alphabet.digits();
        let base = digits.len() as u64;
        let mut out = Vec::new();
        let mut rest = id;
        loop {
            out.push(digits[(rest % base) as usize]);
            rest /= base;
            if rest == 0 {
                break;
            }
        }
        out.iter().rev().collect()
    }

    fn decode_core(&self, core: &str) -> Option<u64> {
        let base = self.alphabet.digits().len() as u64;
        let mut value: u64 = 0;
        for c in core.chars() {
            let idx = self.alphabet.digit_index(c)?;
            value = value.checked_mul(base)?.checked_add(idx)?;
        }
        Some(value)
    }

    /// Pad `core` to exactly `min_length` characters.
    ///
    /// Layout: `guard0 filler guard1 core` (or `guard0 core` when one
    /// character short). The filler is drawn from the digit alphabet
    /// shuffled with the core itself, so padding is deterministic per id
    /// and the strict decode check can reproduce it.
    fn pad(&self, core: String) -> String {
        let core_len = core.chars().count();
        if core_len >= self.min_length {
            return core;
        }
        let guards = self.alphabet.guards();
        let needed = self.min_length - core_len;
        if needed == 1 {
            return format!("{}{}", guards[0], core);
        }

        let mut filler_src = self.alphabet.digits().to_vec();
        let key: Vec<char> = core.chars().collect();
        consistent_shuffle(&mut filler_src, &key);
        let filler: String = filler_src.iter().copied().cycle().take(needed - 2).collect();
        format!("{}{}{}{}", guards[0], filler, guards[1], core)
    }
}

impl IdCodec for VeilCodec {
    fn encode(&self, id: u64) -> String {
        self.pad(self.encode_core(id))
    }

    fn decode(&self, token: &str) -> Option<u64> {
        if token.is_empty() {
            return None;
        }
        let chars: Vec<char> = token.chars().collect();
        let core: String = match chars.iter().rposition(|&c| self.alphabet.is_guard(c)) {
            Some(i) => chars[i + 1..].iter().collect(),
            None => token.to_string(),
        };
        if core.is_empty() {
            return None;
        }
        let id = self.decode_core(&core)?;
        if self.encode(id) == token {
            Some(id)
        } else {
            None
        }
    }
}
