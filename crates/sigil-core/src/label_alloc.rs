//! # Blank-Node Label Allocation
//!
//! Blank nodes have no global name, yet serialized labelled data must
//! round-trip: a term written out with label `L` and read back must
//! have the same identity, derived from `L` verbatim rather than from a
//! content hash. The allocator supports that directly:
//!
//! - [`BlankNodeAllocator::from_label`] — a term whose identity is the
//!   provided label, unchanged. The same label always yields the same
//!   term. There is no per-subgraph scoping; labels are global.
//! - [`BlankNodeAllocator::fresh`] — a synthesized term for data that
//!   arrived without a label, derived from a caller-supplied seed and a
//!   counter. Deterministic per (seed, call sequence), distinct across
//!   calls.
//!
//! [`encode_label`] / [`decode_label`] give labels a transport-safe
//! textual form (`B` marker, non-alphanumerics escaped as
//! `X` + six hex digits) so arbitrary label text survives formats that
//! restrict label characters.

use crate::error::LabelError;
use crate::term::TermFactory;

/// Marker prefix of an encoded label.
const ENCODED_MARKER: char = 'B';
/// Escape introducer inside an encoded label.
const ESCAPE: char = 'X';
const ESCAPE_HEX_DIGITS: usize = 6;

// =============================================================================
// ALLOCATOR
// =============================================================================

/// Allocates blank-node terms from labels, or freshly.
#[derive(Debug, Clone)]
pub struct BlankNodeAllocator<F: TermFactory> {
    factory: F,
    seed: [u8; 32],
    counter: u64,
}

impl<F: TermFactory> BlankNodeAllocator<F> {
    #[must_use]
    pub fn new(factory: F, seed: [u8; 32]) -> Self {
        Self {
            factory,
            seed,
            counter: 0,
        }
    }

    /// A blank node for an externally provided label. Identity is the
    /// label verbatim: equal labels give equal terms, for the lifetime
    /// of any allocator.
    pub fn from_label(&self, label: &str) -> F::Term {
        self.factory.blank_node(label)
    }

    /// A blank node with a synthesized label: the hash of the seed and
    /// an internal counter. Deterministic for a given seed and call
    /// sequence; never collides with another counter value.
    pub fn fresh(&mut self) -> F::Term {
        let mut hasher = blake3::Hasher::new_keyed(&self.seed);
        hasher.update(&self.counter.to_be_bytes());
        self.counter += 1;
        let label = hasher.finalize().to_hex();
        self.factory.blank_node(label.as_str())
    }
}

// =============================================================================
// LABEL ENCODING
// =============================================================================

/// Encode a label for transport. ASCII alphanumerics pass through;
/// every other character becomes `X` followed by six hex digits of its
/// code point. The result always starts with the `B` marker.
#[must_use]
pub fn encode_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len() + 1);
    out.push(ENCODED_MARKER);
    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() && ch != ESCAPE {
            out.push(ch);
        } else {
            out.push(ESCAPE);
            out.push_str(&format!("{:06X}", ch as u32));
        }
    }
    out
}

/// Decode a transport-encoded label back to its original text.
pub fn decode_label(encoded: &str) -> Result<String, LabelError> {
    let bad = || LabelError::BadEncoding(encoded.to_string());
    let body = encoded.strip_prefix(ENCODED_MARKER).ok_or_else(bad)?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch == ESCAPE {
            let mut value = 0u32;
            for _ in 0..ESCAPE_HEX_DIGITS {
                let digit = chars.next().and_then(|c| c.to_digit(16)).ok_or_else(bad)?;
                value = (value << 4) + digit;
            }
            out.push(char::from_u32(value).ok_or_else(bad)?);
        } else if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else {
            return Err(bad());
        }
    }
    Ok(out)
}

// =============================================================================
// TESTS
// =============================================================================
