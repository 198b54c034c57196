//! Deterministic short code generation.
//!
//! A short code is an 8-character fingerprint of the long URL followed by a
//! 2-character slot suffix. The fingerprint is stable for a given URL, so
//! re-shortening the same URL lands on the same candidates. Distinct URLs may
//! share a fingerprint; the suffix enumerates [`SLOT_COUNT`] slots that are
//! probed in order to resolve those collisions.

use sha2::{Digest, Sha256};

/// Ordered code alphabet: digits, upper case, lower case, `_` and `-`.
pub const ALPHABET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_-";

/// Number of characters in the fingerprint segment.
pub const FINGERPRINT_LEN: usize = 8;

/// Number of characters in the slot suffix.
pub const SUFFIX_LEN: usize = 2;

/// Total length of every generated short code.
pub const CODE_LEN: usize = FINGERPRINT_LEN + SUFFIX_LEN;

/// Collision slots available per fingerprint (`64 * 64`).
pub const SLOT_COUNT: usize = ALPHABET.len() * ALPHABET.len();

/// Computes the 8-character fingerprint of a long URL.
///
/// SHA-256 is taken over the UTF-8 bytes of `long_url`; each of the first
/// [`FINGERPRINT_LEN`] digest bytes is reduced modulo the alphabet size and
/// mapped to its alphabet character.
///
/// # Examples
///
/// ```ignore
/// let fp = fingerprint("https://example.com");
/// assert_eq!(fp.len(), 8);
/// assert_eq!(fp, fingerprint("https://example.com"));
/// ```
pub fn fingerprint(long_url: &str) -> String {
    let digest = Sha256::digest(long_url.as_bytes());

    digest[..FINGERPRINT_LEN]
        .iter()
        .map(|byte| ALPHABET[*byte as usize % ALPHABET.len()] as char)
        .collect()
}

/// Encodes a slot id as its 2-character suffix, most significant digit first.
///
/// Returns `None` when `slot` is outside `0..SLOT_COUNT`.
pub fn slot_suffix(slot: usize) -> Option<String> {
    if slot >= SLOT_COUNT {
        return None;
    }

    let high = ALPHABET[slot / ALPHABET.len()] as char;
    let low = ALPHABET[slot % ALPHABET.len()] as char;

    Some([high, low].iter().collect())
}

/// Iterates over every candidate code for `long_url` in probe order.
///
/// Yields exactly [`SLOT_COUNT`] codes, starting with slot 0.
pub fn candidates(long_url: &str) -> impl Iterator<Item = String> {
    let fingerprint = fingerprint(long_url);

    (0..SLOT_COUNT).filter_map(move |slot| {
        slot_suffix(slot).map(|suffix| format!("{fingerprint}{suffix}"))
    })
}
