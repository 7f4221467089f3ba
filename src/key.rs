//! Canonical key handling.
//!
//! Every operation reasons about the canonical form of its input: the text
//! trimmed of surrounding whitespace and truncated to [`MAX_KEY_LENGTH`]
//! bytes. Duplicate tries are keyed on the decimal digit string of a record
//! identifier; `KeyBuf` holds either form so insert and delete can swap to
//! the digit key mid-traversal without reallocating.
//!
//! [`MAX_KEY_LENGTH`]: crate::MAX_KEY_LENGTH

use crate::types::{RecordId, MAX_KEY_LENGTH};

/// Canonicalize an input key: trim surrounding whitespace, truncate to at
/// most [`MAX_KEY_LENGTH`](crate::MAX_KEY_LENGTH) bytes.
pub(crate) fn canonical(key: &str) -> &[u8] {
    let trimmed = key.trim().as_bytes();
    &trimmed[..trimmed.len().min(MAX_KEY_LENGTH)]
}

/// Owned key bytes for a mutating traversal.
///
/// Starts as the canonical text key; [`load_digits`](KeyBuf::load_digits)
/// replaces the contents with a record identifier's decimal digits when the
/// walk descends into a duplicate trie. A `u64` has at most 20 digits, so
/// the canonical-key buffer always fits both forms.
pub(crate) struct KeyBuf {
    buf: [u8; MAX_KEY_LENGTH],
    len: usize,
}

impl KeyBuf {
    pub(crate) fn from_canonical(key: &[u8]) -> Self {
        debug_assert!(key.len() <= MAX_KEY_LENGTH);
        let mut buf = [0u8; MAX_KEY_LENGTH];
        buf[..key.len()].copy_from_slice(key);
        KeyBuf { buf, len: key.len() }
    }

    /// Replace the contents with the decimal digit string of `record`.
    pub(crate) fn load_digits(&mut self, record: RecordId) {
        self.len = write_digits(record, &mut self.buf);
    }

    #[inline]
    pub(crate) fn byte(&self, i: usize) -> u8 {
        self.buf[i]
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Decimal digit string of a record identifier, built without heap
/// allocation. Duplicate tries are keyed on this form, so collection order
/// among duplicates follows digit-string lexical order ("10" before "2"),
/// not numeric order.
pub(crate) struct DigitKey {
    buf: [u8; 20],
    len: usize,
}

impl DigitKey {
    pub(crate) fn new(record: RecordId) -> Self {
        let mut buf = [0u8; 20];
        let len = write_digits(record, &mut buf);
        DigitKey { buf, len }
    }

    #[inline]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Write the decimal digits of `record` into the front of `buf`, returning
/// the digit count. `buf` must hold at least 20 bytes.
fn write_digits(record: RecordId, buf: &mut [u8]) -> usize {
    let mut tmp = [0u8; 20];
    let mut n = record;
    let mut at = tmp.len();
    loop {
        at -= 1;
        tmp[at] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    let len = tmp.len() - at;
    buf[..len].copy_from_slice(&tmp[at..]);
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_trims_whitespace() {
        assert_eq!(canonical("  cat \n"), b"cat");
        assert_eq!(canonical("\t \t"), b"");
        assert_eq!(canonical(""), b"");
    }

    #[test]
    fn canonical_truncates_to_max_length() {
        let long: String = "x".repeat(40);
        assert_eq!(canonical(&long).len(), MAX_KEY_LENGTH);
        let exact: String = "y".repeat(MAX_KEY_LENGTH);
        assert_eq!(canonical(&exact), exact.as_bytes());
    }

    #[test]
    fn digit_key_matches_decimal_text() {
        assert_eq!(DigitKey::new(0).as_bytes(), b"0");
        assert_eq!(DigitKey::new(7).as_bytes(), b"7");
        assert_eq!(DigitKey::new(1203).as_bytes(), b"1203");
        assert_eq!(DigitKey::new(u64::MAX).as_bytes(), b"18446744073709551615");
    }

    #[test]
    fn key_buf_swaps_to_digits() {
        let mut kb = KeyBuf::from_canonical(b"cart");
        assert_eq!(kb.as_bytes(), b"cart");
        assert_eq!(kb.byte(2), b'r');

        kb.load_digits(42);
        assert_eq!(kb.as_bytes(), b"42");
        assert_eq!(kb.len(), 2);
    }
}
