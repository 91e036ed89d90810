//! Composite record keys for the `redb` backend.
//!
//! Every logical `(key, value)` pair is stored as one table key:
//!
//! ```text
//! [key len: u32 BE][key bytes][value len: u32 BE][value bytes][seq: u64 BE]
//! ```
//!
//! Under `redb`'s lexicographic byte order this layout yields exactly
//! the ordering the store contract promises:
//!
//! - the big-endian length prefix sorts keys by byte length first, then
//!   byte content;
//! - all records of one key form one contiguous range;
//! - within a key, records sort by value, so identical `(key, value)`
//!   duplicates are adjacent and distinct values form contiguous blocks;
//! - the trailing sequence number makes identical duplicates distinct
//!   records, so nothing is ever overwritten.

//---------------------------------------------------------------------------------------------------- Import
use std::ops::Bound;

use crate::error::RuntimeError;

//---------------------------------------------------------------------------------------------------- Encode
/// Encode a full record key.
pub(super) fn record(key: &[u8], value: &[u8], seq: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + key.len() + 4 + value.len() + 8);
    push_field(&mut out, key);
    push_field(&mut out, value);
    out.extend_from_slice(&seq.to_be_bytes());
    out
}

/// The prefix shared by every record of `key`.
pub(super) fn key_prefix(key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + key.len());
    push_field(&mut out, key);
    out
}

/// The prefix shared by every record matching `(key, value)` exactly.
pub(super) fn pair_prefix(key: &[u8], value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + key.len() + 4 + value.len());
    push_field(&mut out, key);
    push_field(&mut out, value);
    out
}

fn push_field(out: &mut Vec<u8>, field: &[u8]) {
    // Lengths are `u32`; a >4GiB key or value would have failed inside
    // the engine long before reaching the encoder.
    let len = u32::try_from(field.len()).unwrap_or(u32::MAX);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(field);
}

//---------------------------------------------------------------------------------------------------- PrefixRange
/// The half-open range of record keys starting with a prefix.
pub(super) struct PrefixRange {
    lo: Vec<u8>,
    /// Exclusive upper bound; `None` means unbounded (all-`0xFF` prefix).
    hi: Option<Vec<u8>>,
}

impl PrefixRange {
    pub(super) fn of(prefix: Vec<u8>) -> Self {
        let hi = prefix_successor(&prefix);
        Self { lo: prefix, hi }
    }

    /// Bounds suitable for a `redb` range scan.
    pub(super) fn bounds(&self) -> (Bound<&[u8]>, Bound<&[u8]>) {
        let hi = match &self.hi {
            Some(hi) => Bound::Excluded(hi.as_slice()),
            None => Bound::Unbounded,
        };
        (Bound::Included(self.lo.as_slice()), hi)
    }

    #[cfg(test)]
    fn contains(&self, raw: &[u8]) -> bool {
        raw >= self.lo.as_slice() && self.hi.as_ref().is_none_or(|hi| raw < hi.as_slice())
    }
}

/// The prefix incremented as a big integer, dropping trailing `0xFF`
/// bytes; `None` if the prefix has no successor.
fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut succ = prefix.to_vec();
    while let Some(last) = succ.last_mut() {
        if *last < u8::MAX {
            *last += 1;
            return Some(succ);
        }
        succ.pop();
    }
    None
}

//---------------------------------------------------------------------------------------------------- Decode
/// Split a raw record key back into `(key, value, seq)`.
///
/// # Errors
/// [`RuntimeError::Corrupt`] if the bytes do not parse back exactly.
pub(super) fn decode(raw: &[u8]) -> Result<(&[u8], &[u8], u64), RuntimeError> {
    let (key, rest) = take_field(raw)?;
    let (value, rest) = take_field(rest)?;
    let seq: [u8; 8] = rest.try_into().map_err(|_| corrupt())?;
    Ok((key, value, u64::from_be_bytes(seq)))
}

fn take_field(raw: &[u8]) -> Result<(&[u8], &[u8]), RuntimeError> {
    let (len, rest) = raw.split_first_chunk::<4>().ok_or_else(corrupt)?;
    let len = u32::from_be_bytes(*len) as usize;
    if rest.len() < len {
        return Err(corrupt());
    }
    Ok(rest.split_at(len))
}

#[cold]
fn corrupt() -> RuntimeError {
    tracing::error!(target: "tristore::store", "record key failed to decode");
    RuntimeError::Corrupt
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip() {
        let raw = record(b"colour", b"red", 7);
        let (key, value, seq) = decode(&raw).unwrap();
        assert_eq!(key, b"colour");
        assert_eq!(value, b"red");
        assert_eq!(seq, 7);
    }

    #[test]
    fn empty_value() {
        let raw = record(b"k", b"", 0);
        let (key, value, _) = decode(&raw).unwrap();
        assert_eq!(key, b"k");
        assert_eq!(value, b"");
    }

    #[test]
    fn truncated_is_corrupt() {
        let raw = record(b"colour", b"red", 7);
        for len in 0..raw.len() {
            assert!(matches!(decode(&raw[..len]), Err(RuntimeError::Corrupt)));
        }
    }

    /// Raw byte order of encoded records is the contract order:
    /// shorter keys first, then byte content, then value, then seq.
    #[test]
    fn ordering() {
        let records = [
            record(b"z", b"b", 9),
            record(b"zz", b"a", 0),
            record(b"zz", b"a", 1),
            record(b"zz", b"b", 0),
            record(b"aaa", b"a", 0),
        ];

        for pair in records.windows(2) {
            assert!(pair[0] < pair[1], "{pair:?}");
        }
    }

    /// Every record of a key falls inside its prefix range; records of
    /// other keys (including prefixes and extensions) fall outside.
    #[test]
    fn prefix_covers_key() {
        let range = PrefixRange::of(key_prefix(b"zz"));

        assert!(range.contains(&record(b"zz", b"", 0)));
        assert!(range.contains(&record(b"zz", b"zzzz", u64::MAX)));
        assert!(!range.contains(&record(b"z", b"zzzz", 0)));
        assert!(!range.contains(&record(b"zza", b"", 0)));
        assert!(!range.contains(&record(b"aaa", b"", 0)));
    }

    #[test]
    fn pair_prefix_covers_duplicates_only() {
        let range = PrefixRange::of(pair_prefix(b"k", b"a"));

        assert!(range.contains(&record(b"k", b"a", 0)));
        assert!(range.contains(&record(b"k", b"a", u64::MAX)));
        assert!(!range.contains(&record(b"k", b"b", 0)));
        assert!(!range.contains(&record(b"k", b"", 0)));
    }

    #[test]
    fn successor_of_all_ff() {
        assert_eq!(prefix_successor(&[0xFF, 0xFF]), None);
        assert_eq!(prefix_successor(&[0x01, 0xFF]), Some(vec![0x02]));
        assert_eq!(prefix_successor(&[0x01, 0x02]), Some(vec![0x01, 0x03]));
    }
}
