//! SSZ bit-list plumbing.

use ssz::{Decode, DecodeError, Encode};

/// An SSZ bit list kept in its serialized form.
///
/// The highest set bit of the final byte is the length sentinel; everything
/// below it is payload. The inspector never mutates bitfields, so the raw
/// byte representation is retained and queried in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitList(Vec<u8>);

impl BitList {
    /// Wraps serialized bit-list bytes, validating the sentinel.
    pub fn from_raw_bytes(bytes: Vec<u8>) -> Result<Self, DecodeError> {
        match bytes.last() {
            None => Err(DecodeError::BytesInvalid("bit list is empty".into())),
            Some(0) => Err(DecodeError::BytesInvalid("bit list sentinel byte is zero".into())),
            Some(_) => Ok(Self(bytes)),
        }
    }

    /// The number of payload bits, excluding the sentinel.
    pub fn bit_len(&self) -> usize {
        // The constructor guarantees a non-zero final byte.
        let last = *self.0.last().expect("bit list is non-empty");
        (self.0.len() - 1) * 8 + (7 - last.leading_zeros() as usize)
    }

    /// Whether payload bit `i` is set. Out-of-range indices read as unset.
    pub fn is_set(&self, i: usize) -> bool {
        i < self.bit_len() && self.0[i / 8] & (1 << (i % 8)) != 0
    }

    /// The serialized bytes, sentinel included.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Encode for BitList {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn ssz_bytes_len(&self) -> usize {
        self.0.len()
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.0);
    }
}

impl Decode for BitList {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_raw_bytes(bytes.to_vec())
    }
}
