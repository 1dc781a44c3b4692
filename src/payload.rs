use bitvec::prelude::*;

use crate::error::{HuffmanError, Result};

/// Packed bit stream together with its logical length.
///
/// `bytes` is padded with zero bits up to the next byte boundary; those
/// trailing bits are not part of the stream and `bit_len` is the only
/// authority on where it ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    bytes: Vec<u8>,
    bit_len: u64,
}

impl EncodedPayload {
    pub fn from_bits(mut bits: BitVec<u8, Msb0>) -> Self {
        let bit_len = bits.len() as u64;
        bits.set_uninitialized(false);
        Self {
            bytes: bits.into_vec(),
            bit_len,
        }
    }

    /// Takes already packed bytes; nothing is checked until the bits are read.
    pub fn from_raw_parts(bytes: Vec<u8>, bit_len: u64) -> Self {
        Self { bytes, bit_len }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    /// Number of bits the backing bytes can hold, padding included.
    pub fn physical_bit_len(&self) -> u64 {
        self.bytes.len() as u64 * 8
    }

    /// The logical bits, with padding cut off.
    pub fn bits(&self) -> Result<&BitSlice<u8, Msb0>> {
        if self.bit_len > self.physical_bit_len() {
            return Err(HuffmanError::CorruptData(format!(
                "payload claims {} bits but only stores {}",
                self.bit_len,
                self.physical_bit_len()
            )));
        }

        Ok(&self.bytes.view_bits::<Msb0>()[..self.bit_len as usize])
    }
}
