use bitvec::prelude::*;

use crate::{
    error::{HuffmanError, Result},
    huffman::CodeTable,
    payload::EncodedPayload,
};

/// Appends the codes of text pushed through [`pack`](Self::pack) to one bit
/// stream.
pub struct HuffmanEncoder<'a> {
    table: &'a CodeTable,
    compressed: BitVec<u8, Msb0>,
}

impl<'a> HuffmanEncoder<'a> {
    pub fn new(table: &'a CodeTable) -> Self {
        Self {
            table,
            compressed: BitVec::new(),
        }
    }

    /// On failure nothing from `text` is kept in the stream.
    pub fn pack(&mut self, text: &str) -> Result<()> {
        if let Some(bits) = self.table.encoded_len(text) {
            self.compressed.reserve(bits as usize);
        }

        let start = self.compressed.len();
        for symbol in text.chars() {
            match self.table.code(symbol) {
                Some(code) => self.compressed.extend_from_bitslice(code),
                None => {
                    self.compressed.truncate(start);
                    return Err(HuffmanError::Internal(format!(
                        "no code for symbol {:?}",
                        symbol
                    )));
                }
            }
        }

        Ok(())
    }

    /// Number of bits packed so far.
    pub fn bit_len(&self) -> usize {
        self.compressed.len()
    }

    pub fn finish(self) -> EncodedPayload {
        EncodedPayload::from_bits(self.compressed)
    }
}

pub fn encode_bits(text: &str, table: &CodeTable) -> Result<EncodedPayload> {
    let mut encoder = HuffmanEncoder::new(table);
    encoder.pack(text)?;
    Ok(encoder.finish())
}
