use bitvec::prelude::*;

use crate::{
    error::{HuffmanError, Result},
    huffman::{code_to_string, Code, CodeTable},
    payload::EncodedPayload,
};

pub struct HuffmanDecoder<'a> {
    pub table: &'a CodeTable,
}

impl<'a> HuffmanDecoder<'a> {
    pub fn new(table: &'a CodeTable) -> Self {
        Self { table }
    }

    /// Decodes exactly `payload.bit_len()` bits. Either every bit resolves
    /// to a symbol or nothing is returned.
    pub fn unpack(&self, payload: &EncodedPayload) -> Result<String> {
        let bits = payload.bits()?;
        self.unpack_bits(bits)
    }

    fn unpack_bits(&self, bits: &BitSlice<u8, Msb0>) -> Result<String> {
        let mut decoded = String::new();
        let mut current = Code::with_capacity(self.table.max_code_len());

        for (position, bit) in bits.iter().by_vals().enumerate() {
            current.push(bit);

            if let Some(symbol) = self.table.symbol(&current) {
                decoded.push(symbol);
                current.clear();
            } else if current.len() >= self.table.max_code_len() {
                return Err(HuffmanError::CorruptData(format!(
                    "bits {} ending at offset {} match no code",
                    code_to_string(&current),
                    position
                )));
            }
        }

        if !current.is_empty() {
            return Err(HuffmanError::CorruptData(format!(
                "stream ends inside a code, {} bits left over",
                current.len()
            )));
        }

        log::trace!("decoded {} bits into {} symbols", bits.len(), decoded.chars().count());

        Ok(decoded)
    }
}

pub fn decode_bits(payload: &EncodedPayload, table: &CodeTable) -> Result<String> {
    HuffmanDecoder::new(table).unpack(payload)
}
