#![no_main]

use std::io::Cursor;

use huffman_text::{decode_bits, Artifact};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(artifact) = Artifact::read_from(&mut Cursor::new(data)) {
        let _ = decode_bits(&artifact.payload, &artifact.table);
    }
});
