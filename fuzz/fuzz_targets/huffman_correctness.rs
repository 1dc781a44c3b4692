#![no_main]

use huffman_text::{decode_bits, encode_bits, CodeTable, FrequencyTable, HuffmanTree};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(freq) = FrequencyTable::count(data) else {
        return;
    };

    let tree = HuffmanTree::build(&freq).unwrap();
    let table = CodeTable::generate(&tree);
    let payload = encode_bits(data, &table).unwrap();

    assert_eq!(data, decode_bits(&payload, &table).unwrap());
});
