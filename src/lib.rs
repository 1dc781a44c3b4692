//! # huffman_text
//!
//! Huffman coding of text. A code table is built from the symbol
//! frequencies of the input, the text is packed into a bit stream, and both
//! are written to a single artifact that can later be decoded back into the
//! original text.
//!
//! ```no_run
//! use huffman_text::{CodecConfig, HuffmanCodec};
//!
//! let codec = HuffmanCodec::new(CodecConfig::default().with_artifact_path("message.huft"));
//! let table = codec.encode("This is a test!")?;
//! println!("{}", table);
//! assert_eq!(codec.decode()?, "This is a test!");
//! # Ok::<(), huffman_text::HuffmanError>(())
//! ```

pub mod artifact;
pub mod codec;
pub mod error;
pub mod frequency;
pub mod huffman;
pub mod huffman_decoder;
pub mod huffman_encoder;
pub mod payload;
pub mod tree;

pub use artifact::Artifact;
pub use codec::{CodecConfig, HuffmanCodec};
pub use error::{ArtifactError, HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman::{Code, CodeTable};
pub use huffman_decoder::{decode_bits, HuffmanDecoder};
pub use huffman_encoder::{encode_bits, HuffmanEncoder};
pub use payload::EncodedPayload;
pub use tree::{HuffmanNode, HuffmanTree};
