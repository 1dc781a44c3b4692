use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{
    artifact::Artifact,
    error::{HuffmanError, Result},
    frequency::FrequencyTable,
    huffman::CodeTable,
    huffman_decoder::decode_bits,
    huffman_encoder::encode_bits,
    tree::HuffmanTree,
};

pub const DEFAULT_ARTIFACT_PATH: &str = "encoded_text.huft";
pub const ARTIFACT_PATH_ENV: &str = "HUFFMAN_ARTIFACT_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// The single slot every `encode` overwrites and `decode` reads.
    pub artifact_path: PathBuf,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
        }
    }
}

impl CodecConfig {
    /// Default configuration, with the artifact path taken from
    /// `HUFFMAN_ARTIFACT_PATH` when it is set and not empty.
    pub fn from_env() -> Self {
        match env::var_os(ARTIFACT_PATH_ENV) {
            Some(path) if !path.is_empty() => Self::default().with_artifact_path(path),
            _ => Self::default(),
        }
    }

    pub fn with_artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = path.into();
        self
    }
}

/// Encodes text into the configured artifact and decodes it back.
///
/// The codec keeps no table between calls: `encode` hands the table it built
/// back to the caller and `decode` uses the table stored in the artifact.
#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {
    config: CodecConfig,
}

impl HuffmanCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn artifact_path(&self) -> &Path {
        &self.config.artifact_path
    }

    /// Builds a code table for `text`, writes the table and the encoded text
    /// to the artifact path and returns the table.
    ///
    /// A missing or empty text is rejected before anything is written.
    pub fn encode<'a>(&self, text: impl Into<Option<&'a str>>) -> Result<CodeTable> {
        let text = match text.into() {
            None => return Err(HuffmanError::InvalidInput("text is absent")),
            Some("") => return Err(HuffmanError::InvalidInput("text is empty")),
            Some(text) => text,
        };

        let frequencies = FrequencyTable::count(text)?;
        let tree = HuffmanTree::build(&frequencies)?;
        let table = CodeTable::generate(&tree);
        let payload = encode_bits(text, &table)?;

        log::info!(
            "encoded {} symbols ({} distinct) into {} bits",
            frequencies.total(),
            table.len(),
            payload.bit_len()
        );

        let artifact = Artifact::new(table, payload);
        artifact.save(self.artifact_path())?;

        Ok(artifact.table)
    }

    /// Decodes the text most recently written by [`encode`](Self::encode).
    pub fn decode(&self) -> Result<String> {
        let artifact = Artifact::load(self.artifact_path())?;
        let text = decode_bits(&artifact.payload, &artifact.table)?;

        log::info!(
            "decoded {} bits into {} symbols",
            artifact.payload.bit_len(),
            text.chars().count()
        );

        Ok(text)
    }
}
