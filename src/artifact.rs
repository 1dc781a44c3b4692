use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use tempfile::NamedTempFile;

use crate::{
    error::{ArtifactError, HuffmanError, Result},
    huffman::{Code, CodeTable},
    payload::EncodedPayload,
};

const MAGIC: [u8; 4] = *b"HUFT";
const VERSION: u8 = 1;

/// A code table and the payload encoded with it, as stored on disk.
///
/// Layout, all integers big-endian:
///
/// ```text
/// magic "HUFT" | version u8
/// symbol count u32
///   { scalar value u32 | code bits u16 | code bytes } * symbol count
/// payload bits u64 | payload bytes u64 | payload bytes
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub table: CodeTable,
    pub payload: EncodedPayload,
}

impl Artifact {
    pub fn new(table: CodeTable, payload: EncodedPayload) -> Self {
        Self { table, payload }
    }

    /// Writes the artifact to `path`, replacing whatever was there.
    ///
    /// The bytes go to a temporary file next to `path` which is renamed over
    /// it once complete. On failure the previous artifact is left untouched.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file = NamedTempFile::new_in(dir).map_err(|e| HuffmanError::storage(path, e))?;

        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer).map_err(|e| HuffmanError::storage(path, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| HuffmanError::storage(path, e.into_error()))?;
        file.persist(path).map_err(|e| HuffmanError::storage(path, e.error))?;

        log::debug!(
            "saved {} symbols and {} payload bits to {}",
            self.table.len(),
            self.payload.bit_len(),
            path.display()
        );
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| HuffmanError::storage(path, e))?;
        let artifact =
            Self::read_from(&mut BufReader::new(file)).map_err(|e| HuffmanError::storage(path, e))?;

        log::debug!(
            "loaded {} symbols and {} payload bits from {}",
            artifact.table.len(),
            artifact.payload.bit_len(),
            path.display()
        );
        Ok(artifact)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), ArtifactError> {
        writer.write_all(&MAGIC)?;
        writer.write_u8(VERSION)?;

        writer.write_u32::<BigEndian>(checked_len(self.table.len(), "symbol count")?)?;
        for (symbol, code) in self.table.iter() {
            writer.write_u32::<BigEndian>(symbol as u32)?;
            writer.write_u16::<BigEndian>(checked_len(code.len(), "code length")?)?;
            let mut packed = code.to_bitvec();
            packed.set_uninitialized(false);
            writer.write_all(packed.as_raw_slice())?;
        }

        writer.write_u64::<BigEndian>(self.payload.bit_len())?;
        writer.write_u64::<BigEndian>(self.payload.as_bytes().len() as u64)?;
        writer.write_all(self.payload.as_bytes())?;

        Ok(())
    }

    /// Reads one artifact and requires the reader to end right after it.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, ArtifactError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(ArtifactError::BadMagic(magic));
        }

        let version = reader.read_u8()?;
        if version != VERSION {
            return Err(ArtifactError::UnsupportedVersion(version));
        }

        let symbol_count = reader.read_u32::<BigEndian>()?;
        let mut pairs = Vec::new();
        for _ in 0..symbol_count {
            let scalar = reader.read_u32::<BigEndian>()?;
            let symbol = char::from_u32(scalar).ok_or_else(|| {
                ArtifactError::Malformed(format!("{:#x} is not a unicode scalar value", scalar))
            })?;

            let code_len = reader.read_u16::<BigEndian>()? as usize;
            let mut code_bytes = vec![0u8; code_len.div_ceil(8)];
            reader.read_exact(&mut code_bytes)?;
            let mut code = Code::from_vec(code_bytes);
            code.truncate(code_len);

            pairs.push((symbol, code));
        }
        let table =
            CodeTable::from_pairs(pairs).map_err(|e| ArtifactError::Malformed(e.to_string()))?;

        let bit_len = reader.read_u64::<BigEndian>()?;
        let byte_len = reader.read_u64::<BigEndian>()?;
        if byte_len != bit_len.div_ceil(8) {
            return Err(ArtifactError::Malformed(format!(
                "{} payload bits cannot occupy {} bytes",
                bit_len, byte_len
            )));
        }
        let mut bytes = Vec::new();
        reader.by_ref().take(byte_len).read_to_end(&mut bytes)?;
        if bytes.len() as u64 != byte_len {
            return Err(ArtifactError::Malformed(format!(
                "payload truncated after {} of {} bytes",
                bytes.len(),
                byte_len
            )));
        }

        if reader.read(&mut [0u8; 1])? != 0 {
            return Err(ArtifactError::Malformed("trailing bytes after payload".into()));
        }

        Ok(Self {
            table,
            payload: EncodedPayload::from_raw_parts(bytes, bit_len),
        })
    }
}

fn checked_len<T: TryFrom<usize>>(len: usize, what: &str) -> Result<T, ArtifactError> {
    T::try_from(len).map_err(|_| ArtifactError::Malformed(format!("{} {} does not fit", what, len)))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{
        frequency::FrequencyTable, huffman_decoder::decode_bits, huffman_encoder::encode_bits,
        tree::HuffmanTree,
    };

    fn artifact_for(text: &str) -> Artifact {
        let freq = FrequencyTable::count(text).unwrap();
        let table = CodeTable::generate(&HuffmanTree::build(&freq).unwrap());
        let payload = encode_bits(text, &table).unwrap();
        Artifact::new(table, payload)
    }

    fn to_bytes(artifact: &Artifact) -> Vec<u8> {
        let mut bytes = Vec::new();
        artifact.write_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_layout_of_small_artifact() {
        // a = 1, b = 0, "ab" = 10
        let bytes = to_bytes(&artifact_for("ab"));

        #[rustfmt::skip]
        let expected = vec![
            b'H', b'U', b'F', b'T', 1,
            0, 0, 0, 2,
            0, 0, 0, b'a', 0, 1, 0b1000_0000,
            0, 0, 0, b'b', 0, 1, 0b0000_0000,
            0, 0, 0, 0, 0, 0, 0, 2,
            0, 0, 0, 0, 0, 0, 0, 1,
            0b1000_0000,
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let text = "the quick brown fox jumps over the lazy dog";
        assert_eq!(to_bytes(&artifact_for(text)), to_bytes(&artifact_for(text)));
    }

    #[test]
    fn test_read_back_keeps_table_and_bit_count() {
        let text = "Grüße aus Köln, 日本語も";
        let artifact = artifact_for(text);
        let bytes = to_bytes(&artifact);

        let read = Artifact::read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(read, artifact);
        assert_eq!(decode_bits(&read.payload, &read.table).unwrap(), text);
    }

    #[test]
    fn test_save_overwrites_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact.huft");

        artifact_for("first text, rather long").save(&path).unwrap();
        let second = artifact_for("2nd");
        second.save(&path).unwrap();

        assert_eq!(Artifact::load(&path).unwrap(), second);
    }

    #[test]
    fn test_failed_save_keeps_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact.huft");
        let first = artifact_for("first text");
        first.save(&path).unwrap();

        // a code longer than the u16 length field fails halfway through writing
        let table = CodeTable::from_pairs([('a', Code::repeat(false, 70_000))]).unwrap();
        let oversized = Artifact::new(table, EncodedPayload::from_bits(Code::new()));
        let err = oversized.save(&path).unwrap_err();
        assert!(matches!(
            err,
            HuffmanError::Storage {
                source: ArtifactError::Malformed(_),
                ..
            }
        ));

        assert_eq!(Artifact::load(&path).unwrap(), first);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_into_missing_directory_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("artifact.huft");

        assert!(matches!(
            artifact_for("ab").save(&path),
            Err(HuffmanError::Storage {
                source: ArtifactError::Io(_),
                ..
            })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Artifact::load(&dir.path().join("missing.huft")).unwrap_err();

        assert!(matches!(
            err,
            HuffmanError::Storage {
                source: ArtifactError::Io(_),
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_magic_and_version() {
        let mut bytes = to_bytes(&artifact_for("ab"));
        bytes[0] = b'X';
        assert!(matches!(
            Artifact::read_from(&mut Cursor::new(&bytes)),
            Err(ArtifactError::BadMagic(_))
        ));

        let mut bytes = to_bytes(&artifact_for("ab"));
        bytes[4] = 9;
        assert!(matches!(
            Artifact::read_from(&mut Cursor::new(&bytes)),
            Err(ArtifactError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn test_rejects_truncated_and_padded_files() {
        let bytes = to_bytes(&artifact_for("This is a test!"));

        for cut in [3, 9, bytes.len() - 1] {
            assert!(Artifact::read_from(&mut Cursor::new(&bytes[..cut])).is_err());
        }

        let mut padded = bytes.clone();
        padded.push(0);
        assert!(matches!(
            Artifact::read_from(&mut Cursor::new(&padded)),
            Err(ArtifactError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_payload_size_mismatch() {
        let mut bytes = to_bytes(&artifact_for("ab"));
        // bit count lives 17 bytes from the end: u64 bits, u64 bytes, 1 payload byte
        let at = bytes.len() - 17;
        bytes[at + 7] = 9;
        assert!(matches!(
            Artifact::read_from(&mut Cursor::new(&bytes)),
            Err(ArtifactError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_table_that_is_not_a_prefix_code() {
        let mut bytes = to_bytes(&artifact_for("ab"));
        // make 'b' share the code of 'a'
        bytes[22] = 0b1000_0000;
        assert!(matches!(
            Artifact::read_from(&mut Cursor::new(&bytes)),
            Err(ArtifactError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_scalar_value() {
        let mut bytes = to_bytes(&artifact_for("ab"));
        // first symbol becomes U+D800, a lone surrogate
        bytes[9..13].copy_from_slice(&0xD800u32.to_be_bytes());
        assert!(matches!(
            Artifact::read_from(&mut Cursor::new(&bytes)),
            Err(ArtifactError::Malformed(_))
        ));
    }
}
