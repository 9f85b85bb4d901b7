//! Stored-fields log
//!
//! Record format:
//! - u32 length (little endian)
//! - u32 crc32 of payload
//! - bincode-encoded `IndexDocument`

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crc32fast::Hasher;

use crate::error::TrecdexError;
use crate::index::IndexDocument;
use crate::Result;

const RECORD_HEADER_LEN: usize = 8;

/// Append-only writer for stored documents
pub struct StoreWriter {
    path: PathBuf,
    file: BufWriter<File>,
    file_hasher: Hasher,
    count: u32,
}

impl StoreWriter {
    pub fn create(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        Ok(Self {
            path,
            file: BufWriter::new(file),
            file_hasher: Hasher::new(),
            count: 0,
        })
    }

    /// Append a document and return its position in the store
    pub fn append(&mut self, doc: &IndexDocument) -> Result<u32> {
        let payload = bincode::serialize(doc)?;

        let mut hasher = Hasher::new();
        hasher.update(&payload);
        let crc32 = hasher.finalize();

        let mut header = [0u8; RECORD_HEADER_LEN];
        header[..4].copy_from_slice(&(payload.len() as u32).to_le_bytes());
        header[4..].copy_from_slice(&crc32.to_le_bytes());

        self.file.write_all(&header)?;
        self.file.write_all(&payload)?;
        self.file_hasher.update(&header);
        self.file_hasher.update(&payload);

        let position = self.count;
        self.count += 1;
        Ok(position)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and sync the log, returning the checksum of the whole file
    pub fn finish(mut self) -> Result<u32> {
        self.file.flush()?;
        self.file.get_ref().sync_all()?;
        Ok(self.file_hasher.finalize())
    }
}

/// In-memory view over a committed store file
pub struct StoreReader {
    data: Vec<u8>,
    offsets: Vec<usize>,
}

impl StoreReader {
    /// Load the store, validating every record checksum
    pub fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut offsets = Vec::new();
        let mut pos = 0usize;

        while pos < data.len() {
            if pos + RECORD_HEADER_LEN > data.len() {
                return Err(TrecdexError::Corrupted(format!(
                    "truncated store record header at byte {}",
                    pos
                )));
            }
            let len = u32::from_le_bytes(read_u32(&data, pos)) as usize;
            let expected = u32::from_le_bytes(read_u32(&data, pos + 4));
            let start = pos + RECORD_HEADER_LEN;
            let end = start + len;

            if end > data.len() {
                return Err(TrecdexError::Corrupted(format!(
                    "truncated store record at byte {}",
                    pos
                )));
            }

            let mut hasher = Hasher::new();
            hasher.update(&data[start..end]);
            if hasher.finalize() != expected {
                return Err(TrecdexError::Corrupted(format!(
                    "store record {} failed checksum",
                    offsets.len()
                )));
            }

            offsets.push(pos);
            pos = end;
        }

        Ok(Self { data, offsets })
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Decode a stored document by position
    pub fn get(&self, position: u32) -> Result<Option<IndexDocument>> {
        let Some(&offset) = self.offsets.get(position as usize) else {
            return Ok(None);
        };
        let len = u32::from_le_bytes(read_u32(&self.data, offset)) as usize;
        let start = offset + RECORD_HEADER_LEN;
        let doc = bincode::deserialize(&self.data[start..start + len])?;
        Ok(Some(doc))
    }
}

fn read_u32(data: &[u8], at: usize) -> [u8; 4] {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[at..at + 4]);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexField;
    use tempfile::TempDir;

    fn doc(docno: &str) -> IndexDocument {
        IndexDocument::new()
            .with_field(IndexField::keyword("DOCNO", docno))
            .with_field(IndexField::text("TEXT", "body text "))
    }

    #[test]
    fn test_append_and_read() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.bin");

        let mut writer = StoreWriter::create(path.clone()).unwrap();
        assert_eq!(writer.append(&doc("D1")).unwrap(), 0);
        assert_eq!(writer.append(&doc("D2")).unwrap(), 1);
        assert_eq!(writer.count(), 2);
        let checksum = writer.finish().unwrap();

        let mut hasher = Hasher::new();
        hasher.update(&std::fs::read(&path).unwrap());
        assert_eq!(hasher.finalize(), checksum);

        let reader = StoreReader::open(&path).unwrap();
        assert_eq!(reader.len(), 2);
        assert_eq!(reader.get(1).unwrap().unwrap().get("DOCNO"), Some("D2"));
        assert!(reader.get(2).unwrap().is_none());
    }

    #[test]
    fn test_detects_corruption() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.bin");

        let mut writer = StoreWriter::create(path.clone()).unwrap();
        writer.append(&doc("D1")).unwrap();
        writer.finish().unwrap();

        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;

        assert!(matches!(
            StoreReader::from_bytes(bytes),
            Err(TrecdexError::Corrupted(_))
        ));
    }
}
