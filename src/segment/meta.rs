//! Index metadata and commit point
//!
//! A commit is:
//! 1. Write the generation's field files and store → fsync
//! 2. Write meta.json.tmp → fsync
//! 3. Atomic rename to meta.json
//! 4. Only then delete files from older generations
//!
//! A reader only ever sees files listed by a complete `meta.json`.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::AnalyzerKind;
use crate::error::TrecdexError;
use crate::index::{FieldKind, FieldSummary};
use crate::Result;

pub const META_FILE: &str = "meta.json";
const META_TMP_FILE: &str = "meta.json.tmp";

/// Prefix shared by every generation-owned file
pub const GENERATION_FILE_PREFIX: &str = "gen_";

/// Metadata for one indexed field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub name: String,
    /// Position used in the field's file names
    pub ordinal: u32,
    pub kind: FieldKind,
    pub summary: FieldSummary,
    pub term_count: u64,
    pub avg_length: f64,
    /// CRC32 over the FST, term metadata and postings files, in that order
    pub checksum: u32,
}

/// Committed index description
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexMeta {
    /// Format version
    pub version: u32,
    /// Incremented by every commit into the same directory
    pub generation: u64,
    /// Documents added to the index
    pub doc_count: u32,
    pub analyzer: AnalyzerKind,
    pub fields: Vec<FieldMeta>,
    /// CRC32 of the stored-fields file
    pub store_checksum: u32,
    pub created_at: u64,
}

impl IndexMeta {
    /// Current format version
    pub const VERSION: u32 = 1;

    pub fn new(generation: u64, analyzer: AnalyzerKind) -> Self {
        Self {
            version: Self::VERSION,
            generation,
            doc_count: 0,
            analyzer,
            fields: Vec::new(),
            store_checksum: 0,
            created_at: current_timestamp(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn store_file(generation: u64) -> String {
        format!("{}{}.store", GENERATION_FILE_PREFIX, generation)
    }

    pub fn fst_file(generation: u64, ordinal: u32) -> String {
        format!("{}{}_f{}.fst", GENERATION_FILE_PREFIX, generation, ordinal)
    }

    pub fn terms_file(generation: u64, ordinal: u32) -> String {
        format!("{}{}_f{}.terms", GENERATION_FILE_PREFIX, generation, ordinal)
    }

    pub fn postings_file(generation: u64, ordinal: u32) -> String {
        format!("{}{}_f{}.postings", GENERATION_FILE_PREFIX, generation, ordinal)
    }

    /// Whether a directory entry belongs to `generation`
    pub fn owns_file(generation: u64, file_name: &str) -> bool {
        let own = format!("{}{}", GENERATION_FILE_PREFIX, generation);
        file_name
            .strip_prefix(&own)
            .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('_'))
    }

    /// Load the committed metadata of `dir`, if any
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(META_FILE);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let meta: IndexMeta = serde_json::from_slice(&data)?;
        if meta.version > Self::VERSION {
            return Err(TrecdexError::Corrupted(format!(
                "unsupported index format version {}, expected <= {}",
                meta.version,
                Self::VERSION
            )));
        }
        Ok(Some(meta))
    }

    /// Atomically publish this metadata as the commit point of `dir`
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let tmp = dir.join(META_TMP_FILE);
        let target = dir.join(META_FILE);

        {
            let mut file = File::create(&tmp)?;
            file.write_all(&serde_json::to_vec_pretty(self)?)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &target)?;
        sync_dir(dir);

        Ok(target)
    }
}

/// Best-effort directory fsync so the rename is durable
fn sync_dir(dir: &Path) {
    if let Ok(handle) = File::open(dir) {
        let _ = handle.sync_all();
    }
}

fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
