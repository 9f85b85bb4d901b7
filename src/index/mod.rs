//! Index capability interface
//!
//! The builder and inspector only talk to an index through these traits:
//! create a writer, add documents, commit, open a reader and walk a field's
//! term dictionary. [`crate::segment::SegmentBackend`] is the bundled
//! implementation.

mod document;
mod stats;

pub use document::{FieldKind, IndexDocument, IndexField};
pub use stats::{FieldSummary, TermStats};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::Analyzer;
use crate::Result;

/// How a writer treats an existing index at its path
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenMode {
    /// Remove any existing index and start empty
    #[default]
    Create,
    /// Create when absent; backends may refuse to append to an existing index
    CreateOrAppend,
}

/// Summary returned by a successful commit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitInfo {
    pub doc_count: u32,
    pub fields: Vec<String>,
}

/// Boxed stream of `(term, stats)` pairs in term order
pub type TermIter<'a> = Box<dyn Iterator<Item = (String, TermStats)> + 'a>;

/// Something that can create and open indexes
pub trait IndexBackend {
    type Writer: IndexWriter;
    type Reader: IndexReader;

    /// Open a writer at `path`, taking the index write lock
    fn create_writer(&self, path: &Path, analyzer: Analyzer, mode: OpenMode) -> Result<Self::Writer>;

    /// Open a committed index read-only
    fn open_reader(&self, path: &Path) -> Result<Self::Reader>;
}

/// Write side of an index
///
/// Dropping a writer without committing discards its documents and releases
/// the lock.
pub trait IndexWriter {
    fn add_document(&mut self, doc: &IndexDocument) -> Result<()>;

    fn commit(self) -> Result<CommitInfo>;
}

/// Read side of an index
pub trait IndexReader {
    /// Number of documents ever added to the index
    fn max_doc(&self) -> u32;

    /// Names of the indexed fields
    fn fields(&self) -> Vec<String>;

    /// Walk the term dictionary of a field, or `None` if the field has no terms
    fn terms(&self, field: &str) -> Option<TermIter<'_>>;

    /// Aggregate statistics of a field, or `None` if the field has no terms
    fn field_summary(&self, field: &str) -> Option<FieldSummary>;

    /// Per-term statistics
    fn term_stats(&self, field: &str, term: &str) -> Option<TermStats>;

    /// Stored fields of a document by its number
    fn stored_document(&self, docno: u32) -> Result<Option<IndexDocument>>;
}
