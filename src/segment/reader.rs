//! Read-only view over a committed index directory
//!
//! Every file named by `meta.json` is loaded into memory and checked against
//! the CRC32 recorded at commit time before the reader is handed out.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crc32fast::Hasher;
use tracing::debug;

use super::meta::{FieldMeta, IndexMeta};
use super::postings::PostingsReader;
use super::store::StoreReader;
use super::term_dict::TermDictionary;
use super::types::{DocNo, PostingListMeta};
use crate::analysis::AnalyzerKind;
use crate::error::TrecdexError;
use crate::index::{FieldSummary, IndexDocument, IndexReader, TermIter, TermStats};
use crate::Result;

/// Loaded files of one field
struct FieldReader {
    meta: FieldMeta,
    terms: TermDictionary,
    postings: PostingsReader,
}

impl FieldReader {
    fn load(dir: &Path, generation: u64, meta: &FieldMeta) -> Result<Self> {
        let fst_data = read_index_file(dir, &IndexMeta::fst_file(generation, meta.ordinal))?;
        let term_data = read_index_file(dir, &IndexMeta::terms_file(generation, meta.ordinal))?;
        let postings_data =
            read_index_file(dir, &IndexMeta::postings_file(generation, meta.ordinal))?;

        let mut hasher = Hasher::new();
        hasher.update(&fst_data);
        hasher.update(&term_data);
        hasher.update(&postings_data);
        if hasher.finalize() != meta.checksum {
            return Err(TrecdexError::Corrupted(format!(
                "checksum mismatch for field {}",
                meta.name
            )));
        }

        let metadata: Vec<PostingListMeta> = bincode::deserialize(&term_data)?;
        let terms = TermDictionary::new(fst_data, metadata).map_err(|e| {
            TrecdexError::Corrupted(format!("term dictionary of field {}: {}", meta.name, e))
        })?;

        Ok(Self {
            meta: meta.clone(),
            terms,
            postings: PostingsReader::new(postings_data),
        })
    }
}

/// Reader for a single-segment index
pub struct SegmentReader {
    dir: PathBuf,
    meta: IndexMeta,
    fields: Vec<FieldReader>,
    store: StoreReader,
}

impl SegmentReader {
    /// Open the index committed in `dir`
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(TrecdexError::IndexNotFound(dir.to_path_buf()));
        }
        let meta = IndexMeta::load(dir)?
            .ok_or_else(|| TrecdexError::IndexNotFound(dir.to_path_buf()))?;

        let fields = meta
            .fields
            .iter()
            .map(|field| FieldReader::load(dir, meta.generation, field))
            .collect::<Result<Vec<_>>>()?;

        let store_data = read_index_file(dir, &IndexMeta::store_file(meta.generation))?;
        let mut hasher = Hasher::new();
        hasher.update(&store_data);
        if hasher.finalize() != meta.store_checksum {
            return Err(TrecdexError::Corrupted(
                "checksum mismatch for stored fields".to_string(),
            ));
        }
        let store = StoreReader::from_bytes(store_data)?;
        if store.len() != meta.doc_count as usize {
            return Err(TrecdexError::Corrupted(format!(
                "store holds {} documents, metadata says {}",
                store.len(),
                meta.doc_count
            )));
        }

        debug!(
            "Opened index {} (generation {}, {} documents, {} fields)",
            dir.display(),
            meta.generation,
            meta.doc_count,
            fields.len()
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            meta,
            fields,
            store,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    /// Analyzer the index was built with
    pub fn analyzer(&self) -> AnalyzerKind {
        self.meta.analyzer
    }

    fn field(&self, name: &str) -> Option<&FieldReader> {
        self.fields.iter().find(|f| f.meta.name == name)
    }

    /// Decoded `(docno, term frequency)` postings of a term
    pub fn postings(&self, field: &str, term: &str) -> Result<Option<Vec<(DocNo, u32)>>> {
        let Some(reader) = self.field(field) else {
            return Ok(None);
        };
        let Some(meta) = reader.terms.get(term) else {
            return Ok(None);
        };
        let corrupted =
            |e: io::Error| TrecdexError::Corrupted(format!("postings of {}:{}: {}", field, term, e));
        let postings = reader
            .postings
            .get_postings(meta)
            .map_err(corrupted)?
            .collect::<io::Result<Vec<_>>>()
            .map_err(corrupted)?;
        Ok(Some(postings))
    }
}

impl IndexReader for SegmentReader {
    fn max_doc(&self) -> u32 {
        self.meta.doc_count
    }

    fn fields(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.meta.name.clone()).collect()
    }

    fn terms(&self, field: &str) -> Option<TermIter<'_>> {
        let reader = self.field(field).filter(|f| !f.terms.is_empty())?;
        Some(Box::new(reader.terms.iter_terms().into_iter().map(
            |(term, meta)| {
                (
                    term,
                    TermStats {
                        doc_freq: meta.doc_frequency,
                        total_term_freq: meta.total_term_frequency,
                    },
                )
            },
        )))
    }

    fn field_summary(&self, field: &str) -> Option<FieldSummary> {
        self.field(field)
            .filter(|f| f.meta.term_count > 0)
            .map(|f| f.meta.summary)
    }

    fn term_stats(&self, field: &str, term: &str) -> Option<TermStats> {
        let meta = self.field(field)?.terms.get(term)?;
        Some(TermStats {
            doc_freq: meta.doc_frequency,
            total_term_freq: meta.total_term_frequency,
        })
    }

    fn stored_document(&self, docno: u32) -> Result<Option<IndexDocument>> {
        self.store.get(docno)
    }
}

fn read_index_file(dir: &Path, name: &str) -> Result<Vec<u8>> {
    let path = dir.join(name);
    fs::read(&path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            TrecdexError::Corrupted(format!("missing index file {}", path.display()))
        }
        _ => TrecdexError::IndexIo(format!("cannot read {}: {}", path.display(), e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analyzer;
    use crate::index::{IndexField, IndexWriter, OpenMode};
    use crate::segment::writer::SegmentWriter;
    use tempfile::TempDir;

    fn build(dir: &Path, kind: AnalyzerKind, texts: &[(&str, &str)]) {
        let mut writer = SegmentWriter::open(dir, Analyzer::new(kind), OpenMode::Create).unwrap();
        for (docno, text) in texts {
            let doc = IndexDocument::new()
                .with_field(IndexField::keyword("DOCNO", *docno))
                .with_field(IndexField::text("TEXT", *text));
            writer.add_document(&doc).unwrap();
        }
        writer.commit().unwrap();
    }

    #[test]
    fn test_open_missing_index() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            SegmentReader::open(tmp.path()),
            Err(TrecdexError::IndexNotFound(_))
        ));
        assert!(matches!(
            SegmentReader::open(&tmp.path().join("absent")),
            Err(TrecdexError::IndexNotFound(_))
        ));
    }

    #[test]
    fn test_term_statistics() {
        let tmp = TempDir::new().unwrap();
        build(
            tmp.path(),
            AnalyzerKind::Standard,
            &[("D1", "cat and dog cat"), ("D2", "Dog days")],
        );

        let reader = SegmentReader::open(tmp.path()).unwrap();
        assert_eq!(reader.max_doc(), 2);
        assert_eq!(reader.analyzer(), AnalyzerKind::Standard);
        assert_eq!(reader.fields(), vec!["DOCNO", "TEXT"]);

        let terms: Vec<String> = reader.terms("TEXT").unwrap().map(|(t, _)| t).collect();
        assert_eq!(terms, vec!["and", "cat", "days", "dog"]);

        let dog = reader.term_stats("TEXT", "dog").unwrap();
        assert_eq!(dog.doc_freq, 2);
        assert_eq!(dog.total_term_freq, 2);

        let summary = reader.field_summary("TEXT").unwrap();
        assert_eq!(summary.doc_count, 2);
        assert_eq!(summary.sum_total_term_freq, 6);
        assert_eq!(summary.sum_doc_freq, 5);

        assert_eq!(
            reader.postings("TEXT", "cat").unwrap().unwrap(),
            vec![(DocNo(0), 2)]
        );
        assert!(reader.postings("TEXT", "bird").unwrap().is_none());
        assert!(reader.terms("HEAD").is_none());
    }

    #[test]
    fn test_stored_documents() {
        let tmp = TempDir::new().unwrap();
        build(tmp.path(), AnalyzerKind::Simple, &[("D1", "a"), ("D2", "b")]);

        let reader = SegmentReader::open(tmp.path()).unwrap();
        let doc = reader.stored_document(1).unwrap().unwrap();
        assert_eq!(doc.get("DOCNO"), Some("D2"));
        assert!(reader.stored_document(2).unwrap().is_none());
    }

    #[test]
    fn test_detects_tampered_postings() {
        let tmp = TempDir::new().unwrap();
        build(tmp.path(), AnalyzerKind::Standard, &[("D1", "alpha beta")]);

        let meta = IndexMeta::load(tmp.path()).unwrap().unwrap();
        let text = meta.field("TEXT").unwrap();
        let path = tmp
            .path()
            .join(IndexMeta::postings_file(meta.generation, text.ordinal));
        let mut bytes = fs::read(&path).unwrap();
        bytes[0] ^= 0xFF;
        fs::write(&path, bytes).unwrap();

        assert!(matches!(
            SegmentReader::open(tmp.path()),
            Err(TrecdexError::Corrupted(_))
        ));
    }

    #[test]
    fn test_undecodable_postings_surface_as_errors() {
        let tmp = TempDir::new().unwrap();
        build(tmp.path(), AnalyzerKind::Standard, &[("D1", "alpha beta")]);

        // Break the docno width of "alpha" and re-seal the field checksum
        let mut meta = IndexMeta::load(tmp.path()).unwrap().unwrap();
        let generation = meta.generation;
        let text = meta.fields.iter_mut().find(|f| f.name == "TEXT").unwrap();
        let dir = tmp.path();
        let postings_path = dir.join(IndexMeta::postings_file(generation, text.ordinal));
        let mut postings = fs::read(&postings_path).unwrap();
        postings[2] = 200;
        fs::write(&postings_path, &postings).unwrap();

        let mut hasher = Hasher::new();
        hasher.update(&fs::read(dir.join(IndexMeta::fst_file(generation, text.ordinal))).unwrap());
        hasher.update(&fs::read(dir.join(IndexMeta::terms_file(generation, text.ordinal))).unwrap());
        hasher.update(&postings);
        text.checksum = hasher.finalize();
        meta.save(dir).unwrap();

        let reader = SegmentReader::open(dir).unwrap();
        assert!(matches!(
            reader.postings("TEXT", "alpha"),
            Err(TrecdexError::Corrupted(_))
        ));
        assert_eq!(
            reader.postings("TEXT", "beta").unwrap().unwrap(),
            vec![(DocNo(0), 1)]
        );
    }

    #[test]
    fn test_field_without_terms_has_no_summary() {
        let tmp = TempDir::new().unwrap();
        build(tmp.path(), AnalyzerKind::Stop, &[("D1", "the and of")]);

        let reader = SegmentReader::open(tmp.path()).unwrap();
        assert!(reader.field_summary("TEXT").is_none());
        assert!(reader.terms("TEXT").is_none());
        assert_eq!(reader.max_doc(), 1);
    }
}
