//! Segment writer
//!
//! Buffers postings per field while documents are added and streams stored
//! fields to the generation's store file. `commit` encodes every field,
//! publishes `meta.json` and only then removes the previous generation.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crc32fast::Hasher;
use tracing::{debug, info, warn};

use super::buffer::FieldBuffer;
use super::lock::IndexLock;
use super::meta::{FieldMeta, IndexMeta, GENERATION_FILE_PREFIX};
use super::store::StoreWriter;
use super::types::DocNo;
use crate::analysis::Analyzer;
use crate::error::TrecdexError;
use crate::index::{CommitInfo, FieldKind, IndexDocument, IndexWriter, OpenMode};
use crate::Result;

/// Writer for a single-segment index directory
pub struct SegmentWriter {
    dir: PathBuf,
    analyzer: Analyzer,
    generation: u64,
    store: Option<StoreWriter>,
    /// Field buffers in first-seen order; the position is the field ordinal
    fields: Vec<(String, FieldBuffer)>,
    doc_count: u32,
    committed: bool,
    _lock: IndexLock,
}

impl SegmentWriter {
    /// Open a writer on `dir`, creating the directory if needed
    pub fn open(dir: &Path, analyzer: Analyzer, mode: OpenMode) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| {
            TrecdexError::IndexIo(format!("cannot create index directory {}: {}", dir.display(), e))
        })?;

        let lock = IndexLock::acquire(dir)?;

        let previous = match IndexMeta::load(dir) {
            Ok(meta) => meta,
            Err(e) if mode == OpenMode::Create => {
                warn!("Ignoring unreadable index metadata in {}: {}", dir.display(), e);
                None
            }
            Err(e) => return Err(e),
        };

        if mode == OpenMode::CreateOrAppend && previous.is_some() {
            return Err(TrecdexError::InvalidRequest(format!(
                "appending to the existing index at {} is not supported",
                dir.display()
            )));
        }

        let generation = previous.map(|m| m.generation + 1).unwrap_or(1);
        let store = StoreWriter::create(dir.join(IndexMeta::store_file(generation)))?;

        debug!(
            "Opened writer on {} (generation {}, analyzer {})",
            dir.display(),
            generation,
            analyzer.kind()
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            analyzer,
            generation,
            store: Some(store),
            fields: Vec::new(),
            doc_count: 0,
            committed: false,
            _lock: lock,
        })
    }

    pub fn doc_count(&self) -> u32 {
        self.doc_count
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn field_buffer(&mut self, name: &str, kind: FieldKind) -> Result<&mut FieldBuffer> {
        let position = match self.fields.iter().position(|(n, _)| n == name) {
            Some(position) => {
                let existing = self.fields[position].1.kind();
                if existing != kind {
                    return Err(TrecdexError::InvalidRequest(format!(
                        "field {} was indexed as {:?}, got {:?}",
                        name, existing, kind
                    )));
                }
                position
            }
            None => {
                self.fields.push((name.to_string(), FieldBuffer::new(kind)));
                self.fields.len() - 1
            }
        };
        Ok(&mut self.fields[position].1)
    }

    fn analyze(&self, kind: FieldKind, value: &str) -> HashMap<String, u32> {
        match kind {
            FieldKind::Keyword => HashMap::from([(value.to_string(), 1)]),
            FieldKind::Text => self.analyzer.term_frequencies(value),
        }
    }

    fn write_field(&self, ordinal: u32, name: &str, buffer: FieldBuffer) -> Result<FieldMeta> {
        let kind = buffer.kind();
        let encoded = buffer.encode()?;

        let fst_data = encoded.terms.fst_bytes();
        let term_data = bincode::serialize(encoded.terms.metadata())?;

        let mut hasher = Hasher::new();
        hasher.update(fst_data);
        hasher.update(&term_data);
        hasher.update(&encoded.postings_data);

        write_synced(&self.dir.join(IndexMeta::fst_file(self.generation, ordinal)), fst_data)?;
        write_synced(&self.dir.join(IndexMeta::terms_file(self.generation, ordinal)), &term_data)?;
        write_synced(
            &self.dir.join(IndexMeta::postings_file(self.generation, ordinal)),
            &encoded.postings_data,
        )?;

        Ok(FieldMeta {
            name: name.to_string(),
            ordinal,
            kind,
            summary: encoded.stats.summarize(&encoded.terms),
            term_count: encoded.terms.len() as u64,
            avg_length: encoded.stats.avg_length(),
            checksum: hasher.finalize(),
        })
    }

    /// Remove every generation file that is not owned by `keep`
    fn remove_generations_except(&self, keep: u64) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list {} for cleanup: {}", self.dir.display(), e);
                return;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.starts_with(GENERATION_FILE_PREFIX) {
                continue;
            }
            if !IndexMeta::owns_file(keep, &name) {
                if let Err(e) = fs::remove_file(entry.path()) {
                    warn!("Failed to remove stale index file {}: {}", name, e);
                }
            }
        }
    }

    fn remove_own_files(&self) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if IndexMeta::owns_file(self.generation, &name) {
                let _ = fs::remove_file(entry.path());
            }
        }
    }
}

impl IndexWriter for SegmentWriter {
    fn add_document(&mut self, doc: &IndexDocument) -> Result<()> {
        let docno = DocNo::new(self.doc_count);

        // Same-named fields of one document share a single posting per term
        let mut per_field: Vec<(&str, FieldKind, HashMap<String, u32>)> = Vec::new();
        for field in doc.fields() {
            let terms = self.analyze(field.kind, &field.value);
            match per_field.iter_mut().find(|(name, _, _)| *name == field.name) {
                Some((_, _, existing)) => {
                    for (term, tf) in terms {
                        *existing.entry(term).or_insert(0) += tf;
                    }
                }
                None => per_field.push((field.name.as_str(), field.kind, terms)),
            }
        }

        for (name, kind, terms) in per_field {
            self.field_buffer(name, kind)?.index_document(docno, terms);
        }

        let store = self
            .store
            .as_mut()
            .ok_or_else(|| TrecdexError::IndexIo("writer already closed".to_string()))?;
        store.append(doc)?;

        self.doc_count += 1;
        Ok(())
    }

    fn commit(mut self) -> Result<CommitInfo> {
        let fields = std::mem::take(&mut self.fields);
        let mut meta = IndexMeta::new(self.generation, self.analyzer.kind());
        meta.doc_count = self.doc_count;

        for (ordinal, (name, buffer)) in fields.into_iter().enumerate() {
            let field_meta = self.write_field(ordinal as u32, &name, buffer)?;
            debug!(
                "Field {}: {} terms, {} postings",
                field_meta.name, field_meta.term_count, field_meta.summary.sum_doc_freq
            );
            meta.fields.push(field_meta);
        }

        let store = self
            .store
            .take()
            .ok_or_else(|| TrecdexError::IndexIo("writer already closed".to_string()))?;
        meta.store_checksum = store.finish()?;

        meta.save(&self.dir)?;
        self.committed = true;
        self.remove_generations_except(self.generation);

        info!(
            "Committed {} documents to {} (generation {})",
            meta.doc_count,
            self.dir.display(),
            meta.generation
        );

        Ok(CommitInfo {
            doc_count: meta.doc_count,
            fields: meta.fields.iter().map(|f| f.name.clone()).collect(),
        })
    }
}

impl Drop for SegmentWriter {
    fn drop(&mut self) {
        if !self.committed {
            self.store.take();
            self.remove_own_files();
            debug!(
                "Discarded uncommitted generation {} in {}",
                self.generation,
                self.dir.display()
            );
        }
    }
}

fn write_synced(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalyzerKind;
    use crate::index::IndexField;
    use crate::segment::lock::LOCK_FILE;
    use crate::segment::meta::META_FILE;
    use tempfile::TempDir;

    fn doc(docno: &str, text: &str) -> IndexDocument {
        IndexDocument::new()
            .with_field(IndexField::keyword("DOCNO", docno))
            .with_field(IndexField::text("TEXT", text))
    }

    #[test]
    fn test_commit_writes_meta() {
        let tmp = TempDir::new().unwrap();
        let analyzer = Analyzer::new(AnalyzerKind::Standard);

        let mut writer = SegmentWriter::open(tmp.path(), analyzer, OpenMode::Create).unwrap();
        writer.add_document(&doc("D1", "cat and dog cat")).unwrap();
        writer.add_document(&doc("D2", "dog")).unwrap();
        let info = writer.commit().unwrap();

        assert_eq!(info.doc_count, 2);
        assert_eq!(info.fields, vec!["DOCNO", "TEXT"]);
        assert!(IndexLock::acquire(tmp.path()).is_ok());

        let meta = IndexMeta::load(tmp.path()).unwrap().unwrap();
        let text = meta.field("TEXT").unwrap();
        assert_eq!(text.term_count, 3);
        assert_eq!(text.summary.doc_count, 2);
        assert_eq!(text.summary.sum_total_term_freq, 5);
        assert_eq!(text.summary.sum_doc_freq, 4);
    }

    #[test]
    fn test_drop_without_commit_leaves_nothing() {
        let tmp = TempDir::new().unwrap();
        let analyzer = Analyzer::new(AnalyzerKind::Simple);

        let mut writer = SegmentWriter::open(tmp.path(), analyzer, OpenMode::Create).unwrap();
        writer.add_document(&doc("D1", "text")).unwrap();
        drop(writer);

        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec![LOCK_FILE.to_string()]);
        assert!(IndexLock::acquire(tmp.path()).is_ok());
    }

    #[test]
    fn test_create_replaces_previous_generation() {
        let tmp = TempDir::new().unwrap();

        let mut first =
            SegmentWriter::open(tmp.path(), Analyzer::new(AnalyzerKind::Standard), OpenMode::Create)
                .unwrap();
        first.add_document(&doc("D1", "one two")).unwrap();
        first.commit().unwrap();

        let mut second =
            SegmentWriter::open(tmp.path(), Analyzer::new(AnalyzerKind::Keyword), OpenMode::Create)
                .unwrap();
        assert_eq!(second.generation(), 2);
        second.add_document(&doc("D9", "three")).unwrap();
        second.commit().unwrap();

        let meta = IndexMeta::load(tmp.path()).unwrap().unwrap();
        assert_eq!(meta.doc_count, 1);
        assert_eq!(meta.analyzer, AnalyzerKind::Keyword);

        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert!(names.contains(&META_FILE.to_string()));
        assert!(!names.iter().any(|n| n.starts_with("gen_1")));
    }

    #[test]
    fn test_append_mode_refuses_existing_index() {
        let tmp = TempDir::new().unwrap();
        let writer =
            SegmentWriter::open(tmp.path(), Analyzer::new(AnalyzerKind::Standard), OpenMode::Create)
                .unwrap();
        writer.commit().unwrap();

        let result = SegmentWriter::open(
            tmp.path(),
            Analyzer::new(AnalyzerKind::Standard),
            OpenMode::CreateOrAppend,
        );
        assert!(matches!(result, Err(TrecdexError::InvalidRequest(_))));
        assert!(IndexLock::acquire(tmp.path()).is_ok());
    }

    #[test]
    fn test_second_writer_is_locked_out() {
        let tmp = TempDir::new().unwrap();
        let _writer =
            SegmentWriter::open(tmp.path(), Analyzer::new(AnalyzerKind::Standard), OpenMode::Create)
                .unwrap();

        let second =
            SegmentWriter::open(tmp.path(), Analyzer::new(AnalyzerKind::Standard), OpenMode::Create);
        assert!(matches!(second, Err(TrecdexError::IndexLocked(_))));
    }

    #[test]
    fn test_field_kind_conflict() {
        let tmp = TempDir::new().unwrap();
        let mut writer =
            SegmentWriter::open(tmp.path(), Analyzer::new(AnalyzerKind::Standard), OpenMode::Create)
                .unwrap();
        writer.add_document(&doc("D1", "x")).unwrap();

        let bad = IndexDocument::new().with_field(IndexField::text("DOCNO", "D2"));
        assert!(matches!(
            writer.add_document(&bad),
            Err(TrecdexError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_empty_keyword_is_the_empty_term() {
        let tmp = TempDir::new().unwrap();
        let mut writer =
            SegmentWriter::open(tmp.path(), Analyzer::new(AnalyzerKind::Standard), OpenMode::Create)
                .unwrap();
        writer.add_document(&doc("", "")).unwrap();
        writer.commit().unwrap();

        let meta = IndexMeta::load(tmp.path()).unwrap().unwrap();
        assert_eq!(meta.doc_count, 1);
        let docno = meta.field("DOCNO").unwrap();
        assert_eq!(docno.term_count, 1);
        assert_eq!(docno.summary.doc_count, 1);
        assert_eq!(meta.field("TEXT").unwrap().term_count, 0);
        assert_eq!(meta.field("TEXT").unwrap().summary.doc_count, 0);
    }
}
