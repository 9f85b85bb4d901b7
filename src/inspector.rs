//! Term statistics of a committed index

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::index::{IndexBackend, IndexReader};
use crate::segment::SegmentBackend;
use crate::Result;

/// Document and term counts of one field
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexReport {
    pub field: String,
    /// Documents ever added to the index
    pub total_documents: u32,
    /// Distinct terms of the field
    pub vocabulary_size: u64,
    /// Documents with at least one term in the field
    pub docs_with_field: u32,
    /// Sum of term frequencies over the field
    pub total_tokens: u64,
    /// Sum of document frequencies over the field
    pub total_postings: u64,
}

impl fmt::Display for IndexReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total number of documents in the corpus: {}", self.total_documents)?;
        writeln!(f, "Size of vocabulary = {}", self.vocabulary_size)?;
        writeln!(
            f,
            "Number of documents that have at least one term for this field: {}",
            self.docs_with_field
        )?;
        writeln!(f, "Number of tokens for this field: {}", self.total_tokens)?;
        write!(f, "Number of postings for this field: {}", self.total_postings)
    }
}

/// Inspect an index written by the bundled segment backend
pub fn report_statistics<P: AsRef<Path>>(index_dir: P, field: &str) -> Result<IndexReport> {
    report_statistics_with(&SegmentBackend::new(), index_dir.as_ref(), field)
}

pub fn report_statistics_with<B: IndexBackend>(
    backend: &B,
    index_dir: &Path,
    field: &str,
) -> Result<IndexReport> {
    let reader = backend.open_reader(index_dir)?;

    let mut report = IndexReport {
        field: field.to_string(),
        total_documents: reader.max_doc(),
        ..Default::default()
    };

    if let Some(terms) = reader.terms(field) {
        report.vocabulary_size = terms.count() as u64;
    }

    if let Some(summary) = reader.field_summary(field) {
        report.docs_with_field = summary.doc_count;
        report.total_tokens = summary.sum_total_term_freq;
        report.total_postings = summary.sum_doc_freq;
    }

    debug!("Inspected {} field {}: {:?}", index_dir.display(), field, report);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Analyzer, AnalyzerKind};
    use crate::error::TrecdexError;
    use crate::index::{IndexDocument, IndexField, IndexWriter, OpenMode};
    use tempfile::TempDir;

    #[test]
    fn test_report_display() {
        let report = IndexReport {
            field: "TEXT".to_string(),
            total_documents: 2,
            vocabulary_size: 3,
            docs_with_field: 1,
            total_tokens: 4,
            total_postings: 3,
        };

        let expected = "Total number of documents in the corpus: 2\n\
                        Size of vocabulary = 3\n\
                        Number of documents that have at least one term for this field: 1\n\
                        Number of tokens for this field: 4\n\
                        Number of postings for this field: 3";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_report_statistics() {
        let tmp = TempDir::new().unwrap();
        let backend = SegmentBackend::new();
        let mut writer = backend
            .create_writer(tmp.path(), Analyzer::new(AnalyzerKind::Standard), OpenMode::Create)
            .unwrap();
        writer
            .add_document(&IndexDocument::new().with_field(IndexField::text("TEXT", "cat and dog cat")))
            .unwrap();
        writer
            .add_document(&IndexDocument::new().with_field(IndexField::text("TEXT", "")))
            .unwrap();
        writer.commit().unwrap();

        let report = report_statistics(tmp.path(), "TEXT").unwrap();
        assert_eq!(report.total_documents, 2);
        assert_eq!(report.vocabulary_size, 3);
        assert_eq!(report.docs_with_field, 1);
        assert_eq!(report.total_tokens, 4);
        assert_eq!(report.total_postings, 3);

        let missing = report_statistics(tmp.path(), "HEAD").unwrap();
        assert_eq!(missing.total_documents, 2);
        assert_eq!(missing.vocabulary_size, 0);
        assert_eq!(missing.total_tokens, 0);
    }

    #[test]
    fn test_missing_index() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            report_statistics(tmp.path(), "TEXT"),
            Err(TrecdexError::IndexNotFound(_))
        ));
    }
}
