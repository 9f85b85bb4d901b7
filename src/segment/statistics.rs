//! Per-field statistics gathered while indexing

use serde::{Deserialize, Serialize};

use super::term_dict::TermDictionary;
use crate::index::{FieldSummary, TermStats};

/// Statistics for one field of the segment
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FieldStatistics {
    /// Documents with at least one term in this field
    pub doc_count: u32,
    /// Sum of all field lengths in tokens
    pub total_tokens: u64,
}

impl FieldStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document's field length; zero-length fields are not counted
    pub fn add_document(&mut self, field_len: u32) {
        if field_len == 0 {
            return;
        }
        self.total_tokens += field_len as u64;
        self.doc_count += 1;
    }

    /// Average field length over documents that have the field
    pub fn avg_length(&self) -> f64 {
        if self.doc_count == 0 {
            0.0
        } else {
            self.total_tokens as f64 / self.doc_count as f64
        }
    }

    /// Combine with a committed term dictionary into the field summary
    pub fn summarize(&self, terms: &TermDictionary) -> FieldSummary {
        let mut summary = FieldSummary {
            doc_count: self.doc_count,
            ..Default::default()
        };
        for meta in terms.metadata() {
            summary.add_term(TermStats {
                doc_freq: meta.doc_frequency,
                total_term_freq: meta.total_term_frequency,
            });
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::term_dict::TermDictionaryBuilder;
    use crate::segment::types::PostingListMeta;

    #[test]
    fn test_field_statistics() {
        let mut stats = FieldStatistics::new();
        stats.add_document(100);
        stats.add_document(0);
        stats.add_document(200);

        assert_eq!(stats.doc_count, 2);
        assert_eq!(stats.total_tokens, 300);
        assert!((stats.avg_length() - 150.0).abs() < 0.001);
    }

    #[test]
    fn test_summarize() {
        let mut stats = FieldStatistics::new();
        stats.add_document(4);

        let mut builder = TermDictionaryBuilder::new();
        for (term, tf) in [("and", 1u64), ("cat", 2), ("dog", 1)] {
            builder.add(
                term.to_string(),
                PostingListMeta {
                    offset: 0,
                    length: 0,
                    doc_frequency: 1,
                    total_term_frequency: tf,
                },
            );
        }
        let dict = builder.build().unwrap();

        let summary = stats.summarize(&dict);
        assert_eq!(summary.doc_count, 1);
        assert_eq!(summary.sum_total_term_freq, 4);
        assert_eq!(summary.sum_doc_freq, 3);
    }
}
