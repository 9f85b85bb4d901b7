use serde::{Deserialize, Serialize};

/// Per-term statistics exposed by the term dictionary
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermStats {
    /// Number of documents containing the term
    pub doc_freq: u32,
    /// Occurrences of the term across all documents
    pub total_term_freq: u64,
}

/// Aggregate statistics for one indexed field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSummary {
    /// Documents with at least one term in the field
    pub doc_count: u32,
    /// Sum of `total_term_freq` over all terms (token count)
    pub sum_total_term_freq: u64,
    /// Sum of `doc_freq` over all terms (posting count)
    pub sum_doc_freq: u64,
}

impl FieldSummary {
    /// Fold one term's statistics into the summary
    pub fn add_term(&mut self, stats: TermStats) {
        self.sum_total_term_freq += stats.total_term_freq;
        self.sum_doc_freq += stats.doc_freq as u64;
    }
}
