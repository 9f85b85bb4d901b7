//! In-memory postings buffer for one field
//!
//! Documents are added in docno order, so each term's posting list is
//! already sorted when the writer encodes it.

use std::collections::HashMap;
use std::io;

use super::postings::PostingsWriter;
use super::statistics::FieldStatistics;
use super::term_dict::{TermDictionary, TermDictionaryBuilder};
use super::types::{DocNo, Posting};
use crate::index::FieldKind;

/// Encoded form of a field, ready to be persisted
pub struct EncodedField {
    pub terms: TermDictionary,
    pub postings_data: Vec<u8>,
    pub stats: FieldStatistics,
}

/// Buffered postings for a single field
#[derive(Debug)]
pub struct FieldBuffer {
    kind: FieldKind,
    terms: HashMap<String, Vec<Posting>>,
    stats: FieldStatistics,
}

impl FieldBuffer {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            terms: HashMap::new(),
            stats: FieldStatistics::new(),
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Index one document's term frequencies for this field
    pub fn index_document(&mut self, docno: DocNo, term_frequencies: HashMap<String, u32>) {
        let field_len: u32 = term_frequencies.values().sum();
        self.stats.add_document(field_len);

        for (term, tf) in term_frequencies {
            self.terms.entry(term).or_default().push(Posting::new(docno, tf));
        }
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn get_postings(&self, term: &str) -> Option<&[Posting]> {
        self.terms.get(term).map(|p| p.as_slice())
    }

    /// Encode postings and build the term dictionary
    pub fn encode(self) -> io::Result<EncodedField> {
        let mut terms: Vec<_> = self.terms.into_iter().collect();
        terms.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

        let mut postings_writer = PostingsWriter::new();
        let mut term_builder = TermDictionaryBuilder::with_capacity(terms.len());

        for (term, postings) in terms {
            postings_writer.start_posting_list();

            let mut total_term_frequency = 0u64;
            for posting in &postings {
                postings_writer.add_posting(*posting);
                total_term_frequency += posting.term_frequency as u64;
            }

            let meta =
                postings_writer.finish_posting_list(postings.len() as u32, total_term_frequency);
            term_builder.add(term, meta);
        }

        Ok(EncodedField {
            terms: term_builder.build()?,
            postings_data: postings_writer.into_data(),
            stats: self.stats,
        })
    }
}
