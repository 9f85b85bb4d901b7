//! Core types for the segment index

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense document number within the segment (0..max_doc)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocNo(pub u32);

impl DocNo {
    pub fn new(n: u32) -> Self {
        Self(n)
    }

}

impl fmt::Display for DocNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc_{}", self.0)
    }
}

/// A single posting entry within a posting list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub docno: DocNo,
    pub term_frequency: u32,
}

impl Posting {
    pub fn new(docno: DocNo, term_frequency: u32) -> Self {
        Self {
            docno,
            term_frequency,
        }
    }
}

/// Postings per encoded block
pub const BLOCK_SIZE: usize = 128;

/// A block of postings, delta-encoded against the block's first docno
#[derive(Clone, Debug, Default)]
pub struct PostingBlock {
    pub docnos: Vec<DocNo>,
    pub term_frequencies: Vec<u32>,
}

impl PostingBlock {
    pub fn new() -> Self {
        Self {
            docnos: Vec::with_capacity(BLOCK_SIZE),
            term_frequencies: Vec::with_capacity(BLOCK_SIZE),
        }
    }

    pub fn is_full(&self) -> bool {
        self.docnos.len() >= BLOCK_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.docnos.is_empty()
    }

    pub fn len(&self) -> usize {
        self.docnos.len()
    }

    pub fn push(&mut self, posting: Posting) {
        self.docnos.push(posting.docno);
        self.term_frequencies.push(posting.term_frequency);
    }
}

/// Posting list metadata stored alongside the term dictionary
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingListMeta {
    /// Offset in the field's postings file
    pub offset: u64,
    /// Length in bytes
    pub length: u64,
    /// Number of documents containing this term
    pub doc_frequency: u32,
    /// Total term frequency across all documents
    pub total_term_frequency: u64,
}
