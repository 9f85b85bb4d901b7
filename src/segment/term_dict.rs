//! Term dictionary using FST (Finite State Transducer)
//!
//! The FST maps each term to its ordinal in a parallel metadata array.

use std::io;

use fst::{Map, MapBuilder, Streamer};

use super::types::PostingListMeta;

/// Term dictionary backed by FST
pub struct TermDictionary {
    fst: Map<Vec<u8>>,
    metadata: Vec<PostingListMeta>,
}

impl TermDictionary {
    /// Create a term dictionary from FST data and metadata
    pub fn new(fst_data: Vec<u8>, metadata: Vec<PostingListMeta>) -> io::Result<Self> {
        let fst = Map::new(fst_data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if fst.len() != metadata.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "term dictionary has {} terms but {} metadata entries",
                    fst.len(),
                    metadata.len()
                ),
            ));
        }
        Ok(Self { fst, metadata })
    }

    /// Look up a term and return its postings metadata
    pub fn get(&self, term: &str) -> Option<&PostingListMeta> {
        self.fst
            .get(term.as_bytes())
            .and_then(|idx| self.metadata.get(idx as usize))
    }

    pub fn contains(&self, term: &str) -> bool {
        self.fst.contains_key(term.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    /// Raw FST bytes (for persistence)
    pub fn fst_bytes(&self) -> &[u8] {
        self.fst.as_fst().as_bytes()
    }

    /// Metadata array (for persistence)
    pub fn metadata(&self) -> &[PostingListMeta] {
        &self.metadata
    }

    /// All terms in byte order with their metadata
    pub fn iter_terms(&self) -> Vec<(String, PostingListMeta)> {
        let mut results = Vec::with_capacity(self.metadata.len());
        let mut stream = self.fst.stream();
        while let Some((key, idx)) = stream.next() {
            if let Some(meta) = self.metadata.get(idx as usize) {
                results.push((String::from_utf8_lossy(key).to_string(), *meta));
            }
        }
        results
    }
}

/// Builder for term dictionaries
pub struct TermDictionaryBuilder {
    terms: Vec<(String, PostingListMeta)>,
}

impl TermDictionaryBuilder {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: Vec::with_capacity(capacity),
        }
    }

    /// Add a term with its postings metadata
    pub fn add(&mut self, term: String, meta: PostingListMeta) {
        self.terms.push((term, meta));
    }

    /// Build the term dictionary
    pub fn build(mut self) -> io::Result<TermDictionary> {
        // FST requires byte-ordered, unique keys
        self.terms.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

        let mut fst_builder = MapBuilder::memory();
        let mut metadata = Vec::with_capacity(self.terms.len());

        for (idx, (term, meta)) in self.terms.into_iter().enumerate() {
            fst_builder
                .insert(term.as_bytes(), idx as u64)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            metadata.push(meta);
        }

        let fst_data = fst_builder
            .into_inner()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        TermDictionary::new(fst_data, metadata)
    }
}

impl Default for TermDictionaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
