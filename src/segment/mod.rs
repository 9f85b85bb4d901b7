//! Single-segment on-disk inverted index
//!
//! # Layout
//!
//! - `meta.json`: commit point naming the live generation and its fields
//! - `gen_{g}.store`: stored fields, one checksummed record per document
//! - `gen_{g}_f{n}.fst`: FST term dictionary of field `n`
//! - `gen_{g}_f{n}.terms`: posting list metadata parallel to the FST
//! - `gen_{g}_f{n}.postings`: block-encoded postings
//! - `write.lock`: held while a writer is open
//!
//! A writer always targets a fresh generation. Files of older generations are
//! removed only after the new `meta.json` is in place.

mod backend;
mod buffer;
mod lock;
mod meta;
mod postings;
mod reader;
mod statistics;
mod store;
mod term_dict;
mod types;
mod writer;

pub use backend::SegmentBackend;
pub use buffer::{EncodedField, FieldBuffer};
pub use lock::{IndexLock, LOCK_FILE};
pub use meta::{FieldMeta, IndexMeta, GENERATION_FILE_PREFIX, META_FILE};
pub use postings::{PostingIterator, PostingsReader, PostingsWriter};
pub use reader::SegmentReader;
pub use statistics::FieldStatistics;
pub use store::{StoreReader, StoreWriter};
pub use term_dict::{TermDictionary, TermDictionaryBuilder};
pub use types::{DocNo, Posting, PostingBlock, PostingListMeta, BLOCK_SIZE};
pub use writer::SegmentWriter;
