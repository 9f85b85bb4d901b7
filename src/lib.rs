pub mod analysis;
pub mod builder;
pub mod comparison;
pub mod config;
pub mod corpus;
pub mod error;
pub mod index;
pub mod inspector;
pub mod segment;

pub use analysis::{Analyzer, AnalyzerKind, StopWordSet};
pub use builder::{build_index, build_index_with, BuildReport};
pub use comparison::{build_all, compare, print_comparison};
pub use config::{AmpersandPolicy, BuildConfig, ComparisonConfig, CorpusConfig, HeaderSource, TagNames};
pub use corpus::ParsedDocument;
pub use error::{Result, TrecdexError};
pub use index::{IndexBackend, IndexDocument, IndexField, IndexReader, IndexWriter, OpenMode};
pub use inspector::{report_statistics, report_statistics_with, IndexReport};
pub use segment::SegmentBackend;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
