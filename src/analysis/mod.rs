//! Text analysis for indexed fields
//!
//! Four tokenization strategies are compared by the sweep: standard, simple,
//! stop and keyword. Each turns a field value into the terms stored in the
//! term dictionary.

mod analyzer;

pub use analyzer::{Analyzer, AnalyzerKind, StopWordSet, CLASSIC_ENGLISH_STOP_WORDS, MAX_TOKEN_LENGTH};
