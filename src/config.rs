use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analysis::AnalyzerKind;

/// Default corpus directory
pub const DEFAULT_CORPUS_DIR: &str = "./corpus/";
/// Default corpus file extension
pub const DEFAULT_EXTENSION: &str = ".trectext";
/// Default output directory for the single-index build
pub const DEFAULT_INDEX_DIR: &str = "./index/";
/// Field inspected by the statistics report
pub const DEFAULT_REPORT_FIELD: &str = "TEXT";

/// Tag names used in the corpus
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagNames {
    pub doc: String,
    pub docno: String,
    pub head: String,
    pub byline: String,
    pub dateline: String,
    pub text: String,
}

impl Default for TagNames {
    fn default() -> Self {
        Self {
            doc: "DOC".to_string(),
            docno: "DOCNO".to_string(),
            head: "HEAD".to_string(),
            byline: "BYLINE".to_string(),
            dateline: "DATELINE".to_string(),
            text: "TEXT".to_string(),
        }
    }
}

/// How literal `&` characters are made safe for the XML parser
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmpersandPolicy {
    /// Replace every `&` with the word `and` (lossy: `A&B` becomes `AandB`)
    #[default]
    ReplaceWithAnd,
    /// Escape every `&` as `&amp;` so the parsed text keeps the literal `&`
    EscapeEntity,
}

impl AmpersandPolicy {
    /// Apply the policy to the whole wrapped file content
    pub fn apply(&self, content: &str) -> String {
        match self {
            AmpersandPolicy::ReplaceWithAnd => content.replace('&', "and"),
            AmpersandPolicy::EscapeEntity => content.replace('&', "&amp;"),
        }
    }
}

/// Where the HEAD, BYLINE and DATELINE index fields take their values from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderSource {
    /// Copy the TEXT extraction into all three fields (historical behavior)
    #[default]
    Text,
    /// Use each field's own parsed value
    Parsed,
}

/// Corpus discovery and parsing configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub corpus_dir: PathBuf,
    pub extension: String,
    pub ampersands: AmpersandPolicy,
    pub tags: TagNames,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from(DEFAULT_CORPUS_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            ampersands: AmpersandPolicy::default(),
            tags: TagNames::default(),
        }
    }
}

impl CorpusConfig {
    pub fn new<P: AsRef<Path>>(corpus_dir: P) -> Self {
        Self {
            corpus_dir: corpus_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Set the file extension used to select corpus files
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set the ampersand policy
    pub fn with_ampersands(mut self, policy: AmpersandPolicy) -> Self {
        self.ampersands = policy;
        self
    }
}

/// Configuration for building one index
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildConfig {
    pub corpus: CorpusConfig,
    pub index_dir: PathBuf,
    pub header_source: HeaderSource,
    /// Emit every parsed document at debug level
    pub log_documents: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            corpus: CorpusConfig::default(),
            index_dir: PathBuf::from(DEFAULT_INDEX_DIR),
            header_source: HeaderSource::default(),
            log_documents: false,
        }
    }
}

impl BuildConfig {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(corpus_dir: P, index_dir: Q) -> Self {
        Self {
            corpus: CorpusConfig::new(corpus_dir),
            index_dir: index_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn with_corpus(mut self, corpus: CorpusConfig) -> Self {
        self.corpus = corpus;
        self
    }

    pub fn with_header_source(mut self, source: HeaderSource) -> Self {
        self.header_source = source;
        self
    }

    pub fn with_document_logging(mut self, enabled: bool) -> Self {
        self.log_documents = enabled;
        self
    }

    /// Same configuration pointed at a different output directory
    pub fn for_output<P: AsRef<Path>>(&self, index_dir: P) -> Self {
        Self {
            index_dir: index_dir.as_ref().to_path_buf(),
            ..self.clone()
        }
    }
}

/// Configuration for the analyzer comparison run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComparisonConfig {
    pub build: BuildConfig,
    /// One output directory per analyzer, in build order
    pub outputs: Vec<(AnalyzerKind, PathBuf)>,
    pub field: String,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self::with_output_base(BuildConfig::default(), "./")
    }
}

impl ComparisonConfig {
    /// Place one `<analyzer>_index/` directory per analyzer under `base`
    pub fn with_output_base<P: AsRef<Path>>(build: BuildConfig, base: P) -> Self {
        let base = base.as_ref();
        let outputs = AnalyzerKind::BUILD_ORDER
            .iter()
            .map(|kind| (*kind, base.join(format!("{}_index", kind.name()))))
            .collect();
        Self {
            build,
            outputs,
            field: DEFAULT_REPORT_FIELD.to_string(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Output directory configured for an analyzer
    pub fn output_for(&self, kind: AnalyzerKind) -> Option<&Path> {
        self.outputs
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, path)| path.as_path())
    }
}
