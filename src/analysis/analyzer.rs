use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use stop_words::{get, LANGUAGE};
use unicode_segmentation::UnicodeSegmentation;

/// Tokens longer than this are split into pieces by the standard analyzer
pub const MAX_TOKEN_LENGTH: usize = 255;

/// The classic English stop set used by stop-filtering analyzers
pub const CLASSIC_ENGLISH_STOP_WORDS: [&str; 33] = [
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Tokenization strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    /// Unicode word segmentation, lowercased
    Standard,
    /// Runs of letters, lowercased
    Simple,
    /// Simple analysis followed by stop word removal
    Stop,
    /// Whole field value as one term
    Keyword,
}

impl AnalyzerKind {
    /// Order in which the comparison builds its indexes
    pub const BUILD_ORDER: [AnalyzerKind; 4] = [
        AnalyzerKind::Standard,
        AnalyzerKind::Simple,
        AnalyzerKind::Stop,
        AnalyzerKind::Keyword,
    ];

    /// Order in which the comparison prints its reports
    pub const REPORT_ORDER: [AnalyzerKind; 4] = [
        AnalyzerKind::Standard,
        AnalyzerKind::Simple,
        AnalyzerKind::Keyword,
        AnalyzerKind::Stop,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AnalyzerKind::Standard => "standard",
            AnalyzerKind::Simple => "simple",
            AnalyzerKind::Stop => "stop",
            AnalyzerKind::Keyword => "keyword",
        }
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnalyzerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(AnalyzerKind::Standard),
            "simple" => Ok(AnalyzerKind::Simple),
            "stop" => Ok(AnalyzerKind::Stop),
            "keyword" => Ok(AnalyzerKind::Keyword),
            other => Err(format!(
                "unknown analyzer '{}', expected one of standard, simple, stop, keyword",
                other
            )),
        }
    }
}

/// Stop list used by the stop analyzer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopWordSet {
    /// The 33-word classic English set
    #[default]
    Classic,
    /// The larger English list shipped by the `stop-words` crate
    Extended,
}

impl StopWordSet {
    fn load(&self) -> HashSet<String> {
        match self {
            StopWordSet::Classic => CLASSIC_ENGLISH_STOP_WORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            StopWordSet::Extended => get(LANGUAGE::English)
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect(),
        }
    }
}

/// Text analyzer producing index terms for one strategy
#[derive(Clone, Debug)]
pub struct Analyzer {
    kind: AnalyzerKind,
    stopwords: HashSet<String>,
}

impl Analyzer {
    /// Create an analyzer with the classic stop set
    pub fn new(kind: AnalyzerKind) -> Self {
        Self::with_stop_words(kind, StopWordSet::Classic)
    }

    /// Create an analyzer with an explicit stop set (only used by `Stop`)
    pub fn with_stop_words(kind: AnalyzerKind, set: StopWordSet) -> Self {
        let stopwords = if kind == AnalyzerKind::Stop {
            set.load()
        } else {
            HashSet::new()
        };

        Self { kind, stopwords }
    }

    pub fn kind(&self) -> AnalyzerKind {
        self.kind
    }

    /// Tokenize text into a vector of terms
    pub fn analyze(&self, text: &str) -> Vec<String> {
        match self.kind {
            AnalyzerKind::Standard => text
                .unicode_words()
                .flat_map(|word| split_long_token(&word.to_lowercase()))
                .collect(),
            AnalyzerKind::Simple => letter_runs(text).collect(),
            AnalyzerKind::Stop => letter_runs(text)
                .filter(|token| !self.stopwords.contains(token))
                .collect(),
            AnalyzerKind::Keyword => vec![text.to_string()],
        }
    }

    /// Compute term frequencies for an analyzed field value
    pub fn term_frequencies(&self, text: &str) -> HashMap<String, u32> {
        let mut freq = HashMap::new();
        for token in self.analyze(text) {
            *freq.entry(token).or_insert(0) += 1;
        }
        freq
    }
}

/// Cut a token into pieces of at most `MAX_TOKEN_LENGTH` characters
fn split_long_token(token: &str) -> Vec<String> {
    if token.chars().count() <= MAX_TOKEN_LENGTH {
        return vec![token.to_string()];
    }
    let chars: Vec<char> = token.chars().collect();
    chars
        .chunks(MAX_TOKEN_LENGTH)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Maximal runs of alphabetic characters, lowercased
fn letter_runs(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|run| !run.is_empty())
        .map(|run| run.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_analysis() {
        let analyzer = Analyzer::new(AnalyzerKind::Standard);
        let tokens = analyzer.analyze("Hello World! It's 1990, the U.S. economy.");

        assert!(tokens.contains(&"hello".to_string()));
        assert!(tokens.contains(&"world".to_string()));
        assert!(tokens.contains(&"1990".to_string()));
        assert!(tokens.contains(&"the".to_string()));
        assert!(!tokens.iter().any(|t| t.contains(' ')));
    }

    #[test]
    fn test_simple_analysis_splits_on_non_letters() {
        let analyzer = Analyzer::new(AnalyzerKind::Simple);
        let tokens = analyzer.analyze("AT&T's 3rd-quarter");

        assert_eq!(tokens, vec!["at", "t", "s", "rd", "quarter"]);
    }

    #[test]
    fn test_stop_analysis() {
        let analyzer = Analyzer::new(AnalyzerKind::Stop);
        let tokens = analyzer.analyze("This is a document about the system");

        assert_eq!(tokens, vec!["document", "about", "system"]);
    }

    #[test]
    fn test_extended_stop_words_remove_more() {
        let classic = Analyzer::new(AnalyzerKind::Stop);
        let extended = Analyzer::with_stop_words(AnalyzerKind::Stop, StopWordSet::Extended);
        let text = "a document about the system";

        assert!(extended.analyze(text).len() <= classic.analyze(text).len());
        assert!(!extended.analyze(text).contains(&"the".to_string()));
    }

    #[test]
    fn test_keyword_analysis() {
        let analyzer = Analyzer::new(AnalyzerKind::Keyword);

        assert_eq!(
            analyzer.analyze("cat and dog cat "),
            vec!["cat and dog cat ".to_string()]
        );
        assert_eq!(analyzer.analyze(""), vec![String::new()]);
    }

    #[test]
    fn test_term_frequencies() {
        let analyzer = Analyzer::new(AnalyzerKind::Standard);
        let freq = analyzer.term_frequencies("cat and dog cat ");

        assert_eq!(freq.len(), 3);
        assert_eq!(freq.get("cat"), Some(&2));
        assert_eq!(freq.get("and"), Some(&1));
        assert_eq!(freq.get("dog"), Some(&1));
    }

    #[test]
    fn test_overlong_standard_tokens_split() {
        let analyzer = Analyzer::new(AnalyzerKind::Standard);
        let long = "X".repeat(MAX_TOKEN_LENGTH * 2 + 3);
        let tokens = analyzer.analyze(&format!("short {}", long));

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0], "short");
        assert_eq!(tokens[1], "x".repeat(MAX_TOKEN_LENGTH));
        assert_eq!(tokens[2], "x".repeat(MAX_TOKEN_LENGTH));
        assert_eq!(tokens[3], "xxx");
    }

    #[test]
    fn test_kind_parsing_and_order() {
        assert_eq!("Keyword".parse::<AnalyzerKind>(), Ok(AnalyzerKind::Keyword));
        assert!("porter".parse::<AnalyzerKind>().is_err());
        assert_eq!(AnalyzerKind::BUILD_ORDER[2], AnalyzerKind::Stop);
        assert_eq!(AnalyzerKind::REPORT_ORDER[2], AnalyzerKind::Keyword);
        assert_eq!(AnalyzerKind::Simple.to_string(), "simple");
    }
}
