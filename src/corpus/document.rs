use serde::{Deserialize, Serialize};

/// Field values extracted from one `DOC` element
///
/// Each value is the space-terminated concatenation of every matching
/// element's text, or the empty string when the tag is absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub docno: String,
    pub head: String,
    pub byline: String,
    pub dateline: String,
    pub text: String,
}

impl ParsedDocument {
    /// Document number with the trailing separator and surrounding whitespace removed
    pub fn docno_trimmed(&self) -> &str {
        self.docno.trim()
    }
}
