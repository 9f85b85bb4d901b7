//! TREC pseudo-XML corpus loading
//!
//! Corpus files hold sibling `<DOC>` elements without a common root. The
//! loader wraps each file in a synthetic `<root>` element and neutralizes
//! ampersands; the parser then extracts one [`ParsedDocument`] per `DOC`.

mod document;
mod loader;
mod parser;

pub use document::ParsedDocument;
pub use loader::{list_corpus_files, load_file_content, parse_file, wrap_content};
pub use parser::{parse_documents, ElementTree, Node, NodeId};
