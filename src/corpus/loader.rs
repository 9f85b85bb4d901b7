use std::fs;
use std::io;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use tracing::debug;

use super::document::ParsedDocument;
use super::parser::parse_documents;
use crate::config::{AmpersandPolicy, CorpusConfig};
use crate::error::TrecdexError;
use crate::Result;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// List the corpus files directly inside `dir` whose name ends with `extension`
///
/// The match is case-insensitive and does not descend into sub-directories.
/// Order follows the directory listing and is not sorted.
pub fn list_corpus_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(TrecdexError::DirectoryNotFound(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TrecdexError::DirectoryNotFound(dir.to_path_buf()),
        _ => TrecdexError::Io(e),
    })?;

    let extension = extension.to_lowercase();
    let mut files = Vec::new();

    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.ends_with(&extension) {
            files.push(normalize_separators(&entry.path()));
        }
    }

    debug!("Found {} corpus files in {}", files.len(), dir.display());
    Ok(files)
}

/// Read a corpus file and prepare it for XML parsing
pub fn load_file_content<P: AsRef<Path>>(path: P, policy: AmpersandPolicy) -> Result<String> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| TrecdexError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(wrap_content(&content, policy))
}

/// Wrap raw corpus text in a synthetic root element and apply the ampersand policy
///
/// The policy runs over the wrapped string, so the declaration and root tags
/// are part of its input; neither contains `&`.
pub fn wrap_content(content: &str, policy: AmpersandPolicy) -> String {
    let wrapped = format!("{}\n <root>\n{}\n</root>", XML_DECLARATION, content);
    policy.apply(&wrapped)
}

/// Load and parse one corpus file
pub fn parse_file<P: AsRef<Path>>(path: P, config: &CorpusConfig) -> Result<Vec<ParsedDocument>> {
    let path = path.as_ref();
    let content = load_file_content(path, config.ampersands)?;
    parse_documents(&content, &config.tags).map_err(|e| e.with_path(path))
}

fn normalize_separators(path: &Path) -> PathBuf {
    if MAIN_SEPARATOR == '/' {
        return path.to_path_buf();
    }
    PathBuf::from(path.to_string_lossy().replace(MAIN_SEPARATOR, "/"))
}
