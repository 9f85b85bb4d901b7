//! Corpus to index pipeline
//!
//! Every corpus file is parsed before the writer is opened, so a malformed
//! file aborts the build without touching the index directory.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::{Analyzer, AnalyzerKind};
use crate::config::{BuildConfig, CorpusConfig, HeaderSource, TagNames};
use crate::corpus::{list_corpus_files, parse_file, ParsedDocument};
use crate::index::{IndexBackend, IndexDocument, IndexField, IndexWriter, OpenMode};
use crate::segment::SegmentBackend;
use crate::Result;

/// Outcome of a successful build
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Corpus files read
    pub files: usize,
    /// Documents added to the index
    pub documents: usize,
    pub index_dir: PathBuf,
    pub analyzer: AnalyzerKind,
}

/// Build an index with the bundled segment backend
pub fn build_index(config: &BuildConfig, analyzer: AnalyzerKind) -> Result<BuildReport> {
    build_index_with(&SegmentBackend::new(), config, analyzer)
}

/// Build an index at `config.index_dir`, replacing any index already there
pub fn build_index_with<B: IndexBackend>(
    backend: &B,
    config: &BuildConfig,
    analyzer: AnalyzerKind,
) -> Result<BuildReport> {
    let (files, documents) = load_corpus(&config.corpus)?;
    info!("Number of files: {}", files);

    if config.log_documents {
        for doc in &documents {
            log_document(doc, &config.corpus.tags);
        }
    }

    let mut writer = backend.create_writer(&config.index_dir, Analyzer::new(analyzer), OpenMode::Create)?;
    for doc in &documents {
        writer.add_document(&to_index_document(doc, &config.corpus.tags, config.header_source))?;
    }
    let commit = writer.commit()?;

    info!("Number of documents: {}", commit.doc_count);

    Ok(BuildReport {
        files,
        documents: commit.doc_count as usize,
        index_dir: config.index_dir.clone(),
        analyzer,
    })
}

/// Parse every corpus file, returning the file count and all documents in file order
pub fn load_corpus(config: &CorpusConfig) -> Result<(usize, Vec<ParsedDocument>)> {
    let files = list_corpus_files(&config.corpus_dir, &config.extension)?;

    let mut documents = Vec::new();
    for file in &files {
        let parsed = parse_file(file, config)?;
        debug!("{}: {} documents", file.display(), parsed.len());
        documents.extend(parsed);
    }

    Ok((files.len(), documents))
}

/// Map a parsed document onto index fields
///
/// DOCNO, HEAD, BYLINE and DATELINE are keyword fields and TEXT is analyzed.
/// With [`HeaderSource::Text`] the three header fields carry the TEXT value
/// rather than their own.
pub fn to_index_document(doc: &ParsedDocument, tags: &TagNames, header_source: HeaderSource) -> IndexDocument {
    let (head, byline, dateline) = match header_source {
        HeaderSource::Text => (&doc.text, &doc.text, &doc.text),
        HeaderSource::Parsed => (&doc.head, &doc.byline, &doc.dateline),
    };

    IndexDocument::new()
        .with_field(IndexField::keyword(&tags.docno, &doc.docno))
        .with_field(IndexField::keyword(&tags.head, head))
        .with_field(IndexField::keyword(&tags.byline, byline))
        .with_field(IndexField::keyword(&tags.dateline, dateline))
        .with_field(IndexField::text(&tags.text, &doc.text))
}

fn log_document(doc: &ParsedDocument, tags: &TagNames) {
    debug!("{} = {}", tags.docno, doc.docno);
    debug!("{} = {}", tags.head, doc.head);
    debug!("{} = {}", tags.byline, doc.byline);
    debug!("{} = {}", tags.dateline, doc.dateline);
    debug!("{} = {}", tags.text, doc.text);
}
