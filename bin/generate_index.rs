use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use trecdex::config::{DEFAULT_CORPUS_DIR, DEFAULT_EXTENSION, DEFAULT_INDEX_DIR};
use trecdex::{build_index, AmpersandPolicy, AnalyzerKind, BuildConfig, CorpusConfig, HeaderSource};

#[derive(Parser)]
#[command(name = "generate-index")]
#[command(about = "Index a TREC corpus directory", long_about = None)]
struct Args {
    /// Directory holding the corpus files
    #[arg(long, env = "TRECDEX_CORPUS", default_value = DEFAULT_CORPUS_DIR)]
    corpus: PathBuf,

    /// File name suffix of corpus files (case-insensitive)
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Output index directory; an existing index there is replaced
    #[arg(long, env = "TRECDEX_INDEX", default_value = DEFAULT_INDEX_DIR)]
    index: PathBuf,

    /// Analyzer for the TEXT field (standard, simple, stop, keyword)
    #[arg(long, default_value = "standard")]
    analyzer: AnalyzerKind,

    /// Where HEAD, BYLINE and DATELINE take their values from (text, parsed)
    #[arg(long, default_value = "text")]
    header_source: String,

    /// Keep literal ampersands instead of replacing them with "and"
    #[arg(long)]
    escape_ampersands: bool,

    /// Log every parsed document at debug level
    #[arg(long)]
    log_documents: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.log_documents {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("trecdex v{}", trecdex::VERSION);

    let header_source = match args.header_source.to_lowercase().as_str() {
        "text" => HeaderSource::Text,
        "parsed" => HeaderSource::Parsed,
        _ => {
            warn!("Unknown header source '{}', using 'text'", args.header_source);
            HeaderSource::Text
        }
    };

    let ampersands = if args.escape_ampersands {
        AmpersandPolicy::EscapeEntity
    } else {
        AmpersandPolicy::ReplaceWithAnd
    };

    let corpus = CorpusConfig::new(&args.corpus)
        .with_extension(args.extension)
        .with_ampersands(ampersands);
    let config = BuildConfig::new(&args.corpus, &args.index)
        .with_corpus(corpus)
        .with_header_source(header_source)
        .with_document_logging(args.log_documents);

    let report = build_index(&config, args.analyzer)
        .with_context(|| format!("failed to build index at {}", args.index.display()))?;

    info!(
        "Indexed {} documents from {} files into {}",
        report.documents,
        report.files,
        report.index_dir.display()
    );

    Ok(())
}
