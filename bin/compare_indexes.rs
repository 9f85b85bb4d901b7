use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::info;
use trecdex::config::{DEFAULT_CORPUS_DIR, DEFAULT_EXTENSION, DEFAULT_REPORT_FIELD};
use trecdex::{build_all, compare, print_comparison, BuildConfig, ComparisonConfig, CorpusConfig};

#[derive(Parser)]
#[command(name = "compare-indexes")]
#[command(about = "Build one index per analyzer and compare their term statistics", long_about = None)]
struct Args {
    /// Directory holding the corpus files
    #[arg(long, env = "TRECDEX_CORPUS", default_value = DEFAULT_CORPUS_DIR)]
    corpus: PathBuf,

    /// File name suffix of corpus files (case-insensitive)
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Directory receiving standard_index/, simple_index/, stop_index/ and keyword_index/
    #[arg(long, env = "TRECDEX_OUTPUT_BASE", default_value = "./")]
    output_base: PathBuf,

    /// Field to report on
    #[arg(long, default_value = DEFAULT_REPORT_FIELD)]
    field: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    info!("trecdex v{}", trecdex::VERSION);

    let corpus = CorpusConfig::new(&args.corpus).with_extension(args.extension);
    let build = BuildConfig::new(&args.corpus, &args.output_base).with_corpus(corpus);
    let config = ComparisonConfig::with_output_base(build, &args.output_base).with_field(args.field);

    build_all(&config).context("failed to build analyzer indexes")?;
    let reports = compare(&config).context("failed to read analyzer indexes")?;

    let stdout = io::stdout();
    print_comparison(&mut stdout.lock(), &reports).context("failed to write report")?;

    Ok(())
}
