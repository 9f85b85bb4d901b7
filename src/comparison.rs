//! Analyzer sweep: one index per analyzer, then a side-by-side report

use std::io::{self, Write};

use tracing::info;

use crate::analysis::AnalyzerKind;
use crate::builder::{build_index_with, BuildReport};
use crate::config::ComparisonConfig;
use crate::error::TrecdexError;
use crate::index::IndexBackend;
use crate::inspector::{report_statistics_with, IndexReport};
use crate::segment::SegmentBackend;
use crate::Result;

const BANNER_RULE: &str = "--------------------------------";

/// Build every configured index, in the configured order
pub fn build_all(config: &ComparisonConfig) -> Result<Vec<BuildReport>> {
    build_all_with(&SegmentBackend::new(), config)
}

pub fn build_all_with<B: IndexBackend>(backend: &B, config: &ComparisonConfig) -> Result<Vec<BuildReport>> {
    let mut reports = Vec::with_capacity(config.outputs.len());
    for (kind, index_dir) in &config.outputs {
        info!("Building {} index at {}", kind, index_dir.display());
        let build = config.build.for_output(index_dir);
        reports.push(build_index_with(backend, &build, *kind)?);
    }
    Ok(reports)
}

/// Inspect the configured indexes in report order: standard, simple, keyword, stop
pub fn compare(config: &ComparisonConfig) -> Result<Vec<(AnalyzerKind, IndexReport)>> {
    compare_with(&SegmentBackend::new(), config)
}

pub fn compare_with<B: IndexBackend>(
    backend: &B,
    config: &ComparisonConfig,
) -> Result<Vec<(AnalyzerKind, IndexReport)>> {
    if config.outputs.is_empty() {
        return Err(TrecdexError::InvalidRequest(
            "no analyzer outputs configured".to_string(),
        ));
    }

    let mut reports = Vec::with_capacity(config.outputs.len());
    for kind in AnalyzerKind::REPORT_ORDER {
        let Some(index_dir) = config.output_for(kind) else {
            continue;
        };
        let report = report_statistics_with(backend, index_dir, &config.field)?;
        reports.push((kind, report));
    }
    Ok(reports)
}

/// Write each report under a framed `<NAME> ANALYZER` banner
pub fn print_comparison<W: Write>(out: &mut W, reports: &[(AnalyzerKind, IndexReport)]) -> io::Result<()> {
    for (kind, report) in reports {
        writeln!(out, "{}", BANNER_RULE)?;
        writeln!(out, "{} ANALYZER", kind.name().to_uppercase())?;
        writeln!(out, "{}", BANNER_RULE)?;
        writeln!(out, "{}", report)?;
        writeln!(out)?;
    }
    Ok(())
}
