use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fs;
use tempfile::TempDir;

use trecdex::config::{AmpersandPolicy, BuildConfig, TagNames};
use trecdex::corpus::{parse_documents, wrap_content};
use trecdex::{build_index, Analyzer, AnalyzerKind};

fn make_corpus(doc_count: usize) -> String {
    let mut raw = String::new();
    for i in 0..doc_count {
        raw.push_str(&format!(
            "<DOC>\n<DOCNO> FT{:06} </DOCNO>\n<HEAD>Headline {}</HEAD>\n<TEXT>\n\
             Shares in company {} rose & bonds fell as the market digested news {}.\n\
             </TEXT>\n</DOC>\n",
            i,
            i,
            i % 97,
            i
        ));
    }
    raw
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_documents");
    let tags = TagNames::default();

    for doc_count in [100usize, 1_000] {
        let wrapped = wrap_content(&make_corpus(doc_count), AmpersandPolicy::ReplaceWithAnd);
        group.bench_with_input(BenchmarkId::from_parameter(doc_count), &wrapped, |b, xml| {
            b.iter(|| parse_documents(black_box(xml), &tags).unwrap())
        });
    }

    group.finish();
}

fn bench_analyzers(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let text = make_corpus(50);

    for kind in AnalyzerKind::BUILD_ORDER {
        let analyzer = Analyzer::new(kind);
        group.bench_with_input(BenchmarkId::from_parameter(kind), &text, |b, text| {
            b.iter(|| analyzer.term_frequencies(black_box(text)))
        });
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let corpus = TempDir::new().unwrap();
    fs::write(corpus.path().join("bench.trectext"), make_corpus(500)).unwrap();
    let index = TempDir::new().unwrap();
    let config = BuildConfig::new(corpus.path(), index.path());

    c.bench_function("build_index_500_docs", |b| {
        b.iter(|| build_index(&config, AnalyzerKind::Standard).unwrap())
    });
}

criterion_group!(benches, bench_parse, bench_analyzers, bench_build);
criterion_main!(benches);
