use std::path::Path;

use super::reader::SegmentReader;
use super::writer::SegmentWriter;
use crate::analysis::Analyzer;
use crate::index::{IndexBackend, OpenMode};
use crate::Result;

/// On-disk single-segment index format
#[derive(Clone, Copy, Debug, Default)]
pub struct SegmentBackend;

impl SegmentBackend {
    pub fn new() -> Self {
        Self
    }
}

impl IndexBackend for SegmentBackend {
    type Writer = SegmentWriter;
    type Reader = SegmentReader;

    fn create_writer(&self, path: &Path, analyzer: Analyzer, mode: OpenMode) -> Result<SegmentWriter> {
        SegmentWriter::open(path, analyzer, mode)
    }

    fn open_reader(&self, path: &Path) -> Result<SegmentReader> {
        SegmentReader::open(path)
    }
}
