//! Postings format with block-based compression
//!
//! A posting list is a vbyte block count followed by its blocks. Each block
//! holds a vbyte posting count, bitpacked docno deltas (the first delta is
//! the absolute docno) and bitpacked term frequencies.

use std::io;

use super::types::{DocNo, Posting, PostingBlock, PostingListMeta, BLOCK_SIZE};

/// Variable-byte encoding for integers
pub fn encode_vbyte(value: u32, output: &mut Vec<u8>) {
    let mut v = value;
    loop {
        let byte = (v & 0x7F) as u8;
        v >>= 7;
        if v == 0 {
            output.push(byte | 0x80); // high bit marks the last byte
            break;
        } else {
            output.push(byte);
        }
    }
}

/// Decode a variable-byte encoded integer
pub fn decode_vbyte(input: &[u8], pos: &mut usize) -> io::Result<u32> {
    let mut result: u32 = 0;
    let mut shift = 0;

    loop {
        if *pos >= input.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Unexpected end of vbyte",
            ));
        }

        let byte = input[*pos];
        *pos += 1;

        result |= ((byte & 0x7F) as u32) << shift;

        if byte & 0x80 != 0 {
            return Ok(result);
        }

        shift += 7;
        if shift > 28 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "VByte value too large",
            ));
        }
    }
}

/// Bitpack a block of integers using the width of the largest value
pub fn bitpack_encode(values: &[u32], output: &mut Vec<u8>) {
    let max_val = match values.iter().max() {
        Some(&max) => max,
        None => {
            output.push(0);
            return;
        }
    };

    let bits_needed = if max_val == 0 {
        1
    } else {
        32 - max_val.leading_zeros()
    } as u8;

    output.push(bits_needed);

    let mut current: u64 = 0;
    let mut bits_in_current = 0;

    for &value in values {
        current |= (value as u64) << bits_in_current;
        bits_in_current += bits_needed as u32;

        while bits_in_current >= 8 {
            output.push(current as u8);
            current >>= 8;
            bits_in_current -= 8;
        }
    }

    if bits_in_current > 0 {
        output.push(current as u8);
    }
}

/// Decode bitpacked integers
pub fn bitpack_decode(input: &[u8], pos: &mut usize, count: usize) -> io::Result<Vec<u32>> {
    if *pos >= input.len() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Unexpected end of bitpack",
        ));
    }

    let bits_needed = input[*pos] as u32;
    *pos += 1;

    if bits_needed > 32 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid bitpack width {}", bits_needed),
        ));
    }

    if bits_needed == 0 {
        return Ok(vec![0; count]);
    }

    let total_bits = count as u64 * bits_needed as u64;
    let bytes_needed = total_bits.div_ceil(8) as usize;

    if *pos + bytes_needed > input.len() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Not enough bytes for bitpack",
        ));
    }

    let mut values = Vec::with_capacity(count);
    let mut current: u64 = 0;
    let mut bits_available = 0;
    let mask = (1u64 << bits_needed) - 1;

    for _ in 0..count {
        while bits_available < bits_needed {
            current |= (input[*pos] as u64) << bits_available;
            *pos += 1;
            bits_available += 8;
        }

        values.push((current & mask) as u32);
        current >>= bits_needed;
        bits_available -= bits_needed;
    }

    Ok(values)
}

/// Writer for the posting lists of one field
pub struct PostingsWriter {
    block_data: Vec<u8>,
    block_count: u32,
    current_block: PostingBlock,
    data: Vec<u8>,
}

impl PostingsWriter {
    pub fn new() -> Self {
        Self {
            block_data: Vec::new(),
            block_count: 0,
            current_block: PostingBlock::new(),
            data: Vec::new(),
        }
    }

    /// Start writing a new posting list
    pub fn start_posting_list(&mut self) {
        self.block_data.clear();
        self.block_count = 0;
        self.current_block = PostingBlock::new();
    }

    /// Add a posting to the current list; docnos must be increasing
    pub fn add_posting(&mut self, posting: Posting) {
        self.current_block.push(posting);

        if self.current_block.is_full() {
            self.flush_block();
        }
    }

    /// Finish writing a posting list and return its metadata
    pub fn finish_posting_list(&mut self, doc_frequency: u32, total_term_frequency: u64) -> PostingListMeta {
        self.flush_block();

        let offset = self.data.len() as u64;
        encode_vbyte(self.block_count, &mut self.data);
        self.data.extend_from_slice(&self.block_data);
        let length = self.data.len() as u64 - offset;

        PostingListMeta {
            offset,
            length,
            doc_frequency,
            total_term_frequency,
        }
    }

    /// Take the data (consuming the writer)
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    fn flush_block(&mut self) {
        if self.current_block.is_empty() {
            return;
        }

        encode_vbyte(self.current_block.len() as u32, &mut self.block_data);

        let mut deltas = Vec::with_capacity(self.current_block.len());
        let mut prev = 0u32;
        for docno in &self.current_block.docnos {
            deltas.push(docno.0 - prev);
            prev = docno.0;
        }
        bitpack_encode(&deltas, &mut self.block_data);
        bitpack_encode(&self.current_block.term_frequencies, &mut self.block_data);

        self.block_count += 1;
        self.current_block = PostingBlock::new();
    }
}

impl Default for PostingsWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reader for the posting lists of one field
pub struct PostingsReader {
    data: Vec<u8>,
}

impl PostingsReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Decode the posting list described by `meta`
    pub fn get_postings(&self, meta: &PostingListMeta) -> io::Result<PostingIterator<'_>> {
        let start = meta.offset as usize;
        let end = (meta.offset + meta.length) as usize;

        if end > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Posting list extends beyond data",
            ));
        }

        PostingIterator::new(&self.data[start..end])
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Iterator over `(docno, term_frequency)` pairs of one posting list
///
/// A decode failure is yielded once as an error and ends the iteration.
pub struct PostingIterator<'a> {
    data: &'a [u8],
    pos: usize,
    blocks_left: u32,
    current_block: Vec<(DocNo, u32)>,
    block_pos: usize,
}

impl<'a> PostingIterator<'a> {
    pub fn new(data: &'a [u8]) -> io::Result<Self> {
        let mut pos = 0;
        let blocks_left = decode_vbyte(data, &mut pos)?;

        Ok(Self {
            data,
            pos,
            blocks_left,
            current_block: Vec::new(),
            block_pos: 0,
        })
    }

    fn load_next_block(&mut self) -> io::Result<bool> {
        if self.blocks_left == 0 {
            return Ok(false);
        }

        let count = decode_vbyte(self.data, &mut self.pos)? as usize;
        if count == 0 || count > BLOCK_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid block size {}", count),
            ));
        }
        let deltas = bitpack_decode(self.data, &mut self.pos, count)?;
        let tfs = bitpack_decode(self.data, &mut self.pos, count)?;

        self.current_block.clear();
        let mut docno = 0u32;
        for (delta, tf) in deltas.into_iter().zip(tfs) {
            docno = docno.checked_add(delta).ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, "Docno delta overflow")
            })?;
            self.current_block.push((DocNo(docno), tf));
        }

        self.block_pos = 0;
        self.blocks_left -= 1;
        Ok(true)
    }
}

impl<'a> Iterator for PostingIterator<'a> {
    type Item = io::Result<(DocNo, u32)>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.block_pos >= self.current_block.len() {
            match self.load_next_block() {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => {
                    self.blocks_left = 0;
                    self.current_block.clear();
                    self.block_pos = 0;
                    return Some(Err(e));
                }
            }
        }

        let result = self.current_block[self.block_pos];
        self.block_pos += 1;
        Some(Ok(result))
    }
}
