use std::io::{self, Write};

use log::debug;

use crate::bitstream::bitwriter::BitWriter;
use crate::bwt_algorithms::bwt_sort::bwt_encode;
use crate::huffman_coding::huffman;
use crate::tools::crc::Crc32;

/// First half of the block magic, "pi".
const BLOCK_HEADER_MARKER_1: u32 = 0x31_4159;
/// Second half of the block magic.
const BLOCK_HEADER_MARKER_2: u32 = 0x26_5359;

/// Compresses a single block of a bzip2 stream.
///
/// Bytes go through the RLE1 accumulator into the block buffer until the
/// buffer refuses them; the caller then calls [`close`](Self::close) to run
/// the BWT and Huffman stages and emit the block, and starts a fresh
/// compressor for the next block. A compressor is spent after close.
pub struct BlockCompressor {
    crc: Crc32,
    /// RLE1 output for this block, plus slack for the final runs and the
    /// wrap byte (see `new`).
    block: Vec<u8>,
    block_length: usize,
    /// Beyond this no new data is accepted, leaving room for the worst-case
    /// emission of the run in flight plus the wrap byte.
    block_length_limit: usize,
    /// For each index, whether that byte value occurs in the block data.
    present: [bool; 256],
    bwt: Vec<u32>,
    rle_current: Option<u8>,
    rle_length: usize,
    closed: bool,
}

impl BlockCompressor {
    /// `block_size` is the declared block size in bytes, 100_000 x level.
    pub fn new(block_size: usize) -> Self {
        assert!(block_size > 5, "block size leaves no room for data");
        Self {
            crc: Crc32::new(),
            // Two spare slots past the declared size: the last accepted byte
            // can emit a five byte run, close may still flush a one byte
            // tail run, and the wrap byte follows.
            block: vec![0; block_size + 2],
            block_length: 0,
            block_length_limit: block_size - 5,
            present: [false; 256],
            bwt: vec![0; block_size + 2],
            rle_current: None,
            rle_length: 0,
            closed: false,
        }
    }

    /// Commit one RLE1 run to the block buffer. Runs of four or more encode
    /// as four literals plus a count byte; that count byte value gets its
    /// own presence bit, as the format requires.
    fn write_run(&mut self, value: u8, run_length: usize) {
        self.present[value as usize] = true;
        self.crc.update_run(value, run_length);

        if run_length <= 3 {
            self.block[self.block_length..self.block_length + run_length].fill(value);
            self.block_length += run_length;
        } else {
            let count = run_length - 4; // 0..=251
            self.present[count] = true;
            self.block[self.block_length..self.block_length + 4].fill(value);
            self.block[self.block_length + 4] = count as u8;
            self.block_length += 5;
        }
    }

    /// Accept one byte into the RLE1 accumulator. Returns false, with no
    /// state touched, once the block is full; the caller must close this
    /// block and start another.
    pub fn write_byte(&mut self, value: u8) -> bool {
        assert!(!self.closed, "write into a closed block");
        if self.block_length > self.block_length_limit {
            return false;
        }

        match self.rle_current {
            None => {
                self.rle_current = Some(value);
                self.rle_length = 1;
            }
            Some(current) if current == value => {
                if self.rle_length == 254 {
                    self.write_run(current, 255);
                    self.rle_current = None;
                } else {
                    self.rle_length += 1;
                }
            }
            Some(current) => {
                self.write_run(current, self.rle_length);
                self.rle_current = Some(value);
                self.rle_length = 1;
            }
        }
        true
    }

    /// Accept as many bytes of `data` as fit. Returns how many were taken,
    /// which may be less than `data.len()` or zero once the block is full.
    pub fn write_bytes(&mut self, data: &[u8]) -> usize {
        for (written, &byte) in data.iter().enumerate() {
            if !self.write_byte(byte) {
                return written;
            }
        }
        data.len()
    }

    /// True until the first byte is accepted.
    pub fn is_empty(&self) -> bool {
        self.block_length == 0 && self.rle_length == 0
    }

    /// Finalise the block: flush the run in flight, BWT the buffer, then
    /// emit the preamble and the Huffman coded body onto `bw`. The caller is
    /// responsible for not closing an empty block.
    pub fn close<W: Write>(&mut self, bw: &mut BitWriter<W>) -> io::Result<()> {
        assert!(!self.closed, "block closed twice");
        self.closed = true;

        if let Some(current) = self.rle_current.take() {
            if self.rle_length > 0 {
                self.write_run(current, self.rle_length);
            }
        }
        assert!(self.block_length > 0, "cannot close an empty block");

        // Wrap byte so the rotation sort can read one past the end.
        self.block[self.block_length] = self.block[0];
        let origin_ptr = bwt_encode(&self.block, self.block_length, &mut self.bwt);
        assert!(
            (origin_ptr as usize) < self.block_length,
            "BWT returned an out-of-range origin pointer"
        );
        debug!(
            "block: {} rle1 bytes, origin pointer {}, crc {:08x}",
            self.block_length,
            origin_ptr,
            self.crc.crc()
        );

        bw.write_bits(24, BLOCK_HEADER_MARKER_1)?;
        bw.write_bits(24, BLOCK_HEADER_MARKER_2)?;
        bw.write_u32(self.crc.crc())?;
        bw.write_bool(false)?; // this encoder never randomises a block
        bw.write_bits(24, origin_ptr)?;

        huffman::encode(bw, &self.bwt[..self.block_length], &self.present)
    }

    /// The CRC of the pre-RLE1 input. Only meaningful after close.
    pub fn crc(&self) -> u32 {
        self.crc.crc()
    }
}
