//! A Rust bzip2 compressor.
//!
//! - Produces standard bzip2 streams, block by block: RLE1, Burrows-Wheeler
//!   transform, move-to-front with zero run encoding, and the multi-table
//!   Huffman back end.
//! - Library first: `StreamCompressor` writes a complete stream to any
//!   `io::Write`, while `BlockCompressor` exposes the single block pipeline
//!   for callers that do their own framing.
//!
//! Basic usage to compress a file from the command line:
//!
//! ```text
//! $> bzip2-enc -9 test.txt
//! ```
//!
//! This will compress the file and create test.txt.bz2.
#![warn(rust_2018_idioms)]
pub mod bitstream;
pub mod bwt_algorithms;
pub mod compression;
pub mod huffman_coding;
pub mod tools;
