//! The tools module provides the helper stages shared by the bzip2 compressor.
//!
//! BZIP2 is a block-oriented approach to compress data.
//!
//! The tools are:
//! - cli: Command line interface for the compress-only binary.
//! - crc: CRC32 checksum, both the per-block and stream versions.
//! - mtf: The move-to-front list used by the symbol and selector transforms.
//! - rle2_mtf: Move-To-Front transform and Run-Length-Encoding phase 2
//!   (integrated for speed) over the BWT output.
//! - symbol_map: Encode the condensed symbol map written at the head of each
//!   block body.
pub mod cli;
pub mod crc;
pub mod mtf;
pub mod rle2_mtf;
pub mod symbol_map;
