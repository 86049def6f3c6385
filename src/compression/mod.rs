//! The compression module manages the block pipeline of the bzip2 compressor.
//!
//! BZIP2 compression happens in the following steps:
//! - Run Length Encoding 1: squash all runs of 4-255 identical bytes.
//! - Burrows-Wheeler Transform: permute the block so identical bytes cluster.
//! - Move To Front transform: turn that clustering into runs of small values.
//! - Run Length Encoding 2: spell runs of the zero position over RUNA/RUNB.
//! - Huffman coding: emit the symbols through per-group coding tables.
//!
//! The initial RLE1 step buys little compression on its own; it is a legacy
//! of the original format and must be preserved for interoperability.
//!
//! `compress_block` owns one block from first byte to emitted bitstream;
//! `compress` frames any number of blocks into a stream with the `BZh`
//! header, the footer magic and the combined CRC.
pub mod compress;
pub mod compress_block;
