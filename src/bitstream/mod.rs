//! The bitstream module forms the output subsystem for the bzip2 compressor.
//!
//! BZIP2 packs every field of a stream - magic markers, checksums, symbol
//! maps, Huffman code lengths and the coded data itself - most significant
//! bit first with no padding between fields. The bit writer here buffers
//! whole bytes and hands them to the underlying `io::Write` as they fill.
//!
//! This subsystem is designed to interface with the other modules within the
//! compressor. It is not intended for more general use.
pub mod bitwriter;
