//! The huffman module generates the coded body of each block.
//!
//! BZIP2 is both block and chunk oriented: within each block of 100-900k of
//! RLE1 data, every chunk of 50 MTF symbols is coded with one of up to six
//! Huffman tables, chosen per chunk by a selector. The tables themselves are
//! refined over four passes against the real data before the codes are
//! finalised, which buys a noticeably better ratio than a single whole-block
//! table.
//!
//! Encoding a block is inherently sequential and does not benefit from
//! multithreading.
pub mod allocator;
pub mod huffman;
