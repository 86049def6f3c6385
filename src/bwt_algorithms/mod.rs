//! The bwt_algorithms module forms the sorting subsystem for the bzip2
//! compressor.
//!
//! BZIP2 uses the Burrows-Wheeler Transform (BWT) to prepare data for
//! compression. The transform permutes a block so that runs of similar bytes
//! are much more likely, which is what the move-to-front and Huffman stages
//! feed on.
//!
//! The transform is "computationally expensive" sorting of every rotation of
//! the block. The kernel here is a comparator sort over rotation indices; any
//! suffix sorter producing the same last column and origin pointer could
//! stand in for it.
pub mod bwt_sort;
