//! Encode the symbol map written at the head of each block body.
//!
//! A symbol map records which of the 256 byte values appear in the RLE1 data
//! of a block. There are 16 sets of 16 values, so the map is a vector of u16
//! words: the first word has a bit set for each set that is populated at all,
//! and one further word follows per populated set with a bit per value.
//! Unpopulated sets contribute no word, which is where the space saving
//! comes from for typical text.

const BIT_MASK: u16 = 0x8000;

/// Build the condensed symbol map words from the presence set. Assumes at
/// least one value is present.
pub fn encode_sym_map(present: &[bool; 256]) -> Vec<u16> {
    let mut maps = vec![0u16; 17]; // Index word and 16 set words

    for (value, &in_use) in present.iter().enumerate() {
        if in_use {
            // value/16 marks the set, value%16 the bit within the set.
            maps[0] |= BIT_MASK >> (value >> 4);
            maps[1 + (value >> 4)] |= BIT_MASK >> (value & 15);
        }
    }

    // Keep only the index word and the populated set words.
    maps.retain(|&word| word != 0);
    maps
}
