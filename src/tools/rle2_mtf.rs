//! Move-to-front transform and run-length-encoding phase 2 over BWT output.
//!
//! The move-to-front transform maps each BWT byte to its recency position,
//! which concentrates the distribution on small values. Runs of position
//! zero - by far the most common output - are then coded in a bijective
//! base 2 over the two dedicated symbols RUNA and RUNB, so a run of any
//! length has exactly one spelling and no length byte is needed.
//!
//! The remaining positions shift up by one to make room: `1..` become `2..`,
//! and the alphabet ends with the end-of-block symbol. Symbol frequencies are
//! counted in the same pass for the Huffman stage.

use crate::tools::mtf::MoveToFront;

pub const RUNA: u16 = 0;
pub const RUNB: u16 = 1;

/// MTF and RLE2 encode the BWT output (low 8 bits of each word meaningful).
/// `present` is the per-byte presence set from the RLE1 stage; it defines
/// the dense byte-to-symbol numbering. Returns the encoded symbols and the
/// frequency of each, with the end-of-block symbol last; the alphabet size
/// is the length of the frequency vector.
pub fn mtf_and_rle2_encode(bwt: &[u32], present: &[bool; 256]) -> (Vec<u16>, Vec<u32>) {
    // Number the values in use 0..K-1 in ascending byte order.
    let mut symbol_map = [0u8; 256];
    let mut unique = 0usize;
    for (value, &in_use) in present.iter().enumerate() {
        if in_use {
            symbol_map[value] = unique as u8;
            unique += 1;
        }
    }
    let eob = unique + 1;

    let mut mtf = Vec::with_capacity(bwt.len() + 1);
    let mut freqs = vec![0u32; unique + 2];
    let mut symbol_mtf = MoveToFront::new();
    let mut repeat = 0usize;
    let mut total_run_a = 0u32;
    let mut total_run_b = 0u32;

    for &word in bwt {
        let position = symbol_mtf.value_to_front(symbol_map[(word & 0xff) as usize]);
        if position == 0 {
            repeat += 1;
        } else {
            if repeat > 0 {
                push_zero_run(repeat, &mut mtf, &mut total_run_a, &mut total_run_b);
                repeat = 0;
            }
            // Shift past the two run symbols.
            mtf.push(position as u16 + 1);
            freqs[position + 1] += 1;
        }
    }
    if repeat > 0 {
        push_zero_run(repeat, &mut mtf, &mut total_run_a, &mut total_run_b);
    }

    mtf.push(eob as u16);
    freqs[eob] += 1;
    freqs[RUNA as usize] += total_run_a;
    freqs[RUNB as usize] += total_run_b;

    (mtf, freqs)
}

/// Spell a run of `repeat` zeros as RUNA/RUNB with positional values 1 and 2.
fn push_zero_run(mut repeat: usize, mtf: &mut Vec<u16>, run_a: &mut u32, run_b: &mut u32) {
    repeat -= 1;
    loop {
        if repeat & 1 == 0 {
            mtf.push(RUNA);
            *run_a += 1;
        } else {
            mtf.push(RUNB);
            *run_b += 1;
        }
        if repeat < 2 {
            break;
        }
        repeat = (repeat - 2) >> 1;
    }
}

#[cfg(test)]
mod test {
    use super::{mtf_and_rle2_encode, RUNA, RUNB};

    fn presence_of(data: &[u32]) -> [bool; 256] {
        let mut present = [false; 256];
        for &b in data {
            present[b as usize] = true;
        }
        present
    }

    #[test]
    fn single_byte_block() {
        let bwt = [b'A' as u32];
        let (mtf, freqs) = mtf_and_rle2_encode(&bwt, &presence_of(&bwt));
        // One value in use: EOB is 2 and the alphabet has three symbols.
        assert_eq!(mtf, vec![RUNA, 2]);
        assert_eq!(freqs, vec![1, 0, 1]);
    }

    #[test]
    fn zero_runs_use_bijective_base_two() {
        // With a single value in use every byte MTFs to position zero.
        let cases: [(usize, &[u16]); 6] = [
            (1, &[RUNA]),
            (2, &[RUNB]),
            (3, &[RUNA, RUNA]),
            (4, &[RUNB, RUNA]),
            (5, &[RUNA, RUNB]),
            (6, &[RUNB, RUNB]),
        ];
        for (run, spelling) in cases {
            let bwt = vec![0u32; run];
            let (mtf, _) = mtf_and_rle2_encode(&bwt, &presence_of(&bwt));
            let mut expect = spelling.to_vec();
            expect.push(2); // EOB
            assert_eq!(mtf, expect, "run of {}", run);
        }
    }

    #[test]
    fn positions_shift_past_the_run_symbols() {
        // b a a: 'b' maps to symbol 1, 'a' to 0. MTF positions are 1,1,0 so
        // the output is 2, 2, RUNA.
        let bwt = [b'b' as u32, b'a' as u32, b'a' as u32];
        let (mtf, freqs) = mtf_and_rle2_encode(&bwt, &presence_of(&bwt));
        assert_eq!(mtf, vec![2, 2, RUNA, 3]);
        assert_eq!(freqs, vec![1, 0, 2, 1]);
    }

    #[test]
    fn frequencies_count_every_emitted_symbol() {
        let bwt: Vec<u32> = b"abracadabra".iter().map(|&b| b as u32).collect();
        let (mtf, freqs) = mtf_and_rle2_encode(&bwt, &presence_of(&bwt));
        assert_eq!(
            mtf.len() as u32,
            freqs.iter().sum::<u32>(),
            "every symbol is counted once"
        );
        // Five values in use: alphabet is RUNA, RUNB, 2..=5, EOB=6.
        assert_eq!(freqs.len(), 7);
        assert_eq!(*mtf.last().unwrap(), 6);
    }
}
