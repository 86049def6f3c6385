use std::io::{self, Write};

use log::debug;

use super::allocator::allocate_code_lengths;
use crate::bitstream::bitwriter::BitWriter;
use crate::tools::mtf::MoveToFront;
use crate::tools::rle2_mtf::mtf_and_rle2_encode;
use crate::tools::symbol_map::encode_sym_map;

/// Seed cost for symbols outside a table's assigned range.
const HIGH_SYMBOL_COST: u32 = 15;
/// MTF symbols per selector group.
const GROUP_RUN_LENGTH: usize = 50;
/// Longest code the encoder may emit.
const MAX_CODE_LENGTH: u32 = 17;
/// Refinement passes over the block.
const OPTIMISATION_PASSES: usize = 4;
/// The format allows at most six coding tables per block.
const MAX_TABLES: usize = 6;

/// Encode the body of one block: MTF+RLE2 the BWT output, build and refine
/// the coding tables, then emit the symbol map, selectors, code lengths and
/// coded data. The caller has already written the block preamble; the bit
/// writer is left unflushed for the next block or the stream footer.
pub fn encode<W: Write>(
    bw: &mut BitWriter<W>,
    bwt: &[u32],
    present: &[bool; 256],
) -> io::Result<()> {
    let (mtf, freqs) = mtf_and_rle2_encode(bwt, present);
    let alpha_size = freqs.len();

    let table_count = select_table_count(mtf.len());
    let mut lengths = initial_code_lengths(&freqs, table_count, alpha_size);
    let selectors = optimise_selectors_and_lengths(&mtf, &mut lengths, table_count);
    let merged_codes = assign_code_symbols(&lengths);
    debug!(
        "{} mtf symbols over an alphabet of {}: {} tables, {} selectors",
        mtf.len(),
        alpha_size,
        table_count,
        selectors.len()
    );

    write_symbol_map(bw, present)?;
    write_selectors(bw, table_count, &selectors)?;
    write_code_lengths(bw, &lengths)?;
    write_block_data(bw, &mtf, &merged_codes, &selectors)
}

/// More data earns more tables.
fn select_table_count(mtf_length: usize) -> usize {
    match mtf_length {
        0..=199 => 2,
        200..=599 => 3,
        600..=1199 => 4,
        1200..=2399 => 5,
        _ => 6,
    }
}

/// Seed one table per contiguous slice of the alphabet, the slices chosen so
/// their cumulative frequencies are roughly equal. Symbols inside a table's
/// slice cost 0, all others 15. These are not valid code lengths - they only
/// bias the first optimisation pass so each table starts with an affinity
/// for a different part of the alphabet.
fn initial_code_lengths(freqs: &[u32], table_count: usize, alpha_size: usize) -> Vec<Vec<u32>> {
    let mut lengths = vec![vec![0u32; alpha_size]; table_count];
    let mut remaining = freqs.iter().sum::<u32>();
    let mut low_cost_end: isize = -1;

    for table in 0..table_count {
        let target = remaining / (table_count - table) as u32;
        let low_cost_start = low_cost_end + 1;
        let mut actual = 0u32;

        while actual < target && low_cost_end < alpha_size as isize - 1 {
            low_cost_end += 1;
            actual += freqs[low_cost_end as usize];
        }

        // If the last symbol overshot, give it back to the next table; only
        // for an interior table when an even number of tables remain.
        if low_cost_end > low_cost_start
            && table != 0
            && table != table_count - 1
            && (table_count - table) % 2 == 0
        {
            actual -= freqs[low_cost_end as usize];
            low_cost_end -= 1;
        }

        for (symbol, length) in lengths[table].iter_mut().enumerate() {
            if (symbol as isize) < low_cost_start || symbol as isize > low_cost_end {
                *length = HIGH_SYMBOL_COST;
            }
        }

        remaining -= actual;
    }
    lengths
}

/// Refine the tables against the real data over four passes: assign each
/// 50-symbol group to its cheapest table, then rebuild every table's lengths
/// from the frequencies of the groups it won. Selectors are recorded on the
/// final pass. Ties go to the lowest table index.
fn optimise_selectors_and_lengths(
    mtf: &[u16],
    lengths: &mut [Vec<u32>],
    table_count: usize,
) -> Vec<u8> {
    let alpha_size = lengths[0].len();
    let mut selectors = Vec::with_capacity(mtf.len() / GROUP_RUN_LENGTH + 1);

    for pass in (0..OPTIMISATION_PASSES).rev() {
        let mut table_frequencies = vec![vec![0u32; alpha_size]; table_count];

        for group in mtf.chunks(GROUP_RUN_LENGTH) {
            // Cost of coding this group with each candidate table. Fits u16:
            // at most 50 symbols of at most 17 bits.
            let mut cost = [0u16; MAX_TABLES];
            for &symbol in group {
                for (table, table_cost) in cost.iter_mut().enumerate().take(table_count) {
                    *table_cost += lengths[table][symbol as usize] as u16;
                }
            }

            let mut best_table = 0;
            let mut best_cost = cost[0];
            for (table, &table_cost) in cost.iter().enumerate().take(table_count).skip(1) {
                if table_cost < best_cost {
                    best_cost = table_cost;
                    best_table = table;
                }
            }

            for &symbol in group {
                table_frequencies[best_table][symbol as usize] += 1;
            }
            if pass == 0 {
                selectors.push(best_table as u8);
            }
        }

        // Rebuild each table's lengths from the frequencies it accumulated.
        // The sort key embeds the symbol so the allocator's output can be
        // unpermuted, with symbol index as the tiebreak.
        for (table, frequencies) in table_frequencies.iter().enumerate() {
            let mut sorted_map = frequencies
                .iter()
                .enumerate()
                .map(|(symbol, &f)| (f << 9) | symbol as u32)
                .collect::<Vec<u32>>();
            sorted_map.sort_unstable();

            let mut sorted_freqs = sorted_map.iter().map(|&m| m >> 9).collect::<Vec<u32>>();
            allocate_code_lengths(&mut sorted_freqs, MAX_CODE_LENGTH);

            for (&mapped, &length) in sorted_map.iter().zip(&sorted_freqs) {
                lengths[table][(mapped & 0x1ff) as usize] = length;
            }
        }
    }
    selectors
}

/// Assign canonical codes from the final lengths: codes are sequential
/// within a length, in symbol order, and shift left between lengths. Each
/// entry packs `(length << 24) | code` for a single lookup in the payload
/// loop.
fn assign_code_symbols(lengths: &[Vec<u32>]) -> Vec<Vec<u32>> {
    lengths
        .iter()
        .map(|table| {
            let min_length = *table.iter().min().unwrap();
            let max_length = *table.iter().max().unwrap();
            let mut merged = vec![0u32; table.len()];
            let mut code = 0u32;
            for length in min_length..=max_length {
                for (symbol, &l) in table.iter().enumerate() {
                    if l == length {
                        merged[symbol] = (length << 24) | code;
                        code += 1;
                    }
                }
                code <<= 1;
            }
            merged
        })
        .collect()
}

/// The 16 bit segment map, then one 16 bit word per populated segment.
fn write_symbol_map<W: Write>(bw: &mut BitWriter<W>, present: &[bool; 256]) -> io::Result<()> {
    for word in encode_sym_map(present) {
        bw.write_bits(16, u32::from(word))?;
    }
    Ok(())
}

/// Table count, selector count, then every selector move-to-fronted against
/// the table order and written as a zero-terminated unary number.
fn write_selectors<W: Write>(
    bw: &mut BitWriter<W>,
    table_count: usize,
    selectors: &[u8],
) -> io::Result<()> {
    bw.write_bits(3, table_count as u32)?;
    bw.write_bits(15, selectors.len() as u32)?;

    let mut selector_mtf = MoveToFront::new();
    for &selector in selectors {
        bw.write_unary(selector_mtf.value_to_front(selector) as u32)?;
    }
    Ok(())
}

/// Five bits of starting length per table, then one delta run per symbol:
/// `10` per increment or `11` per decrement, closed by a zero bit. The first
/// symbol's run is always empty but is still terminated.
fn write_code_lengths<W: Write>(bw: &mut BitWriter<W>, lengths: &[Vec<u32>]) -> io::Result<()> {
    for table in lengths {
        let mut current = table[0];
        bw.write_bits(5, current)?;
        for &length in table.iter() {
            let step = if current < length { 2 } else { 3 };
            for _ in 0..current.abs_diff(length) {
                bw.write_bits(2, step)?;
            }
            bw.write_bool(false)?;
            current = length;
        }
    }
    Ok(())
}

/// The payload: each group coded with its selector's table.
fn write_block_data<W: Write>(
    bw: &mut BitWriter<W>,
    mtf: &[u16],
    merged_codes: &[Vec<u32>],
    selectors: &[u8],
) -> io::Result<()> {
    for (group, &selector) in mtf.chunks(GROUP_RUN_LENGTH).zip(selectors) {
        let table = &merged_codes[selector as usize];
        for &symbol in group {
            let merged = table[symbol as usize];
            bw.write_bits(merged >> 24, merged)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn table_count_tiers() {
        assert_eq!(select_table_count(1), 2);
        assert_eq!(select_table_count(199), 2);
        assert_eq!(select_table_count(200), 3);
        assert_eq!(select_table_count(599), 3);
        assert_eq!(select_table_count(600), 4);
        assert_eq!(select_table_count(1200), 5);
        assert_eq!(select_table_count(2400), 6);
        assert_eq!(select_table_count(1 << 20), 6);
    }

    #[test]
    fn initial_tables_slice_the_alphabet() {
        // Flat frequencies over six symbols, two tables: each table gets a
        // contiguous half at cost 0 and the rest at the seed cost.
        let freqs = vec![5u32; 6];
        let lengths = initial_code_lengths(&freqs, 2, 6);
        assert_eq!(lengths[0], vec![0, 0, 0, 15, 15, 15]);
        assert_eq!(lengths[1], vec![15, 15, 15, 0, 0, 0]);
    }

    #[test]
    fn one_selector_per_fifty_symbols() {
        // 120 symbols over a 3 symbol alphabet -> 3 groups.
        let mut mtf = vec![0u16; 119];
        mtf.push(2);
        let mut lengths = vec![vec![1u32, 2, 3]; 2];
        let selectors = optimise_selectors_and_lengths(&mtf, &mut lengths, 2);
        assert_eq!(selectors.len(), 3);
    }

    #[test]
    fn selectors_prefer_the_cheapest_table_lowest_index_first() {
        let mtf = vec![0u16; 50];
        // Identical seed tables; table 0 is never beaten, so index 0 wins.
        let mut lengths = vec![vec![1u32, 2, 2]; 2];
        let selectors = optimise_selectors_and_lengths(&mtf, &mut lengths, 2);
        assert_eq!(selectors, vec![0]);
    }

    #[test]
    fn optimised_lengths_stay_within_the_cap() {
        // A heavily skewed block: long zero runs with a sprinkle of high
        // symbols.
        let mut mtf = Vec::new();
        for i in 0..3000u32 {
            mtf.push(if i % 100 == 0 { 2 } else { 0 });
        }
        mtf.push(3);
        let table_count = select_table_count(mtf.len());
        let freqs = {
            let mut f = vec![0u32; 4];
            for &s in &mtf {
                f[s as usize] += 1;
            }
            f
        };
        let mut lengths = initial_code_lengths(&freqs, table_count, 4);
        optimise_selectors_and_lengths(&mtf, &mut lengths, table_count);
        for table in &lengths {
            assert!(table.iter().all(|&l| (1..=MAX_CODE_LENGTH).contains(&l)));
        }
    }

    #[test]
    fn canonical_codes_are_sequential_within_a_length() {
        let lengths = vec![vec![2u32, 2, 2, 3, 3]];
        let merged = assign_code_symbols(&lengths);
        let codes: Vec<u32> = merged[0].iter().map(|&m| m & 0x00ff_ffff).collect();
        assert_eq!(codes, vec![0b00, 0b01, 0b10, 0b110, 0b111]);
        assert!(merged[0].iter().zip(&lengths[0]).all(|(&m, &l)| m >> 24 == l));
    }

    #[test]
    fn canonical_codes_follow_symbol_order_on_ties() {
        let lengths = vec![vec![3u32, 1, 3, 2]];
        let merged = assign_code_symbols(&lengths);
        let codes: Vec<u32> = merged[0].iter().map(|&m| m & 0x00ff_ffff).collect();
        // Length 1: symbol 1 -> 0. Length 2: symbol 3 -> 10. Length 3:
        // symbols 0 and 2 -> 110, 111.
        assert_eq!(codes, vec![0b110, 0b0, 0b111, 0b10]);
    }

    #[test]
    fn selector_stream_is_mtf_unary_coded() {
        let mut bw = BitWriter::new(Vec::new());
        write_selectors(&mut bw, 3, &[1, 1, 0, 2]).unwrap();
        bw.flush().unwrap();
        // 3 tables (011), 4 selectors (000000000000100), then MTF'd
        // selectors 1,0,1,2 in unary: 10 0 10 110.
        let expect = [0b0110_0000, 0b0000_0001, 0b0010_0101, 0b1000_0000];
        assert_eq!(bw.into_inner(), expect);
    }

    #[test]
    fn code_length_deltas_close_with_a_zero_bit() {
        let mut bw = BitWriter::new(Vec::new());
        write_code_lengths(&mut bw, &[vec![2u32, 3, 1]]).unwrap();
        bw.flush().unwrap();
        // Start 00010, then runs: "0" (2), "10 0" (3), "11 11 0" (1).
        let expect = [0b0001_0010, 0b0111_1000];
        assert_eq!(bw.into_inner(), expect);
    }
}
