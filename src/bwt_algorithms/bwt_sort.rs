use log::debug;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Blocks above this size are sorted on the rayon pool.
const PAR_SORT_THRESHOLD: usize = 40_000;

/// Burrows-Wheeler transform of `block[..length]`. The caller guarantees a
/// wrap byte at `block[length]` equal to `block[0]`. The last column of the
/// sorted rotation matrix is written into `bwt[..length]` (one byte per
/// word), and the returned origin pointer is the row holding the original
/// data, which the decoder needs for inversion.
pub fn bwt_encode(block: &[u8], length: usize, bwt: &mut [u32]) -> u32 {
    debug_assert!(length > 0 && length < block.len());
    debug_assert!(block[length] == block[0]);

    let data = &block[..length];
    let mut index = (0..length as u32).collect::<Vec<u32>>();

    debug!("sorting {} rotations", length);
    if length > PAR_SORT_THRESHOLD {
        index.par_sort_unstable_by(|&a, &b| rotation_order(a as usize, b as usize, data));
    } else {
        index.sort_unstable_by(|&a, &b| rotation_order(a as usize, b as usize, data));
    }

    let mut origin_ptr = 0u32;
    for (row, &start) in index.iter().enumerate() {
        if start == 0 {
            origin_ptr = row as u32;
            bwt[row] = data[length - 1] as u32;
        } else {
            bwt[row] = data[start as usize - 1] as u32;
        }
    }
    origin_ptr
}

/// Lexicographic order of two full rotations of `data`.
fn rotation_order(a: usize, b: usize, data: &[u8]) -> Ordering {
    data[a..]
        .iter()
        .chain(&data[..a])
        .cmp(data[b..].iter().chain(&data[..b]))
}

#[cfg(test)]
mod test {
    use super::bwt_encode;

    fn encode(data: &[u8]) -> (Vec<u32>, u32) {
        let mut block = data.to_vec();
        block.push(data[0]);
        let mut bwt = vec![0u32; data.len()];
        let origin_ptr = bwt_encode(&block, data.len(), &mut bwt);
        (bwt, origin_ptr)
    }

    #[test]
    fn banana() {
        let (bwt, origin_ptr) = encode(b"banana");
        let last_column: Vec<u8> = bwt.iter().map(|&w| w as u8).collect();
        assert_eq!(last_column, b"nnbaaa");
        assert_eq!(origin_ptr, 3);
    }

    #[test]
    fn output_is_a_permutation_of_the_input() {
        let data = b"If Peter Piper picked a peck of pickled peppers";
        let (bwt, origin_ptr) = encode(data);
        let mut sorted_in = data.to_vec();
        sorted_in.sort_unstable();
        let mut sorted_out: Vec<u8> = bwt.iter().map(|&w| w as u8).collect();
        sorted_out.sort_unstable();
        assert_eq!(sorted_in, sorted_out);
        assert!((origin_ptr as usize) < data.len());
    }

    #[test]
    fn identical_rotations_sort_cleanly() {
        let (bwt, origin_ptr) = encode(b"aaaa");
        assert!(bwt.iter().all(|&w| w == b'a' as u32));
        assert!((origin_ptr as usize) < 4);
    }
}
