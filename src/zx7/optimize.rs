//! The ZX7 optimal parser: a dense per-position cost table built with a
//! hash-less, two-byte-prefix inverted index, grounded on
//! `original_source/zx7/compress.c`.

use crate::bitstream::elias_gamma_bits;
use crate::error::CompressError;
use crate::zx7::MAX_LEN;

/// Callback invoked periodically while the dense cost table is built, with a
/// ratio in `0.0..=1.0`. Mirrors `crate::zx0::optimize::ProgressCallback`
/// exactly, since ZX7's table-building pass is the same kind of single
/// linear sweep over the input as ZX0's optimizer.
pub type ProgressCallback<'a> = dyn FnMut(f32) + 'a;

/// A single decision cell: the minimum bit cost of encoding `input[..=i]`,
/// plus the sequence (if any) that achieves it. `len == 0` marks a literal
/// step.
#[derive(Clone, Copy)]
pub(crate) struct Cell {
    pub bits: u32,
    pub offset: usize,
    pub len: usize,
}

/// Incremental bit cost of a `(offset, len)` back-reference, relative to the
/// cost of encoding up to `i - len`: the sequence indicator bit plus the
/// classic Elias-gamma code for `len - 1` plus the byte-aligned offset field
/// (one byte for `offset <= 128`, one byte and four extra bits beyond that).
fn count_bits(offset: usize, len: usize) -> u32 {
    elias_gamma_bits((len - 1) as u32) + 9 + if offset > 128 { 4 } else { 0 }
}

/// Build the dense optimal-cost table for `input[skip..]`. `input.len()` must
/// be at least `skip + 1`.
///
/// Reports [`CompressError::ResourceExhausted`] if any of the fixed-size
/// tables (the dense cost table, the two-byte-prefix buckets, the match chain,
/// or the offset run windows) cannot be allocated.
pub(crate) fn optimize(
    input: &[u8],
    skip: usize,
    max_offset: usize,
    progress_callback: &mut ProgressCallback,
) -> Result<Vec<Cell>, CompressError> {
    let exhausted = || CompressError::ResourceExhausted { size: input.len() };

    let mut table = try_vec(Cell { bits: 0, offset: 0, len: 0 }, input.len()).map_err(|_| exhausted())?;
    let mut matches = try_vec(0usize, 256 * 256).map_err(|_| exhausted())?;
    let mut match_slots = try_vec(0usize, input.len()).map_err(|_| exhausted())?;
    let mut min_window = try_vec(0usize, max_offset + 1).map_err(|_| exhausted())?;
    let mut max_window = try_vec(0usize, max_offset + 1).map_err(|_| exhausted())?;

    let bucket = |data: &[u8], i: usize| (data[i - 1] as usize) << 8 | data[i] as usize;

    // Index the skipped prefix so later matches can reference it.
    for i in 1..=skip {
        let index = bucket(input, i);
        match_slots[i] = matches[index];
        matches[index] = i;
    }

    // The first byte is always literal, emitted uncoded.
    table[skip].bits = 8;

    let total = (input.len() - skip).max(1);

    for i in (skip + 1)..input.len() {
        if i % 128 == 0 {
            let ratio = (i - skip) as f32 / total as f32;
            log::trace!("zx7 optimize: index={i} progress={ratio:.3}");
            progress_callback(ratio);
        }

        table[i].bits = table[i - 1].bits + 9;

        let index = bucket(input, i);
        let mut best_len = 1usize;

        let mut link_in_bucket = true;
        let mut link_pos = 0usize;
        let mut candidate = matches[index];

        while candidate != 0 && best_len < MAX_LEN {
            let offset = i - candidate;
            if offset > max_offset {
                if link_in_bucket {
                    matches[index] = 0;
                } else {
                    match_slots[link_pos] = 0;
                }
                break;
            }

            let mut len = 2usize;
            while len <= MAX_LEN && i >= skip + len {
                if len > best_len {
                    best_len = len;
                    let bits = table[i - len].bits + count_bits(offset, len);
                    if table[i].bits > bits {
                        table[i] = Cell { bits, offset, len };
                    }
                } else if max_window[offset] != 0 && i + 1 == max_window[offset] + len {
                    len = i - min_window[offset];
                    if len > best_len {
                        len = best_len;
                    }
                }

                if i < offset + len || input[i - len] != input[i - len - offset] {
                    break;
                }

                len += 1;
            }

            min_window[offset] = i + 1 - len;
            max_window[offset] = i;

            link_in_bucket = false;
            link_pos = candidate;
            candidate = match_slots[candidate];
        }

        match_slots[i] = matches[index];
        matches[index] = i;
    }

    progress_callback(1.0);

    Ok(table)
}

/// Allocate a `Vec` of `len` copies of `value`, reporting allocation failure
/// instead of aborting the process.
fn try_vec<T: Clone>(value: T, len: usize) -> Result<Vec<T>, ()> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| ())?;
    v.resize(len, value);
    Ok(v)
}
