//! Walks the optimal path chosen by [`crate::zx0::optimize::optimize`] and emits
//! the ZX0 bit stream.

use crate::bitstream::BitWriter;
use crate::zx0::arena::Allocator;
use crate::INITIAL_OFFSET;

struct Action {
    bits: u32,
    index: isize,
    offset: usize,
}

/// Walk the chain backward from `tail_index` to the root and emit the ZX0 bit
/// stream for `input[skip..]`. Returns the output buffer and the delta
/// (maximum in-place decompression head distance).
pub(crate) fn emit(
    allocator: &Allocator,
    tail_index: usize,
    input: &[u8],
    skip: usize,
    backwards_mode: bool,
    invert_mode: bool,
) -> (Vec<u8>, usize) {
    let mut chain = Vec::new();
    let mut cursor = tail_index;

    while cursor != 0 {
        let block = allocator.get(cursor);
        chain.push(Action {
            bits: block.bits,
            index: block.index as isize,
            offset: block.offset as usize,
        });
        cursor = block.next_index;
    }

    // `chain[0]` is still the tail here (the walk above runs tail-to-root),
    // so its `bits` is the full accumulated cost of the optimal path -- the
    // right thing to size the output buffer from. Only after this do we
    // reverse so the root precedes the terminal action for the forward walk
    // below.
    let output_size = ((chain[0].bits + 25) / 8) as usize;
    chain.reverse();
    let mut writer = BitWriter::new(output_size, input.len(), skip, true);

    let mut last_offset = INITIAL_OFFSET;
    let mut input_index = skip;

    for window in chain.windows(2) {
        let (previous, current) = (&window[0], &window[1]);
        let length = (current.index - previous.index) as usize;

        if current.offset == 0 {
            writer.write_bit(0);
            writer.write_interlaced_elias_gamma(length, backwards_mode, false);

            for _ in 0..length {
                writer.write_byte(input[input_index]);
                input_index += 1;
                writer.read_bytes(1);
            }
        } else if current.offset == last_offset {
            writer.write_bit(0);
            writer.write_interlaced_elias_gamma(length, backwards_mode, false);
            input_index += length;
            writer.read_bytes(length);
        } else {
            writer.write_bit(1);
            writer.write_interlaced_elias_gamma((current.offset - 1) / 128 + 1, backwards_mode, invert_mode);

            if backwards_mode {
                writer.write_byte((((current.offset - 1) % 128) << 1) as u8);
            } else {
                writer.write_byte(((127 - (current.offset - 1) % 128) << 1) as u8);
            }

            writer.set_backtrack();
            writer.write_interlaced_elias_gamma(length - 1, backwards_mode, false);
            input_index += length;
            writer.read_bytes(length);

            last_offset = current.offset;
        }
    }

    writer.write_bit(1);
    writer.write_interlaced_elias_gamma(256, backwards_mode, invert_mode);

    writer.into_parts()
}
