//! Walks the dense optimal-cost table built by [`crate::zx7::optimize::optimize`]
//! and emits the ZX7 bit stream.

use crate::bitstream::BitWriter;
use crate::zx7::optimize::Cell;

/// Emit the ZX7 bit stream for `input[skip..]` given its optimal-cost table.
/// Returns the output buffer and the delta (maximum in-place decompression
/// head distance).
pub(crate) fn emit(table: &[Cell], input: &[u8], skip: usize) -> (Vec<u8>, usize) {
    let last = input.len() - 1;

    // Walk the table backward from the last position to `skip`, recording
    // each position's forward successor so it can be replayed front-to-back.
    let mut successor: Vec<Option<usize>> = vec![None; input.len()];
    let mut cursor = last;
    while cursor != skip {
        let step = table[cursor].len.max(1);
        let previous = cursor - step;
        successor[previous] = Some(cursor);
        cursor = previous;
    }

    let output_size = (table[last].bits as usize + 18 + 7) / 8;
    let mut writer = BitWriter::new(output_size, input.len(), skip, false);

    // The first byte is always literal, emitted without a mode bit.
    writer.write_byte(input[skip]);
    writer.read_bytes(1);

    let mut cursor = skip;
    while let Some(next) = successor[cursor] {
        let cell = &table[next];

        if cell.len == 0 {
            writer.write_bit(0);
            writer.write_byte(input[next]);
            writer.read_bytes(1);
        } else {
            writer.write_bit(1);
            writer.write_elias_gamma((cell.len - 1) as u32);

            let offset_minus_one = cell.offset - 1;
            if offset_minus_one < 128 {
                writer.write_byte(offset_minus_one as u8);
            } else {
                let remainder = offset_minus_one - 128;
                writer.write_byte(((remainder & 0x7f) | 0x80) as u8);

                let mut mask = 1024i32;
                while mask > 127 {
                    writer.write_bit(if remainder as i32 & mask != 0 { 1 } else { 0 });
                    mask >>= 1;
                }
            }

            writer.read_bytes(cell.len);
        }

        cursor = next;
    }

    // End marker: a sequence indicator followed by a length impossible in
    // regular encoding (17 bits: 1, then sixteen 0 bits, then 1).
    writer.write_bit(1);
    for _ in 0..16 {
        writer.write_bit(0);
    }
    writer.write_bit(1);

    writer.into_parts()
}
