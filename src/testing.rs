//! Test-only reference decompressors for ZX0 and ZX7.
//!
//! The crate intentionally does not ship a decompressor (that is a separate
//! artifact meant to run on the target platform), but the round-trip and
//! delta-soundness properties from the format specification can only be
//! checked by decompressing what the optimizer/emitter produced. These
//! decompressors exist purely to back `#[cfg(test)]` assertions elsewhere in
//! the crate and are not part of the public API.

struct BitReader<'a> {
    data: &'a [u8],
    byte_pos: usize,
    bit_mask: u8,
    current_byte: u8,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, byte_pos: 0, bit_mask: 0, current_byte: 0 }
    }

    fn read_byte(&mut self) -> u8 {
        let value = self.data[self.byte_pos];
        self.byte_pos += 1;
        value
    }

    fn read_bit(&mut self) -> u8 {
        if self.bit_mask == 0 {
            self.bit_mask = 0x80;
            self.current_byte = self.read_byte();
        }

        let bit = if self.current_byte & self.bit_mask != 0 { 1 } else { 0 };
        self.bit_mask >>= 1;
        bit
    }

    /// Read an interlaced Elias gamma code. `preloaded_first_control_bit`
    /// supplies the first control bit when it was backtracked into the low
    /// bit of a previously read byte (the ZX0 new-offset LSB field) instead
    /// of occupying its own bit-plane position.
    fn read_interlaced_elias_gamma(
        &mut self,
        preloaded_first_control_bit: Option<u8>,
        reverse: bool,
        invert: bool,
    ) -> usize {
        let continue_bit = if reverse { 1 } else { 0 };
        let mut value = 1usize;
        let mut preloaded = preloaded_first_control_bit;

        loop {
            let control = preloaded.take().unwrap_or_else(|| self.read_bit());
            if control != continue_bit {
                break;
            }

            let data_bit = self.read_bit();
            let bit = if invert { 1 - data_bit } else { data_bit };
            value = (value << 1) | bit as usize;
        }

        value
    }

    /// Read a classic (non-interlaced) Elias gamma code. Returns `None` if
    /// the leading zero-run reaches 16 bits, the sentinel the ZX7 end marker
    /// uses (no legitimate `len - 1` value needs more than 15).
    fn read_elias_gamma(&mut self) -> Option<u32> {
        let mut zero_bits = 0u32;
        while self.read_bit() == 0 {
            zero_bits += 1;
            if zero_bits >= 16 {
                return None;
            }
        }

        let mut value = 1u32;
        for _ in 0..zero_bits {
            value = (value << 1) | self.read_bit() as u32;
        }

        Some(value)
    }
}

fn copy_match(output: &mut Vec<u8>, offset: usize, length: usize) {
    let start = output.len() - offset;
    for i in 0..length {
        let byte = output[start + i];
        output.push(byte);
    }
}

/// Decompress a ZX0 stream produced with the given mode flags. `prefix` is the
/// `skip` bytes of already-available context; the returned vector includes
/// them followed by the decoded suffix.
pub(crate) fn decompress_zx0(data: &[u8], prefix: &[u8], backwards: bool, invert: bool) -> Vec<u8> {
    let mut reader = BitReader::new(data);
    let mut output = prefix.to_vec();
    let mut last_offset = 1usize;

    // The first action is always a literal run, and its leading mode bit is
    // absorbed by the writer's initial backtrack state without occupying any
    // bit position, so the decoder reads its length directly.
    let length = reader.read_interlaced_elias_gamma(None, backwards, false);
    for _ in 0..length {
        output.push(reader.read_byte());
    }

    // After a literal, only a match (repeat- or new-offset) can follow; after
    // a match, either a literal or a new-offset match can follow. Both states
    // share the same "1 = new-offset match" meaning; only the "0" branch's
    // meaning depends on which state we're in.
    let mut after_literal = true;

    loop {
        if reader.read_bit() == 1 {
            let msb = reader.read_interlaced_elias_gamma(None, backwards, invert);
            if msb == 256 {
                break;
            }

            let lsb = reader.read_byte();
            let remainder = (lsb >> 1) as usize;
            let offset = if backwards {
                (msb - 1) * 128 + remainder + 1
            } else {
                (msb - 1) * 128 + (127 - remainder) + 1
            };

            let length = reader.read_interlaced_elias_gamma(Some(lsb & 1), backwards, false) + 1;
            copy_match(&mut output, offset, length);
            last_offset = offset;
            after_literal = false;
        } else if after_literal {
            let length = reader.read_interlaced_elias_gamma(None, backwards, false);
            copy_match(&mut output, last_offset, length);
            after_literal = false;
        } else {
            let length = reader.read_interlaced_elias_gamma(None, backwards, false);
            for _ in 0..length {
                output.push(reader.read_byte());
            }
            after_literal = true;
        }
    }

    output
}

/// Decompress a ZX7 stream. `prefix` is the `skip` bytes of already-available
/// context; the returned vector includes them followed by the decoded suffix.
pub(crate) fn decompress_zx7(data: &[u8], prefix: &[u8]) -> Vec<u8> {
    let mut reader = BitReader::new(data);
    let mut output = prefix.to_vec();

    // The first byte is always literal, with no mode bit at all.
    output.push(reader.read_byte());

    loop {
        if reader.read_bit() == 0 {
            output.push(reader.read_byte());
            continue;
        }

        let len_minus_one = match reader.read_elias_gamma() {
            Some(value) => value as usize,
            None => break,
        };

        let first_byte = reader.read_byte();
        let offset = if first_byte & 0x80 == 0 {
            first_byte as usize + 1
        } else {
            let low = (first_byte & 0x7f) as usize;
            let mut high = 0usize;
            for _ in 0..4 {
                high = (high << 1) | reader.read_bit() as usize;
            }
            128 + (high << 7) + low + 1
        };

        copy_match(&mut output, offset, len_minus_one + 1);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_gamma_round_trips_through_writer() {
        use crate::bitstream::BitWriter;

        for value in 1..=5000u32 {
            let mut writer = BitWriter::new(64, 0, 0, false);
            writer.write_elias_gamma(value);
            let (bytes, _) = writer.into_parts();

            let mut reader = BitReader::new(&bytes);
            assert_eq!(reader.read_elias_gamma(), Some(value));
        }
    }

    #[test]
    fn interlaced_gamma_round_trips_through_writer() {
        use crate::bitstream::BitWriter;

        for value in 1..=5000usize {
            for reverse in [false, true] {
                for invert in [false, true] {
                    let mut writer = BitWriter::new(64, 0, 0, false);
                    writer.write_interlaced_elias_gamma(value, reverse, invert);
                    let (bytes, _) = writer.into_parts();

                    let mut reader = BitReader::new(&bytes);
                    assert_eq!(reader.read_interlaced_elias_gamma(None, reverse, invert), value);
                }
            }
        }
    }
}
