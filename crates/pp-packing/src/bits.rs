//! MSB-first bit streams packed into 32-bit big-endian words.

/// Writes variable-width unsigned integers, most significant bit first.
#[derive(Debug, Default)]
pub(crate) struct BitWriter {
    words: Vec<u32>,
    acc: u64,
    filled: u32,
}

impl BitWriter {
    pub fn with_capacity_bits(bits: usize) -> Self {
        Self {
            words: Vec::with_capacity(bits.div_ceil(32)),
            acc: 0,
            filled: 0,
        }
    }

    /// Append the low `nbits` bits of `value` (at most 32).
    pub fn write(&mut self, value: u32, nbits: u32) {
        debug_assert!(nbits <= 32);
        if nbits == 0 {
            return;
        }
        let mask = (1u64 << nbits) - 1;
        self.acc = (self.acc << nbits) | (u64::from(value) & mask);
        self.filled += nbits;

        while self.filled >= 32 {
            self.filled -= 32;
            self.words.push((self.acc >> self.filled) as u32);
            self.acc &= (1u64 << self.filled) - 1;
        }
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.write(u32::from(bit), 1);
    }

    /// Pad to a whole word with zero bits and return the words.
    pub fn finish(mut self) -> Vec<u32> {
        if self.filled > 0 {
            self.words.push((self.acc << (32 - self.filled)) as u32);
        }
        self.words
    }
}

/// Reads MSB-first integers out of a byte slice.
#[derive(Debug)]
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::at(data, 0)
    }

    /// Start reading `bit_offset` bits into `data`.
    pub fn at(data: &'a [u8], bit_offset: usize) -> Self {
        Self {
            data,
            pos: bit_offset.min(data.len() * 8),
        }
    }

    /// Bits left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    /// Read `nbits` bits (at most 32). Returns `None` past the end.
    pub fn read(&mut self, nbits: u32) -> Option<u32> {
        debug_assert!(nbits <= 32);
        let nbits = nbits as usize;
        if nbits > self.remaining() {
            return None;
        }

        let mut result = 0u64;
        let mut left = nbits;
        while left > 0 {
            let byte = self.data[self.pos / 8];
            let avail = 8 - self.pos % 8;
            let take = avail.min(left);
            let bits = (byte >> (avail - take)) & (((1u16 << take) - 1) as u8);
            result = (result << take) | u64::from(bits);
            self.pos += take;
            left -= take;
        }

        Some(result as u32)
    }

    pub fn read_bit(&mut self) -> Option<bool> {
        self.read(1).map(|b| b == 1)
    }
}

/// Number of bits needed to hold `value`.
pub(crate) fn bits_needed(value: u64) -> u32 {
    64 - value.leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_bytes(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    #[test]
    fn test_msb_first_layout() {
        let mut writer = BitWriter::default();
        writer.write(0b101, 3);
        writer.write(0b1, 1);
        let words = writer.finish();
        assert_eq!(words, vec![0b1011 << 28]);
    }

    #[test]
    fn test_write_read_mixed_widths() {
        let mut writer = BitWriter::with_capacity_bits(128);
        writer.write(10, 4);
        writer.write(1021, 10);
        writer.write(3, 2);
        writer.write(u32::MAX, 32);
        writer.write(0x7FFF_FFFF, 31);
        writer.write_bit(true);
        let bytes = to_bytes(&writer.finish());
        assert_eq!(bytes.len() % 4, 0);

        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read(4), Some(10));
        assert_eq!(reader.read(10), Some(1021));
        assert_eq!(reader.read(2), Some(3));
        assert_eq!(reader.read(32), Some(u32::MAX));
        assert_eq!(reader.read(31), Some(0x7FFF_FFFF));
        assert_eq!(reader.read_bit(), Some(true));
    }

    #[test]
    fn test_zero_width_is_noop() {
        let mut writer = BitWriter::default();
        writer.write(123, 0);
        assert!(writer.finish().is_empty());

        let mut reader = BitReader::new(&[]);
        assert_eq!(reader.read(0), Some(0));
        assert_eq!(reader.read(1), None);
    }

    #[test]
    fn test_read_past_end() {
        let bytes = [0xFF, 0x00];
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read(12), Some(0xFF0));
        assert_eq!(reader.remaining(), 4);
        assert_eq!(reader.read(5), None);
    }

    #[test]
    fn test_reader_at_offset() {
        let bytes = [0b0000_0101, 0b1000_0000];
        let mut reader = BitReader::at(&bytes, 5);
        assert_eq!(reader.read(4), Some(0b1011));
        assert_eq!(BitReader::at(&bytes, 99).remaining(), 0);
    }

    #[test]
    fn test_bits_needed() {
        assert_eq!(bits_needed(0), 0);
        assert_eq!(bits_needed(1), 1);
        assert_eq!(bits_needed(2), 2);
        assert_eq!(bits_needed(255), 8);
        assert_eq!(bits_needed(256), 9);
        assert_eq!(bits_needed(0x7FFF_FFFF), 31);
    }
}
