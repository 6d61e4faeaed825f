//! Packing and unpacking of a single WGDOS row.
//!
//! Row layout: base value (f32), a 16-bit flags/bit-width field, a 16-bit
//! data word count, then the data words. Data is an MSB-first bit stream of
//! the optional missing bitmap (one bit per point), the optional zero bitmap
//! (one bit per non-missing point) and one `nbits` integer per remaining point.

use bytes::BufMut;
use tracing::trace;

use crate::bits::{bits_needed, BitReader, BitWriter};
use crate::error::DecodeFailure;
use crate::grid::is_missing;

/// Low five bits of the flags field hold the bit width.
pub const BIT_WIDTH_MASK: u16 = 0x1F;
/// A missing data bitmap precedes the values.
pub const FLAG_MISSING_BITMAP: u16 = 0x20;
/// A zero bitmap precedes the values.
pub const FLAG_ZERO_BITMAP: u16 = 0x40;
/// Every point in the row is missing; no data words follow.
pub const FLAG_ALL_MISSING: u16 = 0x80;

const KNOWN_FLAGS: u16 =
    BIT_WIDTH_MASK | FLAG_MISSING_BITMAP | FLAG_ZERO_BITMAP | FLAG_ALL_MISSING;

/// Largest quantised value a row may hold (31 bits).
pub const MAX_PACKED_VALUE: u64 = (1 << 31) - 1;

/// Size of a row header in bytes.
pub const ROW_HEADER_BYTES: usize = 8;

/// Decoded row header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowHeader {
    pub base: f32,
    pub flags: u16,
    pub data_words: u16,
}

impl RowHeader {
    /// Parse the 8-byte row header.
    pub fn parse(bytes: &[u8; ROW_HEADER_BYTES]) -> Self {
        Self {
            base: f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            flags: u16::from_be_bytes([bytes[4], bytes[5]]),
            data_words: u16::from_be_bytes([bytes[6], bytes[7]]),
        }
    }

    pub fn bit_width(&self) -> u32 {
        u32::from(self.flags & BIT_WIDTH_MASK)
    }

    pub fn has_missing_bitmap(&self) -> bool {
        self.flags & FLAG_MISSING_BITMAP != 0
    }

    pub fn has_zero_bitmap(&self) -> bool {
        self.flags & FLAG_ZERO_BITMAP != 0
    }

    pub fn all_missing(&self) -> bool {
        self.flags & FLAG_ALL_MISSING != 0
    }

    /// Number of data bytes following the header.
    pub fn data_len(&self) -> usize {
        usize::from(self.data_words) * 4
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.put_f32(self.base);
        out.put_u16(self.flags);
        out.put_u16(self.data_words);
    }
}

/// Bits per value for values spanning `min..=max`, or `None` past 31 bits.
fn bits_for_range(min: f32, max: f32, scale: f64) -> Option<u32> {
    let span = ((f64::from(max) - f64::from(min)) / scale).round();
    if span > MAX_PACKED_VALUE as f64 {
        return None;
    }
    Some(bits_needed(span as u64))
}

#[inline]
fn quantise(value: f32, base: f32, scale: f64) -> u32 {
    ((f64::from(value) - f64::from(base)) / scale).round() as u32
}

/// Running statistics over the non-missing points of a row.
#[derive(Debug, Default)]
struct RowStats {
    present: usize,
    zeros: usize,
    min: Option<f32>,
    max: Option<f32>,
    nonzero_min: Option<f32>,
    nonzero_max: Option<f32>,
}

impl RowStats {
    fn collect(row: &[f32], mdi: f32) -> Result<Self, String> {
        let mut stats = Self::default();
        for (col, &value) in row.iter().enumerate() {
            if is_missing(value, mdi) {
                continue;
            }
            if !value.is_finite() {
                return Err(format!("non-finite value {} at point {}", value, col));
            }
            stats.present += 1;
            stats.min = Some(stats.min.map_or(value, |m| m.min(value)));
            stats.max = Some(stats.max.map_or(value, |m| m.max(value)));
            if value == 0.0 {
                stats.zeros += 1;
            } else {
                stats.nonzero_min = Some(stats.nonzero_min.map_or(value, |m| m.min(value)));
                stats.nonzero_max = Some(stats.nonzero_max.map_or(value, |m| m.max(value)));
            }
        }
        Ok(stats)
    }
}

/// Pack one row, appending header and data words to `out`.
///
/// Returns the header that was written.
pub fn pack_row(
    row: &[f32],
    mdi: f32,
    scale: f64,
    out: &mut Vec<u8>,
) -> Result<RowHeader, String> {
    let stats = RowStats::collect(row, mdi)?;
    let (min, max) = match (stats.min, stats.max) {
        (Some(min), Some(max)) => (min, max),
        _ => {
            let header = RowHeader {
                base: mdi,
                flags: FLAG_ALL_MISSING,
                data_words: 0,
            };
            header.write(out);
            return Ok(header);
        }
    };

    let missing_bitmap = stats.present < row.len();
    let missing_bits = if missing_bitmap { row.len() } else { 0 };

    // Plain packing: every present point quantised against the row minimum.
    let plain = bits_for_range(min, max, scale)
        .map(|nbits| (min, nbits, stats.present * nbits as usize));

    // Zero bitmap: exact zeros flagged, the rest quantised against the
    // smallest non-zero value.
    let zeroed = match (stats.nonzero_min, stats.nonzero_max) {
        (Some(lo), Some(hi)) if stats.zeros > 0 => bits_for_range(lo, hi, scale).map(|nbits| {
            let values = stats.present - stats.zeros;
            (lo, nbits, stats.present + values * nbits as usize)
        }),
        _ => None,
    };

    let (base, nbits, zero_bitmap, value_bits) = match (plain, zeroed) {
        (Some(p), Some(z)) if z.2 < p.2 => (z.0, z.1, true, z.2),
        (Some(p), _) => (p.0, p.1, false, p.2),
        (None, Some(z)) => (z.0, z.1, true, z.2),
        (None, None) => {
            return Err(format!(
                "values from {} to {} need more than 31 bits at step {}",
                min, max, scale
            ))
        }
    };

    let total_bits = missing_bits + value_bits;
    let data_words = u16::try_from(total_bits.div_ceil(32)).map_err(|_| {
        format!(
            "row needs {} data words, at most {} fit in a row header",
            total_bits.div_ceil(32),
            u16::MAX
        )
    })?;

    let mut flags = nbits as u16;
    if missing_bitmap {
        flags |= FLAG_MISSING_BITMAP;
    }
    if zero_bitmap {
        flags |= FLAG_ZERO_BITMAP;
    }
    let header = RowHeader {
        base,
        flags,
        data_words,
    };
    header.write(out);

    let mut writer = BitWriter::with_capacity_bits(total_bits);
    if missing_bitmap {
        for &value in row {
            writer.write_bit(is_missing(value, mdi));
        }
    }
    if zero_bitmap {
        for &value in row.iter().filter(|&&v| !is_missing(v, mdi)) {
            writer.write_bit(value == 0.0);
        }
    }
    for &value in row.iter().filter(|&&v| !is_missing(v, mdi)) {
        if zero_bitmap && value == 0.0 {
            continue;
        }
        writer.write(quantise(value, base, scale), nbits);
    }

    let words = writer.finish();
    debug_assert_eq!(words.len(), usize::from(data_words));
    for word in words {
        out.put_u32(word);
    }

    trace!(
        base,
        nbits,
        missing_bitmap,
        zero_bitmap,
        data_words,
        "Packed WGDOS row"
    );
    Ok(header)
}

/// Count the set bits among `count` bits starting at `offset`.
fn count_set(data: &[u8], offset: usize, count: usize) -> Option<usize> {
    let mut reader = BitReader::at(data, offset);
    if reader.remaining() < count {
        return None;
    }
    let mut set = 0;
    for _ in 0..count {
        if reader.read_bit()? {
            set += 1;
        }
    }
    Some(set)
}

/// Unpack one row from its header and data bytes into `out`.
pub fn unpack_row(
    row: usize,
    header: &RowHeader,
    data: &[u8],
    mdi: f32,
    scale: f64,
    out: &mut [f32],
) -> Result<(), DecodeFailure> {
    if header.flags & !KNOWN_FLAGS != 0 {
        return Err(DecodeFailure::InconsistentBitWidth(format!(
            "row {}: unknown flags {:#06x}",
            row, header.flags
        )));
    }

    if header.all_missing() {
        if header.flags != FLAG_ALL_MISSING || header.data_words != 0 {
            return Err(DecodeFailure::InconsistentBitWidth(format!(
                "row {}: all-missing row carries flags {:#06x} and {} data words",
                row, header.flags, header.data_words
            )));
        }
        out.fill(mdi);
        return Ok(());
    }

    let nbits = header.bit_width();
    let cols = out.len();
    let short = || {
        DecodeFailure::InconsistentBitWidth(format!(
            "row {}: {} data words too short for its bitmaps",
            row, header.data_words
        ))
    };

    // First pass: size the bitmaps and check the declared word count.
    let mut cursor = 0;
    let present = if header.has_missing_bitmap() {
        let missing = count_set(data, cursor, cols).ok_or_else(short)?;
        cursor += cols;
        cols - missing
    } else {
        cols
    };
    let zero_start = cursor;
    let values = if header.has_zero_bitmap() {
        let zeros = count_set(data, cursor, present).ok_or_else(short)?;
        cursor += present;
        present - zeros
    } else {
        present
    };
    let value_start = cursor;

    let required_words = (value_start + values * nbits as usize).div_ceil(32);
    if required_words != usize::from(header.data_words) {
        return Err(DecodeFailure::InconsistentBitWidth(format!(
            "row {}: {} data words declared, {} bit values with bitmaps need {}",
            row, header.data_words, nbits, required_words
        )));
    }

    // Second pass: walk the bitmaps and values together.
    let mut missing_bits = BitReader::new(data);
    let mut zero_bits = BitReader::at(data, zero_start);
    let mut value_bits = BitReader::at(data, value_start);
    let base = f64::from(header.base);
    let truncated = || DecodeFailure::TruncatedData(format!("row {}: data ends early", row));

    for slot in out.iter_mut() {
        if header.has_missing_bitmap() && missing_bits.read_bit().ok_or_else(truncated)? {
            *slot = mdi;
            continue;
        }
        if header.has_zero_bitmap() && zero_bits.read_bit().ok_or_else(truncated)? {
            *slot = 0.0;
            continue;
        }
        let packed = value_bits.read(nbits).ok_or_else(truncated)?;
        *slot = (base + f64::from(packed) * scale) as f32;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MDI: f32 = -1.0e30;

    fn header_of(out: &[u8]) -> RowHeader {
        let mut bytes = [0u8; ROW_HEADER_BYTES];
        bytes.copy_from_slice(&out[..ROW_HEADER_BYTES]);
        RowHeader::parse(&bytes)
    }

    fn round_trip(row: &[f32], scale: f64) -> (RowHeader, Vec<f32>) {
        let mut out = Vec::new();
        let header = pack_row(row, MDI, scale, &mut out).unwrap();
        assert_eq!(header_of(&out), header);
        assert_eq!(out.len(), ROW_HEADER_BYTES + header.data_len());

        let mut decoded = vec![0.0; row.len()];
        unpack_row(0, &header, &out[ROW_HEADER_BYTES..], MDI, scale, &mut decoded).unwrap();
        (header, decoded)
    }

    #[test]
    fn test_constant_row_has_no_data() {
        let (header, decoded) = round_trip(&[5.0; 4], 0.5);
        assert_eq!(header.bit_width(), 0);
        assert_eq!(header.data_words, 0);
        assert_eq!(header.base, 5.0);
        assert_eq!(decoded, vec![5.0; 4]);
    }

    #[test]
    fn test_all_missing_row() {
        let (header, decoded) = round_trip(&[MDI; 7], 1.0);
        assert!(header.all_missing());
        assert_eq!(header.data_words, 0);
        assert_eq!(decoded, vec![MDI; 7]);
    }

    #[test]
    fn test_quantised_values_within_half_step() {
        let row = [1.0, 1.3, 2.7, 9.9, 4.25];
        let scale = 0.125;
        let (header, decoded) = round_trip(&row, scale);
        assert_eq!(header.base, 1.0);
        // (9.9 - 1.0) / 0.125 = 71.2 -> 71 -> 7 bits
        assert_eq!(header.bit_width(), 7);
        for (orig, got) in row.iter().zip(&decoded) {
            assert!((orig - got).abs() <= scale as f32 / 2.0 + 1e-6, "{} vs {}", orig, got);
        }
    }

    #[test]
    fn test_missing_bitmap_used_only_when_needed() {
        let (header, decoded) = round_trip(&[1.0, MDI, 3.0, MDI], 1.0);
        assert!(header.has_missing_bitmap());
        assert_eq!(decoded, vec![1.0, MDI, 3.0, MDI]);

        let (header, _) = round_trip(&[1.0, 2.0, 3.0], 1.0);
        assert!(!header.has_missing_bitmap());
    }

    #[test]
    fn test_zero_bitmap_when_smaller() {
        // Mostly zeros with a few large values: the zero bitmap wins.
        let mut row = vec![0.0; 64];
        row[10] = 1000.0;
        row[20] = 1001.0;
        let (header, decoded) = round_trip(&row, 1.0);
        assert!(header.has_zero_bitmap());
        assert_eq!(header.base, 1000.0);
        assert_eq!(header.bit_width(), 1);
        assert_eq!(decoded, row);
    }

    #[test]
    fn test_zero_bitmap_skipped_when_larger() {
        let row = [0.0, 1.0, 2.0, 3.0];
        let (header, decoded) = round_trip(&row, 1.0);
        assert!(!header.has_zero_bitmap());
        assert_eq!(decoded, row.to_vec());
    }

    #[test]
    fn test_range_too_wide() {
        let mut out = Vec::new();
        let err = pack_row(&[1.0, 1.0e12], MDI, 1.0, &mut out).unwrap_err();
        assert!(err.contains("31 bits"), "{}", err);
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut out = Vec::new();
        let err = pack_row(&[1.0, f32::INFINITY], MDI, 1.0, &mut out).unwrap_err();
        assert!(err.contains("non-finite"), "{}", err);
    }

    #[test]
    fn test_unpack_rejects_wrong_word_count() {
        let mut out = Vec::new();
        let mut header = pack_row(&[1.0, 2.0, 3.0, 4.0], MDI, 1.0, &mut out).unwrap();
        header.data_words += 1;
        let mut data = out[ROW_HEADER_BYTES..].to_vec();
        data.extend_from_slice(&[0; 4]);

        let mut decoded = vec![0.0; 4];
        let err = unpack_row(3, &header, &data, MDI, 1.0, &mut decoded).unwrap_err();
        assert!(matches!(err, DecodeFailure::InconsistentBitWidth(_)));
    }

    #[test]
    fn test_unpack_rejects_unknown_flags() {
        let header = RowHeader {
            base: 0.0,
            flags: 0x100,
            data_words: 0,
        };
        let mut decoded = vec![0.0; 2];
        assert!(matches!(
            unpack_row(0, &header, &[], MDI, 1.0, &mut decoded),
            Err(DecodeFailure::InconsistentBitWidth(_))
        ));
    }

    #[test]
    fn test_unpack_rejects_all_missing_with_data() {
        let header = RowHeader {
            base: MDI,
            flags: FLAG_ALL_MISSING | 3,
            data_words: 0,
        };
        let mut decoded = vec![0.0; 2];
        assert!(unpack_row(0, &header, &[], MDI, 1.0, &mut decoded).is_err());
    }
}
