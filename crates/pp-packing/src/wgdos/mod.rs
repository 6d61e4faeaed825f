//! WGDOS packing: lossy, row-adaptive bit packing of PP field data.
//!
//! Each row is quantised against its own base value with a step of
//! `2^accuracy`, using the fewest bits that hold the row's range. Missing
//! points and exact zeros can be flagged with per-row bitmaps so they cost
//! one bit each and come back exactly.
//!
//! # Layout
//!
//! All words are 32-bit big-endian.
//!
//! ```text
//! word 0      u32  number of words following this one
//! word 1      i32  accuracy exponent (step = 2^accuracy)
//! word 2      u16 points per row | u16 rows
//! per row:
//!   word 0    f32  base value
//!   word 1    u16 flags and bit width | u16 data words
//!   data      bitmaps and packed values, zero padded to a whole word
//! ```

pub mod row;

use bytes::BufMut;
use tracing::{debug, warn};

use crate::error::{DecodeFailure, PackingError, Result};
use crate::grid::{alloc_points, Grid, GridShape};
use crate::method::{PackingMethod, BYTES_PER_PP_WORD};
use row::{RowHeader, ROW_HEADER_BYTES};

/// Number of words in the field header.
pub const FIELD_HEADER_WORDS: usize = 3;

/// Smallest accepted accuracy exponent.
pub const MIN_ACCURACY: i32 = -126;
/// Largest accepted accuracy exponent.
pub const MAX_ACCURACY: i32 = 127;

/// Rows and points per row are stored as 16-bit counts.
pub const MAX_DIMENSION: usize = u16::MAX as usize;

/// The fixed header at the start of every WGDOS packed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldHeader {
    /// Words following the length word.
    pub length_words: u32,
    /// Accuracy exponent the field was packed with.
    pub accuracy: i32,
    /// Points per row.
    pub cols: u16,
    /// Number of rows.
    pub rows: u16,
}

impl FieldHeader {
    /// Total size of the packed field in bytes, length word included.
    pub fn total_bytes(&self) -> usize {
        (self.length_words as usize + 1) * BYTES_PER_PP_WORD
    }

    /// Quantisation step.
    pub fn scale(&self) -> f64 {
        2f64.powi(self.accuracy)
    }

    fn parse(bytes: &[u8]) -> std::result::Result<Self, DecodeFailure> {
        let header_bytes = FIELD_HEADER_WORDS * BYTES_PER_PP_WORD;
        if bytes.len() < header_bytes {
            return Err(DecodeFailure::TruncatedHeader(format!(
                "{} bytes, field header needs {}",
                bytes.len(),
                header_bytes
            )));
        }

        let header = Self {
            length_words: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            accuracy: i32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            cols: u16::from_be_bytes([bytes[8], bytes[9]]),
            rows: u16::from_be_bytes([bytes[10], bytes[11]]),
        };

        if (header.length_words as usize) < FIELD_HEADER_WORDS - 1 {
            return Err(DecodeFailure::TruncatedHeader(format!(
                "declared length of {} words is shorter than the field header",
                header.length_words
            )));
        }
        if header.total_bytes() > bytes.len() {
            return Err(DecodeFailure::TruncatedHeader(format!(
                "field declares {} bytes, buffer holds {}",
                header.total_bytes(),
                bytes.len()
            )));
        }
        if !(MIN_ACCURACY..=MAX_ACCURACY).contains(&header.accuracy) {
            return Err(DecodeFailure::InconsistentBitWidth(format!(
                "accuracy exponent {} outside {}..={}",
                header.accuracy, MIN_ACCURACY, MAX_ACCURACY
            )));
        }

        Ok(header)
    }
}

/// Read the field header of a WGDOS packed buffer without unpacking it.
pub fn read_field_header(bytes: &[u8]) -> Result<FieldHeader> {
    FieldHeader::parse(bytes).map_err(|failure| PackingError::decode(PackingMethod::Wgdos, failure))
}

/// Pack field values with the given accuracy exponent.
pub(crate) fn pack(data: &[f32], shape: GridShape, mdi: f32, accuracy: i32) -> Result<Vec<u8>> {
    if !(MIN_ACCURACY..=MAX_ACCURACY).contains(&accuracy) {
        return Err(PackingError::encode(
            PackingMethod::Wgdos,
            format!(
                "accuracy exponent {} outside {}..={}",
                accuracy, MIN_ACCURACY, MAX_ACCURACY
            ),
        ));
    }
    if shape.rows() > MAX_DIMENSION || shape.cols() > MAX_DIMENSION {
        return Err(PackingError::encode(
            PackingMethod::Wgdos,
            format!(
                "{} rows x {} points per row, each must be at most {}",
                shape.rows(),
                shape.cols(),
                MAX_DIMENSION
            ),
        ));
    }

    let scale = 2f64.powi(accuracy);
    let mut out = Vec::new();
    let estimate = (FIELD_HEADER_WORDS + shape.rows() * 2 + shape.npts()) * BYTES_PER_PP_WORD;
    out.try_reserve(estimate)
        .map_err(|_| PackingError::AllocError {
            points: shape.npts(),
        })?;

    // Length word is filled in once the rows are written.
    out.put_u32(0);
    out.put_i32(accuracy);
    out.put_u16(shape.cols() as u16);
    out.put_u16(shape.rows() as u16);

    let cols = shape.cols();
    for r in 0..shape.rows() {
        let values = &data[r * cols..(r + 1) * cols];
        row::pack_row(values, mdi, scale, &mut out).map_err(|reason| {
            PackingError::encode(PackingMethod::Wgdos, format!("row {}: {}", r, reason))
        })?;
    }

    let words = out.len() / BYTES_PER_PP_WORD;
    let length = u32::try_from(words - 1).map_err(|_| {
        PackingError::encode(
            PackingMethod::Wgdos,
            format!("packed field of {} words is too long", words),
        )
    })?;
    out[..BYTES_PER_PP_WORD].copy_from_slice(&length.to_be_bytes());

    debug!(
        rows = shape.rows(),
        cols,
        accuracy,
        words,
        "WGDOS packed field"
    );
    Ok(out)
}

/// Unpack every row of `bytes` into `out` (exactly `shape.npts()` long).
fn unpack_into(
    bytes: &[u8],
    shape: GridShape,
    mdi: f32,
    out: &mut [f32],
) -> std::result::Result<FieldHeader, DecodeFailure> {
    let header = FieldHeader::parse(bytes)?;
    if usize::from(header.rows) != shape.rows() || usize::from(header.cols) != shape.cols() {
        return Err(DecodeFailure::ShapeMismatch(format!(
            "field holds {} rows x {} points per row, expected {} x {}",
            header.rows,
            header.cols,
            shape.rows(),
            shape.cols()
        )));
    }

    let scale = header.scale();
    let end = header.total_bytes();
    let cols = shape.cols();
    let mut pos = FIELD_HEADER_WORDS * BYTES_PER_PP_WORD;

    for r in 0..shape.rows() {
        let row_header: &[u8; ROW_HEADER_BYTES] = bytes
            .get(pos..pos + ROW_HEADER_BYTES)
            .filter(|_| pos + ROW_HEADER_BYTES <= end)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| {
                DecodeFailure::TruncatedData(format!("row {} header beyond end of field", r))
            })?;
        let row_header = RowHeader::parse(row_header);
        pos += ROW_HEADER_BYTES;

        let data_end = pos + row_header.data_len();
        if data_end > end {
            return Err(DecodeFailure::TruncatedData(format!(
                "row {} declares {} data words beyond end of field",
                r, row_header.data_words
            )));
        }

        row::unpack_row(
            r,
            &row_header,
            &bytes[pos..data_end],
            mdi,
            scale,
            &mut out[r * cols..(r + 1) * cols],
        )?;
        pos = data_end;
    }

    if pos != end {
        return Err(DecodeFailure::ShapeMismatch(format!(
            "{} words left over after the last row",
            (end - pos) / BYTES_PER_PP_WORD
        )));
    }

    Ok(header)
}

/// Unpack a WGDOS packed PP field.
///
/// The grid is zero-filled before unpacking and is only returned if every
/// row unpacks cleanly.
pub fn wgdos_unpack(bytes: &[u8], rows: i32, cols: i32, mdi: f32) -> Result<Grid> {
    let shape = GridShape::new(rows, cols)?;
    debug!(rows, cols, bytes = bytes.len(), mdi, "WGDOS unpacking PP field");

    let mut data = alloc_points(shape.npts())?;
    match unpack_into(bytes, shape, mdi, &mut data) {
        Ok(header) => {
            debug!(
                accuracy = header.accuracy,
                words = header.length_words + 1,
                "WGDOS unpacked field"
            );
            Ok(Grid::from_parts(shape, data))
        }
        Err(failure) => {
            warn!(%failure, "WGDOS unpack failed");
            Err(PackingError::decode(PackingMethod::Wgdos, failure))
        }
    }
}
