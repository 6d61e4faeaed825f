//! Run-length encoding of missing data.
//!
//! The packed field is a sequence of big-endian 32-bit floats. Real values are
//! copied verbatim; each maximal run of missing points is written once as the
//! missing data indicator followed by a word holding the run length (stored as
//! a float, like every other word in the record). Runs follow row-major order
//! and may cross row boundaries.

use bytes::{Buf, BufMut};
use tracing::{debug, trace, warn};

use crate::error::{DecodeFailure, PackingError, Result};
use crate::grid::{alloc_points, is_missing, Grid, GridShape};
use crate::method::{PackingMethod, BYTES_PER_PP_WORD};

/// Longest run written as one pair: every integer up to 2^24 is exact in f32.
pub const MAX_RUN_LENGTH: usize = 1 << 24;

/// Encode field values, collapsing runs of `mdi`.
pub(crate) fn encode(data: &[f32], mdi: f32) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    // Worst case is every value a literal; single missing points cost two words.
    out.try_reserve(data.len() * BYTES_PER_PP_WORD)
        .map_err(|_| PackingError::AllocError { points: data.len() })?;

    let mut i = 0;
    while i < data.len() {
        if !is_missing(data[i], mdi) {
            out.put_f32(data[i]);
            i += 1;
            continue;
        }

        let run = data[i..]
            .iter()
            .take(MAX_RUN_LENGTH)
            .take_while(|&&v| is_missing(v, mdi))
            .count();
        out.put_f32(mdi);
        out.put_f32(run as f32);
        i += run;
    }

    debug!(
        points = data.len(),
        words = out.len() / BYTES_PER_PP_WORD,
        "RLE encoded field"
    );
    Ok(out)
}

/// Decoder state between words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RleState {
    ReadingLiteral,
    ReadingRunLength,
}

/// Expand `words` packed words into `out`, which must be exactly the grid size.
fn expand(
    mut input: &[u8],
    words: usize,
    mdi: f32,
    out: &mut [f32],
) -> std::result::Result<(), DecodeFailure> {
    let npts = out.len();
    let mut state = RleState::ReadingLiteral;
    let mut filled = 0usize;

    for word in 0..words {
        let value = input.get_f32();
        match state {
            RleState::ReadingLiteral => {
                if is_missing(value, mdi) {
                    state = RleState::ReadingRunLength;
                    continue;
                }
                if filled == npts {
                    return Err(DecodeFailure::RunOverflow(format!(
                        "literal at word {} exceeds {} grid points",
                        word, npts
                    )));
                }
                out[filled] = value;
                filled += 1;
            }
            RleState::ReadingRunLength => {
                if !value.is_finite() || value < 1.0 || value.fract() != 0.0 {
                    return Err(DecodeFailure::InvalidRunLength(format!(
                        "run length {} at word {}",
                        value, word
                    )));
                }
                let run = value as usize;
                if run > npts - filled {
                    return Err(DecodeFailure::RunOverflow(format!(
                        "run of {} missing points at word {} exceeds {} remaining grid points",
                        run,
                        word,
                        npts - filled
                    )));
                }
                trace!(start = filled, run, "Missing data run");
                out[filled..filled + run].fill(mdi);
                filled += run;
                state = RleState::ReadingLiteral;
            }
        }
    }

    if state == RleState::ReadingRunLength {
        return Err(DecodeFailure::TruncatedRun(
            "input ends after a missing data indicator with no run length".to_string(),
        ));
    }
    if filled != npts {
        return Err(DecodeFailure::ShapeMismatch(format!(
            "decoded {} points, grid has {}",
            filled, npts
        )));
    }
    Ok(())
}

/// Decode a run-length encoded PP field.
///
/// `bytes.len() / 4` words are read; a trailing partial word is ignored.
/// Fails unless the words expand to exactly `rows * cols` points.
pub fn rle_decode(bytes: &[u8], rows: i32, cols: i32, mdi: f32) -> Result<Grid> {
    let shape = GridShape::new(rows, cols)?;
    let words = bytes.len() / BYTES_PER_PP_WORD;
    debug!(rows, cols, bytes = bytes.len(), words, mdi, "RLE decoding PP field");

    if bytes.len() % BYTES_PER_PP_WORD != 0 {
        warn!(
            trailing = bytes.len() % BYTES_PER_PP_WORD,
            "Ignoring trailing bytes that do not form a whole word"
        );
    }

    let mut data = alloc_points(shape.npts())?;
    if let Err(failure) = expand(bytes, words, mdi, &mut data) {
        warn!(%failure, "RLE decode failed");
        return Err(PackingError::decode(PackingMethod::Rle, failure));
    }

    Ok(Grid::from_parts(shape, data))
}
