//! Unpacked field data: big-endian 32-bit floats, one per grid point.

use bytes::{Buf, BufMut};
use tracing::{debug, warn};

use crate::error::{DecodeFailure, PackingError, Result};
use crate::grid::{alloc_points, Grid, GridShape};
use crate::method::{PackingMethod, BYTES_PER_PP_WORD};

/// Copy field values into the PP big-endian word layout.
pub(crate) fn pack(data: &[f32]) -> Result<Vec<u8>> {
    let len = data.len() * BYTES_PER_PP_WORD;
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| PackingError::AllocError { points: data.len() })?;

    for &value in data {
        out.put_f32(value);
    }
    Ok(out)
}

/// Read an unpacked field into a grid.
///
/// The buffer must hold at least `rows * cols` whole words; anything after
/// that (record padding) is ignored.
pub fn raw_unpack(bytes: &[u8], rows: i32, cols: i32) -> Result<Grid> {
    let shape = GridShape::new(rows, cols)?;
    debug!(rows, cols, bytes = bytes.len(), "Reading unpacked PP field");

    let npts = shape.npts();
    let available = bytes.len() / BYTES_PER_PP_WORD;
    if available < npts {
        let failure = DecodeFailure::TruncatedData(format!(
            "{} words available, field needs {}",
            available, npts
        ));
        warn!(%failure, "Unpacked field too short");
        return Err(PackingError::decode(PackingMethod::None, failure));
    }

    let mut data = alloc_points(npts)?;
    let mut buf = bytes;
    for value in data.iter_mut() {
        *value = buf.get_f32();
    }

    Ok(Grid::from_parts(shape, data))
}
