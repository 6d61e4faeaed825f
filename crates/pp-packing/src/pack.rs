//! Method dispatch for packing field data.

use bytes::Bytes;
use tracing::debug;

use crate::error::{PackingError, Result};
use crate::grid::GridShape;
use crate::method::{PackingMethod, BYTES_PER_PP_WORD};
use crate::{raw, rle, wgdos};

/// An owned packed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedField {
    method: PackingMethod,
    data: Bytes,
}

impl PackedField {
    /// Method the field was packed with.
    pub fn method(&self) -> PackingMethod {
        self.method
    }

    /// The packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Packed size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Packed size in whole PP words.
    pub fn words(&self) -> usize {
        self.data.len() / BYTES_PER_PP_WORD
    }

    /// Consume the field, returning its buffer.
    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

/// Pack `data` (row-major, `rows * cols` values) with the given method code.
///
/// `bpacc` is only used by WGDOS. `n_bits` is accepted for compatibility and
/// has no effect.
pub fn pack_field(
    method: i32,
    data: &[f32],
    rows: i32,
    cols: i32,
    mdi: f32,
    bpacc: i32,
    n_bits: i32,
) -> Result<PackedField> {
    let method = PackingMethod::try_from(method)?;
    let shape = GridShape::new(rows, cols)?;
    if data.len() != shape.npts() {
        return Err(PackingError::DataLength {
            expected: shape.npts(),
            actual: data.len(),
        });
    }

    debug!(%method, rows, cols, bpacc, n_bits, "Packing PP field");
    if n_bits != 0 {
        debug!(n_bits, "Ignoring bits per value hint");
    }

    let packed = match method {
        PackingMethod::None => raw::pack(data)?,
        PackingMethod::Wgdos => wgdos::pack(data, shape, mdi, bpacc)?,
        PackingMethod::Rle => rle::encode(data, mdi)?,
    };

    debug!(
        %method,
        bytes = packed.len(),
        ratio = packed.len() as f64 / (shape.npts().max(1) * BYTES_PER_PP_WORD) as f64,
        "Packed PP field"
    );

    Ok(PackedField {
        method,
        data: Bytes::from(packed),
    })
}
