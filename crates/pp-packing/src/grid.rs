//! Grid dimensions and the dense field grid produced by unpacking.

use crate::error::{PackingError, Result};

/// Validated dimensions of a PP field.
///
/// The codecs count points with 32-bit signed arithmetic, so a shape is only
/// accepted when `rows * cols` is guaranteed to fit in an `i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    rows: usize,
    cols: usize,
}

impl GridShape {
    /// Validate `rows` x `cols` before anything is allocated.
    ///
    /// Rejects the shape when `rows > 0` and `cols >= i32::MAX / (rows + 1)`.
    pub fn new(rows: i32, cols: i32) -> Result<Self> {
        if rows < 0 || cols < 0 {
            return Err(PackingError::NegativeDimensions { rows, cols });
        }

        // rows + 1 overflows i32 when rows == i32::MAX
        let limit = i64::from(i32::MAX) / (i64::from(rows) + 1);
        if rows > 0 && i64::from(cols) >= limit {
            return Err(PackingError::SizeOverflow { rows, cols });
        }

        Ok(Self {
            rows: rows as usize,
            cols: cols as usize,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of points per row.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of grid points.
    pub fn npts(&self) -> usize {
        self.rows * self.cols
    }

    /// Check if the grid has no points.
    pub fn is_empty(&self) -> bool {
        self.npts() == 0
    }
}

/// Allocate a zero-filled point buffer, reporting allocation failure
/// instead of aborting.
pub(crate) fn alloc_points(npts: usize) -> Result<Vec<f32>> {
    let mut data = Vec::new();
    data.try_reserve_exact(npts)
        .map_err(|_| PackingError::AllocError { points: npts })?;
    data.resize(npts, 0.0);
    Ok(data)
}

/// True when `value` is the missing data indicator.
///
/// Bitwise equality is also accepted so a NaN indicator still matches itself.
#[inline]
pub(crate) fn is_missing(value: f32, mdi: f32) -> bool {
    value == mdi || value.to_bits() == mdi.to_bits()
}

/// A dense row-major grid of unpacked field values.
///
/// Owns its buffer; whoever receives a `Grid` from an unpack call owns the
/// data from then on.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Grid {
    pub(crate) fn from_parts(shape: GridShape, data: Vec<f32>) -> Self {
        debug_assert_eq!(shape.npts(), data.len());
        Self {
            rows: shape.rows(),
            cols: shape.cols(),
            data,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of points per row.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Get the value at a specific grid position.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Borrow one row of the grid.
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.data.get(start..start + self.cols)
    }

    /// Iterate over the rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.cols.max(1))
    }

    /// All values in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Take ownership of the row-major values.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_accepts_small_grids() {
        let shape = GridShape::new(3, 20).unwrap();
        assert_eq!(shape.rows(), 3);
        assert_eq!(shape.cols(), 20);
        assert_eq!(shape.npts(), 60);
        assert!(!shape.is_empty());
    }

    #[test]
    fn test_shape_zero_rows_is_empty() {
        let shape = GridShape::new(0, 100).unwrap();
        assert!(shape.is_empty());
        assert_eq!(GridShape::new(0, i32::MAX).unwrap().npts(), 0);
    }

    #[test]
    fn test_shape_overflow_guard() {
        assert_eq!(
            GridShape::new(1, i32::MAX),
            Err(PackingError::SizeOverflow {
                rows: 1,
                cols: i32::MAX
            })
        );
        // i32::MAX / 46341 == 46340
        assert!(GridShape::new(46340, 46340).is_err());
        assert!(GridShape::new(i32::MAX, 1).is_err());
        // Just under the limit: cols = i32::MAX / (rows + 1) - 1
        let rows = 1000;
        let cols = i32::MAX / (rows + 1) - 1;
        assert!(GridShape::new(rows, cols).is_ok());
        assert!(GridShape::new(rows, cols + 1).is_err());
    }

    #[test]
    fn test_shape_negative() {
        assert_eq!(
            GridShape::new(-1, 4),
            Err(PackingError::NegativeDimensions { rows: -1, cols: 4 })
        );
        assert!(GridShape::new(4, -1).is_err());
    }

    #[test]
    fn test_grid_accessors() {
        let shape = GridShape::new(2, 3).unwrap();
        let grid = Grid::from_parts(shape, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.get(1, 2), Some(6.0));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 3), None);
        assert_eq!(grid.row(1), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(grid.row(2), None);
        assert_eq!(grid.iter_rows().count(), 2);
        assert_eq!(grid.into_vec().len(), 6);
    }

    #[test]
    fn test_alloc_points_zero_filled() {
        let data = alloc_points(16).unwrap();
        assert_eq!(data.len(), 16);
        assert!(data.iter().all(|&v| v == 0.0));
    }
}
