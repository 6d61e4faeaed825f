//! Test data generators for creating synthetic PP fields.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite. All grids are row-major
//! (`rows` rows of `cols` points).

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0); // col=1, row=0
/// assert_eq!(grid[10], 1.0);   // col=0, row=1
/// ```
pub fn create_test_grid(cols: usize, rows: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates a test grid with temperature-like values in Kelvin.
///
/// The values range from approximately 250K to 310K, as a gradient from
/// cold (first point) to warm (last point).
pub fn create_temperature_grid(cols: usize, rows: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let x_factor = col as f32 / cols.max(1) as f32;
            let y_factor = row as f32 / rows.max(1) as f32;
            data.push(250.0 + (x_factor * 30.0) + (y_factor * 30.0));
        }
    }
    data
}

/// Creates a grid with random-ish but deterministic precipitation values.
///
/// Most points are exactly zero (no precipitation), the rest are up to 50mm,
/// which is the shape of field the WGDOS zero bitmap targets.
pub fn create_precipitation_grid(cols: usize, rows: usize, seed: u32) -> Vec<f32> {
    let mut data = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let hash = simple_hash(col as u32, row as u32, seed);
            let precip = if hash % 4 == 0 {
                (hash % 5000) as f32 / 100.0
            } else {
                0.0
            };
            data.push(precip);
        }
    }
    data
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(cols: usize, rows: usize, value: f32) -> Vec<f32> {
    vec![value; cols * rows]
}

/// Creates a temperature grid with `mdi` at the given `(col, row)` positions.
///
/// Positions outside the grid are ignored.
pub fn create_grid_with_missing(
    cols: usize,
    rows: usize,
    mdi: f32,
    missing_positions: &[(usize, usize)],
) -> Vec<f32> {
    let mut data = create_temperature_grid(cols, rows);
    for &(col, row) in missing_positions {
        if col < cols && row < rows {
            data[row * cols + col] = mdi;
        }
    }
    data
}

/// Creates a sea surface temperature style field: the first `land_rows` rows
/// are entirely missing (land), and every row after that has a missing run of
/// `coast_width` points at its start.
///
/// Produces long missing runs that cross row boundaries, which is the case
/// run-length encoding is built for.
pub fn create_land_masked_grid(
    cols: usize,
    rows: usize,
    mdi: f32,
    land_rows: usize,
    coast_width: usize,
) -> Vec<f32> {
    let mut data = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            if row < land_rows || col < coast_width {
                data.push(mdi);
            } else {
                data.push(271.0 + (row * 7 + col * 3) as f32 / 100.0);
            }
        }
    }
    data
}
