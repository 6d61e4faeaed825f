//! Common test fixtures for PP field packing tests.

/// Missing data indicators seen in PP files.
pub mod mdi {
    /// UM real missing data indicator.
    pub const RMDI: f32 = -1073741824.0;

    /// Large positive sentinel used by some archive tooling.
    pub const LARGE: f32 = 1.07e30;

    /// Conventional PP header BMDI.
    pub const BMDI: f32 = -1.0e30;

    /// NaN sentinel; only matches itself bit for bit.
    pub const NAN: f32 = f32::NAN;
}

/// Common field shapes as `(rows, cols)`.
pub mod shape {
    /// Smallest non-empty field.
    pub const SINGLE_POINT: (i32, i32) = (1, 1);

    /// N96 global grid.
    pub const N96: (i32, i32) = (145, 192);

    /// N216 global grid.
    pub const N216: (i32, i32) = (325, 432);

    /// Square benchmark tile.
    pub const TILE_256: (i32, i32) = (256, 256);

    /// Largest square shape the size guard accepts.
    pub const LARGEST_SQUARE: (i32, i32) = (46339, 46339);

    /// Smallest square shape the size guard rejects.
    pub const SMALLEST_OVERSIZE_SQUARE: (i32, i32) = (46340, 46340);
}

/// A 3 x 20 field of mixed magnitudes.
///
/// The first four points of each row hold the interesting values: wide
/// ranges, values differing only in the fourth decimal, and tiny values next
/// to large ones. The remaining 16 points of each row are zero.
pub mod mixed_field {
    /// Number of rows.
    pub const ROWS: i32 = 3;

    /// Points per row.
    pub const COLS: i32 = 20;

    /// Leading values of each row.
    pub const LEADING: [[f32; 4]; 3] = [
        [77.3, 2.1, 3.0, 4.0],
        [999.0005, 999.0006, 999.0007, 999.0008],
        [99999.03, 999.04, 9.05, 0.06],
    ];

    /// The full field in row-major order.
    pub fn data() -> Vec<f32> {
        let mut data = vec![0.0; (ROWS * COLS) as usize];
        for (row, values) in LEADING.iter().enumerate() {
            let start = row * COLS as usize;
            data[start..start + values.len()].copy_from_slice(values);
        }
        data
    }
}
