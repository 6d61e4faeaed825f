//! Packing and unpacking of PP field data.
//!
//! PP records store their field data either unpacked (big-endian 32-bit
//! floats), WGDOS packed (lossy, row-adaptive bit packing) or run-length
//! encoded (runs of the missing data indicator collapsed). This crate converts
//! between those layouts and dense row-major grids of `f32`.
//!
//! # Example
//!
//! ```
//! use pp_packing::{pack_field, wgdos_unpack, PACKING_TYPE_WGDOS};
//!
//! let mdi = -1.0e30;
//! let data = [1.0, 2.5, mdi, 4.0, 0.0, 7.25];
//! let packed = pack_field(PACKING_TYPE_WGDOS, &data, 2, 3, mdi, -6, 0).unwrap();
//! let grid = wgdos_unpack(packed.as_bytes(), 2, 3, mdi).unwrap();
//! assert_eq!(grid.get(0, 2), Some(mdi));
//! assert!((grid.get(1, 2).unwrap() - 7.25).abs() <= 1.0 / 128.0);
//! ```

mod bits;
pub mod config;
pub mod error;
pub mod grid;
pub mod method;
pub mod pack;
pub mod raw;
pub mod rle;
pub mod wgdos;

pub use config::{pack_with_config, PackingConfig, RMDI};
pub use error::{DecodeFailure, PackingError, Result};
pub use grid::{Grid, GridShape};
pub use method::{
    PackingMethod, BYTES_PER_PP_WORD, PACKING_TYPE_NONE, PACKING_TYPE_RLE, PACKING_TYPE_WGDOS,
};
pub use pack::{pack_field, PackedField};
pub use raw::raw_unpack;
pub use rle::rle_decode;
pub use wgdos::{read_field_header, wgdos_unpack, FieldHeader};
