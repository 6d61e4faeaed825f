//! Packing method selectors (the PP header LBPACK "n1" digit).

use crate::error::PackingError;
use serde::{Deserialize, Serialize};

/// Selector code for unpacked (raw 32-bit float) field data.
pub const PACKING_TYPE_NONE: i32 = 0;
/// Selector code for WGDOS packed field data.
pub const PACKING_TYPE_WGDOS: i32 = 1;
/// Selector code for run-length encoded field data.
pub const PACKING_TYPE_RLE: i32 = 4;

/// Size of one PP word in bytes.
pub const BYTES_PER_PP_WORD: usize = 4;

/// How a PP field's data section is packed.
///
/// The packed buffer itself carries no tag; callers know the method from the
/// record header. Codes 2 and 3 are reserved by the archive format for schemes
/// this crate does not implement and are rejected rather than read as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingMethod {
    /// Raw big-endian 32-bit floats.
    #[default]
    None,
    /// Lossy WGDOS bit packing.
    Wgdos,
    /// Run-length encoding of missing data.
    Rle,
}

impl PackingMethod {
    /// The numeric selector code for this method.
    pub fn code(&self) -> i32 {
        match self {
            Self::None => PACKING_TYPE_NONE,
            Self::Wgdos => PACKING_TYPE_WGDOS,
            Self::Rle => PACKING_TYPE_RLE,
        }
    }

    /// Parse from name (case-insensitive).
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "unpacked" => Some(Self::None),
            "wgdos" => Some(Self::Wgdos),
            "rle" => Some(Self::Rle),
            _ => None,
        }
    }

    /// Get the method name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Wgdos => "WGDOS",
            Self::Rle => "RLE",
        }
    }
}

impl TryFrom<i32> for PackingMethod {
    type Error = PackingError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            PACKING_TYPE_NONE => Ok(Self::None),
            PACKING_TYPE_WGDOS => Ok(Self::Wgdos),
            PACKING_TYPE_RLE => Ok(Self::Rle),
            other => Err(PackingError::UnsupportedMethod(other)),
        }
    }
}

impl std::fmt::Display for PackingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
