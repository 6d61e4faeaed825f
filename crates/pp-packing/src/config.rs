//! Write-side packing parameters.

use crate::error::{PackingError, Result};
use crate::method::PackingMethod;
use crate::pack::{pack_field, PackedField};
use crate::wgdos::{MAX_ACCURACY, MIN_ACCURACY};
use serde::{Deserialize, Serialize};

/// The UM real missing data indicator.
pub const RMDI: f32 = -1073741824.0;

/// Parameters for packing a field, loadable from caller settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackingConfig {
    /// Packing method to apply.
    pub method: PackingMethod,

    /// WGDOS accuracy exponent; values are kept to within `2^accuracy / 2`.
    pub accuracy: i32,

    /// Bits per value hint. Accepted and ignored.
    pub n_bits: i32,

    /// Missing data indicator.
    pub missing_data_indicator: f32,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            method: PackingMethod::None,
            accuracy: -6,
            n_bits: 0,
            missing_data_indicator: RMDI,
        }
    }
}

impl PackingConfig {
    /// Config for the given method with default parameters.
    pub fn for_method(method: PackingMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.method == PackingMethod::Wgdos
            && !(MIN_ACCURACY..=MAX_ACCURACY).contains(&self.accuracy)
        {
            return Err(format!(
                "accuracy must be {}..={} for WGDOS, got {}",
                MIN_ACCURACY, MAX_ACCURACY, self.accuracy
            ));
        }

        Ok(())
    }
}

/// Pack a field using the parameters in `config`.
pub fn pack_with_config(
    config: &PackingConfig,
    data: &[f32],
    rows: i32,
    cols: i32,
) -> Result<PackedField> {
    config.validate().map_err(PackingError::InvalidConfig)?;
    pack_field(
        config.method.code(),
        data,
        rows,
        cols,
        config.missing_data_indicator,
        config.accuracy,
        config.n_bits,
    )
}
