//! Parameters structure for DriveCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::DriveMode;
use crate::params::{check_below, check_non_negative, check_positive, ConfigError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for drive control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {

    // ---- MIXING ----

    /// How rate commands are mixed onto the wheels.
    pub mode: DriveMode,

    /// Turn rate magnitude above which a `Pivot` mode drive turns in place.
    ///
    /// Units: revolutions/minute
    pub pivot_threshold_rpm: f64,

    // ---- CAPABILITIES ----

    /// Maximum wheel rate magnitude. Also the full scale of normalised
    /// inputs.
    ///
    /// Units: revolutions/minute
    pub max_wheel_rate_rpm: f64,

    /// Wheel demands with a magnitude below this are zeroed.
    ///
    /// Units: revolutions/minute
    pub rate_deadband_rpm: f64,

    // ---- INPUT SHAPING ----

    /// Normalised input magnitude treated as zero, in `[0, 1)`.
    pub input_deadband: f64,

    /// Exponent of the response curve applied to normalised inputs.
    pub response_exponent: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check the parameters describe a drive that can be commanded safely.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("pivot_threshold_rpm", self.pivot_threshold_rpm)?;
        check_positive("max_wheel_rate_rpm", self.max_wheel_rate_rpm)?;
        check_non_negative("rate_deadband_rpm", self.rate_deadband_rpm)?;
        check_non_negative("input_deadband", self.input_deadband)?;
        check_below("input_deadband", self.input_deadband, 1.0)?;
        check_positive("response_exponent", self.response_exponent)
    }
}
