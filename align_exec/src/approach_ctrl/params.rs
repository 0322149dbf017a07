//! Parameters structure for ApproachCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::Actuation;
use crate::kin_conv::VehicleGeometry;
use crate::params::{check_positive, ConfigError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for approach control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {

    // ---- PLANNING ----

    /// Fraction of the way along the approach to aim for each cycle, in
    /// `(0, 1]`.
    pub step_size: f64,

    // ---- TERMINATION ----

    /// Straight-line distance to the target at which the vehicle has arrived.
    ///
    /// Units: meters
    pub arrival_threshold_m: f64,

    /// Maximum cumulative time a run may take.
    ///
    /// Units: seconds
    pub max_run_time_s: f64,

    // ---- ACTUATION ----

    pub actuation: Actuation,

    pub geometry: VehicleGeometry,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step_size > 0.0 && self.step_size <= 1.0) {
            return Err(ConfigError::StepSizeOutOfRange(self.step_size));
        }

        check_positive("arrival_threshold_m", self.arrival_threshold_m)?;
        check_positive("max_run_time_s", self.max_run_time_s)?;

        self.geometry.validate()
    }
}
