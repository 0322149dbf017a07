//! # Drive control module
//!
//! Drive control is the single implementation of the drive actuator contract.
//! It turns rate commands (or normalised arcade/manual inputs) into left and
//! right wheel rate demands for the differential drive, which then run their
//! own velocity control.
//!
//! How a rate command is mixed onto the wheels is set by the [`DriveMode`]:
//!
//! - `Pivot` - rotation takes priority. While the turn rate is above the pivot
//!   threshold the wheels run at equal and opposite rates, otherwise both
//!   wheels advance at the move rate.
//! - `Tank` - the turn rate is blended with the move rate, left at
//!   `move - turn` and right at `move + turn`.
//!
//! Wheel demands smaller than the rate deadband are zeroed to avoid creep,
//! and demands beyond the maximum wheel rate are saturated.
//!
//! Normalised inputs in `[-1, 1]` pass through an input deadband and a power
//! response curve before being scaled by the maximum wheel rate:
//!
//! ```text
//! out = sign(u) * ((|u| - deadband) / (1 - deadband)) ^ response_exponent
//! ```

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// Internal
pub use params::*;
pub use state::*;

use crate::params::ConfigError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// How rate commands are mixed onto the left and right wheels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveMode {
    /// Turn in place first, advance once the turn rate has dropped away.
    Pivot,

    /// Differential blend of the turn and move rates.
    Tank
}

/// Possible errors that can occur during DriveCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum DriveCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid drive parameters: {0}")]
    InvalidConfig(ConfigError),
}
