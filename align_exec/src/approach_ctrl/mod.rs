//! # Approach control module
//!
//! Approach control drives the vehicle onto a fiducial target. Each cycle it
//! samples the vision sensor, plans an aim point through [`crate::traj_plan`],
//! converts the correction into a rate command through [`crate::kin_conv`]
//! and, depending on the actuation policy, hands that command to the drive.
//!
//! A run moves through the following modes:
//!
//! ```text
//! Idle --begin--> Running --+--> Arrived --+--> Stopped --reset--> Idle
//!                           |              |
//!                           +--> TimedOut -+
//! ```
//!
//! `Arrived` and `TimedOut` are left in the same cycle they are entered, after
//! a single stop command has been sent to the drive, so they are only visible
//! through the [`ApproachOutcome`] held by the controller once it is
//! `Stopped`.
//!
//! While the target is out of view the controller holds: no command is issued
//! and the previous command stays in effect on the drive. The run budget keeps
//! counting while holding.
//!
//! Arrival is only tested against a visible target. A sensor which has lost
//! the target reports a distance of zero, so an unconditional distance test
//! would end every run the moment the target left the field of view.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;
pub mod tm;

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

/// The possible modes of execution of ApproachCtrl. Each mode is handled by
/// a `mode_xyz` function.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum ApproachMode {
    /// Waiting for a run to begin.
    Idle,

    /// Planning and commanding the approach.
    Running,

    /// The vehicle is within the arrival threshold of the target.
    Arrived,

    /// The run budget was spent before arriving.
    TimedOut,

    /// The drive has been stopped and the run is over.
    Stopped
}

/// How a finished run ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum ApproachOutcome {
    Arrived,
    TimedOut,
    Aborted
}

/// Whether computed rate commands are sent to the drive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actuation {
    /// Commands are forwarded to the drive every cycle.
    Drive,

    /// Commands are only reported. The drive still receives the final stop.
    ReportOnly
}

/// Possible errors that can occur during ApproachCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ApproachCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid approach parameters: {0}")]
    InvalidConfig(ConfigError),

    #[error("Cannot begin a run while in {0:?} mode")]
    NotIdle(ApproachMode),

    #[error("Cannot reset while a run is in progress")]
    StillRunning,

    #[error("The time step must be finite and not negative, found {0}")]
    InvalidTimeStep(f64),
}
