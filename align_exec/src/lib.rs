//! # Alignment library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to access items defined
//! inside the alignment crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Approach control - drives the vehicle onto the target until arrival or timeout
pub mod approach_ctrl;

/// Drive control - mixes rate commands onto the left and right wheels
pub mod drive_ctrl;

/// Kinematics conversion - converts angles and distances into wheel rates
pub mod kin_conv;

/// Executable and shared parameter definitions
pub mod params;

/// Simulation - a flat world providing a vision sensor and integrating wheel demands
pub mod sim;

/// Trajectory planning - aim point and correction angle calculations
pub mod traj_plan;
