//! # Trajectory planning module
//!
//! Trajectory planning turns one observation of the fiducial target into an
//! aim point and the correction angle the vehicle must turn by to head toward
//! it.
//!
//! The target's heading line (the line through the target, rotated by the
//! target's yaw) crosses the robot's lateral axis at the intercept distance.
//! The aim point is a blend between aiming straight at the target and aiming
//! at that intercept, weighted by the step size. It falls short
//! of the target and is re-evaluated on every cycle.
//!
//! Because the aim point is recomputed from live sensor data each cycle the
//! approach corrects itself against sensor and odometry drift, but successive
//! aim points only ever approach the target and never reach it. Termination is
//! left to the arrival threshold in the approach controller.
//!
//! All angles at the interface of this module are in degrees.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod aim_point;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use aim_point::*;
