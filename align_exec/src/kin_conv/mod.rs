//! # Kinematics conversion module
//!
//! Converts a correction angle into the wheel rate that performs it as a
//! pivot turn, and a linear distance into the wheel rate that covers it as a
//! straight advance. Both conversions assume the motion is completed within a
//! single step of fixed duration.
//!
//! Every length in the vehicle geometry is in meters. The rates produced here
//! are handed to a drive that must be configured with the same wheel radius,
//! otherwise the vehicle silently executes the wrong motion.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod geometry;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use geometry::*;
