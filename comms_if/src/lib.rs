//! # Communications interface crate.
//!
//! Provides the interfaces between the alignment software and its equipment:
//! the vision sensor which observes the fiducial target and the drive which
//! executes rate commands.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Interface definitions for equipment (vision sensor and drive)
pub mod eqpt;
