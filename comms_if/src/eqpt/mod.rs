//! # Equipment Interface
//!
//! This module defines the contracts the control core has with its equipment. The core only ever
//! consumes these traits, the implementations live with the hardware (or simulation).

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod drive;
pub mod vision;
