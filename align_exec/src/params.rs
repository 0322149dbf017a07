//! # Alignment Executable Parameters
//!
//! This module provides parameters for the alignment executable, and the
//! configuration checks shared by every module's parameters.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignExecParams {
    /// Target period of one cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// If true the approach telemetry is archived as CSV in the session directory.
    pub archive_tm: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A parameter value that would produce undefined motion.
#[derive(Debug, Copy, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Parameter `{name}` must be finite and greater than zero, found {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("Parameter `{name}` must be finite and not negative, found {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("Parameter `{name}` must be less than {limit}, found {value}")]
    NotBelow { name: &'static str, value: f64, limit: f64 },

    #[error("Step size must be in the range (0, 1], found {0}")]
    StepSizeOutOfRange(f64),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Check that `value` is finite and strictly positive.
pub fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    }
    else {
        Err(ConfigError::NotPositive { name, value })
    }
}

/// Check that `value` is finite and zero or positive.
pub fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    }
    else {
        Err(ConfigError::Negative { name, value })
    }
}

/// Check that `value` is strictly below `limit`.
pub fn check_below(name: &'static str, value: f64, limit: f64) -> Result<(), ConfigError> {
    if value < limit {
        Ok(())
    }
    else {
        Err(ConfigError::NotBelow { name, value, limit })
    }
}

impl AlignExecParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("cycle_period_s", self.cycle_period_s)
    }
}
