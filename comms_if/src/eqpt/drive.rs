//! # Drive Equipment Commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A rate command for a differential drive.
///
/// The turn rate follows the right hand rule about the robot's Z+ (upwards) axis, so a positive
/// turn rate rotates the robot to the left.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RateCommand {
    /// Wheel rate used to turn the robot.
    ///
    /// Units: revolutions/minute
    pub turn_rate_rpm: f64,

    /// Wheel rate used to advance the robot.
    ///
    /// Units: revolutions/minute
    pub move_rate_rpm: f64,
}

/// Wheel rate demands for the left and right sides of a differential drive.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelDems {
    /// Units: revolutions/minute
    pub left_rpm: f64,

    /// Units: revolutions/minute
    pub right_rpm: f64,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A drive able to execute rate commands.
///
/// The drive is presumed to run its own closed-loop velocity control. A command is applied
/// immediately and held until the next call.
pub trait DriveActuator {
    /// Apply the given rate command.
    fn set_rates(&mut self, cmd: RateCommand);

    /// Bring the drive to a stop, equivalent to a `(0, 0)` rate command.
    fn stop(&mut self) {
        self.set_rates(RateCommand::STOP)
    }
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RateCommand {
    /// The command which stops the drive.
    pub const STOP: RateCommand = RateCommand {
        turn_rate_rpm: 0.0,
        move_rate_rpm: 0.0,
    };

    /// True if this command demands no motion.
    pub fn is_stop(&self) -> bool {
        self.turn_rate_rpm == 0.0 && self.move_rate_rpm == 0.0
    }
}

impl WheelDems {
    /// Demands with both sides stationary.
    pub const STOPPED: WheelDems = WheelDems {
        left_rpm: 0.0,
        right_rpm: 0.0,
    };
}
