//! Vehicle geometry and the wheel rate conversions derived from it

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// Internal
use crate::params::{check_positive, ConfigError};
use comms_if::eqpt::drive::RateCommand;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Fixed geometry of the vehicle, immutable for the lifetime of a run.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleGeometry {
    /// The radius of the drive wheels.
    ///
    /// Units: meters
    pub wheel_radius_m: f64,

    /// Effective radius swept by the wheels about the vehicle centre during a
    /// pivot turn (derived from the track width).
    ///
    /// Units: meters
    pub turn_radius_m: f64,

    /// The time in which a single step of motion is executed.
    ///
    /// Units: seconds
    pub step_duration_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehicleGeometry {

    /// Check that every constant is finite and greater than zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("wheel_radius_m", self.wheel_radius_m)?;
        check_positive("turn_radius_m", self.turn_radius_m)?;
        check_positive("step_duration_s", self.step_duration_s)
    }

    /// Circumference of the drive wheels.
    ///
    /// Units: meters
    pub fn wheel_circumference_m(&self) -> f64 {
        2.0 * PI * self.wheel_radius_m
    }

    /// Wheel rate which turns the vehicle on the spot by `angle_deg` within
    /// one step.
    ///
    /// The arc swept by each wheel is the fraction of a full turn times the
    /// circumference of the turn circle.
    ///
    /// Units: revolutions/minute
    pub fn angle_to_wheel_rate_rpm(&self, angle_deg: f64) -> f64 {
        let arc_length_m = (angle_deg / 360.0) * 2.0 * PI * self.turn_radius_m;

        60.0 * arc_length_m / self.wheel_circumference_m() / self.step_duration_s
    }

    /// Wheel rate which advances the vehicle by `distance_m` within one step.
    ///
    /// Units: revolutions/minute
    pub fn distance_to_wheel_rate_rpm(&self, distance_m: f64) -> f64 {
        (60.0 * distance_m) / (self.step_duration_s * self.wheel_circumference_m())
    }

    /// Build the rate command for a correction angle and a distance.
    pub fn rate_command(&self, angle_deg: f64, distance_m: f64) -> RateCommand {
        RateCommand {
            turn_rate_rpm: self.angle_to_wheel_rate_rpm(angle_deg),
            move_rate_rpm: self.distance_to_wheel_rate_rpm(distance_m),
        }
    }
}
