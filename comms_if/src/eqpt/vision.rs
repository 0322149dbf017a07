//! # Vision Sensor Interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A snapshot of the latest vision reading of the fiducial target.
///
/// Observations are sampled once per cycle and must not be kept between cycles.
///
/// Frame: robot body, `x` lateral and `y` forward.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetObservation {
    /// Whether the sensor currently sees the target. When `false` the remaining fields are
    /// whatever the sensor last reported and must not be used.
    pub visible: bool,

    /// Lateral offset of the target.
    ///
    /// Units: meters
    pub x_offset_m: f64,

    /// Forward offset of the target.
    ///
    /// Units: meters
    pub y_offset_m: f64,

    /// Yaw of the target relative to the robot.
    ///
    /// Units: degrees
    pub z_rotation_deg: f64,

    /// Straight-line distance to the target as reported by the sensor.
    ///
    /// Units: meters
    pub distance_m: f64,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A sensor reporting the pose of the fiducial target relative to the robot.
///
/// All reads are polled by the consumer, the sensor is expected to return its latest value without
/// blocking.
pub trait VisionSensor {
    /// True if the target is currently in view.
    fn is_target_visible(&mut self) -> bool;

    /// Lateral offset of the target in meters.
    fn lateral_offset_m(&mut self) -> f64;

    /// Forward offset of the target in meters.
    fn forward_offset_m(&mut self) -> f64;

    /// Yaw of the target relative to the robot in degrees.
    fn target_yaw_deg(&mut self) -> f64;

    /// Straight-line distance to the target in meters.
    fn straight_line_distance_m(&mut self) -> f64;

    /// Sample every quantity into a single observation.
    fn observe(&mut self) -> TargetObservation {
        TargetObservation {
            visible: self.is_target_visible(),
            x_offset_m: self.lateral_offset_m(),
            y_offset_m: self.forward_offset_m(),
            z_rotation_deg: self.target_yaw_deg(),
            distance_m: self.straight_line_distance_m(),
        }
    }
}

impl VisionSensor for TargetObservation {
    fn is_target_visible(&mut self) -> bool {
        self.visible
    }

    fn lateral_offset_m(&mut self) -> f64 {
        self.x_offset_m
    }

    fn forward_offset_m(&mut self) -> f64 {
        self.y_offset_m
    }

    fn target_yaw_deg(&mut self) -> f64 {
        self.z_rotation_deg
    }

    fn straight_line_distance_m(&mut self) -> f64 {
        self.distance_m
    }
}
