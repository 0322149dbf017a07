//! # Simulation module
//!
//! A flat world containing the vehicle and a single fixed target, standing in
//! for the vision sensor and the drive motors when running without hardware.
//!
//! World frame: `x` east, `y` north. A heading of zero faces along `+y` and
//! headings increase anticlockwise. In the vehicle's body frame `x` is lateral
//! (positive right) and `y` forward, matching the vision sensor interface.
//!
//! The wheels are integrated with the same [`VehicleGeometry`] the approach
//! controller converts its commands with, so the two can never disagree.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use crate::kin_conv::VehicleGeometry;
use crate::params::{check_non_negative, check_positive, ConfigError};
use comms_if::eqpt::{drive::WheelDems, vision::VisionSensor};
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A position and heading in the world frame.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2 {
    /// Units: meters
    pub x_m: f64,

    /// Units: meters
    pub y_m: f64,

    /// Units: degrees
    pub heading_deg: f64,
}

/// Parameters of the simulated world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    pub initial_vehicle_pose: Pose2,

    pub target_pose: Pose2,

    /// Full angular width of the camera's field of view.
    ///
    /// Units: degrees
    pub fov_deg: f64,

    /// Furthest distance at which the target can be seen.
    ///
    /// Units: meters
    pub max_range_m: f64,
}

/// The simulated world.
#[derive(Debug, Clone)]
pub struct SimWorld {
    params: Params,

    geometry: VehicleGeometry,

    vehicle: Pose2,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("fov_deg", self.fov_deg)?;
        check_non_negative("max_range_m", self.max_range_m)
    }
}

impl SimWorld {
    /// Create the world, moving the vehicle with the given geometry.
    pub fn new(params: Params, geometry: VehicleGeometry) -> Result<Self, ConfigError> {
        params.validate()?;
        geometry.validate()?;

        Ok(Self {
            vehicle: params.initial_vehicle_pose,
            params,
            geometry,
        })
    }

    pub fn vehicle_pose(&self) -> Pose2 {
        self.vehicle
    }

    /// Position of the target in the vehicle's body frame, `(lateral,
    /// forward)`.
    pub fn target_in_body(&self) -> Vector2<f64> {
        let head = self.vehicle.heading_deg.to_radians();
        let forward = Vector2::new(-head.sin(), head.cos());
        let right = Vector2::new(head.cos(), head.sin());

        let diff = Vector2::new(
            self.params.target_pose.x_m - self.vehicle.x_m,
            self.params.target_pose.y_m - self.vehicle.y_m
        );

        Vector2::new(diff.dot(&right), diff.dot(&forward))
    }

    /// Advance the vehicle by `dt_s` under the given wheel demands using
    /// differential drive kinematics.
    pub fn step(&mut self, dems: &WheelDems, dt_s: f64) {
        let circ_m = self.geometry.wheel_circumference_m();
        let vl = dems.left_rpm / 60.0 * circ_m;
        let vr = dems.right_rpm / 60.0 * circ_m;

        let speed_ms = 0.5 * (vl + vr);
        let yaw_rate_rads = (vr - vl) / (2.0 * self.geometry.turn_radius_m);

        // Integrate at the midpoint heading
        let head = self.vehicle.heading_deg.to_radians();
        let mid = head + 0.5 * yaw_rate_rads * dt_s;

        self.vehicle.x_m += -mid.sin() * speed_ms * dt_s;
        self.vehicle.y_m += mid.cos() * speed_ms * dt_s;
        self.vehicle.heading_deg = wrap_pi(head + yaw_rate_rads * dt_s).to_degrees();

        trace!("Sim vehicle pose: {:?}", self.vehicle);
    }
}

impl VisionSensor for SimWorld {
    fn is_target_visible(&mut self) -> bool {
        let body = self.target_in_body();

        if body.y <= 0.0 {
            return false;
        }

        let bearing_deg = body.x.atan2(body.y).to_degrees();

        bearing_deg.abs() <= 0.5 * self.params.fov_deg
            && body.norm() <= self.params.max_range_m
    }

    fn lateral_offset_m(&mut self) -> f64 {
        self.target_in_body().x
    }

    fn forward_offset_m(&mut self) -> f64 {
        self.target_in_body().y
    }

    fn target_yaw_deg(&mut self) -> f64 {
        wrap_pi(
            (self.params.target_pose.heading_deg - self.vehicle.heading_deg).to_radians()
        ).to_degrees()
    }

    fn straight_line_distance_m(&mut self) -> f64 {
        self.target_in_body().norm()
    }
}
