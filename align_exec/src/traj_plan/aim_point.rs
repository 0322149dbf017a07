//! Aim point and correction angle calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use comms_if::eqpt::vision::TargetObservation;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A synthetic point on the approach trajectory, in the robot body frame.
///
/// Derived from an observation each cycle, never measured.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct AimPoint {
    /// Units: meters
    pub x_m: f64,

    /// Units: meters
    pub y_m: f64,
}

/// The bearing of an aim point, measured from the robot's lateral axis.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct CorrectionAngle {
    /// Units: degrees
    pub deg: f64,
}

/// Everything planned from a single observation.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct TrajPlan {
    /// Forward distance at which the target's heading line crosses the
    /// robot's lateral axis.
    ///
    /// Units: meters
    pub intercept_distance_m: f64,

    pub aim_point: AimPoint,

    pub correction_angle: CorrectionAngle,

    /// Length of the vector to the aim point, the linear distance to cover
    /// this cycle.
    ///
    /// Units: meters
    pub aim_point_distance_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AimPoint {
    /// The aim point as a vector from the robot origin.
    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x_m, self.y_m)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Calculate the intercept distance for a target at `(x_m, y_m)` with yaw
/// `z_rotation_deg`.
///
/// When the yaw is a multiple of 180 degrees the heading line is parallel to
/// the lateral axis and the divisor vanishes, although `tan` only gets within
/// rounding of zero away from the origin. In that case, or whenever the
/// divisor or the result is not finite, the lateral offset `x_m` is returned
/// instead.
pub fn intercept_distance_m(x_m: f64, y_m: f64, z_rotation_deg: f64) -> f64 {
    let tan_z = z_rotation_deg.to_radians().tan();
    let divisor = -tan_z;

    if z_rotation_deg % 180.0 == 0.0
        || divisor.abs() < f64::EPSILON
        || !divisor.is_finite()
    {
        return x_m;
    }

    let intercept_m = (x_m * tan_z - y_m) / divisor;

    if intercept_m.is_finite() {
        intercept_m
    }
    else {
        x_m
    }
}

/// Calculate the aim point for the given observation.
///
/// `step_size` must be in `(0, 1]`, which the approach controller enforces at
/// construction.
pub fn compute_aim_point(obs: &TargetObservation, step_size: f64) -> AimPoint {
    let intercept_m = intercept_distance_m(
        obs.x_offset_m, obs.y_offset_m, obs.z_rotation_deg
    );

    aim_point_from_intercept(obs, intercept_m, step_size)
}

/// Calculate the correction angle to the given aim point.
///
/// Uses the two argument arctangent so that a zero or negative lateral
/// component neither divides by zero nor flips the sign. An aim point at the
/// origin gives a correction of exactly zero.
pub fn correction_angle(aim: &AimPoint) -> CorrectionAngle {
    if aim.x_m == 0.0 && aim.y_m == 0.0 {
        return CorrectionAngle { deg: 0.0 };
    }

    CorrectionAngle {
        deg: aim.y_m.atan2(aim.x_m).to_degrees()
    }
}

/// The linear distance to the aim point.
///
/// Units: meters
pub fn aim_point_distance_m(aim: &AimPoint) -> f64 {
    aim.to_vector().norm()
}

/// Perform the full planning calculation for one observation.
pub fn plan(obs: &TargetObservation, step_size: f64) -> TrajPlan {
    let intercept_distance_m = intercept_distance_m(
        obs.x_offset_m, obs.y_offset_m, obs.z_rotation_deg
    );
    let aim_point = aim_point_from_intercept(obs, intercept_distance_m, step_size);

    TrajPlan {
        intercept_distance_m,
        aim_point,
        correction_angle: correction_angle(&aim_point),
        aim_point_distance_m: aim_point_distance_m(&aim_point),
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn aim_point_from_intercept(obs: &TargetObservation, intercept_m: f64, step_size: f64) -> AimPoint {
    AimPoint {
        x_m: step_size
            * (step_size * obs.x_offset_m + 2.0 * intercept_m * (1.0 - step_size)),
        y_m: step_size * step_size * obs.y_offset_m,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn obs(x_m: f64, y_m: f64, z_rotation_deg: f64) -> TargetObservation {
        TargetObservation {
            visible: true,
            x_offset_m: x_m,
            y_offset_m: y_m,
            z_rotation_deg,
            distance_m: (x_m * x_m + y_m * y_m).sqrt(),
        }
    }

    #[test]
    fn test_zero_rotation_falls_back_to_lateral_offset() {
        for &(x, y) in &[(0.5, 1.0), (-2.0, 0.0), (0.0, 3.5), (1e6, -1e-6), (0.0, 0.0)] {
            assert_eq!(intercept_distance_m(x, y, 0.0), x);
            assert_eq!(intercept_distance_m(x, y, -0.0), x);

            let p = plan(&obs(x, y, 0.0), 0.2);
            assert_eq!(p.intercept_distance_m, x);
            assert!(p.correction_angle.deg.is_finite());
            assert!(p.aim_point_distance_m.is_finite());
        }
    }

    #[test]
    fn test_parallel_heading_falls_back_to_lateral_offset() {
        for &z in &[180.0, -180.0, 360.0, -540.0] {
            assert_eq!(intercept_distance_m(0.5, 1.0, z), 0.5);

            let p = plan(&obs(0.5, 1.0, z), 0.2);
            assert_eq!(p.intercept_distance_m, 0.5);
            assert!(p.aim_point_distance_m < 1.0);
        }
    }

    #[test]
    fn test_non_finite_rotation_falls_back_to_lateral_offset() {
        for &z in &[std::f64::NAN, std::f64::INFINITY, std::f64::NEG_INFINITY] {
            assert_eq!(intercept_distance_m(0.5, 1.0, z), 0.5);

            let p = plan(&obs(0.5, 1.0, z), 0.2);
            assert_eq!(p.intercept_distance_m, 0.5);
            assert!(p.correction_angle.deg.is_finite());
            assert!(p.aim_point_distance_m.is_finite());
        }

        // A finite divisor with an overflowing quotient
        assert_eq!(intercept_distance_m(1e308, -1e308, 45.0), 1e308);
    }

    #[test]
    fn test_target_at_origin() {
        for &z in &[0.0, 15.0, -45.0, 90.0] {
            let p = plan(&obs(0.0, 0.0, z), 0.2);

            assert_eq!(p.correction_angle.deg, 0.0);
            assert_eq!(p.aim_point_distance_m, 0.0);
        }
    }

    #[test]
    fn test_reference_scenario() {
        let (x, y, z, s): (f64, f64, f64, f64) = (0.5, 1.0, 30.0, 0.2);

        // Reference values from the literal formulae
        let tan_z = z.to_radians().tan();
        let ref_intercept = (x * tan_z - y) / (-tan_z);
        let ref_aim_x = s * (s * x + 2.0 * ref_intercept * (1.0 - s));
        let ref_aim_y = s * s * y;
        let ref_angle = ref_aim_y.atan2(ref_aim_x).to_degrees();
        let ref_dist = (ref_aim_x * ref_aim_x + ref_aim_y * ref_aim_y).sqrt();

        let p = plan(&obs(x, y, z), s);

        assert_eq!(p.intercept_distance_m, ref_intercept);
        assert_eq!(p.aim_point.x_m, ref_aim_x);
        assert_eq!(p.aim_point.y_m, ref_aim_y);
        assert_eq!(p.correction_angle.deg, ref_angle);
        assert!((p.aim_point_distance_m - ref_dist).abs() < 1e-12);

        // Sanity check against hand calculated values
        assert!((p.intercept_distance_m - 1.2320508075688774).abs() < 1e-9);
        assert!((p.aim_point.x_m - 0.4142562584220408).abs() < 1e-9);
        assert!((p.aim_point.y_m - 0.04).abs() < 1e-12);
        assert!((p.correction_angle.deg - 5.515301313514259).abs() < 1e-9);
    }

    #[test]
    fn test_plan_is_pure() {
        for &(x, y, z) in &[(0.5, 1.0, 30.0), (-0.3, 2.0, -12.5), (1.0, 0.1, 89.0)] {
            let o = obs(x, y, z);
            let a = plan(&o, 0.2);
            let b = plan(&o, 0.2);

            assert_eq!(a, b);
            assert_eq!(compute_aim_point(&o, 0.2), a.aim_point);
        }
    }

    #[test]
    fn test_correction_angle_quadrants() {
        // Negative lateral component must not flip the bearing
        let behind = correction_angle(&AimPoint { x_m: -1.0, y_m: 1.0 });
        assert!((behind.deg - 135.0).abs() < 1e-12);

        let ahead = correction_angle(&AimPoint { x_m: 0.0, y_m: 1.0 });
        assert!((ahead.deg - 90.0).abs() < 1e-12);

        let right = correction_angle(&AimPoint { x_m: 1.0, y_m: -1.0 });
        assert!((right.deg + 45.0).abs() < 1e-12);
    }

    #[test]
    fn test_full_step_aims_at_target() {
        // With a step size of one the blend collapses onto the target itself
        let o = obs(0.4, 1.2, 20.0);
        let aim = compute_aim_point(&o, 1.0);

        assert_eq!(aim, AimPoint { x_m: 0.4, y_m: 1.2 });
    }
}
