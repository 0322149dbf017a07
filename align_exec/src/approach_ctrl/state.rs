//! Approach control module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use serde::Serialize;

// Internal
use super::*;
use super::tm::{ApproachTm, TmSink};
use crate::traj_plan::{self, TrajPlan};
use comms_if::eqpt::{
    drive::{DriveActuator, RateCommand},
    vision::VisionSensor
};
use util::params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Approach control module state
#[derive(Debug)]
pub struct ApproachCtrl {
    params: Params,

    /// Executing mode
    mode: ApproachMode,

    /// How the last run ended, cleared when a new run begins
    outcome: Option<ApproachOutcome>,

    /// Cumulative time spent in the current run
    elapsed_s: f64,

    output: StepOutput,
}

/// The status report containing the values planned in a cycle.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    /// If true the target was in view this cycle
    pub target_visible: bool,

    /// Straight-line distance to the target reported by the sensor, only set
    /// while the target is in view.
    ///
    /// Units: meters
    pub target_distance_m: Option<f64>,

    /// The plan calculated this cycle
    pub plan: Option<TrajPlan>,

    /// The rate command calculated from the plan, whether or not it was sent
    /// to the drive
    pub planned_cmd: Option<RateCommand>,

    /// Set on the cycle in which the run ended
    pub outcome: Option<ApproachOutcome>,
}

/// Output of a single cycle of approach control.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize)]
pub struct StepOutput {
    /// The command that was sent to the drive this cycle, if any
    pub cmd: Option<RateCommand>,

    pub report: StatusReport,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ApproachCtrl {
    /// Create a new approach controller, validating the parameters.
    pub fn new(params: Params) -> Result<Self, ApproachCtrlError> {
        params.validate().map_err(ApproachCtrlError::InvalidConfig)?;

        Ok(Self {
            params,
            mode: ApproachMode::Idle,
            outcome: None,
            elapsed_s: 0.0,
            output: StepOutput::default(),
        })
    }

    /// Initialise the ApproachCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    pub fn init(params_path: &str) -> Result<Self, ApproachCtrlError> {
        let params = params::load(params_path)
            .map_err(ApproachCtrlError::ParamLoadError)?;

        Self::new(params)
    }

    pub fn mode(&self) -> ApproachMode {
        self.mode
    }

    /// How the last run ended, `None` until a run has finished.
    pub fn outcome(&self) -> Option<ApproachOutcome> {
        self.outcome
    }

    /// Time spent in the current run, frozen once the run ends.
    ///
    /// Units: seconds
    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Override the actuation policy. Takes effect from the next cycle.
    pub fn set_actuation(&mut self, actuation: Actuation) {
        self.params.actuation = actuation;
    }

    /// Begin a new run.
    ///
    /// The controller must be `Idle`. The elapsed time is reset and the run
    /// starts planning on the next call to `proc`.
    pub fn begin(&mut self) -> Result<(), ApproachCtrlError> {
        if self.mode != ApproachMode::Idle {
            return Err(ApproachCtrlError::NotIdle(self.mode));
        }

        self.elapsed_s = 0.0;
        self.outcome = None;
        self.mode = ApproachMode::Running;

        info!("Approach started");

        Ok(())
    }

    /// Return a stopped controller to `Idle` so that a new run can begin.
    ///
    /// The outcome of the last run is kept until the next `begin`.
    pub fn reset(&mut self) -> Result<(), ApproachCtrlError> {
        match self.mode {
            ApproachMode::Idle => Ok(()),
            ApproachMode::Stopped => {
                self.mode = ApproachMode::Idle;
                Ok(())
            },
            _ => Err(ApproachCtrlError::StillRunning)
        }
    }

    /// Cancel a run in progress, stopping the drive immediately.
    ///
    /// Does nothing if no run is in progress.
    pub fn abort(&mut self, actuator: &mut dyn DriveActuator) {
        if self.mode != ApproachMode::Running {
            return;
        }

        self.outcome = Some(ApproachOutcome::Aborted);
        self.mode_finished(actuator);

        warn!("Approach aborted after {:.3} s", self.elapsed_s);
    }

    /// Process a single cycle of approach control.
    ///
    /// `dt_s` is the time since the last cycle and counts towards the run
    /// budget.
    ///
    /// Processing involves:
    ///  1. Sampling the vision sensor
    ///  1. If the target is visible planning an aim point and converting it
    ///     into a rate command, which is sent to the drive when actuation is
    ///     enabled
    ///  1. Checking for arrival or timeout, which ends the run and stops the
    ///     drive
    pub fn proc(
        &mut self,
        dt_s: f64,
        sensor: &mut dyn VisionSensor,
        actuator: &mut dyn DriveActuator,
        tm: &mut dyn TmSink
    ) -> Result<StepOutput, ApproachCtrlError> {
        if !dt_s.is_finite() || dt_s < 0.0 {
            return Err(ApproachCtrlError::InvalidTimeStep(dt_s));
        }

        // Setup cycle data
        self.output = StepOutput::default();

        // Mode execution
        match self.mode {
            ApproachMode::Idle | ApproachMode::Stopped => return Ok(self.output),
            ApproachMode::Running => self.mode_running(dt_s, sensor, actuator),
            ApproachMode::Arrived | ApproachMode::TimedOut => self.mode_finished(actuator)
        }

        tm.publish(&self.tm());

        Ok(self.output)
    }

    fn mode_running(
        &mut self,
        dt_s: f64,
        sensor: &mut dyn VisionSensor,
        actuator: &mut dyn DriveActuator
    ) {
        self.elapsed_s += dt_s;

        let obs = sensor.observe();
        self.output.report.target_visible = obs.visible;

        if obs.visible {
            let plan = traj_plan::plan(&obs, self.params.step_size);
            let cmd = self.params.geometry.rate_command(
                plan.correction_angle.deg,
                plan.aim_point_distance_m
            );

            self.output.report.target_distance_m = Some(obs.distance_m);
            self.output.report.plan = Some(plan);
            self.output.report.planned_cmd = Some(cmd);

            trace!("Approach plan: {:?} -> {:?}", plan, cmd);

            if self.params.actuation == Actuation::Drive {
                actuator.set_rates(cmd);
                self.output.cmd = Some(cmd);
            }
        }
        else {
            trace!("Target not visible, holding");
        }

        // Arrival is checked first so that it wins over a timeout in the same
        // cycle
        if obs.visible && obs.distance_m <= self.params.arrival_threshold_m {
            self.mode = ApproachMode::Arrived;
            self.outcome = Some(ApproachOutcome::Arrived);
            info!(
                "Arrived at target ({:.3} m) after {:.3} s",
                obs.distance_m, self.elapsed_s
            );
        }
        else if self.elapsed_s >= self.params.max_run_time_s {
            self.mode = ApproachMode::TimedOut;
            self.outcome = Some(ApproachOutcome::TimedOut);
            warn!(
                "Approach timed out after {:.3} s without arriving",
                self.elapsed_s
            );
        }

        // Terminal modes are left in the same cycle
        if let ApproachMode::Arrived | ApproachMode::TimedOut = self.mode {
            self.mode_finished(actuator);
        }
    }

    /// Stop the drive and end the run. The elapsed time is not advanced.
    fn mode_finished(&mut self, actuator: &mut dyn DriveActuator) {
        actuator.stop();

        self.output.cmd = Some(RateCommand::STOP);
        self.output.report.outcome = self.outcome;
        self.mode = ApproachMode::Stopped;

        debug!("Approach stopped, outcome: {:?}", self.outcome);
    }

    fn tm(&self) -> ApproachTm {
        let report = &self.output.report;

        ApproachTm {
            elapsed_s: self.elapsed_s,
            mode: self.mode,
            target_visible: report.target_visible,
            correction_angle_deg: report.plan.map(|p| p.correction_angle.deg),
            turn_rate_rpm: report.planned_cmd.map(|c| c.turn_rate_rpm),
            move_rate_rpm: report.planned_cmd.map(|c| c.move_rate_rpm),
            aim_point_distance_m: report.plan.map(|p| p.aim_point_distance_m),
            target_distance_m: report.target_distance_m,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::super::tm::NullTm;
    use crate::kin_conv::VehicleGeometry;
    use comms_if::eqpt::vision::TargetObservation;

    #[derive(Default)]
    struct Recorder(Vec<RateCommand>);

    impl DriveActuator for Recorder {
        fn set_rates(&mut self, cmd: RateCommand) {
            self.0.push(cmd)
        }
    }

    #[derive(Default)]
    struct TmRecorder(Vec<ApproachTm>);

    impl TmSink for TmRecorder {
        fn publish(&mut self, tm: &ApproachTm) {
            self.0.push(*tm)
        }
    }

    fn params(actuation: Actuation) -> Params {
        Params {
            step_size: 0.2,
            arrival_threshold_m: 0.3048,
            max_run_time_s: 5.0,
            actuation,
            geometry: VehicleGeometry {
                wheel_radius_m: 0.0762,
                turn_radius_m: 0.27305,
                step_duration_s: 1.0,
            },
        }
    }

    fn visible(x_m: f64, y_m: f64, z_deg: f64) -> TargetObservation {
        TargetObservation {
            visible: true,
            x_offset_m: x_m,
            y_offset_m: y_m,
            z_rotation_deg: z_deg,
            distance_m: (x_m * x_m + y_m * y_m).sqrt(),
        }
    }

    fn lost() -> TargetObservation {
        // A sensor without a target reports zeros, which must not look like
        // an arrival
        TargetObservation {
            visible: false,
            x_offset_m: 0.0,
            y_offset_m: 0.0,
            z_rotation_deg: 0.0,
            distance_m: 0.0,
        }
    }

    fn running(actuation: Actuation) -> ApproachCtrl {
        let mut ctrl = ApproachCtrl::new(params(actuation)).unwrap();
        ctrl.begin().unwrap();
        ctrl
    }

    #[test]
    fn test_arrival_in_first_cycle() {
        // Inside the threshold the angle and offsets play no part
        let within = [
            (0.1, 0.2, 0.0),
            (-0.2, 0.1, 45.0),
            (0.0, 0.3, -170.0),
            (0.25, -0.1, 90.0),
            (0.05, 0.05, 180.0),
            (0.1, 0.1, std::f64::NAN),
        ];

        for &(x, y, z) in &within {
            let mut ctrl = running(Actuation::Drive);
            let mut drive = Recorder::default();

            let out = ctrl.proc(
                0.05, &mut visible(x, y, z), &mut drive, &mut NullTm
            ).unwrap();

            assert_eq!(ctrl.mode(), ApproachMode::Stopped, "at {:?}", (x, y, z));
            assert_eq!(ctrl.outcome(), Some(ApproachOutcome::Arrived));
            assert_eq!(out.report.outcome, Some(ApproachOutcome::Arrived));
            assert_eq!(out.cmd, Some(RateCommand::STOP));

            // One planned command then a single stop
            assert_eq!(drive.0.len(), 2);
            assert!(!drive.0[0].is_stop());
            assert_eq!(drive.0[1], RateCommand::STOP);
        }
    }

    #[test]
    fn test_timeout_while_target_lost() {
        let mut ctrl = running(Actuation::Drive);
        let mut drive = Recorder::default();

        for _ in 0..99 {
            let out = ctrl.proc(0.05, &mut lost(), &mut drive, &mut NullTm).unwrap();
            assert_eq!(out.cmd, None);
            assert_eq!(ctrl.mode(), ApproachMode::Running);
        }

        // Holding never commands the drive
        assert!(drive.0.is_empty());

        // Elapsed time reaches the budget on the 100th cycle
        ctrl.proc(0.05 + 1e-9, &mut lost(), &mut drive, &mut NullTm).unwrap();

        assert_eq!(ctrl.mode(), ApproachMode::Stopped);
        assert_eq!(ctrl.outcome(), Some(ApproachOutcome::TimedOut));
        assert_eq!(drive.0, vec![RateCommand::STOP]);
    }

    #[test]
    fn test_arrival_wins_over_timeout() {
        let mut ctrl = running(Actuation::Drive);
        let mut drive = Recorder::default();

        ctrl.proc(10.0, &mut visible(0.0, 0.25, 5.0), &mut drive, &mut NullTm).unwrap();

        assert_eq!(ctrl.outcome(), Some(ApproachOutcome::Arrived));
    }

    #[test]
    fn test_stopped_is_terminal() {
        let mut ctrl = running(Actuation::Drive);
        let mut drive = Recorder::default();
        let mut tm = TmRecorder::default();

        ctrl.proc(6.0, &mut lost(), &mut drive, &mut tm).unwrap();
        let frozen = ctrl.elapsed_s();

        for _ in 0..10 {
            let out = ctrl.proc(
                0.05, &mut visible(0.5, 1.0, 30.0), &mut drive, &mut tm
            ).unwrap();
            assert_eq!(out, StepOutput::default());
        }

        assert_eq!(drive.0, vec![RateCommand::STOP]);
        assert_eq!(ctrl.elapsed_s(), frozen);
        assert_eq!(tm.0.len(), 1);
        assert_eq!(tm.0[0].mode, ApproachMode::Stopped);
    }

    #[test]
    fn test_report_only_never_moves_drive() {
        let mut ctrl = running(Actuation::ReportOnly);
        let mut drive = Recorder::default();
        let mut tm = TmRecorder::default();

        let out = ctrl.proc(
            0.05, &mut visible(0.5, 1.0, 30.0), &mut drive, &mut tm
        ).unwrap();

        assert_eq!(out.cmd, None);
        assert!(out.report.planned_cmd.is_some());
        assert!(drive.0.is_empty());

        // The computed rates are still published
        assert_eq!(tm.0[0].turn_rate_rpm, out.report.planned_cmd.map(|c| c.turn_rate_rpm));

        // The run still ends with a stop
        ctrl.proc(0.05, &mut visible(0.1, 0.1, 0.0), &mut drive, &mut tm).unwrap();
        assert_eq!(drive.0, vec![RateCommand::STOP]);
    }

    #[test]
    fn test_planned_command_matches_converter() {
        let mut ctrl = running(Actuation::Drive);
        let mut drive = Recorder::default();
        let obs = visible(0.5, 1.0, 30.0);

        let out = ctrl.proc(0.05, &mut obs.clone(), &mut drive, &mut NullTm).unwrap();

        let plan = traj_plan::plan(&obs, 0.2);
        let expected = params(Actuation::Drive).geometry.rate_command(
            plan.correction_angle.deg, plan.aim_point_distance_m
        );

        assert_eq!(out.report.plan, Some(plan));
        assert_eq!(out.cmd, Some(expected));
        assert_eq!(drive.0, vec![expected]);
        assert_eq!(ctrl.mode(), ApproachMode::Running);
    }

    #[test]
    fn test_lost_target_does_not_arrive() {
        let mut ctrl = running(Actuation::Drive);
        let mut drive = Recorder::default();

        let out = ctrl.proc(0.05, &mut lost(), &mut drive, &mut NullTm).unwrap();

        assert!(!out.report.target_visible);
        assert_eq!(out.report.plan, None);
        assert_eq!(ctrl.mode(), ApproachMode::Running);
        assert_eq!(ctrl.outcome(), None);
    }

    #[test]
    fn test_abort() {
        let mut ctrl = ApproachCtrl::new(params(Actuation::Drive)).unwrap();
        let mut drive = Recorder::default();

        // Not running, nothing happens
        ctrl.abort(&mut drive);
        assert!(drive.0.is_empty());
        assert_eq!(ctrl.mode(), ApproachMode::Idle);

        ctrl.begin().unwrap();
        ctrl.proc(0.05, &mut visible(0.5, 1.0, 30.0), &mut drive, &mut NullTm).unwrap();
        ctrl.abort(&mut drive);

        assert_eq!(ctrl.mode(), ApproachMode::Stopped);
        assert_eq!(ctrl.outcome(), Some(ApproachOutcome::Aborted));
        assert_eq!(drive.0.last(), Some(&RateCommand::STOP));
        assert_eq!(drive.0.len(), 2);

        ctrl.abort(&mut drive);
        assert_eq!(drive.0.len(), 2);
    }

    #[test]
    fn test_begin_and_reset() {
        let mut ctrl = ApproachCtrl::new(params(Actuation::Drive)).unwrap();
        let mut drive = Recorder::default();

        // Idle does nothing
        let out = ctrl.proc(1.0, &mut visible(0.5, 1.0, 30.0), &mut drive, &mut NullTm).unwrap();
        assert_eq!(out, StepOutput::default());
        assert_eq!(ctrl.elapsed_s(), 0.0);

        ctrl.begin().unwrap();
        match ctrl.begin() {
            Err(ApproachCtrlError::NotIdle(ApproachMode::Running)) => (),
            r => panic!("Expected NotIdle, got {:?}", r)
        }
        match ctrl.reset() {
            Err(ApproachCtrlError::StillRunning) => (),
            r => panic!("Expected StillRunning, got {:?}", r)
        }

        ctrl.proc(5.0, &mut lost(), &mut drive, &mut NullTm).unwrap();
        assert!(ctrl.begin().is_err());

        ctrl.reset().unwrap();
        assert_eq!(ctrl.mode(), ApproachMode::Idle);
        assert_eq!(ctrl.outcome(), Some(ApproachOutcome::TimedOut));

        // A fresh run gets a fresh budget
        ctrl.begin().unwrap();
        assert_eq!(ctrl.elapsed_s(), 0.0);
        assert_eq!(ctrl.outcome(), None);
        ctrl.proc(4.0, &mut lost(), &mut drive, &mut NullTm).unwrap();
        assert_eq!(ctrl.mode(), ApproachMode::Running);
    }

    #[test]
    fn test_invalid_time_step() {
        let mut ctrl = running(Actuation::Drive);
        let mut drive = Recorder::default();

        for &dt in &[-0.1, std::f64::NAN, std::f64::INFINITY] {
            match ctrl.proc(dt, &mut lost(), &mut drive, &mut NullTm) {
                Err(ApproachCtrlError::InvalidTimeStep(_)) => (),
                r => panic!("Expected InvalidTimeStep, got {:?}", r)
            }
        }

        assert_eq!(ctrl.elapsed_s(), 0.0);
        assert_eq!(ctrl.mode(), ApproachMode::Running);
    }

    #[test]
    fn test_invalid_params() {
        use crate::params::ConfigError;

        for &s in &[0.0, -0.2, 1.5, std::f64::NAN] {
            let p = Params { step_size: s, ..params(Actuation::Drive) };
            match ApproachCtrl::new(p) {
                Err(ApproachCtrlError::InvalidConfig(ConfigError::StepSizeOutOfRange(_))) => (),
                r => panic!("Expected StepSizeOutOfRange, got {:?}", r)
            }
        }

        // A step size of exactly one is allowed
        assert!(ApproachCtrl::new(Params { step_size: 1.0, ..params(Actuation::Drive) }).is_ok());

        let p = Params { arrival_threshold_m: 0.0, ..params(Actuation::Drive) };
        assert!(ApproachCtrl::new(p).is_err());

        let p = Params { max_run_time_s: -5.0, ..params(Actuation::Drive) };
        assert!(ApproachCtrl::new(p).is_err());

        let mut p = params(Actuation::Drive);
        p.geometry.wheel_radius_m = 0.0;
        assert!(ApproachCtrl::new(p).is_err());
    }

    #[test]
    fn test_telemetry_per_cycle() {
        let mut ctrl = running(Actuation::Drive);
        let mut drive = Recorder::default();
        let mut tm = TmRecorder::default();

        ctrl.proc(0.05, &mut lost(), &mut drive, &mut tm).unwrap();
        ctrl.proc(0.05, &mut visible(0.5, 1.0, 30.0), &mut drive, &mut tm).unwrap();

        assert_eq!(tm.0.len(), 2);
        assert!(!tm.0[0].target_visible);
        assert_eq!(tm.0[0].correction_angle_deg, None);
        assert!(tm.0[1].target_visible);
        assert!((tm.0[1].elapsed_s - 0.1).abs() < 1e-12);
        assert_eq!(tm.0[1].target_distance_m, Some(visible(0.5, 1.0, 30.0).distance_m));
    }
}
