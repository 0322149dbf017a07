//! Implementations for the DriveCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;

// Internal
use super::{DriveCtrlError, DriveMode, Params};
use comms_if::eqpt::drive::{DriveActuator, RateCommand, WheelDems};
use util::{maths::{clamp, signed_powf}, params};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drive control module state
#[derive(Debug)]
pub struct DriveCtrl {
    params: Params,

    report: StatusReport,

    current_cmd: Option<RateCommand>,

    output: WheelDems,
}

/// Status report for DriveCtrl processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// The left wheel demand was saturated at the maximum wheel rate
    pub left_rate_limited: bool,

    /// The right wheel demand was saturated at the maximum wheel rate
    pub right_rate_limited: bool,

    /// The last command was executed as a pivot turn
    pub pivoting: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveCtrl {
    /// Create a new drive controller, validating the parameters.
    pub fn new(params: Params) -> Result<Self, DriveCtrlError> {
        params.validate().map_err(DriveCtrlError::InvalidConfig)?;

        Ok(Self {
            params,
            report: StatusReport::default(),
            current_cmd: None,
            output: WheelDems::STOPPED,
        })
    }

    /// Initialise the DriveCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    pub fn init(params_path: &str) -> Result<Self, DriveCtrlError> {
        let params = params::load(params_path)
            .map_err(DriveCtrlError::ParamLoadError)?;

        Self::new(params)
    }

    /// The wheel demands currently being held.
    pub fn output(&self) -> WheelDems {
        self.output
    }

    /// The status report from the last command.
    pub fn report(&self) -> StatusReport {
        self.report
    }

    /// The last rate command received, if any.
    pub fn current_cmd(&self) -> Option<RateCommand> {
        self.current_cmd
    }

    pub fn mode(&self) -> DriveMode {
        self.params.mode
    }

    /// Drive from normalised arcade inputs, `fwd` forwards and `turn` to the
    /// left, both in `[-1, 1]`.
    pub fn arcade(&mut self, fwd: f64, turn: f64) {
        let cmd = RateCommand {
            turn_rate_rpm: self.shape_input(turn) * self.params.max_wheel_rate_rpm,
            move_rate_rpm: self.shape_input(fwd) * self.params.max_wheel_rate_rpm,
        };

        self.set_rates(cmd);
    }

    /// Drive both sides straight from a single normalised stick input.
    pub fn manual(&mut self, stick: f64) {
        self.arcade(stick, 0.0);
    }

    /// Apply the input deadband and response curve to a normalised input.
    ///
    /// Inputs outside `[-1, 1]` are clamped first. The output is continuous at
    /// the edge of the deadband and reaches `±1` at full scale.
    pub fn shape_input(&self, input: f64) -> f64 {
        let u = clamp(&input, &-1.0, &1.0);
        let db = self.params.input_deadband;

        if !u.is_finite() || u.abs() <= db {
            return 0.0;
        }

        let rescaled = (u.abs() - db) / (1.0 - db);

        signed_powf(rescaled * u.signum(), self.params.response_exponent)
    }

    /// Mix a rate command onto the wheels according to the drive mode.
    fn calc_target_dems(&mut self, cmd: &RateCommand) -> WheelDems {
        match self.params.mode {
            DriveMode::Pivot => {
                if cmd.turn_rate_rpm.abs() > self.params.pivot_threshold_rpm {
                    self.report.pivoting = true;

                    WheelDems {
                        left_rpm: -cmd.turn_rate_rpm,
                        right_rpm: cmd.turn_rate_rpm,
                    }
                }
                else {
                    WheelDems {
                        left_rpm: cmd.move_rate_rpm,
                        right_rpm: cmd.move_rate_rpm,
                    }
                }
            },
            DriveMode::Tank => WheelDems {
                left_rpm: cmd.move_rate_rpm - cmd.turn_rate_rpm,
                right_rpm: cmd.move_rate_rpm + cmd.turn_rate_rpm,
            }
        }
    }

    /// Enforce the deadband and the limits of the drive's capabilities.
    ///
    /// If a limit is reached the corresponding flag in the status report will
    /// be raised.
    fn enforce_limits(&mut self, dems: WheelDems) -> WheelDems {
        let max = self.params.max_wheel_rate_rpm;

        let (left_rpm, left_limited) = self.limit_side(dems.left_rpm, max);
        let (right_rpm, right_limited) = self.limit_side(dems.right_rpm, max);

        self.report.left_rate_limited = left_limited;
        self.report.right_rate_limited = right_limited;

        if left_limited || right_limited {
            debug!(
                "Wheel demands limited to {} rpm (requested {:?})",
                max, dems
            );
        }

        WheelDems { left_rpm, right_rpm }
    }

    fn limit_side(&self, rpm: f64, max: f64) -> (f64, bool) {
        if !rpm.is_finite() || rpm.abs() < self.params.rate_deadband_rpm {
            return (0.0, false);
        }

        let limited = clamp(&rpm, &-max, &max);

        (limited, limited != rpm)
    }
}

impl DriveActuator for DriveCtrl {
    fn set_rates(&mut self, cmd: RateCommand) {
        // Clear the status report
        self.report = StatusReport::default();

        self.current_cmd = Some(cmd);

        let target = self.calc_target_dems(&cmd);
        self.output = self.enforce_limits(target);

        trace!("DriveCtrl output: {:?} from {:?}", self.output, cmd);
    }

    /// Stop shall never fail and must always bring both sides to zero.
    fn stop(&mut self) {
        self.report = StatusReport::default();
        self.current_cmd = Some(RateCommand::STOP);
        self.output = WheelDems::STOPPED;

        trace!("DriveCtrl stopped");
    }
}
