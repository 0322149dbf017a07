//! Approach telemetry
//!
//! The controller publishes one [`ApproachTm`] per cycle to a [`TmSink`].
//! Sinks are write-only, nothing published can influence control.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use serde::Serialize;

// Internal
use super::ApproachMode;
use util::{
    archive::{ArchiveError, Archived, Archiver},
    session::Session
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Telemetry for a single approach cycle.
///
/// Planned quantities are `None` on cycles where nothing was planned.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ApproachTm {
    /// Time since the start of the run.
    ///
    /// Units: seconds
    pub elapsed_s: f64,

    pub mode: ApproachMode,

    pub target_visible: bool,

    /// Units: degrees
    pub correction_angle_deg: Option<f64>,

    /// Units: revolutions/minute
    pub turn_rate_rpm: Option<f64>,

    /// Units: revolutions/minute
    pub move_rate_rpm: Option<f64>,

    /// Distance to this cycle's aim point.
    ///
    /// Units: meters
    pub aim_point_distance_m: Option<f64>,

    /// Units: meters
    pub target_distance_m: Option<f64>,
}

/// Sink which writes telemetry to the log at debug level.
#[derive(Debug, Default)]
pub struct LogTm;

/// Sink which discards all telemetry.
#[derive(Debug, Default)]
pub struct NullTm;

/// Sink which archives telemetry as CSV.
pub struct ArchiveTm {
    arch: Archiver,

    last: Option<ApproachTm>,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A destination for approach telemetry.
pub trait TmSink {
    fn publish(&mut self, tm: &ApproachTm);
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TmSink for LogTm {
    fn publish(&mut self, tm: &ApproachTm) {
        debug!(
            "Approach TM: t={:.3} s, {:?}, visible: {}, angle: {:?} deg, \
            rates: ({:?}, {:?}) rpm, aim dist: {:?} m, target dist: {:?} m",
            tm.elapsed_s,
            tm.mode,
            tm.target_visible,
            tm.correction_angle_deg,
            tm.turn_rate_rpm,
            tm.move_rate_rpm,
            tm.aim_point_distance_m,
            tm.target_distance_m
        );
    }
}

impl TmSink for NullTm {
    fn publish(&mut self, _tm: &ApproachTm) {}
}

impl ArchiveTm {
    /// Create a new archive sink writing to `rel_path` in the session's
    /// archive directory.
    pub fn new(session: &Session, rel_path: &str) -> Result<Self, ArchiveError> {
        Ok(Self {
            arch: Archiver::from_path(session, rel_path)?,
            last: None
        })
    }
}

impl Archived for ArchiveTm {
    fn write(&mut self) -> Result<(), ArchiveError> {
        match self.last.take() {
            Some(tm) => self.arch.serialise(tm),
            None => Ok(())
        }
    }
}

impl TmSink for ArchiveTm {
    fn publish(&mut self, tm: &ApproachTm) {
        self.last = Some(*tm);

        // Archive failures must never reach the control loop
        if let Err(e) = self.write() {
            warn!("Could not archive approach TM: {}", e);
        }
    }
}
