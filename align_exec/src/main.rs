//! Main alignment executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Begin the approach run
//!     - Main loop:
//!         - Simulation integration of the held wheel demands over the
//!           measured cycle time
//!         - Target sensing (from the simulation)
//!         - Approach control processing
//!         - Drive control (driven by approach control through the actuator interface)
//!     - Save the run summary

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{Report, eyre::WrapErr};
use log::{debug, info, warn};
use serde::Serialize;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use align_lib::{
    approach_ctrl::{
        tm::{ArchiveTm, LogTm, TmSink},
        Actuation, ApproachCtrl, ApproachMode, ApproachOutcome
    },
    drive_ctrl::DriveCtrl,
    params::AlignExecParams,
    sim::{self, Pose2, SimWorld},
};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line options for the executable.
#[derive(Debug, StructOpt)]
#[structopt(name = "align_exec", about = "Approach and align with a fiducial target")]
struct Opt {
    /// Only report the computed rate commands, never send them to the drive
    #[structopt(long)]
    report_only: bool,

    /// Maximum number of cycles to run for. The run is aborted if it has not
    /// finished by then
    #[structopt(long)]
    cycles: Option<u64>,
}

/// Summary of a run, saved into the session directory.
#[derive(Debug, Serialize)]
struct RunSummary {
    timestamp: String,
    actuation: Actuation,
    outcome: Option<ApproachOutcome>,
    elapsed_s: f64,
    num_cycles: u64,
    num_cycle_overruns: u64,
    final_pose: Pose2,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "align_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Alignment Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opt);

    // ---- LOAD PARAMETERS ----

    let exec_params: AlignExecParams = util::params::load("align_exec.toml")
        .wrap_err("Could not load exec params")?;
    exec_params.validate()
        .wrap_err("Invalid exec params")?;

    let sim_params: sim::Params = util::params::load("sim.toml")
        .wrap_err("Could not load sim params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut approach_ctrl = ApproachCtrl::init("approach_ctrl.toml")
        .wrap_err("Failed to initialise ApproachCtrl")?;
    if opt.report_only {
        approach_ctrl.set_actuation(Actuation::ReportOnly);
    }
    info!(
        "ApproachCtrl init complete (actuation: {:?})",
        approach_ctrl.params().actuation
    );

    let mut drive_ctrl = DriveCtrl::init("drive_ctrl.toml")
        .wrap_err("Failed to initialise DriveCtrl")?;
    info!("DriveCtrl init complete (mode: {:?})", drive_ctrl.mode());

    // The simulated wheels share the geometry used to convert commands
    let mut sim = SimWorld::new(sim_params, approach_ctrl.params().geometry)
        .wrap_err("Failed to initialise the simulation")?;
    info!("Simulation init complete");

    let mut tm: Box<dyn TmSink> = if exec_params.archive_tm {
        Box::new(
            ArchiveTm::new(&session, "approach_tm.csv")
                .wrap_err("Failed to initialise the TM archive")?
        )
    }
    else {
        Box::new(LogTm)
    };

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    approach_ctrl.begin()
        .wrap_err("Failed to begin the approach")?;

    info!("Beginning main loop\n");

    let cycle_period = Duration::from_secs_f64(exec_params.cycle_period_s);
    let mut num_cycles: u64 = 0;
    let mut num_cycle_overruns: u64 = 0;
    let mut last_cycle_instant = Instant::now();

    loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();
        let dt_s = match num_cycles {
            0 => 0.0,
            _ => (cycle_start_instant - last_cycle_instant).as_secs_f64()
        };
        last_cycle_instant = cycle_start_instant;

        // ---- SIMULATION ----

        // Same time base as the controller's run budget
        sim.step(&drive_ctrl.output(), dt_s);

        // ---- CONTROL ALGORITHM PROCESSING ----

        let out = approach_ctrl.proc(
            dt_s,
            &mut sim,
            &mut drive_ctrl,
            &mut *tm
        ).wrap_err("Error during ApproachCtrl processing")?;

        if let Some(cmd) = out.cmd {
            debug!("Drive output for {:?}: {:?}", cmd, drive_ctrl.output());
        }

        num_cycles += 1;

        if approach_ctrl.mode() == ApproachMode::Stopped {
            break;
        }

        if let Some(max) = opt.cycles {
            if num_cycles >= max {
                warn!("Cycle limit of {} reached", max);
                approach_ctrl.abort(&mut drive_ctrl);
                break;
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
                );
                num_cycle_overruns += 1;
            }
        }
    }

    // ---- SHUTDOWN ----

    let summary = RunSummary {
        timestamp: chrono::Utc::now().to_rfc3339(),
        actuation: approach_ctrl.params().actuation,
        outcome: approach_ctrl.outcome(),
        elapsed_s: approach_ctrl.elapsed_s(),
        num_cycles,
        num_cycle_overruns,
        final_pose: sim.vehicle_pose(),
    };

    info!("Run complete: {:?}", summary.outcome);
    session.save("run_summary.json", summary);

    info!("End of execution");

    session.exit();

    Ok(())
}
