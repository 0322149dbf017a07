//! Session management
//!
//! A session owns a timestamped directory for one execution, holding the log
//! file, the CSV archives under `arch/` and any JSON saved through
//! [`Session::save`]. Saves are written by a background thread so that the
//! control loop never blocks on the filesystem.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use erased_serde::Serialize;
use log::{debug, info, warn};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};
use thiserror::Error;

// Internal imports
use crate::time;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Chrono format of the timestamp in session directory names.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Name of the archive directory within a session.
const ARCH_DIR_NAME: &str = "arch";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A struct storing information about the current session
pub struct Session {
    /// The root directory for this session
    pub session_root: PathBuf,

    /// The root directory for this session's archives
    pub arch_root: PathBuf,

    /// The path to the session's log file
    pub log_file_path: PathBuf,

    save_sender: Sender<SaveRequest>,

    save_jh: Option<JoinHandle<()>>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Requests handled by the save thread, in the order they were sent.
enum SaveRequest {
    Save(PathBuf, Box<dyn Serialize + Send>),
    Exit,
}

/// Possible errors associated with the session module.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("The software root environment variable (ALIGN_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot create the session directory: {0}")]
    CannotCreateDir(std::io::Error),

    #[error("A session has already been started in this process ({0})")]
    CannotInitEpoch(conquer_once::TryInitError),

    #[error("Cannot get the epoch time, did you forget to initialise the session?")]
    CannotGetEpoch,
}

/// Errors raised on the save thread, which are logged rather than returned.
#[derive(Error, Debug)]
enum SaveError {
    #[error("only .json files can be saved")]
    NotJson,

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start a new session named `{exec_name}_{timestamp}` under
    /// `$ALIGN_SW_ROOT/{sessions_dir}`.
    pub fn new(exec_name: &str, sessions_dir: &str) -> Result<Self, SessionError> {
        let root = crate::host::get_sw_root()
            .map_err(|_| SessionError::SwRootNotSet)?;

        Self::new_in(exec_name, root.join(sessions_dir))
    }

    /// Start a new session inside an explicit directory.
    ///
    /// Only one session may be started per process, since it fixes the epoch
    /// used to timestamp log records.
    pub fn new_in<P: AsRef<Path>>(exec_name: &str, sessions_dir: P) -> Result<Self, SessionError> {
        SESSION_EPOCH
            .try_init_once(Utc::now)
            .map_err(SessionError::CannotInitEpoch)?;

        let timestamp = SESSION_EPOCH
            .get()
            .ok_or(SessionError::CannotGetEpoch)?
            .format(TIMESTAMP_FORMAT);

        let session_root = sessions_dir
            .as_ref()
            .join(format!("{}_{}", exec_name, timestamp));
        let arch_root = session_root.join(ARCH_DIR_NAME);

        // Creates the session root too
        fs::create_dir_all(&arch_root).map_err(SessionError::CannotCreateDir)?;

        let (save_sender, rx) = channel();
        let thread_root = session_root.clone();
        let save_jh = thread::spawn(move || save_thread(thread_root, rx));

        Ok(Session {
            log_file_path: session_root.join(format!("{}.log", exec_name)),
            session_root,
            arch_root,
            save_sender,
            save_jh: Some(save_jh),
        })
    }

    /// Saves the given data as JSON to the session-relative path in the
    /// background.
    pub fn save<P: AsRef<Path>, T: Serialize + Send + 'static>(&self, path: P, data: T) {
        let req = SaveRequest::Save(path.as_ref().to_path_buf(), Box::new(data));

        if self.save_sender.send(req).is_err() {
            warn!(
                "Save thread has stopped, could not save {:?}",
                path.as_ref()
            );
        }
    }

    /// Exit the session, waiting for the save thread to write any pending
    /// data.
    pub fn exit(mut self) {
        info!("Stopping save thread");

        self.save_sender.send(SaveRequest::Exit).ok();

        if let Some(jh) = self.save_jh.take() {
            if jh.join().is_err() {
                warn!("Save thread panicked");
            }
        }

        info!("Save thread exited");
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the number of seconds elapsed since the start of the session.
///
/// Returns `0.0` before any session has been started.
pub fn get_elapsed_seconds() -> f64 {
    match SESSION_EPOCH.get() {
        Some(e) => time::duration_to_seconds(Utc::now() - *e).unwrap_or(std::f64::NAN),
        None => 0.0,
    }
}

/// Return a reference to the session's epoch.
///
/// # Panics
/// - This function will panic if the session epoch has not been
///   initialised, which is performed on creating a new Session instance.
pub fn get_epoch() -> &'static DateTime<Utc> {
    match SESSION_EPOCH.get() {
        Some(e) => e,
        None => panic!("Cannot get the session epoch!"),
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn save_thread(session_root: PathBuf, receiver: Receiver<SaveRequest>) {
    // Ends on an exit request or once every sender has been dropped
    while let Ok(SaveRequest::Save(path, data)) = receiver.recv() {
        let full_path = session_root.join(&path);

        match write_json(&full_path, &*data) {
            Ok(()) => debug!("Saved {:?}", full_path),
            Err(e) => warn!("Could not save {:?}: {}", full_path, e),
        }
    }
}

fn write_json(full_path: &Path, data: &(dyn Serialize + Send)) -> Result<(), SaveError> {
    if full_path.extension().and_then(|s| s.to_str()) != Some("json") {
        return Err(SaveError::NotJson);
    }

    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(full_path)?;
    serde_json::to_writer_pretty(file, data)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(serde::Serialize)]
    struct Summary {
        outcome: &'static str,
        cycles: u64,
    }

    #[test]
    fn test_session_save_and_exit() {
        let dir = std::env::temp_dir()
            .join(format!("util_session_test_{}", std::process::id()));

        let session = Session::new_in("test_exec", &dir).unwrap();

        assert!(session.arch_root.is_dir());
        assert!(session.arch_root.starts_with(&session.session_root));
        assert_eq!(
            session.log_file_path.file_name().and_then(|s| s.to_str()),
            Some("test_exec.log")
        );
        assert!(get_elapsed_seconds() >= 0.0);

        session.save("nested/summary.json", Summary { outcome: "Arrived", cycles: 12 });
        session.save("summary.txt", Summary { outcome: "Arrived", cycles: 12 });

        let root = session.session_root.clone();
        session.exit();

        // Exit waits for pending saves
        let saved: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(root.join("nested/summary.json")).unwrap()
        ).unwrap();
        assert_eq!(saved["outcome"], "Arrived");
        assert_eq!(saved["cycles"], 12);

        assert!(!root.join("summary.txt").exists());

        // Only one session per process
        assert!(Session::new_in("test_exec", &dir).is_err());
    }
}
