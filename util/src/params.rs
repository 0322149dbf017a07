//! Parameter file loading
//!
//! Parameters are TOML files deserialised straight into each module's
//! `Params` struct. Range checks are left to the owning module.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Directory under the software root holding the parameter files.
pub const PARAMS_DIR_NAME: &str = "params";

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (ALIGN_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot read parameter file {path:?}: {source}")]
    FileLoadError {
        path: PathBuf,
        source: std::io::Error
    },

    #[error("Invalid parameters: {0}")]
    DeserialiseError(#[from] toml::de::Error)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file relative to `$ALIGN_SW_ROOT/params`.
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned
{
    let root = crate::host::get_sw_root()
        .map_err(|_| LoadError::SwRootNotSet)?;

    load_from_path(root.join(PARAMS_DIR_NAME).join(param_file_path))
}

/// Load a parameter file from an explicit path, bypassing the software root.
pub fn load_from_path<P, F>(path: F) -> Result<P, LoadError>
where
    P: DeserializeOwned,
    F: AsRef<Path>
{
    let contents = std::fs::read_to_string(path.as_ref())
        .map_err(|source| LoadError::FileLoadError {
            path: path.as_ref().to_path_buf(),
            source
        })?;

    parse(&contents)
}

/// Parse parameters from a TOML string.
pub fn parse<P>(params_str: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned
{
    Ok(toml::from_str(params_str)?)
}
