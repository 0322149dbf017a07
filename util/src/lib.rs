//! Utility library for the alignment software
//!
//! Provides the session, logging, parameter and archiving infrastructure shared
//! by the executables and libraries in the workspace.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod archive;
pub mod host;
pub mod logger;
pub mod maths;
pub mod params;
pub mod session;
pub mod time;
