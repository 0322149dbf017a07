//! CSV archives
//!
//! An [`Archiver`] writes one CSV row per serialised record, with the header
//! taken from the first record's field names. Records must be flat: scalar
//! fields and `Option`s of scalars only.
//!
//! Structs which archive their own state each cycle implement [`Archived`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Writes records to a CSV file, flushing after every row.
///
/// The default archiver is unopened and refuses every record.
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while archiving.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Cannot open the archive file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Cannot write the archive record: {0}")]
    CsvError(#[from] csv::Error),

    #[error("The archiver has not been opened")]
    NotInitialised
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A struct which writes its own archive records.
pub trait Archived {
    /// Write any pending records to the archive.
    fn write(&mut self) -> Result<(), ArchiveError>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Open an archive at `path` relative to the session's archive directory.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        Self::from_abs_path(session.arch_root.join(path))
    }

    /// Open an archive at `path`, creating missing parent directories and
    /// truncating any existing file.
    pub fn from_abs_path<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self {
            writer: Some(Writer::from_path(path)?)
        })
    }

    /// Append a record to the archive.
    pub fn serialise<T: Serialize>(&mut self, record: T) -> Result<(), ArchiveError> {
        let w = self.writer.as_mut().ok_or(ArchiveError::NotInitialised)?;

        w.serialize(record)?;
        w.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        time_s: f64,
        value: Option<f64>
    }

    #[test]
    fn test_archiver_writes_header_and_rows() {
        let path = std::env::temp_dir()
            .join(format!("util_archive_test_{}", std::process::id()))
            .join("rows.csv");

        let mut arch = Archiver::from_abs_path(&path).unwrap();
        arch.serialise(Row { time_s: 0.0, value: Some(1.5) }).unwrap();
        arch.serialise(Row { time_s: 0.1, value: None }).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "time_s,value\n0.0,1.5\n0.1,\n");
    }

    #[test]
    fn test_default_archiver_is_not_initialised() {
        let mut arch = Archiver::default();
        match arch.serialise(Row { time_s: 0.0, value: None }) {
            Err(ArchiveError::NotInitialised) => (),
            r => panic!("Expected NotInitialised, got {:?}", r)
        }
    }
}
