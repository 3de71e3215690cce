#![forbid(unsafe_code)]

//! JSON persistence of model state.
//!
//! Only the current value of a model is saved. Undo history and
//! subscribers are session state and never hit the disk. Reading goes
//! through the model's normal mutation path, so subscribers see a loaded
//! value exactly like any other change.
//!
//! | Failure | Result |
//! |---------|--------|
//! | Reader/writer I/O error | [`PersistError::Io`] |
//! | Malformed or mismatched JSON | [`PersistError::Format`] |
//!
//! On any error the target is left untouched.

use std::fmt;
use std::io::{Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::reactive::Observable;

/// Errors from saving or loading model state.
#[derive(Debug)]
pub enum PersistError {
    /// The underlying reader or writer failed.
    Io(std::io::Error),
    /// The data could not be encoded or decoded.
    Format(serde_json::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Format(e) => write!(f, "format error: {e}"),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Format(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Self::Io(e.into())
        } else {
            Self::Format(e)
        }
    }
}

/// Write the current value of `source` as JSON.
///
/// # Errors
///
/// Returns [`PersistError`] if encoding or writing fails.
pub fn write_value<T>(source: &Observable<T>, writer: impl Write) -> Result<(), PersistError>
where
    T: Clone + Serialize + 'static,
{
    source.with(|value| write_json(value, writer))
}

/// Read a JSON value and `set` it on `target`, notifying its subscribers.
///
/// # Errors
///
/// Returns [`PersistError`] if reading or decoding fails; `target` is then
/// unchanged.
pub fn read_value<T>(target: &Observable<T>, reader: impl Read) -> Result<(), PersistError>
where
    T: Clone + DeserializeOwned + 'static,
{
    let value: T = read_json(reader)?;
    target.set(value);
    Ok(())
}

pub(crate) fn write_json<T: Serialize + ?Sized>(
    value: &T,
    mut writer: impl Write,
) -> Result<(), PersistError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    debug!("Model state written");
    Ok(())
}

pub(crate) fn read_json<T: DeserializeOwned>(reader: impl Read) -> Result<T, PersistError> {
    let value = serde_json::from_reader(reader)?;
    debug!("Model state read");
    Ok(value)
}
