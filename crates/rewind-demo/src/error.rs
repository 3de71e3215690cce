#![forbid(unsafe_code)]

//! Errors that abort a demo run.

use std::fmt;

use rewind_core::{CounterError, PersistError};

/// A demo run failed.
#[derive(Debug)]
pub enum DemoError {
    /// Reading the script or writing output failed.
    Io(std::io::Error),
    /// Saving or loading model state failed.
    Persist(PersistError),
    /// The counter could not be built.
    Counter(CounterError),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Persist(e) => write!(f, "persistence error: {e}"),
            Self::Counter(e) => write!(f, "counter error: {e}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Persist(e) => Some(e),
            Self::Counter(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for DemoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<PersistError> for DemoError {
    fn from(e: PersistError) -> Self {
        Self::Persist(e)
    }
}

impl From<CounterError> for DemoError {
    fn from(e: CounterError) -> Self {
        Self::Counter(e)
    }
}
