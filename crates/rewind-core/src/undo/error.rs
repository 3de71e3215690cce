#![forbid(unsafe_code)]

//! Errors reported by the undo stack.

use std::fmt;

/// Failure of an [`UndoStack`](super::UndoStack) operation.
///
/// All variants are local and recoverable: the stack is left exactly as it
/// was before the failing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoError {
    /// `undo()` was called with an empty undo history.
    CannotUndo,
    /// `redo()` was called with an empty redo history.
    CannotRedo,
    /// A mutating call reached the stack while it was still running an
    /// edit's action, typically from a subscriber notified by that action.
    Reentrancy {
        /// The rejected operation.
        operation: &'static str,
        /// The operation that was in progress.
        active: &'static str,
    },
}

impl fmt::Display for UndoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CannotUndo => write!(f, "cannot undo: undo history is empty"),
            Self::CannotRedo => write!(f, "cannot redo: redo history is empty"),
            Self::Reentrancy { operation, active } => {
                write!(f, "re-entrant {operation} rejected while {active} is running")
            }
        }
    }
}

impl std::error::Error for UndoError {}
