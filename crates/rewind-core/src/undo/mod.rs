#![forbid(unsafe_code)]

//! Undo/redo command stack.
//!
//! - [`UndoStack`]: dual-stack history manager. Callers hand it a forward
//!   and an inverse closure via [`UndoStack::apply`] (or use
//!   [`UndoStack::apply_set`] for an [`Observable`](crate::reactive::Observable));
//!   the stack runs them and keeps the resulting [`Edit`].
//! - [`HistoryConfig`]: depth limit.
//! - [`UndoError`]: `CannotUndo`, `CannotRedo` and `Reentrancy`.

pub mod edit;
pub mod error;
pub mod history;

pub use edit::Edit;
pub use error::UndoError;
pub use history::{HistoryConfig, UndoStack};
