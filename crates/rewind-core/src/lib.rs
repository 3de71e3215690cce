#![forbid(unsafe_code)]

//! Core: observable model values and the undo/redo command stack.
//!
//! # Role in Rewind
//! `rewind-core` is the model layer a UI shell binds to. The shell subscribes
//! to model values to refresh its widgets, routes user intents (field
//! commits, button clicks) through the [`UndoStack`], and reads
//! `can_undo`/`can_redo` and the presentation names to enable and label its
//! undo/redo controls. Nothing here renders or handles input.
//!
//! # Primary responsibilities
//! - **Observable**: a value with synchronous, always-on change notification.
//! - **UndoStack**: history of reversible edits with redo truncation and
//!   reentrancy detection.
//! - **BoundedCounter**: range-limited counter whose enablement queries drive
//!   increment/decrement actions.
//! - **Entity tree**: house/floor/room model whose children report changes
//!   upward through callback links.
//! - **Persistence** (`state-persistence` feature): saving and loading of
//!   current model state as JSON.
//!
//! # Example
//!
//! ```
//! use rewind_core::{Observable, UndoStack};
//!
//! let name = Observable::new(String::new());
//! let history = UndoStack::default();
//!
//! history.apply_set(&name, "A".to_string()).unwrap();
//! history.apply_set(&name, "B".to_string()).unwrap();
//! assert_eq!(history.undo().unwrap(), "change to B");
//! assert_eq!(name.get(), "A");
//! assert_eq!(history.redo_presentation_name(), "Redo change to B");
//! ```

pub mod counter;
pub mod entity;
#[cfg(feature = "state-persistence")]
pub mod persist;
pub mod reactive;
pub mod undo;

pub use counter::{BoundedCounter, CounterError};
pub use entity::{Change, HouseModel};
#[cfg(feature = "state-persistence")]
pub use persist::PersistError;
pub use reactive::{Observable, SubscriptionHandle};
pub use undo::{HistoryConfig, UndoError, UndoStack};
