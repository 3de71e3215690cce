#![forbid(unsafe_code)]

//! History stack for undo/redo operations.
//!
//! This module provides the [`UndoStack`] which maintains dual stacks of
//! [`Edit`]s with support for:
//!
//! - **Stack-managed edits**: callers hand over a forward and an inverse
//!   closure; only the stack ever runs them, so undo/redo are never
//!   re-recorded as new edits
//! - **Depth limits**: oldest edits evicted past [`HistoryConfig::max_depth`]
//! - **Branch handling**: new edits clear the redo stack
//! - **Reentrancy detection**: mutating calls made while an action runs fail
//!   with [`UndoError::Reentrancy`]
//!
//! # Invariants
//!
//! 1. An edit is in the undo stack or the redo stack, never both
//! 2. `undo_stack.len() <= config.max_depth` (after any operation)
//! 3. Redo stack is cleared whenever a new edit is applied
//! 4. Failed operations leave both stacks untouched
//!
//! # Notification timing
//!
//! The stacks are updated *before* an edit's action runs. A subscriber
//! notified by that action already sees the post-operation `can_undo()`,
//! `can_redo()` and labels, which is what a UI shell needs to refresh its
//! undo/redo controls.
//!
//! ```text
//! apply(e5)
//! ┌───────────────────────────────────────────────┐
//! │ Undo Stack: [e1, e2, e3, e4, e5]              │
//! │ Redo Stack: []                                │
//! └───────────────────────────────────────────────┘
//!
//! undo() x2
//! ┌───────────────────────────────────────────────┐
//! │ Undo Stack: [e1, e2, e3]                      │
//! │ Redo Stack: [e5, e4]                          │
//! └───────────────────────────────────────────────┘
//!
//! apply(e6)  <-- new branch, clears redo
//! ┌───────────────────────────────────────────────┐
//! │ Undo Stack: [e1, e2, e3, e6]                  │
//! │ Redo Stack: []                                │
//! └───────────────────────────────────────────────┘
//! ```

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use super::edit::{self, Edit};
use super::error::UndoError;
use crate::reactive::Observable;

/// Configuration for the undo stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of edits to keep in undo history.
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl HistoryConfig {
    /// Create a configuration with a depth limit.
    ///
    /// A depth of 0 records nothing: applied edits still run but are evicted
    /// immediately, so they cannot be undone.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Set the depth limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// No depth limit.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }
}

struct HistoryState {
    /// Edits available for undo (newest at back).
    undo_stack: VecDeque<Edit>,
    /// Edits available for redo (newest at back).
    redo_stack: VecDeque<Edit>,
    config: HistoryConfig,
}

struct StackInner {
    state: RefCell<HistoryState>,
    /// Operation currently running an edit action, if any.
    active: Cell<Option<&'static str>>,
}

/// Clears the busy marker on drop, including during unwinding.
struct ActiveGuard<'a> {
    active: &'a Cell<Option<&'static str>>,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.active.set(None);
    }
}

/// Undo/redo history of reversible edits.
///
/// Cloning an `UndoStack` creates a new handle to the **same** history, so a
/// UI shell can hand clones to button callbacks.
pub struct UndoStack {
    inner: Rc<StackInner>,
}

impl Clone for UndoStack {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for UndoStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("UndoStack")
            .field("undo_depth", &state.undo_stack.len())
            .field("redo_depth", &state.redo_stack.len())
            .field("active", &self.inner.active.get())
            .field("config", &state.config)
            .finish()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl UndoStack {
    /// Create a new undo stack with the given configuration.
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            inner: Rc::new(StackInner {
                state: RefCell::new(HistoryState {
                    undo_stack: VecDeque::new(),
                    redo_stack: VecDeque::new(),
                    config,
                }),
                active: Cell::new(None),
            }),
        }
    }

    // ========================================================================
    // Core Operations
    // ========================================================================

    /// Execute `do_action` and record it, with `undo_action` as its inverse.
    ///
    /// Clears the redo stack (new branch) and enforces the depth limit.
    /// Every call creates a new, independent entry.
    ///
    /// # Errors
    ///
    /// Returns [`UndoError::Reentrancy`] if called while another edit action
    /// of this stack is running. Nothing is executed in that case.
    pub fn apply(
        &self,
        do_action: impl FnMut() + 'static,
        undo_action: impl FnMut() + 'static,
        label: impl Into<String>,
    ) -> Result<(), UndoError> {
        let _guard = self.enter("apply")?;
        let entry = Edit::new(label, do_action, undo_action);
        let forward = entry.forward();

        let (discarded, evicted) = {
            let mut state = self.inner.state.borrow_mut();
            let discarded = std::mem::take(&mut state.redo_stack);
            state.undo_stack.push_back(entry);

            let mut evicted = Vec::new();
            while state.undo_stack.len() > state.config.max_depth {
                if let Some(oldest) = state.undo_stack.pop_front() {
                    evicted.push(oldest);
                }
            }

            if let Some(newest) = state.undo_stack.back() {
                debug!(
                    label = newest.label(),
                    undo_depth = state.undo_stack.len(),
                    discarded_redo = discarded.len(),
                    "Edit applied"
                );
            }
            (discarded, evicted)
        };
        if !evicted.is_empty() {
            debug!(evicted = evicted.len(), "Evicted oldest edits past depth limit");
        }
        // Captured state is dropped outside the borrow.
        drop(discarded);
        drop(evicted);

        edit::run(&forward);
        Ok(())
    }

    /// Record a `set` on `target`, labelled `"change to {value}"`.
    ///
    /// The previous value is captured now; undo and redo go through the
    /// observable's normal `set`, so they notify exactly like the original
    /// edit did.
    ///
    /// # Errors
    ///
    /// Returns [`UndoError::Reentrancy`] if called while an edit action of
    /// this stack is running.
    pub fn apply_set<T>(&self, target: &Observable<T>, value: T) -> Result<(), UndoError>
    where
        T: Clone + fmt::Display + 'static,
    {
        let previous = target.get();
        let label = format!("change to {value}");
        let forward_target = target.clone();
        let inverse_target = target.clone();
        self.apply(
            move || forward_target.set(value.clone()),
            move || inverse_target.set(previous.clone()),
            label,
        )
    }

    /// Undo the last edit.
    ///
    /// Moves the edit from the undo stack to the redo stack and runs its
    /// inverse action.
    ///
    /// # Returns
    ///
    /// The label of the undone edit.
    ///
    /// # Errors
    ///
    /// - [`UndoError::CannotUndo`] if there is nothing to undo
    /// - [`UndoError::Reentrancy`] if an edit action is running
    pub fn undo(&self) -> Result<String, UndoError> {
        let _guard = self.enter("undo")?;
        let (inverse, label) = {
            let mut state = self.inner.state.borrow_mut();
            let entry = state.undo_stack.pop_back().ok_or(UndoError::CannotUndo)?;
            let moved = (entry.inverse(), entry.label().to_owned());
            state.redo_stack.push_back(entry);
            moved
        };
        debug!(label = %label, "Undo");
        edit::run(&inverse);
        Ok(label)
    }

    /// Redo the last undone edit.
    ///
    /// Moves the edit from the redo stack to the undo stack and runs its
    /// forward action.
    ///
    /// # Errors
    ///
    /// - [`UndoError::CannotRedo`] if there is nothing to redo
    /// - [`UndoError::Reentrancy`] if an edit action is running
    pub fn redo(&self) -> Result<String, UndoError> {
        let _guard = self.enter("redo")?;
        let (forward, label) = {
            let mut state = self.inner.state.borrow_mut();
            let entry = state.redo_stack.pop_back().ok_or(UndoError::CannotRedo)?;
            let moved = (entry.forward(), entry.label().to_owned());
            state.undo_stack.push_back(entry);
            moved
        };
        debug!(label = %label, "Redo");
        edit::run(&forward);
        Ok(label)
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.inner.state.borrow().undo_stack.is_empty()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.inner.state.borrow().redo_stack.is_empty()
    }

    // ========================================================================
    // Info
    // ========================================================================

    /// Get the undo stack depth.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.inner.state.borrow().undo_stack.len()
    }

    /// Get the redo stack depth.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.inner.state.borrow().redo_stack.len()
    }

    /// Label of the edit the next `undo()` would revert.
    #[must_use]
    pub fn peek_undo_label(&self) -> Option<String> {
        self.inner
            .state
            .borrow()
            .undo_stack
            .back()
            .map(|e| e.label().to_owned())
    }

    /// Label of the edit the next `redo()` would reapply.
    #[must_use]
    pub fn peek_redo_label(&self) -> Option<String> {
        self.inner
            .state
            .borrow()
            .redo_stack
            .back()
            .map(|e| e.label().to_owned())
    }

    /// Button text for undo: `"Undo change to X"`, or `"Undo"` when empty.
    #[must_use]
    pub fn undo_presentation_name(&self) -> String {
        presentation_name("Undo", self.peek_undo_label())
    }

    /// Button text for redo: `"Redo change to X"`, or `"Redo"` when empty.
    #[must_use]
    pub fn redo_presentation_name(&self) -> String {
        presentation_name("Redo", self.peek_redo_label())
    }

    /// Get labels for undo edits (most recent first).
    pub fn undo_labels(&self, limit: usize) -> Vec<String> {
        self.inner
            .state
            .borrow()
            .undo_stack
            .iter()
            .rev()
            .take(limit)
            .map(|e| e.label().to_owned())
            .collect()
    }

    /// Get labels for redo edits (most recent first).
    pub fn redo_labels(&self, limit: usize) -> Vec<String> {
        self.inner
            .state
            .borrow()
            .redo_stack
            .iter()
            .rev()
            .take(limit)
            .map(|e| e.label().to_owned())
            .collect()
    }

    /// Get the current configuration.
    #[must_use]
    pub fn config(&self) -> HistoryConfig {
        self.inner.state.borrow().config.clone()
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Clear all history (both undo and redo). The target is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`UndoError::Reentrancy`] if an edit action is running.
    pub fn clear(&self) -> Result<(), UndoError> {
        let _guard = self.enter("clear")?;
        let (undo, redo) = {
            let mut state = self.inner.state.borrow_mut();
            (
                std::mem::take(&mut state.undo_stack),
                std::mem::take(&mut state.redo_stack),
            )
        };
        debug!(undo = undo.len(), redo = redo.len(), "History cleared");
        Ok(())
    }

    /// Mark the stack busy for the duration of one operation.
    fn enter(&self, operation: &'static str) -> Result<ActiveGuard<'_>, UndoError> {
        if let Some(active) = self.inner.active.get() {
            warn!(operation, active, "Rejected re-entrant history mutation");
            return Err(UndoError::Reentrancy { operation, active });
        }
        self.inner.active.set(Some(operation));
        Ok(ActiveGuard {
            active: &self.inner.active,
        })
    }
}

fn presentation_name(verb: &str, label: Option<String>) -> String {
    match label {
        Some(label) => format!("{verb} {label}"),
        None => verb.to_owned(),
    }
}

// ============================================================================
// Tests
// ============================================================================
