#![forbid(unsafe_code)]

//! A single reversible change.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared so the stack can run an action after releasing its own borrow.
pub(crate) type Action = Rc<RefCell<dyn FnMut()>>;

/// One reversible edit: a forward action, its inverse and a display label.
///
/// Edits are built by the [`UndoStack`](super::UndoStack) from the closures
/// handed to `apply`; they may capture a handle to their target but never
/// own the model. An edit lives in exactly one of the two histories.
pub struct Edit {
    label: String,
    forward: Action,
    inverse: Action,
}

impl fmt::Debug for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Edit").field("label", &self.label).finish_non_exhaustive()
    }
}

impl Edit {
    pub(crate) fn new(
        label: impl Into<String>,
        forward: impl FnMut() + 'static,
        inverse: impl FnMut() + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            forward: Rc::new(RefCell::new(forward)),
            inverse: Rc::new(RefCell::new(inverse)),
        }
    }

    /// Presentation name, e.g. `"change to Bedroom"`.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn forward(&self) -> Action {
        Rc::clone(&self.forward)
    }

    pub(crate) fn inverse(&self) -> Action {
        Rc::clone(&self.inverse)
    }
}

/// Run an action previously detached from its edit.
pub(crate) fn run(action: &Action) {
    (&mut *action.borrow_mut())();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn actions_run_independently() {
        let value = Rc::new(Cell::new(0));
        let fwd = Rc::clone(&value);
        let inv = Rc::clone(&value);
        let edit = Edit::new("change to 5", move || fwd.set(5), move || inv.set(0));

        run(&edit.forward());
        assert_eq!(value.get(), 5);
        run(&edit.inverse());
        assert_eq!(value.get(), 0);
        run(&edit.forward());
        assert_eq!(value.get(), 5);
    }

    #[test]
    fn debug_shows_label() {
        let edit = Edit::new("change to X", || {}, || {});
        assert_eq!(edit.label(), "change to X");
        assert!(format!("{edit:?}").contains("change to X"));
    }
}
