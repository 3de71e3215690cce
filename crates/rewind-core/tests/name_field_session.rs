//! End-to-end session: a name field bound to an observable, with undo/redo
//! buttons refreshed from subscriber callbacks the way a UI shell would.

use std::cell::RefCell;
use std::rc::Rc;

use rewind_core::{Observable, UndoError, UndoStack};
use tracing::{Level, info};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init();
}

/// What the shell's widgets display.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Widgets {
    field: String,
    undo_text: String,
    undo_enabled: bool,
    redo_text: String,
    redo_enabled: bool,
}

fn bind(model: &Observable<String>, stack: &UndoStack) -> Rc<RefCell<Vec<Widgets>>> {
    let frames = Rc::new(RefCell::new(Vec::new()));
    let frames_clone = Rc::clone(&frames);
    let stack = stack.clone();
    model.subscribe(move |name: &String| {
        frames_clone.borrow_mut().push(Widgets {
            field: name.clone(),
            undo_text: stack.undo_presentation_name(),
            undo_enabled: stack.can_undo(),
            redo_text: stack.redo_presentation_name(),
            redo_enabled: stack.can_redo(),
        });
    });
    frames
}

#[test]
fn scripted_session() {
    init_tracing();
    let model = Observable::new(String::new());
    let stack = UndoStack::default();

    stack.apply_set(&model, "A".to_string()).unwrap();
    assert_eq!(model.get(), "A");
    assert!(stack.can_undo());
    assert!(!stack.can_redo());

    stack.apply_set(&model, "B".to_string()).unwrap();
    assert_eq!(model.get(), "B");

    stack.undo().unwrap();
    assert_eq!(model.get(), "A");
    assert_eq!(stack.peek_redo_label().as_deref(), Some("change to B"));
    assert!(stack.can_redo());

    stack.undo().unwrap();
    assert_eq!(model.get(), "");
    assert!(!stack.can_undo());

    stack.redo().unwrap();
    assert_eq!(model.get(), "A");

    stack.apply_set(&model, "C".to_string()).unwrap();
    assert_eq!(model.get(), "C");
    assert!(!stack.can_redo());
    info!(undo_depth = stack.undo_depth(), "Session finished");
}

#[test]
fn widgets_refresh_from_notifications() {
    init_tracing();
    let model = Observable::new(String::new());
    let stack = UndoStack::default();
    let frames = bind(&model, &stack);

    stack.apply_set(&model, "Kitchen".to_string()).unwrap();
    stack.apply_set(&model, "Bedroom".to_string()).unwrap();
    stack.undo().unwrap();

    let last = frames.borrow().last().cloned().unwrap();
    assert_eq!(
        last,
        Widgets {
            field: "Kitchen".to_string(),
            undo_text: "Undo change to Kitchen".to_string(),
            undo_enabled: true,
            redo_text: "Redo change to Bedroom".to_string(),
            redo_enabled: true,
        }
    );
    assert_eq!(frames.borrow().len(), 3);
}

#[test]
fn failed_undo_does_not_touch_widgets() {
    init_tracing();
    let model = Observable::new(String::new());
    let stack = UndoStack::default();
    let frames = bind(&model, &stack);

    assert_eq!(stack.undo(), Err(UndoError::CannotUndo));
    assert_eq!(stack.redo(), Err(UndoError::CannotRedo));
    assert!(frames.borrow().is_empty());
    assert_eq!(model.version(), 0);
}

#[test]
fn field_commit_from_subscriber_is_rejected_not_recorded() {
    init_tracing();
    let model = Observable::new(String::new());
    let stack = UndoStack::default();

    // A misbehaving view that echoes every change back as a new commit.
    let echo_stack = stack.clone();
    let echo_model = model.clone();
    let rejected = Rc::new(RefCell::new(0u32));
    let rejected_clone = Rc::clone(&rejected);
    model.subscribe(move |name: &String| {
        let echoed = format!("{name}!");
        if let Err(UndoError::Reentrancy { .. }) = echo_stack.apply_set(&echo_model, echoed) {
            *rejected_clone.borrow_mut() += 1;
        }
    });

    stack.apply_set(&model, "A".to_string()).unwrap();
    stack.undo().unwrap();
    stack.redo().unwrap();

    assert_eq!(*rejected.borrow(), 3);
    assert_eq!(model.get(), "A");
    assert_eq!(stack.undo_labels(10), vec!["change to A"]);
}
