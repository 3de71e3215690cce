#![forbid(unsafe_code)]

//! The demo scenarios.
//!
//! Each scenario wires the model layer to a stand-in "view" that writes to
//! `out` instead of drawing widgets. Notifications are collected by
//! subscriber callbacks and printed after each user intent.

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::rc::Rc;

use rewind_core::entity::{Floor, Room};
use rewind_core::{BoundedCounter, Change, HistoryConfig, HouseModel, Observable};
use tracing::info;

use crate::cli::{Opts, Scenario};
use crate::error::DemoError;
use crate::script::{BUILTIN_SCRIPT, RunSummary, Session};

/// Run the scenario selected in `opts`.
///
/// # Errors
///
/// Returns [`DemoError`] on I/O or persistence failures.
pub fn run(opts: &Opts, out: &mut impl Write) -> Result<(), DemoError> {
    info!(scenario = ?opts.scenario, "Starting scenario");
    match opts.scenario {
        Scenario::Observer => observer(out)?,
        Scenario::Undo => {
            undo(opts, out)?;
        }
        Scenario::Counter => counter(out)?,
        Scenario::House => house(&save_path(opts), out)?,
    }
    Ok(())
}

/// Two views on one value: one reads the notification argument, the other
/// keeps its own handle to the model and reads it back.
pub fn observer(out: &mut impl Write) -> io::Result<()> {
    let model = Observable::new(String::new());
    let lines = Rc::new(RefCell::new(Vec::new()));

    let first = Rc::clone(&lines);
    model.subscribe(move |value: &String| {
        first.borrow_mut().push(format!("first view: {value}"));
    });

    let second = Rc::clone(&lines);
    let held = model.clone();
    let second_handle = model.subscribe(move |_| {
        second.borrow_mut().push(format!("second view: {}", held.get()));
    });

    model.set("Changed".to_string());
    model.unsubscribe(second_handle);
    model.set("Changed again".to_string());

    for line in lines.borrow().iter() {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Name field with undo/redo buttons driven by a script.
pub fn undo(opts: &Opts, out: &mut impl Write) -> Result<RunSummary, DemoError> {
    let config = match opts.max_depth {
        Some(depth) => HistoryConfig::new(depth),
        None => HistoryConfig::unlimited(),
    };
    let session = Session::new(config, opts.format);
    let summary = match opts.script.as_deref() {
        None => session.run(BUILTIN_SCRIPT.as_bytes(), out)?,
        Some("-") => session.run(io::stdin().lock(), out)?,
        Some(path) => session.run(BufReader::new(File::open(path)?), out)?,
    };
    writeln!(
        out,
        "{} commands, {} failed",
        summary.commands, summary.errors
    )?;
    Ok(summary)
}

/// Counter in `[0, 3]` with increment/decrement actions that enable and
/// disable themselves from the counter's notifications.
pub fn counter(out: &mut impl Write) -> Result<(), DemoError> {
    let counter = BoundedCounter::new(0, 3)?;
    let lines = Rc::new(RefCell::new(Vec::new()));

    counter.subscribe(counter_view(
        counter.min(),
        counter.max(),
        Rc::clone(&lines),
    ));

    let presses: [(&str, fn(&BoundedCounter) -> bool); 6] = [
        ("+", BoundedCounter::increment),
        ("+", BoundedCounter::increment),
        ("+", BoundedCounter::increment),
        ("+", BoundedCounter::increment),
        ("-", BoundedCounter::decrement),
        ("-", BoundedCounter::decrement),
    ];
    for (label, press) in presses {
        let moved = press(&counter);
        writeln!(out, "press {label}{}", if moved { "" } else { " (ignored)" })?;
        for line in lines.borrow_mut().drain(..) {
            writeln!(out, "  {line}")?;
        }
    }
    Ok(())
}

/// Action line for a notified counter value. Holds copies of the bounds,
/// never a handle to the counter it observes.
fn counter_view(
    min: i32,
    max: i32,
    sink: Rc<RefCell<Vec<String>>>,
) -> impl Fn(&i32) + 'static {
    move |value| {
        sink.borrow_mut().push(format!(
            "value={value} [+] {} [-] {}",
            toggle(*value < max),
            toggle(*value > min)
        ));
    }
}

fn toggle(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

/// Build a house, save it, change it, load the saved copy back and keep
/// editing through the model.
pub fn house(path: &std::path::Path, out: &mut impl Write) -> Result<(), DemoError> {
    let mut model = HouseModel::new();
    let changes = Rc::new(RefCell::new(Vec::<Change>::new()));
    let sink = Rc::clone(&changes);
    model.subscribe(move |change| sink.borrow_mut().push(change.clone()));

    writeln!(out, "Building a house:")?;
    {
        let house = model.house_mut();
        house.add_floor(Floor::new()).add_room(Room::new("Kitchen"));
        house.add_floor(Floor::new()).add_room(Room::new("Bedroom"));
    }
    report(&model, &changes, out)?;

    writeln!(out, "Setting price of kitchen:")?;
    if let Some(kitchen) = model.house_mut().floor_mut(0).and_then(|f| f.room_mut(0)) {
        kitchen.set_price(15.0);
    }
    report(&model, &changes, out)?;

    writeln!(out, "Writing house to {}:", path.display())?;
    model.save(path)?;

    writeln!(out, "Adding a second room to the ground floor:")?;
    if let Some(ground) = model.house_mut().floor_mut(0) {
        ground.add_room(Room::new("Living room"));
    }
    report(&model, &changes, out)?;

    writeln!(out, "Reading the old house from {}:", path.display())?;
    model.load(path)?;
    report(&model, &changes, out)?;

    writeln!(out, "Setting price of first room on first floor:")?;
    if let Some(room) = model.house_mut().floor_mut(1).and_then(|f| f.room_mut(0)) {
        room.set_price(100.0);
    }
    report(&model, &changes, out)?;
    Ok(())
}

fn report(
    model: &HouseModel,
    changes: &Rc<RefCell<Vec<Change>>>,
    out: &mut impl Write,
) -> io::Result<()> {
    for change in changes.borrow_mut().drain(..) {
        writeln!(out, "-> {change:?}")?;
    }
    writeln!(out, "   {model}")
}

fn save_path(opts: &Opts) -> PathBuf {
    opts.save
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("rewind-house.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(f: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut out = Vec::new();
        f(&mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn observer_views_both_update_until_unsubscribed() {
        let text = output(|out| observer(out).unwrap());
        assert_eq!(
            text,
            "first view: Changed\nsecond view: Changed\nfirst view: Changed again\n"
        );
    }

    #[test]
    fn counter_actions_toggle_at_bounds() {
        let text = output(|out| counter(out).unwrap());
        assert!(text.contains("press +\n  value=1 [+] on [-] on\n"));
        assert!(text.contains("press +\n  value=3 [+] off [-] on\n"));
        assert!(text.contains("press + (ignored)\n"));
        assert!(text.trim_end().ends_with("value=1 [+] on [-] on"));
    }

    #[test]
    fn counter_view_toggles_from_bounds_alone() {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let view = counter_view(0, 3, Rc::clone(&lines));
        view(&0);
        view(&2);
        view(&3);
        assert_eq!(
            *lines.borrow(),
            vec![
                "value=0 [+] on [-] off",
                "value=2 [+] on [-] on",
                "value=3 [+] off [-] on",
            ]
        );
    }

    #[test]
    fn counter_view_does_not_keep_counter_alive() {
        let counter = BoundedCounter::new(0, 3).unwrap();
        let lines = Rc::new(RefCell::new(Vec::new()));
        counter.subscribe(counter_view(counter.min(), counter.max(), Rc::clone(&lines)));
        counter.increment();
        drop(counter);

        // The subscriber (and its sink clone) went away with the counter.
        assert_eq!(Rc::strong_count(&lines), 1);
        assert_eq!(*lines.borrow(), vec!["value=1 [+] on [-] on"]);
    }

    #[test]
    fn house_reload_restores_saved_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("house.json");
        let text = output(|out| house(&path, out).unwrap());

        assert!(text.contains("Model(House[Floor[Kitchen, Living room], Floor[Bedroom]] of total value 15)"));
        assert!(text.contains("-> Loaded"));
        assert!(text.trim_end().ends_with(
            "Model(House[Floor[Kitchen], Floor[Bedroom]] of total value 115)"
        ));
    }

    #[test]
    fn undo_scenario_reads_script_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.txt");
        std::fs::write(&path, "set Kitchen\nset Bedroom\nundo\nstatus\n").unwrap();

        let opts = Opts {
            script: Some(path.display().to_string()),
            ..Opts::default()
        };
        let mut out = Vec::new();
        let summary = undo(&opts, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(summary.errors, 0);
        assert!(text.contains("field=\"Kitchen\" | Undo change to Kitchen [enabled] | Redo change to Bedroom [enabled]"));
        assert!(text.ends_with("4 commands, 0 failed\n"));
    }

    #[test]
    fn missing_script_is_an_io_error() {
        let opts = Opts {
            script: Some("/definitely/not/here.txt".to_string()),
            ..Opts::default()
        };
        let mut out = Vec::new();
        assert!(matches!(undo(&opts, &mut out), Err(DemoError::Io(_))));
    }
}
