#![forbid(unsafe_code)]

//! Line-oriented command scripts for the undo scenario.
//!
//! A [`Session`] plays the role of the UI shell in the classic name-field
//! demo: a text field bound to an [`Observable<String>`], plus undo and redo
//! buttons whose text and enabled state come from the [`UndoStack`]. Each
//! script line is one user intent.
//!
//! Failed commands (nothing to undo, unknown command) are reported in the
//! output and counted, never fatal.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use rewind_core::{HistoryConfig, Observable, UndoStack};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::OutputFormat;

/// Script replaying the reference session: A, B, undo twice, redo, C.
pub const BUILTIN_SCRIPT: &str = "\
# Start empty, commit two names.
set A
status
set B
status
# Walk back to the beginning.
undo
status
undo
status
# Forward once, then branch: the redo of B is discarded.
redo
status
set C
status
history
";

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Commit text to the field.
    Set(String),
    Undo,
    Redo,
    Status,
    History,
}

/// A script line that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand {
    pub line: usize,
    pub text: String,
}

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: unknown command '{}'", self.line, self.text)
    }
}

impl std::error::Error for UnknownCommand {}

impl Command {
    /// Parse one line. Blank lines and `#` comments yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownCommand`] for anything else that is not a command.
    pub fn parse(line_no: usize, line: &str) -> Result<Option<Self>, UnknownCommand> {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        let word = trimmed.trim();
        if word.is_empty() || word.starts_with('#') {
            return Ok(None);
        }
        let command = match word {
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            "status" => Self::Status,
            "history" => Self::History,
            "set" => Self::Set(String::new()),
            _ => match trimmed.trim_start().strip_prefix("set ") {
                Some(text) => Self::Set(text.to_string()),
                None => {
                    return Err(UnknownCommand {
                        line: line_no,
                        text: word.to_string(),
                    });
                }
            },
        };
        Ok(Some(command))
    }
}

/// What the shell's widgets currently show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub value: String,
    pub undo: String,
    pub undo_enabled: bool,
    pub redo: String,
    pub redo_enabled: bool,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field={:?} | {} [{}] | {} [{}]",
            self.value,
            self.undo,
            enabled(self.undo_enabled),
            self.redo,
            enabled(self.redo_enabled),
        )
    }
}

fn enabled(on: bool) -> &'static str {
    if on { "enabled" } else { "disabled" }
}

/// Counts from one script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub commands: usize,
    pub errors: usize,
}

/// Name field plus undo/redo buttons.
pub struct Session {
    model: Observable<String>,
    stack: UndoStack,
    format: OutputFormat,
    /// Field refreshes delivered by the model since the last flush.
    refreshes: Rc<RefCell<Vec<String>>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("model", &self.model)
            .field("stack", &self.stack)
            .field("format", &self.format)
            .finish()
    }
}

impl Session {
    /// Start with an empty field and empty history.
    #[must_use]
    pub fn new(config: HistoryConfig, format: OutputFormat) -> Self {
        let model = Observable::new(String::new());
        let refreshes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&refreshes);
        model.subscribe(move |name: &String| sink.borrow_mut().push(name.clone()));
        Self {
            model,
            stack: UndoStack::new(config),
            format,
            refreshes,
        }
    }

    #[must_use]
    pub fn model(&self) -> &Observable<String> {
        &self.model
    }

    #[must_use]
    pub fn stack(&self) -> &UndoStack {
        &self.stack
    }

    #[must_use]
    pub fn status(&self) -> Status {
        Status {
            value: self.model.get(),
            undo: self.stack.undo_presentation_name(),
            undo_enabled: self.stack.can_undo(),
            redo: self.stack.redo_presentation_name(),
            redo_enabled: self.stack.can_redo(),
        }
    }

    /// Run one command. Returns `false` if the command failed.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to `out` fails.
    pub fn execute(&self, command: &Command, out: &mut impl Write) -> io::Result<bool> {
        debug!(?command, "Executing");
        let ok = match command {
            Command::Set(text) => report(out, self.stack.apply_set(&self.model, text.clone()))?,
            Command::Undo => report(out, self.stack.undo().map(drop))?,
            Command::Redo => report(out, self.stack.redo().map(drop))?,
            Command::Status => {
                self.write_status(out)?;
                true
            }
            Command::History => {
                writeln!(out, "undo: {:?}", self.stack.undo_labels(usize::MAX))?;
                writeln!(out, "redo: {:?}", self.stack.redo_labels(usize::MAX))?;
                true
            }
        };
        self.flush_refreshes(out)?;
        Ok(ok)
    }

    /// Run every line of `reader`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the script or writing output fails.
    pub fn run(&self, reader: impl BufRead, out: &mut impl Write) -> io::Result<RunSummary> {
        let mut summary = RunSummary::default();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            match Command::parse(index + 1, &line) {
                Ok(None) => {}
                Ok(Some(command)) => {
                    summary.commands += 1;
                    if !self.execute(&command, out)? {
                        summary.errors += 1;
                    }
                }
                Err(e) => {
                    summary.errors += 1;
                    writeln!(out, "error: {e}")?;
                }
            }
        }
        info!(
            commands = summary.commands,
            errors = summary.errors,
            "Script finished"
        );
        Ok(summary)
    }

    fn write_status(&self, out: &mut impl Write) -> io::Result<()> {
        let status = self.status();
        match self.format {
            OutputFormat::Text => writeln!(out, "{status}"),
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &status).map_err(io::Error::from)?;
                writeln!(out)
            }
        }
    }

    fn flush_refreshes(&self, out: &mut impl Write) -> io::Result<()> {
        let pending = std::mem::take(&mut *self.refreshes.borrow_mut());
        for value in pending {
            writeln!(out, "  field <- {value:?}")?;
        }
        Ok(())
    }
}

fn report<E: fmt::Display>(out: &mut impl Write, result: Result<(), E>) -> io::Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(e) => {
            writeln!(out, "error: {e}")?;
            Ok(false)
        }
    }
}
