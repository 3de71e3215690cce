#![forbid(unsafe_code)]

//! Integration test: the built-in undo script, end to end through the
//! public demo API, in both output formats.

use rewind_core::HistoryConfig;
use rewind_demo::cli::OutputFormat;
use rewind_demo::script::{BUILTIN_SCRIPT, Session, Status};

fn run(format: OutputFormat) -> (Session, String) {
    let session = Session::new(HistoryConfig::default(), format);
    let mut out = Vec::new();
    let summary = session.run(BUILTIN_SCRIPT.as_bytes(), &mut out).unwrap();
    assert_eq!(summary.errors, 0);
    (session, String::from_utf8(out).unwrap())
}

#[test]
fn text_status_sequence() {
    let (_, output) = run(OutputFormat::Text);
    let statuses: Vec<&str> = output.lines().filter(|l| l.starts_with("field=")).collect();
    assert_eq!(
        statuses,
        vec![
            "field=\"A\" | Undo change to A [enabled] | Redo [disabled]",
            "field=\"B\" | Undo change to B [enabled] | Redo [disabled]",
            "field=\"A\" | Undo change to A [enabled] | Redo change to B [enabled]",
            "field=\"\" | Undo [disabled] | Redo change to A [enabled]",
            "field=\"A\" | Undo change to A [enabled] | Redo change to B [enabled]",
            "field=\"C\" | Undo change to C [enabled] | Redo [disabled]",
        ]
    );
}

#[test]
fn json_final_status() {
    let (session, output) = run(OutputFormat::Json);
    let last: serde_json::Value = output
        .lines()
        .rfind(|l| l.starts_with('{'))
        .map(|l| serde_json::from_str(l).unwrap())
        .unwrap();
    assert_eq!(last["value"], "C");
    assert_eq!(last["redo_enabled"], false);
    assert_eq!(
        session.status(),
        Status {
            value: "C".to_string(),
            undo: "Undo change to C".to_string(),
            undo_enabled: true,
            redo: "Redo".to_string(),
            redo_enabled: false,
        }
    );
}
