#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo driver.
//!
//! Parses args manually to keep the binary lean.
//! Supports environment variable overrides via `REWIND_DEMO_*` prefix.

use std::env;
use std::path::PathBuf;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Rewind Demo: observable models and undo/redo driven from a script

USAGE:
    rewind-demo [OPTIONS]

OPTIONS:
    --scenario=NAME      Scenario to run (default: undo)
    --script=PATH        Command script for the undo scenario ('-' = stdin)
    --max-depth=N        Undo history depth limit, N >= 1 (default: unlimited)
    --save=PATH          Save file for the house scenario (default: temp dir)
    --format=FORMAT      Status output: 'text' or 'json' (default: text)
    --log=FILTER         Tracing filter, e.g. 'debug' (default: warn)
    --help, -h           Show this help message
    --version, -V        Show version

SCENARIOS:
    observer   Two views subscribed to one value
    undo       Name field with undo/redo buttons, driven by a script
    counter    Bounded counter with increment/decrement actions
    house      Entity tree with upward notification, saved and reloaded

SCRIPT COMMANDS (one per line, '#' starts a comment):
    set TEXT   Commit TEXT to the name field (recorded as an edit)
    undo       Press the undo button
    redo       Press the redo button
    status     Print the field and button state
    history    Print undo/redo labels, most recent first

ENVIRONMENT VARIABLES:
    REWIND_DEMO_SCENARIO    Override --scenario
    REWIND_DEMO_SCRIPT      Override --script
    REWIND_DEMO_MAX_DEPTH   Override --max-depth
    REWIND_DEMO_SAVE        Override --save
    REWIND_DEMO_FORMAT      Override --format
    REWIND_DEMO_LOG         Override --log";

/// Which demo to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Observer,
    Undo,
    Counter,
    House,
}

impl Scenario {
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "observer" => Some(Self::Observer),
            "undo" => Some(Self::Undo),
            "counter" => Some(Self::Counter),
            "house" => Some(Self::House),
            _ => None,
        }
    }
}

/// How status lines are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parsed command-line options.
#[derive(Debug, Clone)]
pub struct Opts {
    /// Scenario to run.
    pub scenario: Scenario,
    /// Script path for the undo scenario (`-` = stdin, None = built-in).
    pub script: Option<String>,
    /// Undo history depth limit (None = unlimited).
    pub max_depth: Option<usize>,
    /// Save file for the house scenario (None = temp dir).
    pub save: Option<PathBuf>,
    /// Status output format.
    pub format: OutputFormat,
    /// Tracing filter directive.
    pub log: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseError {
    Help,
    Version,
    InvalidValue { flag: &'static str, value: String },
    UnknownArg(String),
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            scenario: Scenario::Undo,
            script: None,
            max_depth: None,
            save: None,
            format: OutputFormat::Text,
            log: "warn".into(),
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("rewind-demo {VERSION}");
                process::exit(0);
            }
            Err(ParseError::InvalidValue { flag, value }) => {
                eprintln!("Invalid {flag} value: {value}");
                process::exit(1);
            }
            Err(ParseError::UnknownArg(arg)) => {
                eprintln!("Unknown argument: {arg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = get_env("REWIND_DEMO_SCENARIO")
            && let Some(scenario) = Scenario::from_name(&val)
        {
            opts.scenario = scenario;
        }
        if let Some(val) = get_env("REWIND_DEMO_SCRIPT")
            && !val.trim().is_empty()
        {
            opts.script = Some(val);
        }
        if let Some(val) = get_env("REWIND_DEMO_MAX_DEPTH")
            && let Ok(n) = val.parse::<usize>()
            && n > 0
        {
            opts.max_depth = Some(n);
        }
        if let Some(val) = get_env("REWIND_DEMO_SAVE")
            && !val.trim().is_empty()
        {
            opts.save = Some(PathBuf::from(val));
        }
        if let Some(val) = get_env("REWIND_DEMO_FORMAT")
            && let Some(format) = OutputFormat::from_name(&val)
        {
            opts.format = format;
        }
        if let Some(val) = get_env("REWIND_DEMO_LOG")
            && !val.trim().is_empty()
        {
            opts.log = val;
        }

        // Parse command-line args (override env vars)
        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => {
                    return Err(ParseError::Help);
                }
                "--version" | "-V" => {
                    return Err(ParseError::Version);
                }
                other => {
                    if let Some(val) = other.strip_prefix("--scenario=") {
                        match Scenario::from_name(val) {
                            Some(scenario) => opts.scenario = scenario,
                            None => {
                                return Err(ParseError::InvalidValue {
                                    flag: "--scenario",
                                    value: val.to_string(),
                                });
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--script=") {
                        if !val.trim().is_empty() {
                            opts.script = Some(val.to_string());
                        }
                    } else if let Some(val) = other.strip_prefix("--max-depth=") {
                        // A depth of 0 would record nothing.
                        match val.parse::<usize>() {
                            Ok(n) if n > 0 => opts.max_depth = Some(n),
                            _ => {
                                return Err(ParseError::InvalidValue {
                                    flag: "--max-depth",
                                    value: val.to_string(),
                                });
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--save=") {
                        if !val.trim().is_empty() {
                            opts.save = Some(PathBuf::from(val));
                        }
                    } else if let Some(val) = other.strip_prefix("--format=") {
                        match OutputFormat::from_name(val) {
                            Some(format) => opts.format = format,
                            None => {
                                return Err(ParseError::InvalidValue {
                                    flag: "--format",
                                    value: val.to_string(),
                                });
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--log=") {
                        opts.log = val.to_string();
                    } else {
                        return Err(ParseError::UnknownArg(other.to_string()));
                    }
                }
            }
        }

        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_with_env<I, S>(
        args: I,
        env_pairs: &[(&'static str, &'static str)],
    ) -> Result<Opts, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = std::collections::HashMap::new();
        for (key, value) in env_pairs {
            map.insert(*key, *value);
        }
        Opts::parse_from_env_and_args(args, |key| map.get(key).map(|value| (*value).to_string()))
    }

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert_eq!(opts.scenario, Scenario::Undo);
        assert_eq!(opts.script, None);
        assert_eq!(opts.max_depth, None);
        assert_eq!(opts.save, None);
        assert_eq!(opts.format, OutputFormat::Text);
        assert_eq!(opts.log, "warn");
    }

    #[test]
    fn help_text_lists_scenarios_and_env_vars() {
        for name in ["observer", "undo", "counter", "house"] {
            assert!(HELP_TEXT.contains(name), "missing scenario {name}");
        }
        for var in [
            "REWIND_DEMO_SCENARIO",
            "REWIND_DEMO_SCRIPT",
            "REWIND_DEMO_MAX_DEPTH",
            "REWIND_DEMO_SAVE",
            "REWIND_DEMO_FORMAT",
            "REWIND_DEMO_LOG",
        ] {
            assert!(HELP_TEXT.contains(var), "missing env var {var}");
        }
    }

    #[test]
    fn env_overrides_apply() {
        let env = [
            ("REWIND_DEMO_SCENARIO", "house"),
            ("REWIND_DEMO_MAX_DEPTH", "5"),
            ("REWIND_DEMO_SAVE", "/tmp/h.json"),
            ("REWIND_DEMO_FORMAT", "JSON"),
            ("REWIND_DEMO_LOG", "debug"),
        ];
        let opts = parse_with_env(Vec::<String>::new(), &env).unwrap();
        assert_eq!(opts.scenario, Scenario::House);
        assert_eq!(opts.max_depth, Some(5));
        assert_eq!(opts.save, Some(PathBuf::from("/tmp/h.json")));
        assert_eq!(opts.format, OutputFormat::Json);
        assert_eq!(opts.log, "debug");
    }

    #[test]
    fn bad_env_values_are_ignored() {
        let env = [
            ("REWIND_DEMO_SCENARIO", "nope"),
            ("REWIND_DEMO_MAX_DEPTH", "many"),
        ];
        let opts = parse_with_env(Vec::<String>::new(), &env).unwrap();
        assert_eq!(opts.scenario, Scenario::Undo);
        assert_eq!(opts.max_depth, None);
    }

    #[test]
    fn args_override_env() {
        let args = ["--scenario=counter", "--script=session.txt"];
        let env = [
            ("REWIND_DEMO_SCENARIO", "house"),
            ("REWIND_DEMO_SCRIPT", "other.txt"),
        ];
        let opts = parse_with_env(args, &env).unwrap();
        assert_eq!(opts.scenario, Scenario::Counter);
        assert_eq!(opts.script.as_deref(), Some("session.txt"));
    }

    #[test]
    fn help_and_version() {
        assert_eq!(parse_with_env(["-h"], &[]).unwrap_err(), ParseError::Help);
        assert_eq!(
            parse_with_env(["--version"], &[]).unwrap_err(),
            ParseError::Version
        );
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn invalid_value_reports_flag() {
        let err = parse_with_env(["--max-depth=bad"], &[]).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidValue {
                flag: "--max-depth",
                value: "bad".to_string(),
            }
        );

        let err = parse_with_env(["--scenario=gui"], &[]).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidValue {
                flag: "--scenario",
                ..
            }
        ));
    }

    #[test]
    fn zero_max_depth_is_rejected() {
        let err = parse_with_env(["--max-depth=0"], &[]).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidValue {
                flag: "--max-depth",
                value: "0".to_string(),
            }
        );

        let opts = parse_with_env(Vec::<String>::new(), &[("REWIND_DEMO_MAX_DEPTH", "0")]).unwrap();
        assert_eq!(opts.max_depth, None);
    }

    #[test]
    fn unknown_arg_reports_error() {
        let err = parse_with_env(["--mystery-flag"], &[]).unwrap_err();
        assert_eq!(err, ParseError::UnknownArg("--mystery-flag".to_string()));
    }
}
