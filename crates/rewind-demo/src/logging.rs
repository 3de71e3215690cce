#![forbid(unsafe_code)]

//! Tracing subscriber setup for the demo binary.
//!
//! Logs go to stderr so script output on stdout stays clean.

use tracing_subscriber::EnvFilter;

/// Fallback directive when the requested filter does not parse.
pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter for `directive`, falling back to [`DEFAULT_FILTER`].
#[must_use]
pub fn filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global fmt subscriber. Returns `false` if one was already set.
pub fn init(directive: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter(directive))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn valid_directive_is_kept() {
        assert_eq!(filter("debug").max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn invalid_directive_falls_back() {
        assert_eq!(
            filter("rewind=bogus").max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }
}
