#![forbid(unsafe_code)]

//! Rewind demo driver library.
//!
//! Stands in for the UI shell: it subscribes to model values, turns script
//! lines into user intents and prints what the widgets would show. The
//! binary in `main.rs` only parses options, installs logging and calls
//! [`scenarios::run`].

pub mod cli;
pub mod error;
pub mod logging;
pub mod scenarios;
pub mod script;

pub use error::DemoError;
