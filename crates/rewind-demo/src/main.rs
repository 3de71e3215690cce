#![forbid(unsafe_code)]

//! Rewind demo binary entry point.

use rewind_demo::{cli, logging, scenarios};

fn main() {
    let opts = cli::Opts::parse();
    logging::init(&opts.log);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = scenarios::run(&opts, &mut out) {
        eprintln!("Demo error: {e}");
        std::process::exit(1);
    }
}
