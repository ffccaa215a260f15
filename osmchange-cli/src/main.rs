//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = osmchange_cli::run() {
        eprintln!("osmchange: {err}");
        std::process::exit(1);
    }
}
