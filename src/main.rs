//! blogcore entry point
//!
//! Parses the command line and hands off to `cli::run`. Any error, including
//! a missing cookie secret, is printed to stderr and exits non-zero.

use blogcore::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
