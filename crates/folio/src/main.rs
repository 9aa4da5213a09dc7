//! `folio`: edit a Folio workspace from the command line.
//!
//! Documents and blocks live in a local JSON file that stands in for the
//! remote store, so every command goes through the same optimistic
//! synchronizer a graphical front end would use.

/// CLI module - command-line interface for folio
mod cli;

fn main() {
    cli::run_cli();
}
