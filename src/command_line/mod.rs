//! Command-line interface: argument definitions and subcommand handlers.

pub mod cli;
