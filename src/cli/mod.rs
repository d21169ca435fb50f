//! Command-line interface module
//!
//! Provides argument parsing and command execution.

pub mod args;
pub mod commands;

pub use args::{Args, Intent, Invocation, USAGE, parse_args, parse_invocation};
pub use commands::{VERSION_LINE, execute_intent, report_error};
