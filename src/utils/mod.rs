//! Utility modules for common functionality
//!
//! Provides external process execution behind a mockable seam.

pub mod process;

#[cfg(test)]
pub(crate) mod testing;

pub use process::{CommandResult, CommandRunner, ShellRunner, shell_quote};
