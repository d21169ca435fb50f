//! External command execution
//!
//! Every OS utility the tool relies on is reached through [`CommandRunner`],
//! so the command sequences can be exercised against a scripted runner in
//! tests. Calls are blocking and never time out: a hung utility hangs the tool.

use std::borrow::Cow;
use std::process::{Command, Stdio};
use std::{thread, time::Duration};
use tracing::{debug, instrument, warn};

/// Default capacity of the captured first line, terminator included
pub const DEFAULT_OUTPUT_BUFFER: usize = 256;

/// Outcome of a single external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// First line of standard output, without its line terminator
    pub first_line: String,
    /// Exit status code, `None` if the process never ran or was killed
    pub exit_code: Option<i32>,
    /// Whether the process exited with status 0
    pub success: bool,
}

impl CommandResult {
    /// Result of a command that could not be started
    #[must_use]
    pub fn not_started() -> Self {
        Self::default()
    }

    /// Result of a command that exited with `code` and printed `first_line`
    #[must_use]
    pub fn exited(code: i32, first_line: impl Into<String>) -> Self {
        Self {
            first_line: first_line.into(),
            exit_code: Some(code),
            success: code == 0,
        }
    }
}

/// Narrow seam over the OS shell
pub trait CommandRunner {
    /// Run `cmdline` and capture the first line of its standard output
    fn capture(&self, cmdline: &str) -> CommandResult;

    /// Run `cmdline` with inherited standard streams, keeping only its status
    fn execute(&self, cmdline: &str) -> CommandResult;

    /// Wait for the OS to settle between two commands
    fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            debug!("Pausing for {:?}", delay);
            thread::sleep(delay);
        }
    }
}

/// Runs command lines through `sh -c`
#[derive(Debug)]
pub struct ShellRunner {
    output_buffer: usize,
}

impl ShellRunner {
    /// Create a runner whose captured lines are capped at `output_buffer - 1` bytes
    #[must_use]
    pub const fn new(output_buffer: usize) -> Self {
        Self { output_buffer }
    }

    fn shell(cmdline: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(cmdline);
        cmd
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_BUFFER)
    }
}

impl CommandRunner for ShellRunner {
    #[instrument(skip(self))]
    fn capture(&self, cmdline: &str) -> CommandResult {
        debug!("Running command with output capture: {}", cmdline);

        let output = match Self::shell(cmdline)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                warn!("Failed to execute command '{}': {}", cmdline, e);
                return CommandResult::not_started();
            }
        };

        let first_line = first_line(&output.stdout, self.output_buffer);
        let exit_code = output.status.code();
        let success = output.status.success();

        debug!(
            "Command finished: success={}, exit_code={:?}, first_line={:?}",
            success, exit_code, first_line
        );

        CommandResult {
            first_line,
            exit_code,
            success,
        }
    }

    #[instrument(skip(self))]
    fn execute(&self, cmdline: &str) -> CommandResult {
        debug!("Running command: {}", cmdline);

        match Self::shell(cmdline)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
        {
            Ok(status) => {
                debug!("Command finished with status {:?}", status.code());
                CommandResult {
                    first_line: String::new(),
                    exit_code: status.code(),
                    success: status.success(),
                }
            }
            Err(e) => {
                warn!("Failed to execute command '{}': {}", cmdline, e);
                CommandResult::not_started()
            }
        }
    }
}

/// Extract the first line of `stdout` the way a fixed `fgets` buffer would:
/// at most `buffer - 1` bytes, stopping after the first newline.
fn first_line(stdout: &[u8], buffer: usize) -> String {
    let cap = buffer.saturating_sub(1);
    let mut line = &stdout[..stdout.len().min(cap)];
    if let Some(end) = line.iter().position(|&b| b == b'\n') {
        line = &line[..end];
    }
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Quote `value` for interpolation into a `sh` command line.
///
/// Values made only of characters that are inert to the shell pass through
/// unchanged; anything else is wrapped in single quotes.
#[must_use]
pub fn shell_quote(value: &str) -> Cow<'_, str> {
    let inert = |c: char| c.is_ascii_alphanumeric() || "._:@%+=,/-".contains(c);
    if !value.is_empty() && value.chars().all(inert) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("'{}'", value.replace('\'', r"'\''")))
    }
}
