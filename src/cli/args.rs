//! Command-line argument parsing and validation

use crate::error::{MacError, Result};
use clap::{Parser, error::ErrorKind};
use std::ffi::OsString;

/// Fixed usage text
pub const USAGE: &str = "\
Usage:
  antimac <device>
      Generate and set a random MAC address for <device>
  antimac -s <device>
  antimac --show <device>
      Show the current MAC address for <device>
  antimac -c <device> <new-mac-address>
  antimac --config <device> <new-mac-address>
      Set <new-mac-address> for <device>
  antimac -v
  antimac --version
      Show version
";

/// antimac - MAC address management for macOS
#[derive(Parser, Debug)]
#[command(name = "antimac", disable_version_flag = true, disable_help_flag = true)]
pub struct Args {
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Show version
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Show usage
    #[arg(short = 'h', long = "help")]
    pub help: bool,

    /// Show the current MAC address for DEVICE
    #[arg(short = 's', long = "show", value_name = "DEVICE", conflicts_with_all = ["config", "device"])]
    pub show: Option<String>,

    /// Set NEW_MAC for DEVICE
    #[arg(
        short = 'c',
        long = "config",
        num_args = 2,
        value_names = ["DEVICE", "NEW_MAC"],
        conflicts_with = "device"
    )]
    pub config: Option<Vec<String>>,

    /// Generate and set a random MAC address for DEVICE
    #[arg(value_name = "DEVICE")]
    pub device: Option<String>,
}

/// What the invocation asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ShowMac { device: String },
    SetRandomMac { device: String },
    SetSpecificMac { device: String, mac: String },
    ShowVersion,
    ShowUsage,
}

/// Parsed invocation: the intent plus ambient flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub intent: Intent,
    pub debug: bool,
}

impl Intent {
    /// Derive the intent from already-parsed arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let intent = Self::select(args)?;
        match &intent {
            Intent::ShowMac { device }
            | Intent::SetRandomMac { device }
            | Intent::SetSpecificMac { device, .. }
                if device.trim().is_empty() =>
            {
                Err(MacError::usage("Device name cannot be empty."))
            }
            _ => Ok(intent),
        }
    }

    fn select(args: Args) -> Result<Self> {
        if args.version {
            return Ok(Self::ShowVersion);
        }
        if args.help {
            return Ok(Self::ShowUsage);
        }
        if let Some(device) = args.show {
            return Ok(Self::ShowMac { device });
        }
        if let Some(values) = args.config {
            let mut values = values.into_iter();
            return match (values.next(), values.next()) {
                (Some(device), Some(mac)) => Ok(Self::SetSpecificMac { device, mac }),
                _ => Err(MacError::usage("Missing device or new-mac-address argument.")),
            };
        }
        match args.device {
            Some(device) => Ok(Self::SetRandomMac { device }),
            None => Err(MacError::usage("Missing device argument.")),
        }
    }
}

/// Whether `-v`/`--version` appears before any `--` terminator.
///
/// Checked ahead of full parsing so the version request wins over whatever
/// else is on the command line.
pub fn requests_version<I, T>(argv: I) -> bool
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    argv.into_iter()
        .skip(1)
        .map(Into::into)
        .take_while(|arg| arg != "--")
        .any(|arg| arg == "-v" || arg == "--version")
}

/// Parse a full argument vector, program name first
pub fn parse_invocation<I, T>(argv: I) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
    let debug = argv.iter().skip(1).any(|arg| arg == "--debug");

    if requests_version(&argv) {
        return Ok(Invocation {
            intent: Intent::ShowVersion,
            debug,
        });
    }

    let args = Args::try_parse_from(&argv).map_err(|e| MacError::usage(usage_reason(e.kind())))?;
    let debug = args.debug;

    Ok(Invocation {
        intent: Intent::from_args(args)?,
        debug,
    })
}

/// One-line reason shown above the usage text
fn usage_reason(kind: ErrorKind) -> String {
    match kind {
        ErrorKind::ArgumentConflict => {
            "Only one of -s, -c or a bare <device> may be given.".to_string()
        }
        ErrorKind::InvalidValue | ErrorKind::WrongNumberOfValues | ErrorKind::TooFewValues => {
            "Missing device or new-mac-address argument.".to_string()
        }
        ErrorKind::UnknownArgument => "Unexpected argument.".to_string(),
        other => {
            let text = other.as_str().unwrap_or("invalid arguments");
            let mut chars = text.chars();
            let first = chars.next().map(|c| c.to_ascii_uppercase());
            format!("{}{}.", first.map(String::from).unwrap_or_default(), chars.as_str())
        }
    }
}

/// Parse the process arguments
pub fn parse_args() -> Result<Invocation> {
    parse_invocation(std::env::args_os())
}
