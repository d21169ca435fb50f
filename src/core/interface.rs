//! Interface state queries
//!
//! Each query runs one OS utility through a [`CommandRunner`] and scrapes the
//! first line of its output. A utility that cannot be started yields an empty
//! line, which reads as "not down", "unknown type" or "no MAC".

use crate::{
    config::Config,
    utils::process::{CommandRunner, shell_quote},
};
use std::fmt;
use tracing::{debug, instrument};

const ETHER_MARKER: &str = "ether ";

/// Hardware port class of an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceType {
    WiFi,
    Ethernet,
    Unknown,
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WiFi => "Wi-Fi",
            Self::Ethernet => "Ethernet",
            Self::Unknown => "Unknown",
        })
    }
}

/// Read-only view of interfaces through the OS utilities
pub struct InterfaceQuery<'a, R: CommandRunner> {
    runner: &'a R,
    config: &'a Config,
}

impl<'a, R: CommandRunner> InterfaceQuery<'a, R> {
    #[must_use]
    pub const fn new(runner: &'a R, config: &'a Config) -> Self {
        Self { runner, config }
    }

    /// Whether `device` appears in the list of down interfaces
    #[instrument(skip(self))]
    pub fn is_interface_down(&self, device: &str) -> bool {
        let cmdline = format!(
            "{} -d | grep -E {}",
            self.config.commands.ifconfig,
            shell_quote(&format!("^{device}:"))
        );
        let down = !self.runner.capture(&cmdline).first_line.is_empty();
        debug!("Interface {} down: {}", device, down);
        down
    }

    /// Classify `device` against the Wi-Fi, then Ethernet, hardware port listings.
    ///
    /// The device must match a whole word, so `en1` never claims `en10`.
    #[instrument(skip(self))]
    pub fn interface_type(&self, device: &str) -> InterfaceType {
        for (port, kind) in [("Wi-Fi", InterfaceType::WiFi), ("Ethernet", InterfaceType::Ethernet)] {
            let cmdline = format!(
                "{} -listallhardwareports | grep -A1 {} | grep -w {}",
                self.config.commands.networksetup_query,
                shell_quote(port),
                shell_quote(device)
            );
            if !self.runner.capture(&cmdline).first_line.is_empty() {
                debug!("Interface {} is {}", device, kind);
                return kind;
            }
        }
        debug!("Interface {} has no known hardware port", device);
        InterfaceType::Unknown
    }

    /// MAC currently reported for `device`, or an empty string if none is found
    #[instrument(skip(self))]
    pub fn current_mac(&self, device: &str) -> String {
        let cmdline = format!(
            "{} {} | grep ether",
            self.config.commands.ifconfig,
            shell_quote(device)
        );
        parse_ether_line(&self.runner.capture(&cmdline).first_line)
    }

    /// Machine architecture as reported by `uname -m`
    #[instrument(skip(self))]
    pub fn cpu_arch(&self) -> String {
        let cmdline = format!("{} -m", self.config.commands.uname);
        self.runner.capture(&cmdline).first_line.trim().to_string()
    }
}

/// Extract the address following `ether ` in an `ifconfig` line
fn parse_ether_line(line: &str) -> String {
    line.find(ETHER_MARKER)
        .map(|at| line[at + ETHER_MARKER.len()..].trim().to_string())
        .unwrap_or_default()
}
