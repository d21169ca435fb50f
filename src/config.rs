//! Configuration management for antimac
//!
//! Centralizes the OS utility locations and settling delays used when
//! changing an address.

use crate::{cli::Invocation, error::MacError, utils::process::DEFAULT_OUTPUT_BUFFER};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// External utilities invoked by the tool
    pub commands: PlatformCommands,
    /// Pause after toggling Wi-Fi power or re-detecting hardware
    pub settle_delay_ms: u64,
    /// Pause after the legacy airport reset on Intel machines
    pub legacy_reset_delay_ms: u64,
    /// Capacity of a captured output line, terminator included
    pub output_buffer: usize,
}

/// Locations of the OS utilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformCommands {
    /// Interface configuration utility
    pub ifconfig: String,
    /// Network hardware/power utility used for mutations
    pub networksetup: String,
    /// Network hardware utility used for port listing
    pub networksetup_query: String,
    /// Legacy Wi-Fi diagnostic utility (Intel only)
    pub airport: String,
    /// Architecture identification utility
    pub uname: String,
    /// Prefix prepended to every mutating command, e.g. `sudo`
    pub privilege_prefix: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            commands: PlatformCommands::default(),
            settle_delay_ms: 200,
            legacy_reset_delay_ms: 2000,
            output_buffer: DEFAULT_OUTPUT_BUFFER,
        }
    }
}

impl Default for PlatformCommands {
    fn default() -> Self {
        Self {
            ifconfig: "/sbin/ifconfig".to_string(),
            networksetup: "/usr/sbin/networksetup".to_string(),
            networksetup_query: "networksetup".to_string(),
            airport: "/System/Library/PrivateFrameworks/Apple80211.framework/Versions/Current/Resources/airport".to_string(),
            uname: "uname".to_string(),
            privilege_prefix: Some("sudo".to_string()),
        }
    }
}

impl Config {
    /// Create configuration from parsed command line arguments
    pub fn from_invocation(invocation: &Invocation) -> Result<Self, MacError> {
        let config = Self {
            debug: invocation.debug,
            ..Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), MacError> {
        let commands = &self.commands;
        for (name, path) in [
            ("ifconfig", &commands.ifconfig),
            ("networksetup", &commands.networksetup),
            ("networksetup_query", &commands.networksetup_query),
            ("airport", &commands.airport),
            ("uname", &commands.uname),
        ] {
            if path.trim().is_empty() {
                return Err(MacError::config(format!("{name} command is empty")));
            }
        }

        if self.output_buffer < 2 {
            return Err(MacError::config(format!(
                "output buffer of {} bytes cannot hold a line",
                self.output_buffer
            )));
        }

        Ok(())
    }

    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub const fn legacy_reset_delay(&self) -> Duration {
        Duration::from_millis(self.legacy_reset_delay_ms)
    }

    /// Build a mutating command line, prefixed for elevated privileges when configured
    pub fn privileged(&self, cmdline: &str) -> String {
        match &self.commands.privilege_prefix {
            Some(prefix) if !prefix.is_empty() => format!("{prefix} {cmdline}"),
            _ => cmdline.to_string(),
        }
    }
}
