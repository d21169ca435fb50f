//! Platform-specific MAC change sequences
//!
//! The sequence is chosen once from the CPU architecture and the interface
//! type, then run step by step with fixed settling pauses between radio state
//! changes.

use crate::{
    config::Config,
    core::{
        interface::{InterfaceQuery, InterfaceType},
        mac::MacAddress,
    },
    error::Result,
    utils::process::{CommandRunner, shell_quote},
};
use std::io::Write;
use tracing::{debug, info, instrument, warn};

const ARM_ARCH: &str = "arm64";

const AIRPORT_DEPRECATION_WARNING: &str = "WARNING: The airport command line tool is deprecated and will be removed in a future release.\n\
     For diagnosing Wi-Fi related issues, use the Wireless Diagnostics app or wdutil command line tool.";

/// CPU family, as far as the change sequence is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    Arm,
    Intel,
}

impl Architecture {
    /// `arm64` is ARM; everything else, including an empty answer, is Intel
    #[must_use]
    pub fn from_uname(machine: &str) -> Self {
        if machine.trim() == ARM_ARCH {
            Self::Arm
        } else {
            Self::Intel
        }
    }
}

/// The four change sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStrategy {
    ArmWifi,
    ArmOther,
    IntelWifi,
    IntelOther,
}

impl ApplyStrategy {
    #[must_use]
    pub const fn resolve(arch: Architecture, kind: InterfaceType) -> Self {
        match (arch, kind) {
            (Architecture::Arm, InterfaceType::WiFi) => Self::ArmWifi,
            (Architecture::Arm, _) => Self::ArmOther,
            (Architecture::Intel, InterfaceType::WiFi) => Self::IntelWifi,
            (Architecture::Intel, _) => Self::IntelOther,
        }
    }
}

/// Runs the change sequence for one interface
pub struct Dispatcher<'a, R: CommandRunner> {
    runner: &'a R,
    config: &'a Config,
}

impl<'a, R: CommandRunner> Dispatcher<'a, R> {
    #[must_use]
    pub const fn new(runner: &'a R, config: &'a Config) -> Self {
        Self { runner, config }
    }

    /// Pick the sequence for `device` from `uname -m` and its hardware port
    #[instrument(skip(self))]
    pub fn resolve_strategy(&self, device: &str) -> ApplyStrategy {
        let query = InterfaceQuery::new(self.runner, self.config);
        let arch = Architecture::from_uname(&query.cpu_arch());
        let kind = query.interface_type(device);
        let strategy = ApplyStrategy::resolve(arch, kind);
        debug!("Architecture {:?}, interface type {}: {:?}", arch, kind, strategy);
        strategy
    }

    /// Run `strategy` to put `mac` on `device`.
    ///
    /// Returns whether the underlying set command reported success. That is
    /// only a hint: the caller confirms the change by reading the address back.
    #[instrument(skip(self, out))]
    pub fn apply(
        &self,
        strategy: ApplyStrategy,
        device: &str,
        mac: &MacAddress,
        out: &mut impl Write,
    ) -> Result<bool> {
        let accepted = match strategy {
            ApplyStrategy::ArmWifi => self.apply_arm_wifi(device, mac),
            ApplyStrategy::IntelWifi => {
                writeln!(out, "{AIRPORT_DEPRECATION_WARNING}")?;
                self.apply_intel_wifi(device, mac)
            }
            ApplyStrategy::ArmOther | ApplyStrategy::IntelOther => self.set_mac(device, mac),
        };

        if accepted {
            info!("Set command accepted {} for {}", mac, device);
        } else {
            warn!("Set command for {} on {} did not succeed", mac, device);
        }
        Ok(accepted)
    }

    /// The first set usually fails while the radio is off; the second runs
    /// after power comes back.
    fn apply_arm_wifi(&self, device: &str, mac: &MacAddress) -> bool {
        self.airport_power(device, false);
        self.runner.pause(self.config.settle_delay());
        let first = self.set_mac(device, mac);

        self.airport_power(device, true);
        self.runner.pause(self.config.settle_delay());
        let second = self.set_mac(device, mac);

        self.run_privileged(&format!(
            "{} -detectnewhardware",
            self.config.commands.networksetup
        ));
        self.runner.pause(self.config.settle_delay());

        debug!("Wi-Fi set attempts: first={}, second={}", first, second);
        first || second
    }

    fn apply_intel_wifi(&self, device: &str, mac: &MacAddress) -> bool {
        self.run_privileged(&format!(
            "{} {} -z",
            shell_quote(&self.config.commands.airport),
            shell_quote(device)
        ));
        self.runner.pause(self.config.legacy_reset_delay());
        self.set_mac(device, mac)
    }

    fn airport_power(&self, device: &str, on: bool) -> bool {
        self.run_privileged(&format!(
            "{} -setairportpower {} {}",
            self.config.commands.networksetup,
            shell_quote(device),
            if on { "on" } else { "off" }
        ))
    }

    fn set_mac(&self, device: &str, mac: &MacAddress) -> bool {
        self.run_privileged(&format!(
            "{} {} ether {} 2>/dev/null",
            self.config.commands.ifconfig,
            shell_quote(device),
            mac
        ))
    }

    fn run_privileged(&self, cmdline: &str) -> bool {
        self.runner.execute(&self.config.privileged(cmdline)).success
    }
}
