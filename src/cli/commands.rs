//! Command implementations for the CLI

use crate::{
    cli::{Intent, USAGE},
    config::Config,
    core::{Dispatcher, InterfaceQuery, MacAddress, generate_random_mac},
    error::{MacError, Result},
    utils::process::CommandRunner,
};
use std::io::Write;
use tracing::{debug, info, instrument, warn};

/// Version line printed by `-v`
pub const VERSION_LINE: &str = concat!("Version: ", env!("CARGO_PKG_VERSION"));

/// Execute the appropriate command for `intent`, writing user-facing lines to `out`
#[instrument(skip(config, runner, out))]
pub fn execute_intent<R: CommandRunner>(
    config: &Config,
    runner: &R,
    intent: &Intent,
    out: &mut impl Write,
) -> Result<()> {
    match intent {
        Intent::ShowVersion => {
            writeln!(out, "{VERSION_LINE}")?;
            Ok(())
        }
        Intent::ShowUsage => {
            write!(out, "{USAGE}")?;
            Ok(())
        }
        Intent::ShowMac { device } => execute_show_command(config, runner, device, out),
        Intent::SetRandomMac { device } => {
            ensure_device_up(config, runner, device)?;
            let mac = generate_random_mac();
            info!("Generated random MAC {} for {}", mac, device);
            execute_set_command(config, runner, device, &mac, out)
        }
        Intent::SetSpecificMac { device, mac } => {
            ensure_device_up(config, runner, device)?;
            let mac: MacAddress = mac.parse().map_err(|e| {
                debug!("Rejected MAC address: {}", e);
                MacError::InvalidMacSyntax
            })?;
            if mac.is_multicast() {
                warn!("{} has the multicast bit set and may be rejected", mac);
            }
            execute_set_command(config, runner, device, &mac, out)
        }
    }
}

/// Execute the show command
#[instrument(skip(config, runner, out))]
fn execute_show_command<R: CommandRunner>(
    config: &Config,
    runner: &R,
    device: &str,
    out: &mut impl Write,
) -> Result<()> {
    let current = InterfaceQuery::new(runner, config).current_mac(device);
    if current.is_empty() {
        writeln!(out, "Could not get MAC address for {device}")?;
        return Err(MacError::MacUnavailable {
            device: device.to_string(),
        });
    }
    writeln!(out, "[+] {device} MAC address: {current}")?;
    Ok(())
}

fn ensure_device_up<R: CommandRunner>(config: &Config, runner: &R, device: &str) -> Result<()> {
    if InterfaceQuery::new(runner, config).is_interface_down(device) {
        return Err(MacError::device_down(device));
    }
    Ok(())
}

/// Execute the set command and confirm it by reading the address back
#[instrument(skip(config, runner, out))]
fn execute_set_command<R: CommandRunner>(
    config: &Config,
    runner: &R,
    device: &str,
    mac: &MacAddress,
    out: &mut impl Write,
) -> Result<()> {
    let dispatcher = Dispatcher::new(runner, config);
    let strategy = dispatcher.resolve_strategy(device);
    let accepted = dispatcher.apply(strategy, device, mac, out)?;

    let actual = InterfaceQuery::new(runner, config).current_mac(device);
    if !actual.eq_ignore_ascii_case(&mac.to_string()) {
        if accepted {
            warn!("Set command succeeded but {} still reports {:?}", device, actual);
        }
        return Err(MacError::apply_failure(device, actual));
    }

    writeln!(out, "[+] MAC address successfully set for {device}: {actual}")?;
    Ok(())
}

/// Print `err` on the stream it belongs to
pub fn report_error(err: &MacError, out: &mut impl Write, err_out: &mut impl Write) -> Result<()> {
    match err {
        MacError::Usage { message } => {
            writeln!(err_out, "{message}")?;
            write!(err_out, "{USAGE}")?;
        }
        // Already printed by the show command
        MacError::MacUnavailable { .. } => {}
        other if other.reports_to_stdout() => write!(out, "{}", other.diagnostic())?,
        other => write!(err_out, "{}", other.diagnostic())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::process::CommandResult;
    use crate::utils::testing::{CallKind, ScriptedRunner};

    fn quick_config() -> Config {
        Config {
            settle_delay_ms: 0,
            legacy_reset_delay_ms: 0,
            ..Config::default()
        }
    }

    fn run(runner: &ScriptedRunner, intent: Intent) -> (Result<()>, String) {
        let mut out = Vec::<u8>::new();
        let result = execute_intent(&quick_config(), runner, &intent, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn set_specific(mac: &str) -> Intent {
        Intent::SetSpecificMac {
            device: "en0".to_string(),
            mac: mac.to_string(),
        }
    }

    #[test]
    fn test_version() {
        let runner = ScriptedRunner::new();
        let (result, out) = run(&runner, Intent::ShowVersion);
        assert!(result.is_ok());
        assert_eq!(out, "Version: 0.0.1\n");
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_show_mac() {
        let runner =
            ScriptedRunner::new().prints("ifconfig en0 | grep ether", "\tether 3c:22:fb:aa:bb:cc ");
        let (result, out) = run(
            &runner,
            Intent::ShowMac {
                device: "en0".to_string(),
            },
        );
        assert!(result.is_ok());
        assert_eq!(out, "[+] en0 MAC address: 3c:22:fb:aa:bb:cc\n");
        assert!(runner.executed().is_empty());
    }

    #[test]
    fn test_show_mac_missing() {
        let (result, out) = run(
            &ScriptedRunner::new(),
            Intent::ShowMac {
                device: "utun3".to_string(),
            },
        );
        assert!(matches!(result, Err(MacError::MacUnavailable { .. })));
        assert_eq!(out, "Could not get MAC address for utun3\n");
    }

    #[test]
    fn test_down_device_is_never_mutated() {
        let intents = [
            Intent::SetRandomMac {
                device: "en0".to_string(),
            },
            set_specific("02:00:00:00:00:01"),
        ];
        for intent in intents {
            let runner = ScriptedRunner::new().prints("'^en0:'", "en0: flags=8822<BROADCAST>");
            let (result, _) = run(&runner, intent);

            assert!(matches!(result, Err(MacError::DeviceDown { .. })));
            assert!(runner.executed().is_empty());
        }
    }

    #[test]
    fn test_invalid_mac_is_never_applied() {
        let runner = ScriptedRunner::new();
        let (result, _) = run(&runner, set_specific("aa:bb:cc:dd:ee:f"));

        assert!(matches!(result, Err(MacError::InvalidMacSyntax)));
        assert!(runner.executed().is_empty());
        // Only the down check ran
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_arm_wifi_retry_end_to_end() {
        let runner = ScriptedRunner::new()
            .prints("uname -m", "arm64")
            .prints("grep -A1 Wi-Fi | grep -w en0", "Device: en0")
            .on(
                "ifconfig en0 ether",
                vec![CommandResult::exited(1, ""), CommandResult::exited(0, "")],
            )
            .prints("ifconfig en0 | grep ether", "\tether 0a:1b:2c:3d:4e:5f ");

        let (result, out) = run(&runner, set_specific("0A:1B:2C:3D:4E:5F"));

        assert!(result.is_ok(), "{result:?}");
        assert_eq!(
            out,
            "[+] MAC address successfully set for en0: 0a:1b:2c:3d:4e:5f\n"
        );
        assert_eq!(runner.executed().len(), 5);
        assert_eq!(
            runner.calls().last().unwrap(),
            &(
                CallKind::Capture,
                "/sbin/ifconfig en0 | grep ether".to_string()
            )
        );
    }

    #[test]
    fn test_verification_is_authoritative() {
        // Set command claims success but the interface keeps its old address
        let runner = ScriptedRunner::new()
            .prints("uname -m", "x86_64")
            .prints("ifconfig en0 | grep ether", "\tether 3c:22:fb:aa:bb:cc ");

        let (result, _) = run(&runner, set_specific("02:00:00:00:00:01"));

        match result {
            Err(MacError::ApplyFailure { device, current }) => {
                assert_eq!(device, "en0");
                assert_eq!(current, "3c:22:fb:aa:bb:cc");
            }
            other => panic!("Expected ApplyFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_random_mac_is_locally_administered() {
        let runner = ScriptedRunner::new().prints("uname -m", "x86_64");
        let (result, _) = run(
            &runner,
            Intent::SetRandomMac {
                device: "en5".to_string(),
            },
        );
        assert!(matches!(result, Err(MacError::ApplyFailure { .. })));

        let executed = runner.executed();
        assert_eq!(executed.len(), 1);
        let mac: MacAddress = executed[0]
            .split_whitespace()
            .nth(4)
            .unwrap()
            .parse()
            .unwrap();
        assert!(mac.is_locally_administered());
        assert!(!mac.is_multicast());
    }

    #[test]
    fn test_report_error_streams() {
        let mut out = Vec::<u8>::new();
        let mut err_out = Vec::<u8>::new();

        report_error(
            &MacError::usage("Missing device argument."),
            &mut out,
            &mut err_out,
        )
        .unwrap();
        let err_text = String::from_utf8(err_out.clone()).unwrap();
        assert!(err_text.starts_with("Missing device argument.\nUsage:\n"));
        assert!(out.is_empty());

        err_out.clear();
        report_error(&MacError::apply_failure("en0", ""), &mut out, &mut err_out).unwrap();
        assert!(err_out.is_empty());
        assert!(String::from_utf8(out).unwrap().starts_with("[!] Failed to set MAC address for en0"));
    }
}
