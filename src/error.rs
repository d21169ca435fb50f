//! Error types for antimac
//!
//! Every failure the tool can report to the user is a variant of [`MacError`].
//! Failures to launch an external command are not errors: they degrade to
//! empty output and surface through whichever check consumed that output.

use thiserror::Error;

/// Main error type for the MAC address tool
#[derive(Error, Debug)]
pub enum MacError {
    /// Malformed or missing command-line arguments
    #[error("{message}")]
    Usage { message: String },

    /// The target interface is listed among the down interfaces
    #[error("Device {device} is down.")]
    DeviceDown { device: String },

    /// A user-supplied MAC failed the `xx:xx:xx:xx:xx:xx` shape check
    #[error("Mac address is not valid.")]
    InvalidMacSyntax,

    /// No MAC could be read for the interface
    #[error("Could not get MAC address for {device}")]
    MacUnavailable { device: String },

    /// The interface did not report the requested MAC after the change
    #[error("Failed to set MAC address for {device}")]
    ApplyFailure { device: String, current: String },

    /// Invalid runtime configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Writing user-facing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MacError {
    /// Create a new usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a new device-down error
    pub fn device_down(device: impl Into<String>) -> Self {
        Self::DeviceDown {
            device: device.into(),
        }
    }

    /// Create a new apply failure carrying the MAC the interface still reports
    pub fn apply_failure(device: impl Into<String>, current: impl Into<String>) -> Self {
        Self::ApplyFailure {
            device: device.into(),
            current: current.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error is reported on standard output rather than standard error
    #[must_use]
    pub const fn reports_to_stdout(&self) -> bool {
        matches!(self, Self::ApplyFailure { .. })
    }

    /// Full user-facing text for this error.
    ///
    /// Apply failures expand into a multi-line diagnostic listing the current
    /// MAC and the usual reasons a change is refused.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        match self {
            Self::ApplyFailure { device, current } => format!(
                "[!] Failed to set MAC address for {device}\n\
                 [=] Current MAC remains: {current}\n\
                 \n\
                 [x] MAC operation failed. Possible causes:\n\
                 \u{20}   • Insufficient privileges (try sudo)\n\
                 \u{20}   • MAC address rejected by system\n\
                 \u{20}   • Interface may not support spoofing\n\
                 \u{20}   • The network stack is feeling stubborn today\n\
                 \u{20}   • Or perhaps, fate resists your command\n"
            ),
            other => format!("{other}\n"),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MacError>;
