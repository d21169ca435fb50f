//! # antimac
//!
//! Show, randomize or set the MAC address of a macOS network interface.
//! The work is done by the OS utilities (`ifconfig`, `networksetup`,
//! `airport`, `uname`); this library picks the right command sequence for the
//! machine and interface, then checks the result by reading the address back.
//!
//! ## Example
//!
//! ```no_run
//! use antimac::{config::Config, core::InterfaceQuery, utils::ShellRunner};
//!
//! let config = Config::default();
//! let runner = ShellRunner::new(config.output_buffer);
//! let mac = InterfaceQuery::new(&runner, &config).current_mac("en0");
//! println!("en0: {mac}");
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a log filter directive that overrides `--debug`
pub const LOG_ENV: &str = "ANTIMAC_LOG";

/// Initialize logging with appropriate verbosity
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
