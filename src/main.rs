#![allow(clippy::cargo_common_metadata)]
use antimac::{cli, config::Config, error::MacError, setup_logging, utils::ShellRunner};
use anyhow::Result;
use std::{io, process::ExitCode};

fn main() -> Result<ExitCode> {
    let parsed = cli::parse_args().and_then(|invocation| {
        let config = Config::from_invocation(&invocation)?;
        Ok((config, invocation))
    });
    let (config, invocation) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => return fail(&e),
    };

    setup_logging(config.debug)?;

    let runner = ShellRunner::new(config.output_buffer);
    match cli::execute_intent(&config, &runner, &invocation.intent, &mut io::stdout()) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => fail(&e),
    }
}

fn fail(err: &MacError) -> Result<ExitCode> {
    cli::report_error(err, &mut io::stdout(), &mut io::stderr())?;
    Ok(ExitCode::FAILURE)
}
