//! Stow/unstow commands - send a single command to the terminal.

use crate::error::CliError;
use crate::runner::{CliRunner, RunnerOptions};

pub fn run(options: RunnerOptions, unstow: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(&options)?;
    let command = if unstow { "unstow" } else { "stow" };
    runner.log_startup(command);

    let link = runner.device_link();
    runner.runtime()?.block_on(link.set_stow(unstow))?;

    tracing::info!(command, "Command accepted");
    println!("Terminal accepted {} command", command);
    Ok(())
}
