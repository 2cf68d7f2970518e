//! Init command - write a default config file.

use std::path::PathBuf;

use dishwatch::config::{config_file_path, ConfigFile};

use crate::error::CliError;

pub struct InitArgs {
    pub config_path: Option<PathBuf>,
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<(), CliError> {
    let path = args.config_path.unwrap_or_else(config_file_path);

    if path.exists() && !args.force {
        return Err(CliError::ConfigExists(path));
    }

    ConfigFile::default().save_to(&path)?;
    println!("Wrote default configuration to {}", path.display());
    println!();
    println!("To stow automatically while under way, set:");
    println!("  [movement]");
    println!("  stow_while_moving = true");
    Ok(())
}
