//! Dishwatch CLI - Command-line interface
//!
//! This binary runs the dishwatch monitor and offers one-shot commands for
//! querying and steering the terminal.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::init::InitArgs;
use runner::RunnerOptions;

#[derive(Parser)]
#[command(name = "dishwatch")]
#[command(version = dishwatch::VERSION)]
#[command(about = "Monitor a satellite terminal and publish its status as telemetry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the terminal and publish deltas on stdout until interrupted
    Run {
        /// Config file (default: ~/.dishwatch/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Log at debug level
        #[arg(long)]
        debug: bool,

        /// Only log to the log file, not to stderr
        #[arg(long)]
        no_console_log: bool,
    },

    /// Query the terminal once and print its status
    Status {
        /// Config file (default: ~/.dishwatch/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Stow the antenna
    Stow {
        /// Config file (default: ~/.dishwatch/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Unstow the antenna
    Unstow {
        /// Config file (default: ~/.dishwatch/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a config file with default values
    Init {
        /// Where to write (default: ~/.dishwatch/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Options for the one-shot commands: file logging only, so their output
/// stays readable.
fn one_shot(config_path: Option<PathBuf>) -> RunnerOptions {
    RunnerOptions {
        config_path,
        debug: false,
        console_log: false,
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            debug,
            no_console_log,
        } => commands::run::run(RunnerOptions {
            config_path: config,
            debug,
            console_log: !no_console_log,
        }),
        Commands::Status { config } => commands::status::run(one_shot(config)),
        Commands::Stow { config } => commands::stow::run(one_shot(config), false),
        Commands::Unstow { config } => commands::stow::run(one_shot(config), true),
        Commands::Init { config, force } => commands::init::run(InitArgs {
            config_path: config,
            force,
        }),
    };

    if let Err(e) = result {
        e.exit();
    }
}
