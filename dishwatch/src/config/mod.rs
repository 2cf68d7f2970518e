//! Configuration file for the monitor (`~/.dishwatch/config.ini`).
//!
//! - [`settings`] - one struct per INI section
//! - [`defaults`] - `DEFAULT_*` constants and `ConfigFile::default()`
//! - [`parser`] - INI → `ConfigFile`, with validation
//! - [`writer`] - `ConfigFile` → commented INI
//!
//! A missing file means defaults. Unknown sections and keys are ignored.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, DeviceSettings, GpsSettings, LoggingSettings, MovementSettings, StatusSettings,
};
