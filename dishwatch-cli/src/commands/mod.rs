//! CLI command implementations.
//!
//! - [`init`] - write the default config file
//! - [`run`] - run the monitor until interrupted
//! - [`status`] - one status request
//! - [`stow`] - one stow or unstow command

pub mod init;
pub mod run;
pub mod status;
pub mod stow;
