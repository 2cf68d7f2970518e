//! Scripted terminal used by unit tests across the crate.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::client::{DeviceClient, DeviceConnector};
use super::error::DeviceError;
use super::model::{DeviceLocation, DeviceStatus};

#[derive(Default)]
struct Script {
    statuses: VecDeque<Result<DeviceStatus, DeviceError>>,
    locations: VecDeque<Result<DeviceLocation, DeviceError>>,
    stow_results: VecDeque<Result<(), DeviceError>>,
    stow_calls: Vec<bool>,
}

/// Queues of canned responses. Unscripted status and location requests fail
/// with a transport error; unscripted stow commands succeed.
#[derive(Clone, Default)]
pub(crate) struct ScriptedDevice {
    script: Arc<Mutex<Script>>,
}

impl ScriptedDevice {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn connector(&self) -> ScriptedConnector {
        ScriptedConnector(self.clone())
    }

    pub(crate) fn push_status(&self, result: Result<DeviceStatus, DeviceError>) {
        self.script.lock().unwrap().statuses.push_back(result);
    }

    pub(crate) fn push_location(&self, result: Result<DeviceLocation, DeviceError>) {
        self.script.lock().unwrap().locations.push_back(result);
    }

    pub(crate) fn push_stow_result(&self, result: Result<(), DeviceError>) {
        self.script.lock().unwrap().stow_results.push_back(result);
    }

    /// Every stow command received, as the `unstow` argument.
    pub(crate) fn stow_calls(&self) -> Vec<bool> {
        self.script.lock().unwrap().stow_calls.clone()
    }
}

pub(crate) struct ScriptedConnector(ScriptedDevice);

impl DeviceConnector for ScriptedConnector {
    type Client = ScriptedDevice;

    fn connect(&self) -> Result<ScriptedDevice, DeviceError> {
        Ok(self.0.clone())
    }
}

impl DeviceClient for ScriptedDevice {
    async fn get_status(&self) -> Result<DeviceStatus, DeviceError> {
        let next = self.script.lock().unwrap().statuses.pop_front();
        next.unwrap_or_else(|| Err(DeviceError::Transport("no scripted status".into())))
    }

    async fn get_location(&self) -> Result<DeviceLocation, DeviceError> {
        let next = self.script.lock().unwrap().locations.pop_front();
        next.unwrap_or_else(|| Err(DeviceError::Transport("no scripted location".into())))
    }

    async fn set_stow(&self, unstow: bool) -> Result<(), DeviceError> {
        let mut script = self.script.lock().unwrap();
        script.stow_calls.push(unstow);
        script.stow_results.pop_front().unwrap_or(Ok(()))
    }
}
