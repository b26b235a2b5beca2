// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol implementations for communicating with Shelly devices.
//!
//! # Protocols
//!
//! - [`HttpClient`]: outbound commands, one stateless GET per call
//! - [`NotificationListener`]: inbound `NotifyEvent`/`NotifyStatus` frames
//!   published by Gen2 devices on MQTT (requires the `mqtt` feature)

mod http;
#[cfg(feature = "mqtt")]
mod mqtt;

use std::future::Future;

pub use http::{HttpClient, HttpConfig};
#[cfg(feature = "mqtt")]
pub use mqtt::{MqttConfig, NotificationListener};

use crate::command::Command;
use crate::error::{ParseError, ProtocolError};

/// Response body returned by a device.
#[derive(Debug, Clone)]
pub struct CommandResponse {
    body: String,
}

impl CommandResponse {
    /// Creates a new command response with the given body.
    #[must_use]
    pub fn new(body: String) -> Self {
        Self { body }
    }

    /// Returns the raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the response as a specific type.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON cannot be parsed into the target type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, ParseError> {
        serde_json::from_str(&self.body).map_err(Into::into)
    }
}

/// Transport that can deliver commands to one device.
///
/// Implementations must be shareable across tasks: automations fire calls
/// from spawned tasks without waiting on each other.
pub trait Protocol: Send + Sync {
    /// Sends a command to the device and returns the response.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command fails to send or the device
    /// rejects it.
    fn send_command<C: Command + Sync>(
        &self,
        command: &C,
    ) -> impl Future<Output = Result<CommandResponse, ProtocolError>> + Send;
}
