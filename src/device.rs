// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed access to one Shelly device.

use std::sync::Arc;
use std::time::Duration;

use crate::command::{
    Command, InputCommand, LegacyLightCommand, LegacySettingsCommand, LightCommand, RgbCommand,
    RgbwCommand, RgbwSet, SwitchCommand,
};
use crate::error::Error;
use crate::protocol::{CommandResponse, HttpClient, Protocol};
use crate::response::{InputConfig, LegacyLightStatus, LightStatus, RgbwStatus};
use crate::types::{Brightness, DimDirection, FadeRate, RgbColor};

/// A Shelly device reachable through a protocol.
///
/// Cloning is cheap; clones share the same protocol client.
///
/// # Examples
///
/// ```no_run
/// use shelly_automation::Device;
///
/// # async fn example() -> shelly_automation::Result<()> {
/// let dimmer = Device::http("192.168.1.60")?;
/// let status = dimmer.light_status(1).await?;
/// println!("channel 1 at {}", status.brightness());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Device<P: Protocol> {
    protocol: Arc<P>,
}

impl<P: Protocol> Clone for Device<P> {
    fn clone(&self) -> Self {
        Self {
            protocol: Arc::clone(&self.protocol),
        }
    }
}

impl Device<HttpClient> {
    /// Creates a device reached over HTTP with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the client cannot be created.
    pub fn http(host: impl Into<String>) -> Result<Self, Error> {
        Ok(Self::new(HttpClient::new(host)?))
    }
}

impl<P: Protocol> Device<P> {
    /// Creates a device with the specified protocol.
    pub fn new(protocol: P) -> Self {
        Self {
            protocol: Arc::new(protocol),
        }
    }

    /// Sends a command to the device.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn send_command<C: Command + Sync>(
        &self,
        command: &C,
    ) -> Result<CommandResponse, Error> {
        self.protocol
            .send_command(command)
            .await
            .map_err(Error::Protocol)
    }

    async fn send_and_parse<C, T>(&self, command: &C) -> Result<T, Error>
    where
        C: Command + Sync,
        T: serde::de::DeserializeOwned,
    {
        let response = self.send_command(command).await?;
        response.parse().map_err(Error::Parse)
    }

    // ========== Gen2 Light ==========

    /// Toggles a light, restoring its last brightness when turning on.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn toggle_light(&self, id: u8) -> Result<(), Error> {
        self.send_command(&LightCommand::toggle(id)).await.map(drop)
    }

    /// Turns a light on at its last brightness.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn turn_on_light(&self, id: u8) -> Result<(), Error> {
        self.send_command(&LightCommand::turn_on(id)).await.map(drop)
    }

    /// Turns a light on at the given brightness.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_light_brightness(&self, id: u8, brightness: Brightness) -> Result<(), Error> {
        self.send_command(&LightCommand::set_brightness(id, brightness))
            .await
            .map(drop)
    }

    /// Fades a light to a fixed level, switching it off at zero.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn fade_light_to(
        &self,
        id: u8,
        brightness: Brightness,
        transition: Duration,
    ) -> Result<(), Error> {
        let command = LightCommand::Set {
            id,
            on: Some(brightness.value() > 0),
            brightness: Some(brightness),
            transition: Some(transition),
        };
        self.send_command(&command).await.map(drop)
    }

    /// Starts dimming a light towards an extreme.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn dim_light(
        &self,
        id: u8,
        direction: DimDirection,
        fade_rate: FadeRate,
    ) -> Result<(), Error> {
        self.send_command(&LightCommand::dim(id, direction, fade_rate))
            .await
            .map(drop)
    }

    /// Stops an ongoing dim.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn stop_dimming_light(&self, id: u8) -> Result<(), Error> {
        self.send_command(&LightCommand::dim_stop(id)).await.map(drop)
    }

    /// Reads the status of a light.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the response is malformed.
    pub async fn light_status(&self, id: u8) -> Result<LightStatus, Error> {
        self.send_and_parse(&LightCommand::get_status(id)).await
    }

    // ========== Gen1 Light ==========

    /// Sends a Gen1 `/light/<channel>` action.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn legacy_light(&self, command: LegacyLightCommand) -> Result<(), Error> {
        self.send_command(&command).await.map(drop)
    }

    /// Reads the status of a Gen1 light channel.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the response is malformed.
    pub async fn legacy_light_status(&self, channel: u8) -> Result<LegacyLightStatus, Error> {
        self.send_and_parse(&LegacyLightCommand::status(channel))
            .await
    }

    /// Sets the Gen1 dimming fade rate.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_legacy_fade_rate(&self, fade_rate: FadeRate) -> Result<(), Error> {
        self.send_command(&LegacySettingsCommand::FadeRate(fade_rate))
            .await
            .map(drop)
    }

    // ========== Switch ==========

    /// Switches a relay output.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_switch(&self, id: u8, on: bool) -> Result<(), Error> {
        self.send_command(&SwitchCommand::set(id, on)).await.map(drop)
    }

    // ========== Color ==========

    /// Shows a color on an RGB component.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_rgb(
        &self,
        id: u8,
        rgb: RgbColor,
        brightness: Brightness,
        transition: Duration,
    ) -> Result<(), Error> {
        self.send_command(&RgbCommand::set(id, rgb, brightness, transition))
            .await
            .map(drop)
    }

    /// Updates an RGBW component.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_rgbw(&self, id: u8, fields: RgbwSet) -> Result<(), Error> {
        self.send_command(&RgbwCommand::Set { id, fields })
            .await
            .map(drop)
    }

    /// Reads the status of an RGBW component.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the response is malformed.
    pub async fn rgbw_status(&self, id: u8) -> Result<RgbwStatus, Error> {
        self.send_and_parse(&RgbwCommand::get_status(id)).await
    }

    // ========== Input ==========

    /// Reads the configuration of an input.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the response is malformed.
    pub async fn input_config(&self, id: u8) -> Result<InputConfig, Error> {
        self.send_and_parse(&InputCommand::get_config(id)).await
    }

    /// Renames an input; `None` clears the name.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn rename_input(&self, id: u8, name: Option<&str>) -> Result<(), Error> {
        let command = match name {
            Some(name) => InputCommand::rename(id, name),
            None => InputCommand::clear_name(id),
        };
        self.send_command(&command).await.map(drop)
    }
}
