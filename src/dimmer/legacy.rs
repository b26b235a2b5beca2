// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gen1 dimmer proxy.

use crate::Device;
use crate::command::LegacyLightCommand;
use crate::error::Result;
use crate::protocol::Protocol;
use crate::types::{Brightness, DimDirection, FadeRate};

use super::RemoteDimmer;

/// Drives one `/light/<channel>` of a Gen1 dimmer.
///
/// Gen1 firmware has no per-call fade rate: [`initialize`](RemoteDimmer::initialize)
/// stores the configured rate in the device settings and `dim` ignores its
/// `fade_rate` argument.
#[derive(Debug, Clone)]
pub struct LegacyDimmer<P: Protocol> {
    device: Device<P>,
    channel: u8,
    fade_rate: FadeRate,
}

impl<P: Protocol> LegacyDimmer<P> {
    /// Creates a proxy for the given channel.
    pub fn new(device: Device<P>, channel: u8, fade_rate: FadeRate) -> Self {
        Self {
            device,
            channel,
            fade_rate,
        }
    }
}

impl<P: Protocol + 'static> RemoteDimmer for LegacyDimmer<P> {
    async fn initialize(&self) -> Result<()> {
        tracing::debug!(fade_rate = self.fade_rate.value(), "Setting Gen1 fade rate");
        self.device.set_legacy_fade_rate(self.fade_rate).await
    }

    async fn toggle(&self) -> Result<()> {
        self.device
            .legacy_light(LegacyLightCommand::toggle(self.channel))
            .await
    }

    async fn set_brightness(&self, brightness: Brightness) -> Result<()> {
        self.device
            .legacy_light(LegacyLightCommand::set_brightness(self.channel, brightness))
            .await
    }

    async fn turn_on(&self) -> Result<()> {
        self.device
            .legacy_light(LegacyLightCommand::turn_on(self.channel))
            .await
    }

    async fn dim(&self, direction: DimDirection, _fade_rate: FadeRate) -> Result<()> {
        self.device
            .legacy_light(LegacyLightCommand::dim(self.channel, direction))
            .await
    }

    async fn dim_stop(&self) -> Result<()> {
        self.device
            .legacy_light(LegacyLightCommand::dim_stop(self.channel))
            .await
    }

    async fn brightness(&self) -> Result<Brightness> {
        Ok(self
            .device
            .legacy_light_status(self.channel)
            .await?
            .brightness())
    }
}
