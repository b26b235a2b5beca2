// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gen2 dimmer proxy.

use crate::Device;
use crate::error::Result;
use crate::protocol::Protocol;
use crate::types::{Brightness, DimDirection, FadeRate};

use super::RemoteDimmer;

/// Drives one `light:<id>` channel of a Gen2 dimmer.
#[derive(Debug, Clone)]
pub struct RpcDimmer<P: Protocol> {
    device: Device<P>,
    id: u8,
}

impl<P: Protocol> RpcDimmer<P> {
    /// Creates a proxy for the given light channel.
    pub fn new(device: Device<P>, id: u8) -> Self {
        Self { device, id }
    }

    /// Returns the light channel.
    #[must_use]
    pub fn channel(&self) -> u8 {
        self.id
    }
}

impl<P: Protocol + 'static> RemoteDimmer for RpcDimmer<P> {
    async fn toggle(&self) -> Result<()> {
        self.device.toggle_light(self.id).await
    }

    async fn set_brightness(&self, brightness: Brightness) -> Result<()> {
        self.device.set_light_brightness(self.id, brightness).await
    }

    async fn turn_on(&self) -> Result<()> {
        self.device.turn_on_light(self.id).await
    }

    async fn dim(&self, direction: DimDirection, fade_rate: FadeRate) -> Result<()> {
        self.device.dim_light(self.id, direction, fade_rate).await
    }

    async fn dim_stop(&self) -> Result<()> {
        self.device.stop_dimming_light(self.id).await
    }

    async fn brightness(&self) -> Result<Brightness> {
        Ok(self.device.light_status(self.id).await?.brightness())
    }
}
