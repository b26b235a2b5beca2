// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mutual exclusion of the white and color channels of an RGBW output.

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use crate::Device;
use crate::command::RgbwSet;
use crate::error::ValueError;
use crate::protocol::Protocol;
use crate::response::RgbwStatus;
use crate::types::{Brightness, RgbColor};

/// Keeps white and color from being lit together.
///
/// The output is polled; selecting white blanks the colors, and selecting
/// a color while white is lit switches white off. Changes are detected
/// against the previous poll.
#[derive(Debug)]
pub struct ChannelIsolation<P: Protocol> {
    device: Device<P>,
    id: u8,
    period: Duration,
    last_white: u8,
    last_rgb: RgbColor,
}

impl<P: Protocol> ChannelIsolation<P> {
    /// Default poll period.
    pub const DEFAULT_PERIOD: Duration = Duration::from_millis(300);

    /// Creates the automation for `rgbw:<id>`.
    pub fn new(device: Device<P>, id: u8) -> Self {
        Self {
            device,
            id,
            period: Self::DEFAULT_PERIOD,
            last_white: 0,
            last_rgb: RgbColor::BLACK,
        }
    }

    /// Sets the poll period.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::ZeroInterval`] if `period` is zero.
    pub fn with_period(mut self, period: Duration) -> Result<Self, ValueError> {
        if period.is_zero() {
            return Err(ValueError::ZeroInterval("poll"));
        }
        self.period = period;
        Ok(self)
    }

    /// Compares a status with the previous one and returns the corrections
    /// to apply, in order.
    pub fn corrections(&mut self, status: &RgbwStatus) -> Vec<RgbwSet> {
        let white = status.white();
        let rgb = status.rgb();
        let white_changed = white != self.last_white;
        let rgb_changed = rgb != self.last_rgb;

        let mut corrections = Vec::new();
        if white_changed && white > 0 {
            corrections.push(RgbwSet {
                rgb: Some(RgbColor::BLACK),
                white: Some(white),
                brightness: Some(Brightness::MIN),
                ..RgbwSet::default()
            });
        }
        if rgb_changed && rgb.is_lit() && white > 0 {
            let brightness = if status.brightness() == Brightness::MIN {
                Brightness::MAX
            } else {
                status.brightness()
            };
            corrections.push(RgbwSet {
                rgb: Some(rgb),
                white: Some(0),
                brightness: Some(brightness),
                ..RgbwSet::default()
            });
        }

        self.last_white = white;
        self.last_rgb = rgb;
        corrections
    }

    async fn poll_once(&mut self) {
        let status = match self.device.rgbw_status(self.id).await {
            Ok(status) => status,
            Err(e) => {
                tracing::debug!(error = %e, "Remote call failed");
                return;
            }
        };
        for fields in self.corrections(&status) {
            tracing::debug!(?fields, "Isolating channels");
            if let Err(e) = self.device.set_rgbw(self.id, fields).await {
                tracing::debug!(error = %e, "Remote call failed");
            }
        }
    }

    /// Polls forever.
    pub async fn run(mut self) {
        let mut ticks = time::interval_at(time::Instant::now() + self.period, self.period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            self.poll_once().await;
        }
    }
}
