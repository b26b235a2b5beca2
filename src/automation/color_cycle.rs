// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color cycling on RGB and RGBW outputs.

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use crate::Device;
use crate::command::{RgbCommand, RgbwCommand, RgbwSet};
use crate::error::{Result, ValueError};
use crate::protocol::Protocol;
use crate::types::{Brightness, RgbColor};

/// Output a [`ColorCycle`] paints on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorOutput {
    /// `rgbw:<id>` of a Plus RGBW PM.
    Rgbw {
        /// Component id.
        id: u8,
        /// White channel level (0-255) shown with every color.
        white: u8,
        /// Overall brightness.
        brightness: Brightness,
    },
    /// `rgb:<id>` of a Pro RGBWW in `rgbx2light` profile.
    Rgb {
        /// Component id.
        id: u8,
        /// Overall brightness.
        brightness: Brightness,
        /// Fade time between colors.
        transition: Duration,
        /// Fixed levels for the single-channel white lights, applied once.
        white_lights: Vec<(u8, Brightness)>,
    },
}

/// Shows a list of colors one after the other, forever.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use shelly_automation::Device;
/// use shelly_automation::automation::{ColorCycle, ColorOutput};
/// use shelly_automation::types::{Brightness, RgbColor};
///
/// # async fn example() -> shelly_automation::Result<()> {
/// let output = ColorOutput::Rgbw { id: 0, white: 50, brightness: Brightness::MAX };
/// let cycle = ColorCycle::new(Device::http("192.168.1.70")?, output, RgbColor::primaries())
///     .with_interval(Duration::from_secs(5))?;
/// cycle.run().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ColorCycle<P: Protocol> {
    device: Device<P>,
    output: ColorOutput,
    colors: Vec<RgbColor>,
    interval: Duration,
    next: usize,
}

impl<P: Protocol> ColorCycle<P> {
    /// Default time between two colors.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

    /// Creates a cycle over `colors`.
    ///
    /// An empty list falls back to red, green and blue.
    pub fn new(device: Device<P>, output: ColorOutput, colors: Vec<RgbColor>) -> Self {
        let colors = if colors.is_empty() {
            RgbColor::primaries()
        } else {
            colors
        };
        Self {
            device,
            output,
            colors,
            interval: Self::DEFAULT_INTERVAL,
            next: 0,
        }
    }

    /// Sets the time between two colors.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::ZeroInterval`] if `interval` is zero.
    pub fn with_interval(mut self, interval: Duration) -> std::result::Result<Self, ValueError> {
        if interval.is_zero() {
            return Err(ValueError::ZeroInterval("color"));
        }
        self.interval = interval;
        Ok(self)
    }

    /// Returns the time between two colors.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the color the next step will show.
    #[must_use]
    pub fn upcoming(&self) -> RgbColor {
        self.colors[self.next]
    }

    /// Applies the fixed white light levels of an RGB output.
    ///
    /// # Errors
    ///
    /// Returns error if a call fails.
    pub async fn prepare(&self) -> Result<()> {
        if let ColorOutput::Rgb {
            transition,
            white_lights,
            ..
        } = &self.output
        {
            for &(id, level) in white_lights {
                self.device.fade_light_to(id, level, *transition).await?;
            }
        }
        Ok(())
    }

    /// Shows the next color and advances.
    ///
    /// The position advances even if the call fails.
    ///
    /// # Errors
    ///
    /// Returns error if the call fails.
    pub async fn step(&mut self) -> Result<()> {
        let color = self.upcoming();
        self.next = (self.next + 1) % self.colors.len();
        tracing::debug!(%color, "Showing color");

        match &self.output {
            ColorOutput::Rgbw {
                id,
                white,
                brightness,
            } => {
                let fields = RgbwSet {
                    on: Some(true),
                    rgb: Some(color),
                    white: Some(*white),
                    brightness: Some(*brightness),
                };
                self.device.set_rgbw(*id, fields).await
            }
            ColorOutput::Rgb {
                id,
                brightness,
                transition,
                ..
            } => {
                self.device
                    .set_rgb(*id, color, *brightness, *transition)
                    .await
            }
        }
    }

    /// Switches the output off.
    ///
    /// # Errors
    ///
    /// Returns error if the call fails.
    pub async fn turn_off(&self) -> Result<()> {
        match &self.output {
            ColorOutput::Rgbw { id, .. } => self
                .device
                .send_command(&RgbwCommand::turn_off(*id))
                .await
                .map(drop),
            ColorOutput::Rgb { id, .. } => self
                .device
                .send_command(&RgbCommand::Off { id: *id })
                .await
                .map(drop),
        }
    }

    /// Shows the first color immediately, then one color per interval.
    pub async fn run(mut self) {
        if let Err(e) = self.prepare().await {
            tracing::debug!(error = %e, "Remote call failed");
        }

        let mut ticks = time::interval(self.interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            if let Err(e) = self.step().await {
                tracing::debug!(error = %e, "Remote call failed");
            }
        }
    }
}
