// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dimmer target descriptor.

use std::time::Duration;

use crate::Device;
use crate::error::{Result, ValueError};
use crate::protocol::HttpClient;
use crate::types::FadeRate;

use super::{LegacyDimmer, RpcDimmer};

/// Intervals driving a brightness sweep.
///
/// `poll` is the period of the brightness poll; `wait` is the pause at
/// either end of the range before the direction reverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepTiming {
    /// Brightness poll period.
    pub poll: Duration,
    /// Pause before a reversal.
    pub wait: Duration,
}

impl SweepTiming {
    /// Default poll period.
    pub const DEFAULT_POLL: Duration = Duration::from_millis(1000);
    /// Default poll period for Gen1 dimmers, which answer more slowly.
    pub const LEGACY_POLL: Duration = Duration::from_millis(1500);
    /// Default pause before a reversal.
    pub const DEFAULT_WAIT: Duration = Duration::from_millis(1000);

    /// Creates timing with explicit intervals.
    ///
    /// A zero `wait` reverses as soon as an end is reached.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::ZeroInterval`] if `poll` is zero.
    pub fn new(poll: Duration, wait: Duration) -> std::result::Result<Self, ValueError> {
        if poll.is_zero() {
            return Err(ValueError::ZeroInterval("poll"));
        }
        Ok(Self { poll, wait })
    }

    /// Default timing for Gen1 dimmers.
    #[must_use]
    pub const fn legacy() -> Self {
        Self {
            poll: Self::LEGACY_POLL,
            wait: Self::DEFAULT_WAIT,
        }
    }
}

impl Default for SweepTiming {
    fn default() -> Self {
        Self {
            poll: Self::DEFAULT_POLL,
            wait: Self::DEFAULT_WAIT,
        }
    }
}

/// Where a gesture sends its calls and how a sweep behaves.
///
/// Immutable once built.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use shelly_automation::dimmer::DimmerTarget;
/// use shelly_automation::types::FadeRate;
///
/// let target = DimmerTarget::new("192.168.1.60", 1)
///     .with_fade_rate(FadeRate::new(3).unwrap())
///     .with_wait_interval(Duration::from_millis(750));
/// assert_eq!(target.channel(), 1);
/// assert_eq!(target.timing().poll, Duration::from_millis(1000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimmerTarget {
    address: String,
    channel: u8,
    fade_rate: FadeRate,
    timing: SweepTiming,
}

impl DimmerTarget {
    /// Creates a target with the fastest fade rate and default timing.
    #[must_use]
    pub fn new(address: impl Into<String>, channel: u8) -> Self {
        Self {
            address: address.into(),
            channel,
            fade_rate: FadeRate::FASTEST,
            timing: SweepTiming::default(),
        }
    }

    /// Sets the fade rate.
    #[must_use]
    pub fn with_fade_rate(mut self, fade_rate: FadeRate) -> Self {
        self.fade_rate = fade_rate;
        self
    }

    /// Sets both sweep intervals.
    #[must_use]
    pub fn with_timing(mut self, timing: SweepTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Sets the brightness poll period.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::ZeroInterval`] if `poll` is zero.
    pub fn with_poll_interval(mut self, poll: Duration) -> std::result::Result<Self, ValueError> {
        self.timing = SweepTiming::new(poll, self.timing.wait)?;
        Ok(self)
    }

    /// Sets the pause before a reversal.
    #[must_use]
    pub fn with_wait_interval(mut self, wait: Duration) -> Self {
        self.timing.wait = wait;
        self
    }

    /// Returns the device address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the light channel.
    #[must_use]
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Returns the fade rate.
    #[must_use]
    pub fn fade_rate(&self) -> FadeRate {
        self.fade_rate
    }

    /// Returns the sweep timing.
    #[must_use]
    pub fn timing(&self) -> SweepTiming {
        self.timing
    }

    /// Creates a Gen2 proxy for this target over HTTP.
    ///
    /// # Errors
    ///
    /// Returns error if the address is empty or the client cannot be created.
    pub fn rpc_dimmer(&self) -> Result<RpcDimmer<HttpClient>> {
        Ok(RpcDimmer::new(Device::http(&self.address)?, self.channel))
    }

    /// Creates a Gen1 proxy for this target over HTTP.
    ///
    /// # Errors
    ///
    /// Returns error if the address is empty or the client cannot be created.
    pub fn legacy_dimmer(&self) -> Result<LegacyDimmer<HttpClient>> {
        Ok(LegacyDimmer::new(
            Device::http(&self.address)?,
            self.channel,
            self.fade_rate,
        ))
    }
}
