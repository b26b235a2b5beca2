// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fade rate type for dim-up/dim-down transitions.
//!
//! Shelly dimmers take a device-side `fade_rate` between 1 (slowest) and 5
//! (fastest). Gen2 devices accept it with every `Light.DimUp`/`Light.DimDown`
//! call, Gen1 devices store it in `/settings`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Dimming speed (1-5).
///
/// Higher values dim faster.
///
/// # Examples
///
/// ```
/// use shelly_automation::types::FadeRate;
///
/// let rate = FadeRate::new(3).unwrap();
/// assert_eq!(rate.value(), 3);
/// assert_eq!(FadeRate::default(), FadeRate::FASTEST);
/// assert!(FadeRate::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FadeRate(u8);

impl FadeRate {
    /// Minimum rate value.
    pub const MIN: u8 = 1;

    /// Maximum rate value.
    pub const MAX: u8 = 5;

    /// Slowest dimming.
    pub const SLOWEST: Self = Self(Self::MIN);

    /// Fastest dimming.
    pub const FASTEST: Self = Self(Self::MAX);

    /// Creates a new fade rate.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [1, 5].
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: u16::from(Self::MIN),
                max: u16::from(Self::MAX),
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a fade rate, clamping to the valid range.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value < Self::MIN {
            Self(Self::MIN)
        } else if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    /// Returns the rate value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl Default for FadeRate {
    fn default() -> Self {
        Self::FASTEST
    }
}

impl fmt::Display for FadeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for FadeRate {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FadeRate> for u8 {
    fn from(value: FadeRate) -> Self {
        value.0
    }
}
