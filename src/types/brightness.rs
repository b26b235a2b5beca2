// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness type for dimmable lights.
//!
//! Shelly dimmers report and accept brightness as a percentage in 0-100.
//! The sweep logic treats 100 and 1 as the two extremes of a fade.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Brightness level as a percentage (0-100).
///
/// # Examples
///
/// ```
/// use shelly_automation::types::Brightness;
///
/// let level = Brightness::new(75).unwrap();
/// assert_eq!(level.value(), 75);
/// assert!(level.is_upper_half());
///
/// assert!(Brightness::MAX.is_sweep_top());
/// assert!(Brightness::SWEEP_FLOOR.is_sweep_floor());
/// assert!(Brightness::new(101).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Brightness(u8);

impl Brightness {
    /// Minimum brightness value (0%).
    pub const MIN: Self = Self(0);

    /// Lowest level a dim-down fade settles on (1%).
    pub const SWEEP_FLOOR: Self = Self(1);

    /// Maximum brightness value (100%).
    pub const MAX: Self = Self(100);

    /// Creates a new brightness value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a brightness value, clamping to the valid range.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value > 100 { Self(100) } else { Self(value) }
    }

    /// Returns the brightness percentage.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns `true` above 50%, where a held button starts dimming down.
    #[must_use]
    pub const fn is_upper_half(&self) -> bool {
        self.0 > 50
    }

    /// Returns `true` when a fade has reached the top (100%).
    #[must_use]
    pub const fn is_sweep_top(&self) -> bool {
        self.0 == Self::MAX.0
    }

    /// Returns `true` when a fade has reached the bottom (1%).
    #[must_use]
    pub const fn is_sweep_floor(&self) -> bool {
        self.0 == Self::SWEEP_FLOOR.0
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Brightness {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Brightness> for u8 {
    fn from(value: Brightness) -> Self {
        value.0
    }
}
