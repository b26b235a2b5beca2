// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dimming direction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::types::Brightness;

/// Direction of a continuous dim.
///
/// # Examples
///
/// ```
/// use shelly_automation::types::{Brightness, DimDirection};
///
/// // A held button dims away from the current level
/// let bright = Brightness::new(80).unwrap();
/// assert_eq!(DimDirection::away_from(bright), DimDirection::Down);
///
/// assert_eq!(DimDirection::Up.reversed(), DimDirection::Down);
/// assert_eq!("down".parse::<DimDirection>().unwrap(), DimDirection::Down);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimDirection {
    /// Towards 100%.
    Up,
    /// Towards the lowest level.
    Down,
}

impl DimDirection {
    /// Picks the direction that moves away from the current level.
    ///
    /// Above 50% the light dims down, otherwise it dims up.
    #[must_use]
    pub const fn away_from(current: Brightness) -> Self {
        if current.is_upper_half() {
            Self::Down
        } else {
            Self::Up
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Returns the lowercase name used by Gen1 `dim=` parameters.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for DimDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DimDirection {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(ValueError::InvalidDirection(s.to_string())),
        }
    }
}
