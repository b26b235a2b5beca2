// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type.
//!
//! Shelly RGB(W) components take colors as a three element array
//! (`"rgb": [255, 0, 0]`), which is also how colors are written in the
//! configuration file.

use std::fmt;

use serde::{Deserialize, Serialize};

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use shelly_automation::types::RgbColor;
///
/// let orange = RgbColor::new(255, 127, 0);
/// assert_eq!(orange.to_array(), [255, 127, 0]);
/// assert!(orange.is_lit());
/// assert!(!RgbColor::BLACK.is_lit());
///
/// let parsed: RgbColor = serde_json::from_str("[0, 0, 255]").unwrap();
/// assert_eq!(parsed, RgbColor::BLUE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// All channels off.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Pure red.
    pub const RED: Self = Self::new(255, 0, 0);
    /// Pure green.
    pub const GREEN: Self = Self::new(0, 255, 0);
    /// Pure blue.
    pub const BLUE: Self = Self::new(0, 0, 255);

    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns `true` if any channel is above zero.
    #[must_use]
    pub const fn is_lit(&self) -> bool {
        self.red > 0 || self.green > 0 || self.blue > 0
    }

    /// Returns the color as `[r, g, b]`.
    #[must_use]
    pub const fn to_array(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    /// The three-color cycle used when no palette is configured.
    #[must_use]
    pub fn primaries() -> Vec<Self> {
        vec![Self::RED, Self::GREEN, Self::BLUE]
    }

    /// Twelve hues around the color wheel, red to rose.
    #[must_use]
    pub fn color_wheel() -> Vec<Self> {
        vec![
            Self::new(255, 0, 0),
            Self::new(255, 127, 0),
            Self::new(255, 255, 0),
            Self::new(127, 255, 0),
            Self::new(0, 255, 0),
            Self::new(0, 255, 127),
            Self::new(0, 255, 255),
            Self::new(0, 127, 255),
            Self::new(0, 0, 255),
            Self::new(127, 0, 255),
            Self::new(255, 0, 255),
            Self::new(255, 0, 127),
        ]
    }
}

impl From<[u8; 3]> for RgbColor {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::new(red, green, blue)
    }
}

impl From<RgbColor> for [u8; 3] {
    fn from(color: RgbColor) -> Self {
        color.to_array()
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_array() {
        assert_eq!(
            serde_json::to_string(&RgbColor::new(1, 2, 3)).unwrap(),
            "[1,2,3]"
        );
    }

    #[test]
    fn display_as_hex() {
        assert_eq!(RgbColor::new(255, 127, 0).to_string(), "#FF7F00");
    }

    #[test]
    fn palettes_are_non_empty() {
        assert_eq!(RgbColor::primaries().len(), 3);
        assert_eq!(RgbColor::color_wheel().len(), 12);
        assert!(RgbColor::color_wheel().iter().all(RgbColor::is_lit));
    }
}
