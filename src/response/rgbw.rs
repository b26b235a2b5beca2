// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGBW status parsing.

use serde::Deserialize;

use crate::types::{Brightness, RgbColor};

/// Response of Gen2 `RGBW.GetStatus`.
///
/// # Examples
///
/// ```
/// use shelly_automation::response::RgbwStatus;
/// use shelly_automation::types::RgbColor;
///
/// let json = r#"{"id":0,"output":true,"rgb":[255,0,0],"white":0,"brightness":60}"#;
/// let status: RgbwStatus = serde_json::from_str(json).unwrap();
/// assert_eq!(status.rgb(), RgbColor::RED);
/// assert_eq!(status.white(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RgbwStatus {
    #[serde(default)]
    output: bool,
    rgb: RgbColor,
    white: u8,
    brightness: Brightness,
}

impl RgbwStatus {
    /// Returns `true` if the output is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.output
    }

    /// Returns the color channels.
    #[must_use]
    pub fn rgb(&self) -> RgbColor {
        self.rgb
    }

    /// Returns the white channel level (0-255).
    #[must_use]
    pub fn white(&self) -> u8 {
        self.white
    }

    /// Returns the overall brightness.
    #[must_use]
    pub fn brightness(&self) -> Brightness {
        self.brightness
    }
}
