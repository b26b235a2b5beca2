// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light status parsing.

use serde::Deserialize;

use crate::types::Brightness;

/// Response of Gen2 `Light.GetStatus`.
///
/// # Examples
///
/// ```
/// use shelly_automation::response::LightStatus;
///
/// let json = r#"{"id":0,"source":"button","output":true,"brightness":80,"temperature":{"tC":41.2}}"#;
/// let status: LightStatus = serde_json::from_str(json).unwrap();
/// assert_eq!(status.brightness().value(), 80);
/// assert!(status.is_on());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LightStatus {
    id: u8,
    #[serde(default)]
    output: bool,
    brightness: Brightness,
}

impl LightStatus {
    /// Returns the light component id.
    #[must_use]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Returns `true` if the output is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.output
    }

    /// Returns the current brightness.
    #[must_use]
    pub fn brightness(&self) -> Brightness {
        self.brightness
    }
}

/// Response of Gen1 `/light/<channel>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LegacyLightStatus {
    ison: bool,
    brightness: Brightness,
}

impl LegacyLightStatus {
    /// Returns `true` if the light is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.ison
    }

    /// Returns the current brightness.
    #[must_use]
    pub fn brightness(&self) -> Brightness {
        self.brightness
    }
}
