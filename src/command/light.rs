// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gen2 `Light.*` RPC commands.

use std::time::Duration;

use crate::command::{Command, rpc_path};
use crate::types::{Brightness, DimDirection, FadeRate};

/// Command addressed to a Gen2 `light:<id>` component.
///
/// # Examples
///
/// ```
/// use shelly_automation::command::{Command, LightCommand};
/// use shelly_automation::types::Brightness;
///
/// let toggle = LightCommand::toggle(0);
/// assert_eq!(toggle.to_request_path(), "/rpc/Light.Toggle?id=0");
///
/// let max = LightCommand::set_brightness(1, Brightness::MAX);
/// assert_eq!(
///     max.to_request_path(),
///     "/rpc/Light.Set?id=1&on=true&brightness=100"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightCommand {
    /// Flip the output, returning to the last brightness when turning on.
    Toggle {
        /// Light component id.
        id: u8,
    },
    /// Set output and/or brightness.
    Set {
        /// Light component id.
        id: u8,
        /// Output state, omitted when `None`.
        on: Option<bool>,
        /// Brightness, omitted when `None`.
        brightness: Option<Brightness>,
        /// Transition time, omitted when `None`.
        transition: Option<Duration>,
    },
    /// Start dimming up or down until stopped or the extreme is reached.
    Dim {
        /// Light component id.
        id: u8,
        /// Dim direction.
        direction: DimDirection,
        /// Device-side dimming speed.
        fade_rate: FadeRate,
    },
    /// Stop a running dim.
    DimStop {
        /// Light component id.
        id: u8,
    },
    /// Read the current status.
    GetStatus {
        /// Light component id.
        id: u8,
    },
}

impl LightCommand {
    /// Toggles the light.
    #[must_use]
    pub const fn toggle(id: u8) -> Self {
        Self::Toggle { id }
    }

    /// Turns the light on at its last brightness.
    #[must_use]
    pub const fn turn_on(id: u8) -> Self {
        Self::Set {
            id,
            on: Some(true),
            brightness: None,
            transition: None,
        }
    }

    /// Turns the light on at the given brightness.
    #[must_use]
    pub const fn set_brightness(id: u8, brightness: Brightness) -> Self {
        Self::Set {
            id,
            on: Some(true),
            brightness: Some(brightness),
            transition: None,
        }
    }

    /// Starts dimming in the given direction.
    #[must_use]
    pub const fn dim(id: u8, direction: DimDirection, fade_rate: FadeRate) -> Self {
        Self::Dim {
            id,
            direction,
            fade_rate,
        }
    }

    /// Stops a running dim.
    #[must_use]
    pub const fn dim_stop(id: u8) -> Self {
        Self::DimStop { id }
    }

    /// Queries the light status.
    #[must_use]
    pub const fn get_status(id: u8) -> Self {
        Self::GetStatus { id }
    }
}

impl Command for LightCommand {
    fn path(&self) -> String {
        let method = match self {
            Self::Toggle { .. } => "Light.Toggle",
            Self::Set { .. } => "Light.Set",
            Self::Dim {
                direction: DimDirection::Up,
                ..
            } => "Light.DimUp",
            Self::Dim {
                direction: DimDirection::Down,
                ..
            } => "Light.DimDown",
            Self::DimStop { .. } => "Light.DimStop",
            Self::GetStatus { .. } => "Light.GetStatus",
        };
        rpc_path(method)
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        match *self {
            Self::Toggle { id } | Self::DimStop { id } | Self::GetStatus { id } => {
                vec![("id", id.to_string())]
            }
            Self::Set {
                id,
                on,
                brightness,
                transition,
            } => {
                let mut params = vec![("id", id.to_string())];
                if let Some(on) = on {
                    params.push(("on", on.to_string()));
                }
                if let Some(brightness) = brightness {
                    params.push(("brightness", brightness.value().to_string()));
                }
                if let Some(transition) = transition {
                    params.push((
                        "transition_duration",
                        transition.as_secs_f32().to_string(),
                    ));
                }
                params
            }
            Self::Dim { id, fade_rate, .. } => vec![
                ("id", id.to_string()),
                ("fade_rate", fade_rate.value().to_string()),
            ],
        }
    }
}
