// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gen1 REST commands.
//!
//! Gen1 dimmers (Shelly Dimmer 2 and friends) predate the RPC API and are
//! driven through `/light/<channel>` query parameters. The fade rate is a
//! persisted device setting rather than a per-call parameter.

use crate::command::Command;
use crate::types::{Brightness, DimDirection, FadeRate};

/// Action performed on a Gen1 light channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyLightAction {
    /// Read the channel status.
    Status,
    /// `turn=toggle`.
    Toggle,
    /// `turn=on`, optionally with a brightness.
    TurnOn(Option<Brightness>),
    /// `dim=<up|down>&step=100`: dim all the way unless stopped.
    Dim(DimDirection),
    /// `dim=stop`.
    DimStop,
}

/// Command for a Gen1 `/light/<channel>` endpoint.
///
/// # Examples
///
/// ```
/// use shelly_automation::command::{Command, LegacyLightCommand};
/// use shelly_automation::types::DimDirection;
///
/// let cmd = LegacyLightCommand::dim(0, DimDirection::Up);
/// assert_eq!(cmd.to_request_path(), "/light/0?dim=up&step=100");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyLightCommand {
    channel: u8,
    action: LegacyLightAction,
}

impl LegacyLightCommand {
    /// Creates a command for an arbitrary action.
    #[must_use]
    pub const fn new(channel: u8, action: LegacyLightAction) -> Self {
        Self { channel, action }
    }

    /// Reads the channel status.
    #[must_use]
    pub const fn status(channel: u8) -> Self {
        Self::new(channel, LegacyLightAction::Status)
    }

    /// Toggles the channel.
    #[must_use]
    pub const fn toggle(channel: u8) -> Self {
        Self::new(channel, LegacyLightAction::Toggle)
    }

    /// Turns the channel on at its last brightness.
    #[must_use]
    pub const fn turn_on(channel: u8) -> Self {
        Self::new(channel, LegacyLightAction::TurnOn(None))
    }

    /// Turns the channel on at the given brightness.
    #[must_use]
    pub const fn set_brightness(channel: u8, brightness: Brightness) -> Self {
        Self::new(channel, LegacyLightAction::TurnOn(Some(brightness)))
    }

    /// Starts dimming.
    #[must_use]
    pub const fn dim(channel: u8, direction: DimDirection) -> Self {
        Self::new(channel, LegacyLightAction::Dim(direction))
    }

    /// Stops dimming.
    #[must_use]
    pub const fn dim_stop(channel: u8) -> Self {
        Self::new(channel, LegacyLightAction::DimStop)
    }

    /// Returns the action.
    #[must_use]
    pub const fn action(&self) -> LegacyLightAction {
        self.action
    }
}

impl Command for LegacyLightCommand {
    fn path(&self) -> String {
        format!("/light/{}", self.channel)
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        match self.action {
            LegacyLightAction::Status => Vec::new(),
            LegacyLightAction::Toggle => vec![("turn", "toggle".to_string())],
            LegacyLightAction::TurnOn(None) => vec![("turn", "on".to_string())],
            LegacyLightAction::TurnOn(Some(brightness)) => vec![
                ("turn", "on".to_string()),
                ("brightness", brightness.value().to_string()),
            ],
            LegacyLightAction::Dim(direction) => vec![
                ("dim", direction.as_str().to_string()),
                ("step", "100".to_string()),
            ],
            LegacyLightAction::DimStop => vec![("dim", "stop".to_string())],
        }
    }
}

/// Command for the Gen1 `/settings` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacySettingsCommand {
    /// Persist the dimming speed.
    FadeRate(FadeRate),
}

impl Command for LegacySettingsCommand {
    fn path(&self) -> String {
        "/settings".to_string()
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::FadeRate(rate) => vec![("fade_rate", rate.value().to_string())],
        }
    }
}
