// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shelly command definitions.
//!
//! Commands are typed representations of the HTTP requests understood by
//! Shelly devices. Gen2 devices expose every RPC method as
//! `GET /rpc/<Method>?<params>`; Gen1 devices use a small REST surface.
//!
//! # Available Commands
//!
//! | Command Type | Generation | Purpose |
//! |-------------|------------|---------|
//! | [`LightCommand`] | Gen2 | Toggle, set, dim up/down/stop, status of a light |
//! | [`SwitchCommand`] | Gen2 | Set a relay output |
//! | [`RgbCommand`] | Gen2 | Set the RGB component of a Pro RGBWW |
//! | [`RgbwCommand`] | Gen2 | Set or query the RGBW component |
//! | [`InputCommand`] | Gen2 | Read or rename an input |
//! | [`LegacyLightCommand`] | Gen1 | `/light/<channel>` actions |
//! | [`LegacySettingsCommand`] | Gen1 | `/settings` updates |
//!
//! # Examples
//!
//! ```
//! use shelly_automation::command::{Command, LightCommand};
//! use shelly_automation::types::{DimDirection, FadeRate};
//!
//! let cmd = LightCommand::dim(1, DimDirection::Down, FadeRate::FASTEST);
//! assert_eq!(cmd.path(), "/rpc/Light.DimDown");
//! assert_eq!(cmd.to_request_path(), "/rpc/Light.DimDown?id=1&fade_rate=5");
//! ```

mod color;
mod input;
mod legacy;
mod light;
mod switch;

pub use color::{RgbCommand, RgbwCommand, RgbwSet};
pub use input::InputCommand;
pub use legacy::{LegacyLightAction, LegacyLightCommand, LegacySettingsCommand};
pub use light::LightCommand;
pub use switch::SwitchCommand;

/// A request that can be sent to a Shelly device over HTTP.
pub trait Command {
    /// Returns the request path, e.g. `/rpc/Light.Toggle` or `/light/0`.
    fn path(&self) -> String;

    /// Returns the query parameters in the order they are sent.
    ///
    /// Values are raw; encoding happens in [`to_request_path`](Self::to_request_path).
    fn params(&self) -> Vec<(&'static str, String)>;

    /// Returns the path with its percent-encoded query string.
    fn to_request_path(&self) -> String {
        let params = self.params();
        if params.is_empty() {
            return self.path();
        }
        let query = params
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{query}", self.path())
    }
}

/// Path prefix shared by all Gen2 RPC methods.
pub(crate) fn rpc_path(method: &str) -> String {
    format!("/rpc/{method}")
}
