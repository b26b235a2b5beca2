// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response parsing for Shelly JSON responses.
//!
//! Only the fields the automations read are modelled; every other field
//! of a response is ignored.

mod input;
mod light;
mod rgbw;

pub use input::InputConfig;
pub use light::{LegacyLightStatus, LightStatus};
pub use rgbw::RgbwStatus;
