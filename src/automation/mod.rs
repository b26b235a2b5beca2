// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-purpose automations.
//!
//! Each automation owns its [`Device`](crate::Device) and runs as one task.
//! Remote failures are logged and never stop the task.
//!
//! | Automation | Trigger | Effect |
//! |---|---|---|
//! | [`PowerCycle`] | `switch:<id>` reports off | switch back on after a delay |
//! | [`ColorCycle`] | interval | next color on an RGB or RGBW output |
//! | [`RainbowToggle`] | input renamed `rainbow` | start or stop a color cycle |
//! | [`ChannelIsolation`] | status poll | keep white and color apart |
//! | [`SunSchedule`] | sun times | relay on and off |

mod channel_isolation;
mod color_cycle;
mod power_cycle;
mod rainbow_toggle;
mod sun_schedule;

pub use channel_isolation::ChannelIsolation;
pub use color_cycle::{ColorCycle, ColorOutput};
pub use power_cycle::PowerCycle;
pub use rainbow_toggle::{RainbowToggle, TRIGGER_NAME};
pub use sun_schedule::{
    Day, DayRules, Location, Plan, SunEvent, SunSchedule, SunTimes, SunTimesClient, TimeOfDay,
    TimeRule, WeekRules, plan,
};
