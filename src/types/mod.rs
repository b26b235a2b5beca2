// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Shelly device control.
//!
//! Each type ensures values are within their valid ranges at construction
//! time, so commands built from them never carry out-of-range parameters.
//!
//! # Types
//!
//! - [`Brightness`] - Brightness level (0-100%)
//! - [`FadeRate`] - Dimming speed (1-5)
//! - [`DimDirection`] - Up or down
//! - [`RgbColor`] - 8-bit RGB color

mod brightness;
mod direction;
mod fade_rate;
mod rgb_color;

pub use brightness::Brightness;
pub use direction::DimDirection;
pub use fade_rate::FadeRate;
pub use rgb_color::RgbColor;
