// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shelly Automation - home automations for Shelly devices.
//!
//! This library turns button events into dimmer sweeps and runs a handful
//! of small automations against Shelly Gen1 and Gen2 devices over HTTP,
//! listening for device notifications over MQTT.
//!
//! # Supported Features
//!
//! - **Gesture dimming**: single push toggles, double push sets full
//!   brightness, long push sweeps up and down until released
//! - **Multiple targets**: one dimmer per input, or a rocker pair of inputs
//!   per channel
//! - **Automations**: relay power cycle, color cycles, rainbow toggle,
//!   RGBW channel isolation, sunrise/sunset relay schedule
//!
//! # Quick Start
//!
//! ## Gesture control of a Gen2 dimmer
//!
//! ```no_run
//! use shelly_automation::dimmer::DimmerTarget;
//! use shelly_automation::event::EventBus;
//! use shelly_automation::gesture::GestureController;
//! use shelly_automation::protocol::{MqttConfig, NotificationListener};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus = EventBus::new();
//!     let _listener = NotificationListener::start(
//!         &MqttConfig::new("mqtt://192.168.1.50:1883"),
//!         "shellyplusi4-a8032ab12345",
//!         bus.clone(),
//!     )
//!     .await?;
//!
//!     let target = DimmerTarget::new("192.168.1.60", 0);
//!     let handle = GestureController::spawn(0, target.rpc_dimmer()?, target.fade_rate(), target.timing());
//!     handle.run(bus.subscribe()).await;
//!     Ok(())
//! }
//! ```
//!
//! ## Direct device calls
//!
//! ```no_run
//! use shelly_automation::Device;
//! use shelly_automation::types::Brightness;
//!
//! #[tokio::main]
//! async fn main() -> shelly_automation::Result<()> {
//!     let device = Device::http("192.168.1.60")?;
//!     device.set_light_brightness(0, Brightness::new(40)?).await?;
//!     let status = device.light_status(0).await?;
//!     println!("{}", status.brightness());
//!     Ok(())
//! }
//! ```

pub mod automation;
pub mod command;
pub mod config;
mod device;
pub mod dimmer;
pub mod error;
pub mod event;
pub mod gesture;
pub mod protocol;
pub mod response;
pub mod timer;
pub mod types;

#[cfg(test)]
mod testing;

pub use command::Command;
pub use device::Device;
pub use error::{ConfigError, Error, ParseError, ProtocolError, Result, ValueError};
pub use protocol::{HttpClient, HttpConfig, Protocol};
pub use types::{Brightness, DimDirection, FadeRate, RgbColor};
