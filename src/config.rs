// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration file of the `shelly-automation` binary.
//!
//! The file is JSON. Every automation names its `type` and, when it reacts
//! to device notifications, the MQTT topic prefix of the device publishing
//! them (`events`).
//!
//! # Examples
//!
//! ```
//! use shelly_automation::config::{AppConfig, AutomationConfig};
//!
//! let config = AppConfig::from_json(r#"{
//!     "debug": true,
//!     "mqtt": {"broker": "mqtt://192.168.1.50:1883"},
//!     "automations": [
//!         {"type": "dimmer_control", "events": "shellyplusi4-lounge",
//!          "input": 0, "host": "192.168.1.60", "channel": 1}
//!     ]
//! }"#).unwrap();
//!
//! assert!(config.debug);
//! assert_eq!(config.automations[0].events(), Some("shellyplusi4-lounge"));
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::automation::{ColorOutput, Location, WeekRules};
use crate::dimmer::{DimmerTarget, SweepTiming};
use crate::error::{ConfigError, ValueError};
#[cfg(feature = "mqtt")]
use crate::protocol::MqttConfig;
use crate::types::{Brightness, FadeRate, RgbColor};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Logs at debug level.
    #[serde(default)]
    pub debug: bool,
    /// Broker carrying device notifications.
    #[cfg(feature = "mqtt")]
    #[serde(default)]
    pub mqtt: Option<MqttConfig>,
    /// Automations to run.
    pub automations: Vec<AutomationConfig>,
}

impl AppConfig {
    /// Reads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, is not valid JSON for this
    /// schema, or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parses and validates a configuration document.
    ///
    /// # Errors
    ///
    /// Returns error if the document does not match the schema or fails
    /// validation.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the distinct notification topic prefixes in use.
    #[must_use]
    pub fn event_sources(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.automations
            .iter()
            .filter_map(AutomationConfig::events)
            .filter(|prefix| seen.insert(*prefix))
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (index, automation) in self.automations.iter().enumerate() {
            automation.validate(&format!("automations[{index}]"))?;
        }

        #[cfg(feature = "mqtt")]
        if self.mqtt.is_none() && !self.event_sources().is_empty() {
            return Err(ConfigError::Missing("mqtt".to_string()));
        }

        Ok(())
    }
}

fn default_fade_rate() -> FadeRate {
    FadeRate::FASTEST
}

fn default_legacy_fade_rate() -> FadeRate {
    FadeRate::SLOWEST
}

fn default_rocker_fade_rate() -> FadeRate {
    FadeRate::clamped(4)
}

fn default_poll_ms() -> u64 {
    1000
}

fn default_legacy_poll_ms() -> u64 {
    1500
}

fn default_wait_ms() -> u64 {
    1000
}

fn default_delay_secs() -> u64 {
    10
}

fn default_cycle_ms() -> u64 {
    5000
}

fn default_isolation_ms() -> u64 {
    300
}

fn default_rocker_channels() -> [u8; 2] {
    [0, 1]
}

fn nonzero(field: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            source: ValueError::OutOfRange {
                min: 1,
                max: u16::MAX,
                actual: 0,
            },
        });
    }
    Ok(())
}

/// A dimmer driven by one input's gestures.
#[derive(Debug, Clone, Deserialize)]
pub struct DimmerConfig {
    /// Input id on the button device.
    pub input: u8,
    /// Dimmer address.
    pub host: String,
    /// Dimmer channel.
    #[serde(default)]
    pub channel: u8,
    /// Fade rate for sweeps.
    #[serde(default = "default_fade_rate")]
    pub fade_rate: FadeRate,
    /// Brightness poll period in milliseconds.
    #[serde(default = "default_poll_ms")]
    pub poll_interval_ms: u64,
    /// Pause before a reversal in milliseconds.
    #[serde(default = "default_wait_ms")]
    pub wait_interval_ms: u64,
}

impl DimmerConfig {
    /// Returns the dimmer target.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::ZeroInterval`] if the poll interval is zero.
    pub fn target(&self) -> Result<DimmerTarget, ValueError> {
        let timing = SweepTiming::new(
            Duration::from_millis(self.poll_interval_ms),
            Duration::from_millis(self.wait_interval_ms),
        )?;
        Ok(DimmerTarget::new(self.host.clone(), self.channel)
            .with_fade_rate(self.fade_rate)
            .with_timing(timing))
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        nonzero(&format!("{field}.poll_interval_ms"), self.poll_interval_ms)?;
        nonzero(&format!("{field}.wait_interval_ms"), self.wait_interval_ms)
    }
}

/// A Gen1 dimmer driven by one input's gestures.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyDimmerConfig {
    /// Input id on the button device.
    pub input: u8,
    /// Dimmer address.
    pub host: String,
    /// Dimmer channel.
    #[serde(default)]
    pub channel: u8,
    /// Fade rate written to the dimmer settings at start-up.
    #[serde(default = "default_legacy_fade_rate")]
    pub fade_rate: FadeRate,
    /// Brightness poll period in milliseconds.
    #[serde(default = "default_legacy_poll_ms")]
    pub poll_interval_ms: u64,
    /// Pause before a reversal in milliseconds.
    #[serde(default = "default_wait_ms")]
    pub wait_interval_ms: u64,
}

impl LegacyDimmerConfig {
    /// Returns the dimmer target.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::ZeroInterval`] if the poll interval is zero.
    pub fn target(&self) -> Result<DimmerTarget, ValueError> {
        let timing = SweepTiming::new(
            Duration::from_millis(self.poll_interval_ms),
            Duration::from_millis(self.wait_interval_ms),
        )?;
        Ok(DimmerTarget::new(self.host.clone(), self.channel)
            .with_fade_rate(self.fade_rate)
            .with_timing(timing))
    }
}

/// A white light set once by an RGB color cycle.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WhiteLightConfig {
    /// Light component id.
    pub id: u8,
    /// Level to set.
    pub brightness: Brightness,
}

/// Output painted by a color cycle.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorOutputConfig {
    /// `rgbw:<id>`.
    Rgbw {
        /// Component id.
        #[serde(default)]
        id: u8,
        /// White channel level (0-255).
        #[serde(default)]
        white: u8,
        /// Overall brightness.
        #[serde(default = "max_brightness")]
        brightness: Brightness,
    },
    /// `rgb:<id>`.
    Rgb {
        /// Component id.
        #[serde(default)]
        id: u8,
        /// Overall brightness.
        #[serde(default = "max_brightness")]
        brightness: Brightness,
        /// Fade time between colors in milliseconds.
        #[serde(default)]
        transition_ms: u64,
        /// Fixed white light levels.
        #[serde(default)]
        white_lights: Vec<WhiteLightConfig>,
    },
}

fn max_brightness() -> Brightness {
    Brightness::MAX
}

impl ColorOutputConfig {
    /// Returns the output description.
    #[must_use]
    pub fn output(&self) -> ColorOutput {
        match self {
            Self::Rgbw {
                id,
                white,
                brightness,
            } => ColorOutput::Rgbw {
                id: *id,
                white: *white,
                brightness: *brightness,
            },
            Self::Rgb {
                id,
                brightness,
                transition_ms,
                white_lights,
            } => ColorOutput::Rgb {
                id: *id,
                brightness: *brightness,
                transition: Duration::from_millis(*transition_ms),
                white_lights: white_lights
                    .iter()
                    .map(|light| (light.id, light.brightness))
                    .collect(),
            },
        }
    }
}

/// Color cycle settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ColorCycleConfig {
    /// Output to paint.
    pub output: ColorOutputConfig,
    /// Colors in order; red, green and blue when empty.
    #[serde(default)]
    pub colors: Vec<RgbColor>,
    /// Time between two colors in milliseconds.
    #[serde(default = "default_cycle_ms")]
    pub interval_ms: u64,
}

impl ColorCycleConfig {
    /// Returns the time between two colors.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Gesture control of a Gen2 dimmer.
#[derive(Debug, Clone, Deserialize)]
pub struct DimmerControlConfig {
    /// Topic prefix of the button device.
    pub events: String,
    /// Target and input.
    #[serde(flatten)]
    pub dimmer: DimmerConfig,
}

/// Gesture control of a Gen1 dimmer.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyDimmerControlConfig {
    /// Topic prefix of the button device.
    pub events: String,
    /// Target and input.
    #[serde(flatten)]
    pub dimmer: LegacyDimmerConfig,
}

/// One Gen2 dimmer per input of a button device.
#[derive(Debug, Clone, Deserialize)]
pub struct MultiDimmerConfig {
    /// Topic prefix of the button device.
    pub events: String,
    /// Dimmers by input.
    pub dimmers: Vec<DimmerConfig>,
}

/// Two channels of one dimmer driven by four inputs.
#[derive(Debug, Clone, Deserialize)]
pub struct RockerConfig {
    /// Topic prefix of the button device.
    pub events: String,
    /// Dimmer address.
    pub host: String,
    /// Light ids driven by inputs 0/1 and 2/3.
    #[serde(default = "default_rocker_channels")]
    pub channels: [u8; 2],
    /// Fade rate while dimming.
    #[serde(default = "default_rocker_fade_rate")]
    pub fade_rate: FadeRate,
}

/// Relay switched back on after being switched off.
#[derive(Debug, Clone, Deserialize)]
pub struct PowerCycleConfig {
    /// Topic prefix of the plug.
    pub events: String,
    /// Plug address.
    pub host: String,
    /// Switch id.
    #[serde(default)]
    pub switch_id: u8,
    /// Delay before switching back on, in seconds.
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

/// Endless color cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct ColorCycleAutomationConfig {
    /// Controller address.
    pub host: String,
    /// Cycle settings.
    #[serde(flatten)]
    pub cycle: ColorCycleConfig,
}

/// Color cycle toggled by renaming an input.
#[derive(Debug, Clone, Deserialize)]
pub struct RainbowToggleConfig {
    /// Topic prefix of the controller.
    pub events: String,
    /// Controller address.
    pub host: String,
    /// Input watched for renames.
    #[serde(default)]
    pub input: u8,
    /// Cycle settings.
    #[serde(flatten)]
    pub cycle: ColorCycleConfig,
}

/// White and color kept apart on an RGBW output.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelIsolationConfig {
    /// Controller address.
    pub host: String,
    /// RGBW component id.
    #[serde(default)]
    pub id: u8,
    /// Poll period in milliseconds.
    #[serde(default = "default_isolation_ms")]
    pub period_ms: u64,
}

/// Relay following sunrise and sunset.
#[derive(Debug, Clone, Deserialize)]
pub struct SunScheduleConfig {
    /// Plug address.
    pub host: String,
    /// Switch id.
    #[serde(default)]
    pub switch_id: u8,
    /// Location sent to the sun times service.
    pub location: Location,
    /// Rules per day type.
    pub rules: WeekRules,
    /// Swaps on and off.
    #[serde(default)]
    pub inverse: bool,
    /// Alternative sun times service.
    #[serde(default)]
    pub api_url: Option<String>,
}

/// One configured automation, selected by its `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AutomationConfig {
    /// `dimmer_control`
    DimmerControl(DimmerControlConfig),
    /// `legacy_dimmer_control`
    LegacyDimmerControl(LegacyDimmerControlConfig),
    /// `multi_dimmer`
    MultiDimmer(MultiDimmerConfig),
    /// `rocker`
    Rocker(RockerConfig),
    /// `power_cycle`
    PowerCycle(PowerCycleConfig),
    /// `color_cycle`
    ColorCycle(ColorCycleAutomationConfig),
    /// `rainbow_toggle`
    RainbowToggle(RainbowToggleConfig),
    /// `channel_isolation`
    ChannelIsolation(ChannelIsolationConfig),
    /// `sun_schedule`
    SunSchedule(SunScheduleConfig),
}

impl AutomationConfig {
    /// Returns the notification topic prefix this automation listens to.
    #[must_use]
    pub fn events(&self) -> Option<&str> {
        match self {
            Self::DimmerControl(config) => Some(&config.events),
            Self::LegacyDimmerControl(config) => Some(&config.events),
            Self::MultiDimmer(config) => Some(&config.events),
            Self::Rocker(config) => Some(&config.events),
            Self::PowerCycle(config) => Some(&config.events),
            Self::RainbowToggle(config) => Some(&config.events),
            Self::ColorCycle(_) | Self::ChannelIsolation(_) | Self::SunSchedule(_) => None,
        }
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        match self {
            Self::DimmerControl(config) => config.dimmer.validate(field),
            Self::LegacyDimmerControl(config) => {
                nonzero(&format!("{field}.poll_interval_ms"), config.dimmer.poll_interval_ms)?;
                nonzero(&format!("{field}.wait_interval_ms"), config.dimmer.wait_interval_ms)
            }
            Self::MultiDimmer(config) => {
                let mut inputs = HashSet::new();
                for (index, dimmer) in config.dimmers.iter().enumerate() {
                    dimmer.validate(&format!("{field}.dimmers[{index}]"))?;
                    if !inputs.insert(dimmer.input) {
                        return Err(ConfigError::DuplicateInput(dimmer.input));
                    }
                }
                Ok(())
            }
            Self::PowerCycle(config) => nonzero(&format!("{field}.delay_secs"), config.delay_secs),
            Self::ColorCycle(ColorCycleAutomationConfig { cycle, .. })
            | Self::RainbowToggle(RainbowToggleConfig { cycle, .. }) => {
                nonzero(&format!("{field}.interval_ms"), cycle.interval_ms)
            }
            Self::ChannelIsolation(config) => nonzero(&format!("{field}.period_ms"), config.period_ms),
            Self::Rocker(_) | Self::SunSchedule(_) => Ok(()),
        }
    }
}
