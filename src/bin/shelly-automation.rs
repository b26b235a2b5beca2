// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Runs the automations of a configuration file until interrupted.

use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

use shelly_automation::Device;
use shelly_automation::automation::{
    ChannelIsolation, ColorCycle, PowerCycle, RainbowToggle, SunSchedule, SunTimesClient,
};
use shelly_automation::config::{AppConfig, AutomationConfig};
use shelly_automation::dimmer::RpcDimmer;
use shelly_automation::event::{EventBus, Notification};
use shelly_automation::gesture::{GestureController, InputRouter, RockerControl};
use shelly_automation::protocol::{MqttConfig, NotificationListener};

#[derive(Parser, Debug)]
#[command(version, about = "Shelly button gestures and home automations")]
struct Args {
    /// Path of the JSON configuration file.
    config: PathBuf,

    /// Log at debug level regardless of the configuration.
    #[arg(long)]
    debug: bool,
}

type BoxError = Box<dyn Error + Send + Sync>;

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

/// Notification buses keyed by device topic prefix.
struct EventSources {
    buses: HashMap<String, EventBus>,
    listeners: Vec<NotificationListener>,
}

impl EventSources {
    async fn connect(mqtt: Option<&MqttConfig>, prefixes: &[&str]) -> Result<Self, BoxError> {
        let mut sources = Self {
            buses: HashMap::new(),
            listeners: Vec::new(),
        };
        let Some(mqtt) = mqtt else {
            return Ok(sources);
        };

        for (index, prefix) in prefixes.iter().enumerate() {
            // One connection per device; a fixed client id would make them evict each other.
            let config = match mqtt.client_id() {
                Some(id) if prefixes.len() > 1 => mqtt.clone().with_client_id(format!("{id}_{index}")),
                _ => mqtt.clone(),
            };
            let bus = EventBus::new();
            let listener = NotificationListener::start(&config, prefix, bus.clone()).await?;
            sources.listeners.push(listener);
            sources.buses.insert((*prefix).to_string(), bus);
        }
        Ok(sources)
    }

    fn subscribe(&self, prefix: &str) -> Result<broadcast::Receiver<Notification>, BoxError> {
        self.buses
            .get(prefix)
            .map(EventBus::subscribe)
            .ok_or_else(|| format!("no event source for {prefix}").into())
    }

    async fn shutdown(self) {
        for listener in self.listeners {
            listener.shutdown().await;
        }
    }
}

fn spawn_automation(
    tasks: &mut JoinSet<()>,
    automation: AutomationConfig,
    sources: &EventSources,
) -> Result<(), BoxError> {
    match automation {
        AutomationConfig::DimmerControl(config) => {
            let target = config.dimmer.target()?;
            tracing::info!(input = config.dimmer.input, host = %target.address(), "Starting dimmer control");
            let handle = GestureController::spawn(
                config.dimmer.input,
                target.rpc_dimmer()?,
                target.fade_rate(),
                target.timing(),
            );
            tasks.spawn(handle.run(sources.subscribe(&config.events)?));
        }
        AutomationConfig::LegacyDimmerControl(config) => {
            let target = config.dimmer.target()?;
            tracing::info!(input = config.dimmer.input, host = %target.address(), "Starting Gen1 dimmer control");
            let handle = GestureController::spawn(
                config.dimmer.input,
                target.legacy_dimmer()?,
                target.fade_rate(),
                target.timing(),
            );
            tasks.spawn(handle.run(sources.subscribe(&config.events)?));
        }
        AutomationConfig::MultiDimmer(config) => {
            let mut router = InputRouter::new();
            for dimmer in &config.dimmers {
                let target = dimmer.target()?;
                tracing::info!(input = dimmer.input, host = %target.address(), "Binding dimmer");
                router.bind(GestureController::spawn(
                    dimmer.input,
                    target.rpc_dimmer()?,
                    target.fade_rate(),
                    target.timing(),
                ));
            }
            tasks.spawn(router.run(sources.subscribe(&config.events)?));
        }
        AutomationConfig::Rocker(config) => {
            tracing::info!(host = %config.host, "Starting rocker control");
            let device = Device::http(&config.host)?;
            let [first, second] = config.channels;
            let control = RockerControl::new(
                RpcDimmer::new(device.clone(), first),
                RpcDimmer::new(device, second),
                config.fade_rate,
            );
            tasks.spawn(control.run(sources.subscribe(&config.events)?));
        }
        AutomationConfig::PowerCycle(config) => {
            tracing::info!(host = %config.host, switch = config.switch_id, "Starting power cycle");
            let automation = PowerCycle::new(Device::http(&config.host)?, config.switch_id)
                .with_delay(Duration::from_secs(config.delay_secs));
            tasks.spawn(automation.run(sources.subscribe(&config.events)?));
        }
        AutomationConfig::ColorCycle(config) => {
            tracing::info!(host = %config.host, "Starting color cycle");
            let cycle = ColorCycle::new(
                Device::http(&config.host)?,
                config.cycle.output.output(),
                config.cycle.colors.clone(),
            )
            .with_interval(config.cycle.interval())?;
            tasks.spawn(cycle.run());
        }
        AutomationConfig::RainbowToggle(config) => {
            tracing::info!(host = %config.host, input = config.input, "Starting rainbow toggle");
            let device = Device::http(&config.host)?;
            let cycle = ColorCycle::new(
                device.clone(),
                config.cycle.output.output(),
                config.cycle.colors.clone(),
            )
            .with_interval(config.cycle.interval())?;
            let automation = RainbowToggle::new(device, config.input, cycle);
            tasks.spawn(automation.run(sources.subscribe(&config.events)?));
        }
        AutomationConfig::ChannelIsolation(config) => {
            tracing::info!(host = %config.host, id = config.id, "Starting channel isolation");
            let automation = ChannelIsolation::new(Device::http(&config.host)?, config.id)
                .with_period(Duration::from_millis(config.period_ms))?;
            tasks.spawn(automation.run());
        }
        AutomationConfig::SunSchedule(config) => {
            tracing::info!(host = %config.host, switch = config.switch_id, "Starting sun schedule");
            let client = match &config.api_url {
                Some(url) => SunTimesClient::with_base_url(url.as_str())?,
                None => SunTimesClient::new()?,
            };
            let schedule = SunSchedule::new(
                Device::http(&config.host)?,
                config.switch_id,
                client,
                config.location,
                config.rules,
            )
            .inverse(config.inverse);
            tasks.spawn(schedule.run());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let args = Args::parse();
    let config = AppConfig::load(&args.config)?;
    init_tracing(args.debug || config.debug);

    let prefixes = config.event_sources();
    let sources = EventSources::connect(config.mqtt.as_ref(), &prefixes).await?;

    let mut tasks = JoinSet::new();
    for automation in config.automations.clone() {
        spawn_automation(&mut tasks, automation, &sources)?;
    }
    tracing::info!(automations = tasks.len(), "Running");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    tasks.shutdown().await;
    sources.shutdown().await;
    Ok(())
}
