// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color cycle toggled by renaming an input.
//!
//! A Wall Display button can only call a URL. Pointing it at
//! `/rpc/Input.SetConfig?id=0&config={"name":"rainbow"}` on the RGBW
//! controller raises a `config_changed` event there; this automation reacts
//! to the new name by starting or stopping a [`ColorCycle`] and then puts
//! the previous name back so the next press is seen again.

use tokio::sync::{broadcast, mpsc};

use crate::Device;
use crate::event::{EventKind, Notification};
use crate::protocol::Protocol;
use crate::timer::TimerHandle;

use super::ColorCycle;

/// Input name that requests a toggle.
pub const TRIGGER_NAME: &str = "rainbow";

/// Name given to an input found already holding [`TRIGGER_NAME`].
const FALLBACK_NAME: &str = "Input0";

/// Starts and stops a color cycle each time an input is renamed
/// [`TRIGGER_NAME`].
#[derive(Debug)]
pub struct RainbowToggle<P: Protocol> {
    device: Device<P>,
    input: u8,
    cycle: ColorCycle<P>,
    original_name: Option<String>,
    active: bool,
}

impl<P: Protocol> RainbowToggle<P> {
    /// Creates the automation watching `input:<input>` of `device`.
    pub fn new(device: Device<P>, input: u8, cycle: ColorCycle<P>) -> Self {
        Self {
            device,
            input,
            cycle,
            original_name: None,
            active: false,
        }
    }

    /// Returns `true` while the cycle runs.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Remembers the input's current name.
    ///
    /// A name already equal to the trigger would make every rename a no-op,
    /// so the input is renamed first.
    async fn remember_name(&mut self) {
        let name = match self.device.input_config(self.input).await {
            Ok(config) => config.name().map(str::to_string),
            Err(e) => {
                tracing::warn!(input = self.input, error = %e, "Cannot read input name");
                return;
            }
        };

        if name.as_deref() == Some(TRIGGER_NAME) {
            match self.device.rename_input(self.input, Some(FALLBACK_NAME)).await {
                Ok(()) => self.original_name = Some(FALLBACK_NAME.to_string()),
                Err(e) => tracing::debug!(error = %e, "Remote call failed"),
            }
        } else {
            self.original_name = name;
        }
    }

    /// Handles a configuration change, arming or cancelling `timer`.
    async fn on_config_changed(
        &mut self,
        ticks: &mpsc::Sender<()>,
        timer: &mut TimerHandle,
    ) {
        match self.device.input_config(self.input).await {
            Ok(config) if config.name() == Some(TRIGGER_NAME) => {}
            Ok(_) => return,
            Err(e) => {
                tracing::debug!(error = %e, "Remote call failed");
                return;
            }
        }

        if self.active {
            tracing::info!("Stopping color cycle");
            timer.cancel();
            if let Err(e) = self.cycle.turn_off().await {
                tracing::debug!(error = %e, "Remote call failed");
            }
        } else {
            tracing::info!("Starting color cycle");
            if let Err(e) = self.cycle.prepare().await {
                tracing::debug!(error = %e, "Remote call failed");
            }
            self.show_next().await;
            *timer = TimerHandle::repeating(self.cycle.interval(), ticks.clone(), ());
        }
        self.active = !self.active;

        if let Err(e) = self
            .device
            .rename_input(self.input, self.original_name.as_deref())
            .await
        {
            tracing::debug!(error = %e, "Remote call failed");
        }
    }

    async fn show_next(&mut self) {
        if let Err(e) = self.cycle.step().await {
            tracing::debug!(error = %e, "Remote call failed");
        }
    }

    /// Reacts to configuration changes until the stream closes.
    pub async fn run(mut self, mut notifications: broadcast::Receiver<Notification>) {
        self.remember_name().await;

        let (tick_tx, mut tick_rx) = mpsc::channel(1);
        let mut timer = TimerHandle::idle();

        loop {
            tokio::select! {
                received = notifications.recv() => match received {
                    Ok(Notification::Event(event)) if *event.kind() == EventKind::ConfigChanged => {
                        self.on_config_changed(&tick_tx, &mut timer).await;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "Dropped events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                Some(()) = tick_rx.recv() => {
                    if self.active {
                        self.show_next().await;
                    }
                }
            }
        }
    }
}
