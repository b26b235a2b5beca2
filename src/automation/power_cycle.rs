// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Automatic power restore for a relay.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};

use crate::Device;
use crate::event::{Notification, StatusChange};
use crate::protocol::Protocol;
use crate::timer::TimerHandle;

/// Switches a relay back on a fixed delay after it was switched off.
///
/// Turning a plug off remotely then power-cycles whatever is plugged in.
/// Another off report during the delay restarts it.
#[derive(Debug)]
pub struct PowerCycle<P: Protocol> {
    device: Device<P>,
    switch_id: u8,
    delay: Duration,
}

impl<P: Protocol> PowerCycle<P> {
    /// Default delay before the relay is switched back on.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(10);

    /// Creates the automation for `switch:<switch_id>`.
    pub fn new(device: Device<P>, switch_id: u8) -> Self {
        Self {
            device,
            switch_id,
            delay: Self::DEFAULT_DELAY,
        }
    }

    /// Sets the delay before the relay is switched back on.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn is_switched_off(&self, change: &StatusChange) -> bool {
        change.component() == format!("switch:{}", self.switch_id) && change.output() == Some(false)
    }

    /// Watches status changes until the stream closes.
    pub async fn run(self, mut notifications: broadcast::Receiver<Notification>) {
        let (due_tx, mut due_rx) = mpsc::channel(4);
        let mut restore = TimerHandle::idle();
        let mut generation = 0_u64;

        loop {
            tokio::select! {
                received = notifications.recv() => match received {
                    Ok(Notification::Status(change)) if self.is_switched_off(&change) => {
                        generation += 1;
                        tracing::info!(switch = self.switch_id, delay = ?self.delay, "Relay off, scheduling restore");
                        restore = TimerHandle::once(self.delay, due_tx.clone(), generation);
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "Dropped status changes");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                Some(fired) = due_rx.recv() => {
                    if fired != generation {
                        continue;
                    }
                    tracing::info!(switch = self.switch_id, "Restoring relay power");
                    if let Err(e) = self.device.set_switch(self.switch_id, true).await {
                        tracing::debug!(error = %e, "Remote call failed");
                    }
                }
            }
        }
        restore.cancel();
    }
}
