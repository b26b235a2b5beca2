// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Routing of i4 inputs to independent dimmer controllers.

use std::collections::HashMap;

use tokio::sync::broadcast;

use crate::event::{ComponentEvent, Notification};

use super::GestureHandle;

/// Sends each input's events to the controller bound to that input.
///
/// Every controller keeps its own gesture and sweep state, so holding one
/// button never affects the light of another. Events from unmapped inputs
/// are dropped.
#[derive(Debug, Default)]
pub struct InputRouter {
    routes: HashMap<u8, GestureHandle>,
}

impl InputRouter {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a controller to the input it listens to.
    ///
    /// A controller already bound to that input is replaced and stopped.
    pub fn bind(&mut self, handle: GestureHandle) {
        if let Some(previous) = self.routes.insert(handle.input(), handle) {
            tracing::debug!(input = previous.input(), "Replacing gesture controller");
        }
    }

    /// Returns `true` if a controller is bound to `input`.
    #[must_use]
    pub fn is_bound(&self, input: u8) -> bool {
        self.routes.contains_key(&input)
    }

    /// Returns the number of bound inputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no input is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Forwards one event to the controller of its input.
    pub async fn dispatch(&self, event: ComponentEvent) {
        let Some(handle) = event.input_id().and_then(|input| self.routes.get(&input)) else {
            return;
        };
        handle.dispatch(event).await;
    }

    /// Routes every event from a notification stream until it closes.
    ///
    /// Returns at once when no input is bound.
    pub async fn run(self, mut notifications: broadcast::Receiver<Notification>) {
        if self.is_empty() {
            tracing::warn!("No dimmer bound, ignoring button events");
            return;
        }
        loop {
            match notifications.recv().await {
                Ok(Notification::Event(event)) => self.dispatch(event).await,
                Ok(Notification::Status(_)) => {}
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Dropped button events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
