// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Two-channel rocker control.
//!
//! An i4 behind two rocker switches drives both channels of one dimmer:
//! inputs 0 and 1 belong to channel 0, inputs 2 and 3 to channel 1. The
//! outer inputs (0 and 3) dim up and the inner ones (1 and 2) dim down.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::dimmer::RemoteDimmer;
use crate::event::{ComponentEvent, EventKind, Notification};
use crate::types::{DimDirection, FadeRate};

/// Action requested for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RockerAction {
    /// Toggle the channel.
    Toggle,
    /// Start dimming the channel.
    Dim(DimDirection),
    /// Stop dimming the channel.
    DimStop,
}

/// Maps rocker inputs to per-channel actions.
///
/// There is no sweep: holding a button dims until it is released.
#[derive(Debug, Clone, Default)]
pub struct RockerInterpreter {
    dimming: bool,
}

impl RockerInterpreter {
    /// Creates an idle interpreter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a long press is dimming a channel.
    #[must_use]
    pub fn is_dimming(&self) -> bool {
        self.dimming
    }

    /// Handles one event and returns the channel and action to perform.
    pub fn on_event(&mut self, event: &ComponentEvent) -> Option<(usize, RockerAction)> {
        let input = event.input_id().filter(|input| *input < 4)?;
        let channel = usize::from(input >= 2);

        match event.kind() {
            EventKind::SinglePush => Some((channel, RockerAction::Toggle)),
            EventKind::LongPush => {
                self.dimming = true;
                let direction = if input == 1 || input == 2 {
                    DimDirection::Down
                } else {
                    DimDirection::Up
                };
                Some((channel, RockerAction::Dim(direction)))
            }
            EventKind::ButtonUp if self.dimming => {
                self.dimming = false;
                Some((channel, RockerAction::DimStop))
            }
            _ => None,
        }
    }
}

/// Runs a [`RockerInterpreter`] against the two channels of a dimmer.
#[derive(Debug)]
pub struct RockerControl<D: RemoteDimmer> {
    interpreter: RockerInterpreter,
    channels: [Arc<D>; 2],
    fade_rate: FadeRate,
}

impl<D: RemoteDimmer> RockerControl<D> {
    /// Creates a control for channel 0 and channel 1 of one dimmer.
    pub fn new(channel_0: D, channel_1: D, fade_rate: FadeRate) -> Self {
        Self {
            interpreter: RockerInterpreter::new(),
            channels: [Arc::new(channel_0), Arc::new(channel_1)],
            fade_rate,
        }
    }

    /// Handles one event, spawning the resulting remote call.
    pub fn handle(&mut self, event: &ComponentEvent) {
        let Some((channel, action)) = self.interpreter.on_event(event) else {
            return;
        };
        tracing::debug!(channel, ?action, "Rocker action");

        let dimmer = Arc::clone(&self.channels[channel]);
        let fade_rate = self.fade_rate;
        tokio::spawn(async move {
            let result = match action {
                RockerAction::Toggle => dimmer.toggle().await,
                RockerAction::Dim(direction) => dimmer.dim(direction, fade_rate).await,
                RockerAction::DimStop => dimmer.dim_stop().await,
            };
            if let Err(e) = result {
                tracing::debug!(channel, error = %e, "Remote call failed");
            }
        });
    }

    /// Handles every event from a notification stream until it closes.
    pub async fn run(mut self, mut notifications: broadcast::Receiver<Notification>) {
        loop {
            match notifications.recv().await {
                Ok(Notification::Event(event)) => self.handle(&event),
                Ok(Notification::Status(_)) => {}
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Dropped button events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on(interpreter: &mut RockerInterpreter, input: u8, kind: EventKind) -> Option<(usize, RockerAction)> {
        interpreter.on_event(&ComponentEvent::input(input, kind))
    }

    #[test]
    fn inputs_map_to_channels_and_directions() {
        let mut rocker = RockerInterpreter::new();
        assert_eq!(
            on(&mut rocker, 0, EventKind::LongPush),
            Some((0, RockerAction::Dim(DimDirection::Up)))
        );
        assert_eq!(
            on(&mut rocker, 1, EventKind::LongPush),
            Some((0, RockerAction::Dim(DimDirection::Down)))
        );
        assert_eq!(
            on(&mut rocker, 2, EventKind::LongPush),
            Some((1, RockerAction::Dim(DimDirection::Down)))
        );
        assert_eq!(
            on(&mut rocker, 3, EventKind::LongPush),
            Some((1, RockerAction::Dim(DimDirection::Up)))
        );
    }

    #[test]
    fn single_push_toggles_its_channel() {
        let mut rocker = RockerInterpreter::new();
        assert_eq!(
            on(&mut rocker, 2, EventKind::SinglePush),
            Some((1, RockerAction::Toggle))
        );
    }

    #[test]
    fn release_stops_only_after_long_push() {
        let mut rocker = RockerInterpreter::new();
        assert_eq!(on(&mut rocker, 0, EventKind::ButtonUp), None);

        on(&mut rocker, 3, EventKind::LongPush);
        assert!(rocker.is_dimming());
        assert_eq!(
            on(&mut rocker, 3, EventKind::ButtonUp),
            Some((1, RockerAction::DimStop))
        );
        assert!(!rocker.is_dimming());
        assert_eq!(on(&mut rocker, 3, EventKind::ButtonUp), None);
    }

    #[test]
    fn unknown_inputs_and_gestures_are_ignored() {
        let mut rocker = RockerInterpreter::new();
        assert_eq!(on(&mut rocker, 4, EventKind::SinglePush), None);
        assert_eq!(on(&mut rocker, 0, EventKind::DoublePush), None);
        assert_eq!(
            rocker.on_event(&ComponentEvent::new("sys", None, EventKind::ConfigChanged)),
            None
        );
    }
}
