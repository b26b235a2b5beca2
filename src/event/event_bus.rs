// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus fanning device notifications out to automations.

use tokio::sync::broadcast;

use super::Notification;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Broadcasts notifications from one device to every running automation.
///
/// Each automation subscribes once and receives its own copy of every
/// notification published afterwards, in publication order. A subscriber
/// that falls more than the capacity behind loses the oldest notifications
/// and sees `RecvError::Lagged`.
///
/// # Examples
///
/// ```
/// use shelly_automation::event::{ComponentEvent, EventBus, EventKind, Notification};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(Notification::Event(ComponentEvent::input(0, EventKind::SinglePush)));
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Notification>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to notifications published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes a notification to all subscribers.
    ///
    /// Without subscribers the notification is discarded.
    pub fn publish(&self, notification: Notification) {
        let _ = self.sender.send(notification);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
