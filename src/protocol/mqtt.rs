// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT notification source for Gen2 Shelly devices.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Global counter for generating unique client IDs.
static CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use serde::Deserialize;
use tokio::task::JoinHandle;

use crate::error::ProtocolError;
use crate::event::{EventBus, Notification};

/// Delay before polling the event loop again after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Broker settings for the notification listener.
///
/// # Examples
///
/// ```
/// use shelly_automation::protocol::MqttConfig;
/// use std::time::Duration;
///
/// let config = MqttConfig::new("mqtt://192.168.1.50:1883")
///     .with_credentials("shelly", "secret")
///     .with_keep_alive(Duration::from_secs(60));
/// assert_eq!(config.broker(), "mqtt://192.168.1.50:1883");
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct MqttConfig {
    broker: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default = "default_keep_alive", with = "keep_alive_secs")]
    keep_alive: Duration,
}

fn default_keep_alive() -> Duration {
    MqttConfig::DEFAULT_KEEP_ALIVE
}

mod keep_alive_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

impl MqttConfig {
    /// Default keep-alive interval.
    pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);

    /// Creates a configuration for the given broker URL.
    #[must_use]
    pub fn new(broker: impl Into<String>) -> Self {
        Self {
            broker: broker.into(),
            username: None,
            password: None,
            client_id: None,
            keep_alive: Self::DEFAULT_KEEP_ALIVE,
        }
    }

    /// Sets authentication credentials for the broker.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets a custom client ID.
    #[must_use]
    pub fn with_client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    /// Sets the keep-alive interval.
    #[must_use]
    pub fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Returns the broker URL.
    #[must_use]
    pub fn broker(&self) -> &str {
        &self.broker
    }

    /// Returns the configured client ID.
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    fn mqtt_options(&self) -> Result<MqttOptions, ProtocolError> {
        let (host, port) = parse_mqtt_url(&self.broker)?;

        let client_id = self.client_id.clone().unwrap_or_else(|| {
            let counter = CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
            format!("shelly_automation_{}_{}", std::process::id(), counter)
        });

        let mut options = MqttOptions::new(client_id, host, port);
        options.set_keep_alive(self.keep_alive);
        options.set_clean_session(true);
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            options.set_credentials(username, password);
        }
        Ok(options)
    }
}

/// Listens for RPC notifications of one device and republishes them.
///
/// Gen2 devices with RPC notifications enabled publish every `NotifyEvent`
/// and `NotifyStatus` frame on `<topic_prefix>/events/rpc`. Each frame is
/// parsed and its notifications are published on the [`EventBus`] in
/// arrival order.
///
/// # Examples
///
/// ```no_run
/// use shelly_automation::event::EventBus;
/// use shelly_automation::protocol::{MqttConfig, NotificationListener};
///
/// # async fn example() -> Result<(), shelly_automation::error::ProtocolError> {
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
/// let listener = NotificationListener::start(
///     &MqttConfig::new("mqtt://192.168.1.50:1883"),
///     "shellyplusi4-a8032ab12345",
///     bus,
/// )
/// .await?;
/// let first = rx.recv().await;
/// listener.shutdown().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NotificationListener {
    client: AsyncClient,
    topic: String,
    task: JoinHandle<()>,
}

impl NotificationListener {
    /// Connects to the broker and subscribes to the device's RPC topic.
    ///
    /// # Errors
    ///
    /// Returns error if the broker URL is invalid or the subscription
    /// request cannot be queued.
    pub async fn start(
        config: &MqttConfig,
        topic_prefix: &str,
        bus: EventBus,
    ) -> Result<Self, ProtocolError> {
        let options = config.mqtt_options()?;
        let (client, event_loop) = AsyncClient::new(options, 10);

        let topic = rpc_topic(topic_prefix);
        client
            .subscribe(&topic, QoS::AtLeastOnce)
            .await
            .map_err(ProtocolError::Mqtt)?;

        tracing::info!(broker = %config.broker(), topic = %topic, "Listening for notifications");

        let task = tokio::spawn(handle_mqtt_events(
            event_loop,
            client.clone(),
            topic.clone(),
            bus,
        ));

        Ok(Self {
            client,
            topic,
            task,
        })
    }

    /// Returns the subscribed topic.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Disconnects from the broker and stops the event loop.
    pub async fn shutdown(self) {
        if let Err(e) = self.client.disconnect().await {
            tracing::debug!(error = %e, "MQTT disconnect failed");
        }
        self.task.abort();
    }
}

fn rpc_topic(topic_prefix: &str) -> String {
    format!("{}/events/rpc", topic_prefix.trim_end_matches('/'))
}

/// Parses an MQTT URL into host and port.
fn parse_mqtt_url(url: &str) -> Result<(String, u16), ProtocolError> {
    let url = url
        .strip_prefix("mqtt://")
        .or_else(|| url.strip_prefix("tcp://"))
        .unwrap_or(url);

    let (host, port) = if let Some((h, p)) = url.rsplit_once(':') {
        let port = p
            .parse()
            .map_err(|_| ProtocolError::InvalidAddress(format!("Invalid port: {p}")))?;
        (h.to_string(), port)
    } else {
        (url.to_string(), 1883)
    };

    if host.is_empty() {
        return Err(ProtocolError::InvalidAddress(
            "broker host is required".to_string(),
        ));
    }

    Ok((host, port))
}

/// Handles MQTT events in the background.
///
/// Clean sessions drop subscriptions, so every reconnection subscribes again.
async fn handle_mqtt_events(
    mut event_loop: EventLoop,
    client: AsyncClient,
    topic: String,
    bus: EventBus,
) {
    use rumqttc::{Event, Packet};

    let mut connected_before = false;
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, "MQTT connected");
                if connected_before && !connack.session_present {
                    if let Err(e) = client.try_subscribe(&topic, QoS::AtLeastOnce) {
                        tracing::warn!(topic = %topic, error = %e, "Cannot resubscribe");
                    }
                }
                connected_before = true;
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) if publish.topic == topic => {
                let Ok(payload) = std::str::from_utf8(&publish.payload) else {
                    tracing::warn!(topic = %publish.topic, "Dropping non UTF-8 frame");
                    continue;
                };
                dispatch_frame(payload, &bus);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "MQTT event loop error, reconnecting");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

fn dispatch_frame(payload: &str, bus: &EventBus) {
    match Notification::parse_frame(payload) {
        Ok(notifications) => {
            for notification in notifications {
                tracing::trace!(?notification, "Received notification");
                bus.publish(notification);
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, payload = %payload, "Dropping malformed frame");
        }
    }
}
