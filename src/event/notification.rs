// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Notification types and frame parsing.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ParseError;

/// Kind of event reported by a component.
///
/// Button gestures are classified on the device; the names follow the
/// `event` field of Gen2 `NotifyEvent` frames.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Button pressed down.
    ButtonDown,
    /// Button released.
    ButtonUp,
    /// Short press.
    SinglePush,
    /// Two short presses.
    DoublePush,
    /// Three short presses.
    TriplePush,
    /// Button held past the long-press threshold.
    LongPush,
    /// A component configuration changed.
    ConfigChanged,
    /// Any other event name.
    Other(String),
}

impl EventKind {
    /// Maps a device event name to its kind.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "btn_down" => Self::ButtonDown,
            "btn_up" => Self::ButtonUp,
            "single_push" => Self::SinglePush,
            "double_push" => Self::DoublePush,
            "triple_push" => Self::TriplePush,
            "long_push" => Self::LongPush,
            "config_changed" => Self::ConfigChanged,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the device event name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::ButtonDown => "btn_down",
            Self::ButtonUp => "btn_up",
            Self::SinglePush => "single_push",
            Self::DoublePush => "double_push",
            Self::TriplePush => "triple_push",
            Self::LongPush => "long_push",
            Self::ConfigChanged => "config_changed",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An event raised by one component of a device.
///
/// # Examples
///
/// ```
/// use shelly_automation::event::{ComponentEvent, EventKind};
///
/// let event = ComponentEvent::input(2, EventKind::LongPush);
/// assert_eq!(event.component(), "input:2");
/// assert_eq!(event.input_id(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentEvent {
    component: String,
    id: Option<u8>,
    kind: EventKind,
}

impl ComponentEvent {
    /// Creates an event for an arbitrary component.
    #[must_use]
    pub fn new(component: impl Into<String>, id: Option<u8>, kind: EventKind) -> Self {
        Self {
            component: component.into(),
            id,
            kind,
        }
    }

    /// Creates an event raised by `input:<id>`.
    #[must_use]
    pub fn input(id: u8, kind: EventKind) -> Self {
        Self::new(format!("input:{id}"), Some(id), kind)
    }

    /// Returns the component key, e.g. `input:0` or `sys`.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Returns the component instance id, if any.
    #[must_use]
    pub fn id(&self) -> Option<u8> {
        self.id
    }

    /// Returns the event kind.
    #[must_use]
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Returns the input id when the event comes from an `input:<id>` component.
    #[must_use]
    pub fn input_id(&self) -> Option<u8> {
        if self.component.starts_with("input:") {
            self.id
        } else {
            None
        }
    }
}

/// A status delta reported for one component.
///
/// Only the fields that changed are present in [`delta`](Self::delta).
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    component: String,
    delta: Value,
}

impl StatusChange {
    /// Creates a status change.
    #[must_use]
    pub fn new(component: impl Into<String>, delta: Value) -> Self {
        Self {
            component: component.into(),
            delta,
        }
    }

    /// Returns the component key, e.g. `switch:0`.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Returns the raw delta object.
    #[must_use]
    pub fn delta(&self) -> &Value {
        &self.delta
    }

    /// Returns the new `output` value if it is part of the delta.
    #[must_use]
    pub fn output(&self) -> Option<bool> {
        self.delta.get("output").and_then(Value::as_bool)
    }
}

/// One notification received from a device.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A component event (`NotifyEvent`).
    Event(ComponentEvent),
    /// A component status delta (`NotifyStatus`).
    Status(StatusChange),
}

impl Notification {
    /// Parses one RPC notification frame.
    ///
    /// A `NotifyEvent` frame can carry several events and a `NotifyStatus`
    /// frame several components, so a frame yields zero or more
    /// notifications. Frames with other methods yield none.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the payload is not a well-formed frame.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelly_automation::event::{EventKind, Notification};
    ///
    /// let frame = r#"{
    ///     "src": "shellyplusi4-a8032ab12345",
    ///     "method": "NotifyEvent",
    ///     "params": {"ts": 1700000000.5, "events": [
    ///         {"component": "input:0", "id": 0, "event": "single_push", "ts": 1700000000.5}
    ///     ]}
    /// }"#;
    /// let parsed = Notification::parse_frame(frame).unwrap();
    /// let Notification::Event(event) = &parsed[0] else { panic!() };
    /// assert_eq!(event.kind(), &EventKind::SinglePush);
    /// ```
    pub fn parse_frame(payload: &str) -> Result<Vec<Self>, ParseError> {
        let frame: Frame = serde_json::from_str(payload)?;
        match frame.method.as_str() {
            "NotifyEvent" => {
                let params: EventParams = serde_json::from_value(frame.params)?;
                Ok(params
                    .events
                    .into_iter()
                    .map(|raw| {
                        Self::Event(ComponentEvent::new(
                            raw.component,
                            raw.id,
                            EventKind::from_name(&raw.event),
                        ))
                    })
                    .collect())
            }
            "NotifyStatus" => {
                let Value::Object(params) = frame.params else {
                    return Err(ParseError::UnexpectedFormat(
                        "NotifyStatus params is not an object".to_string(),
                    ));
                };
                Ok(status_changes(params))
            }
            _ => Ok(Vec::new()),
        }
    }
}

fn status_changes(params: Map<String, Value>) -> Vec<Notification> {
    params
        .into_iter()
        .filter(|(key, value)| key != "ts" && value.is_object())
        .map(|(component, delta)| Notification::Status(StatusChange::new(component, delta)))
        .collect()
}

#[derive(Debug, Deserialize)]
struct Frame {
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Deserialize)]
struct EventParams {
    #[serde(default)]
    events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    component: String,
    #[serde(default)]
    id: Option<u8>,
    event: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_names_round_trip() {
        for name in [
            "btn_down",
            "btn_up",
            "single_push",
            "double_push",
            "triple_push",
            "long_push",
            "config_changed",
        ] {
            assert_eq!(EventKind::from_name(name).name(), name);
        }
        assert_eq!(
            EventKind::from_name("wheel_turned"),
            EventKind::Other("wheel_turned".to_string())
        );
    }

    #[test]
    fn parse_notify_event_with_several_events() {
        let frame = r#"{"src":"i4","dst":"i4/events","method":"NotifyEvent","params":{"ts":1.0,"events":[
            {"component":"input:1","id":1,"event":"btn_down","ts":1.0},
            {"component":"input:1","id":1,"event":"long_push","ts":1.0}
        ]}}"#;
        let parsed = Notification::parse_frame(frame).unwrap();
        assert_eq!(
            parsed,
            vec![
                Notification::Event(ComponentEvent::input(1, EventKind::ButtonDown)),
                Notification::Event(ComponentEvent::input(1, EventKind::LongPush)),
            ]
        );
    }

    #[test]
    fn parse_sys_event_without_id() {
        let frame = r#"{"method":"NotifyEvent","params":{"events":[
            {"component":"sys","event":"config_changed","restart_required":false}
        ]}}"#;
        let parsed = Notification::parse_frame(frame).unwrap();
        let Notification::Event(event) = &parsed[0] else {
            panic!("expected event");
        };
        assert_eq!(event.component(), "sys");
        assert_eq!(event.input_id(), None);
        assert_eq!(event.kind(), &EventKind::ConfigChanged);
    }

    #[test]
    fn parse_notify_status_skips_timestamp() {
        let frame = r#"{"method":"NotifyStatus","params":{"ts":1700000000.0,"switch:0":{"id":0,"output":false,"source":"button"}}}"#;
        let parsed = Notification::parse_frame(frame).unwrap();
        assert_eq!(parsed.len(), 1);
        let Notification::Status(change) = &parsed[0] else {
            panic!("expected status");
        };
        assert_eq!(change.component(), "switch:0");
        assert_eq!(change.output(), Some(false));
    }

    #[test]
    fn other_methods_are_ignored() {
        let frame = r#"{"method":"NotifyFullStatus","params":{"ts":1.0}}"#;
        assert!(Notification::parse_frame(frame).unwrap().is_empty());
    }

    #[test]
    fn malformed_frame_is_an_error() {
        assert!(Notification::parse_frame("not json").is_err());
        assert!(Notification::parse_frame(r#"{"method":"NotifyStatus","params":[1]}"#).is_err());
    }
}
