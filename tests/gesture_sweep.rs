// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timer-driven gesture tests against an in-process dimmer.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use shelly_automation::dimmer::{RemoteDimmer, SweepTiming};
use shelly_automation::event::{ComponentEvent, EventBus, EventKind, Notification};
use shelly_automation::gesture::{GestureController, InputRouter, RockerControl};
use shelly_automation::types::{Brightness, DimDirection, FadeRate};
use tokio::time::sleep;

/// Records every call and answers brightness reads from a script.
///
/// The last scripted reading repeats once the script runs out.
#[derive(Debug, Clone, Default)]
struct RecordingDimmer {
    calls: Arc<Mutex<Vec<String>>>,
    readings: Arc<Mutex<VecDeque<u8>>>,
    read_delay: Duration,
    init_delay: Duration,
}

impl RecordingDimmer {
    fn with_readings(readings: &[u8]) -> Self {
        Self {
            readings: Arc::new(Mutex::new(readings.iter().copied().collect())),
            ..Self::default()
        }
    }

    fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = delay;
        self
    }

    fn with_init_delay(mut self, delay: Duration) -> Self {
        self.init_delay = delay;
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn count(&self, call: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }
}

impl RemoteDimmer for RecordingDimmer {
    async fn initialize(&self) -> shelly_automation::Result<()> {
        sleep(self.init_delay).await;
        Ok(())
    }

    async fn toggle(&self) -> shelly_automation::Result<()> {
        self.record("toggle");
        Ok(())
    }

    async fn set_brightness(&self, brightness: Brightness) -> shelly_automation::Result<()> {
        self.record(format!("set:{}", brightness.value()));
        Ok(())
    }

    async fn turn_on(&self) -> shelly_automation::Result<()> {
        self.record("turn_on");
        Ok(())
    }

    async fn dim(&self, direction: DimDirection, fade_rate: FadeRate) -> shelly_automation::Result<()> {
        self.record(format!("dim:{}:{}", direction.as_str(), fade_rate.value()));
        Ok(())
    }

    async fn dim_stop(&self) -> shelly_automation::Result<()> {
        self.record("dim_stop");
        Ok(())
    }

    async fn brightness(&self) -> shelly_automation::Result<Brightness> {
        self.record("brightness");
        if !self.read_delay.is_zero() {
            sleep(self.read_delay).await;
        }
        let mut readings = self.readings.lock();
        let value = if readings.len() > 1 {
            readings.pop_front()
        } else {
            readings.front().copied()
        };
        Ok(Brightness::clamped(value.unwrap_or(50)))
    }
}

fn timing() -> SweepTiming {
    SweepTiming::new(Duration::from_millis(1000), Duration::from_millis(1000)).unwrap()
}

fn input(id: u8, kind: EventKind) -> ComponentEvent {
    ComponentEvent::input(id, kind)
}

async fn settle() {
    sleep(Duration::from_millis(10)).await;
}

// ============================================================================
// Single target
// ============================================================================

#[tokio::test(start_paused = true)]
async fn long_push_dims_away_from_start_brightness() {
    let dimmer = RecordingDimmer::with_readings(&[80]);
    let handle = GestureController::spawn(0, dimmer.clone(), FadeRate::FASTEST, timing());

    handle.dispatch(input(0, EventKind::LongPush)).await;
    settle().await;

    let calls = dimmer.calls();
    assert!(calls.contains(&"turn_on".to_string()));
    assert_eq!(dimmer.count("dim:down:5"), 1);
    assert_eq!(dimmer.count("dim:up:5"), 0);
}

#[tokio::test(start_paused = true)]
async fn sweep_reverses_at_the_top_after_the_wait() {
    let dimmer = RecordingDimmer::with_readings(&[30, 100]);
    let handle = GestureController::spawn(0, dimmer.clone(), FadeRate::FASTEST, timing());

    handle.dispatch(input(0, EventKind::LongPush)).await;
    settle().await;
    assert_eq!(dimmer.count("dim:up:5"), 1);

    // First poll reads 100 at t=1s; the reversal waits another second.
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(dimmer.count("brightness"), 2);
    assert_eq!(dimmer.count("dim:down:5"), 0);

    sleep(Duration::from_millis(600)).await;
    assert_eq!(dimmer.count("dim:down:5"), 1);
}

#[tokio::test(start_paused = true)]
async fn sweep_reverses_at_the_floor() {
    let dimmer = RecordingDimmer::with_readings(&[80, 1]);
    let handle = GestureController::spawn(0, dimmer.clone(), FadeRate::FASTEST, timing());

    handle.dispatch(input(0, EventKind::LongPush)).await;
    sleep(Duration::from_millis(2100)).await;

    assert_eq!(dimmer.count("dim:down:5"), 1);
    assert_eq!(dimmer.count("dim:up:5"), 1);
}

#[tokio::test(start_paused = true)]
async fn new_sweep_cancels_pending_reversal() {
    let dimmer = RecordingDimmer::with_readings(&[30, 100, 40]);
    let handle = GestureController::spawn(0, dimmer.clone(), FadeRate::FASTEST, timing());

    handle.dispatch(input(0, EventKind::LongPush)).await;
    // Poll at t=1s reads 100; the reversal would fire at t=2s.
    sleep(Duration::from_millis(1500)).await;
    handle.dispatch(input(0, EventKind::LongPush)).await;
    sleep(Duration::from_millis(1100)).await;

    assert_eq!(dimmer.count("dim:up:5"), 2);
    assert_eq!(dimmer.count("dim:down:5"), 0);
}

#[tokio::test(start_paused = true)]
async fn gestures_are_handled_while_initialising() {
    let dimmer = RecordingDimmer::default().with_init_delay(Duration::from_secs(10));
    let handle = GestureController::spawn(0, dimmer.clone(), FadeRate::FASTEST, timing());

    handle.dispatch(input(0, EventKind::SinglePush)).await;
    settle().await;

    assert_eq!(dimmer.calls(), vec!["toggle"]);
}

#[tokio::test(start_paused = true)]
async fn mid_range_readings_keep_sweeping() {
    let dimmer = RecordingDimmer::with_readings(&[20, 40, 60, 80]);
    let handle = GestureController::spawn(0, dimmer.clone(), FadeRate::FASTEST, timing());

    handle.dispatch(input(0, EventKind::LongPush)).await;
    sleep(Duration::from_millis(3500)).await;

    assert_eq!(dimmer.count("brightness"), 4);
    assert_eq!(dimmer.count("dim:up:5"), 1);
    assert_eq!(dimmer.count("dim:down:5"), 0);
}

#[tokio::test(start_paused = true)]
async fn release_after_long_push_stops_everything() {
    let dimmer = RecordingDimmer::with_readings(&[80]);
    let handle = GestureController::spawn(0, dimmer.clone(), FadeRate::FASTEST, timing());

    handle.dispatch(input(0, EventKind::LongPush)).await;
    settle().await;
    handle.dispatch(input(0, EventKind::ButtonUp)).await;
    sleep(Duration::from_secs(5)).await;

    assert_eq!(dimmer.count("dim_stop"), 1);
    assert_eq!(dimmer.count("brightness"), 1);
}

#[tokio::test(start_paused = true)]
async fn release_without_long_push_is_ignored() {
    let dimmer = RecordingDimmer::default();
    let handle = GestureController::spawn(0, dimmer.clone(), FadeRate::FASTEST, timing());

    handle.dispatch(input(0, EventKind::ButtonDown)).await;
    handle.dispatch(input(0, EventKind::ButtonUp)).await;
    handle.dispatch(input(0, EventKind::SinglePush)).await;
    handle.dispatch(input(0, EventKind::ButtonUp)).await;
    settle().await;

    assert_eq!(dimmer.calls(), vec!["toggle"]);
}

#[tokio::test(start_paused = true)]
async fn single_push_cancels_a_running_sweep() {
    let dimmer = RecordingDimmer::with_readings(&[50]);
    let handle = GestureController::spawn(0, dimmer.clone(), FadeRate::FASTEST, timing());

    handle.dispatch(input(0, EventKind::LongPush)).await;
    settle().await;
    handle.dispatch(input(0, EventKind::SinglePush)).await;
    sleep(Duration::from_secs(5)).await;

    assert_eq!(dimmer.count("toggle"), 1);
    assert_eq!(dimmer.count("brightness"), 1);
}

#[tokio::test(start_paused = true)]
async fn double_push_sets_full_brightness() {
    let dimmer = RecordingDimmer::default();
    let handle = GestureController::spawn(0, dimmer.clone(), FadeRate::FASTEST, timing());

    handle.dispatch(input(0, EventKind::DoublePush)).await;
    settle().await;

    assert_eq!(dimmer.calls(), vec!["set:100"]);
}

#[tokio::test(start_paused = true)]
async fn late_start_reading_after_release_is_dropped() {
    let dimmer = RecordingDimmer::with_readings(&[80]).with_read_delay(Duration::from_millis(300));
    let handle = GestureController::spawn(0, dimmer.clone(), FadeRate::FASTEST, timing());

    handle.dispatch(input(0, EventKind::LongPush)).await;
    settle().await;
    handle.dispatch(input(0, EventKind::ButtonUp)).await;
    sleep(Duration::from_secs(3)).await;

    assert!(dimmer.calls().iter().all(|call| !call.starts_with("dim:")));
    assert_eq!(dimmer.count("dim_stop"), 1);
}

#[tokio::test(start_paused = true)]
async fn events_for_other_inputs_are_ignored() {
    let dimmer = RecordingDimmer::default();
    let handle = GestureController::spawn(2, dimmer.clone(), FadeRate::FASTEST, timing());

    handle.dispatch(input(0, EventKind::SinglePush)).await;
    handle
        .dispatch(ComponentEvent::new("switch", Some(2), EventKind::SinglePush))
        .await;
    settle().await;

    assert!(dimmer.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn handle_follows_the_event_bus() {
    let dimmer = RecordingDimmer::default();
    let bus = EventBus::new();
    let handle = GestureController::spawn(0, dimmer.clone(), FadeRate::FASTEST, timing());
    tokio::spawn(handle.run(bus.subscribe()));
    settle().await;

    bus.publish(Notification::Event(input(0, EventKind::SinglePush)));
    settle().await;

    assert_eq!(dimmer.calls(), vec!["toggle"]);
}

// ============================================================================
// Several targets
// ============================================================================

#[tokio::test(start_paused = true)]
async fn router_sends_each_input_to_its_dimmer() {
    let first = RecordingDimmer::default();
    let second = RecordingDimmer::default();
    let mut router = InputRouter::new();
    router.bind(GestureController::spawn(0, first.clone(), FadeRate::FASTEST, timing()));
    router.bind(GestureController::spawn(1, second.clone(), FadeRate::FASTEST, timing()));
    assert_eq!(router.len(), 2);
    assert!(router.is_bound(1));
    assert!(!router.is_bound(3));

    router.dispatch(input(1, EventKind::SinglePush)).await;
    router.dispatch(input(3, EventKind::SinglePush)).await;
    settle().await;

    assert!(first.calls().is_empty());
    assert_eq!(second.calls(), vec!["toggle"]);
}

#[tokio::test(start_paused = true)]
async fn empty_router_returns_at_once() {
    let router = InputRouter::new();
    assert!(router.is_empty());
    let bus = EventBus::new();

    tokio::time::timeout(Duration::from_secs(1), router.run(bus.subscribe()))
        .await
        .expect("router with no bindings should return");
}

#[tokio::test(start_paused = true)]
async fn rocker_maps_inputs_to_channels() {
    let left = RecordingDimmer::default();
    let right = RecordingDimmer::default();
    let mut control = RockerControl::new(left.clone(), right.clone(), FadeRate::clamped(4));

    control.handle(&input(2, EventKind::LongPush));
    settle().await;
    control.handle(&input(2, EventKind::ButtonUp));
    control.handle(&input(0, EventKind::SinglePush));
    settle().await;

    assert_eq!(left.calls(), vec!["toggle"]);
    assert_eq!(right.calls(), vec!["dim:down:4", "dim_stop"]);
}
