// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Button gesture state machine.

use crate::event::{ComponentEvent, EventKind};
use crate::types::{Brightness, DimDirection};

/// Identifies one armed sweep.
///
/// Every cancellation moves to a new sweep id, so readings and timer
/// messages tagged with an older id are recognised as stale.
pub type SweepId = u64;

/// Work requested by the interpreter.
///
/// The interpreter never performs I/O; its owner executes effects in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Cancel the poll timer and any pending reversal.
    CancelTimers,
    /// Toggle the light.
    Toggle,
    /// Turn the light on at full brightness.
    SetMaxBrightness,
    /// Turn the light on at its last brightness.
    TurnOn,
    /// Read the brightness a sweep starts from.
    QueryStartBrightness(SweepId),
    /// Start dimming towards an extreme.
    Dim(DimDirection),
    /// Stop dimming.
    DimStop,
    /// Arm the repeating brightness poll.
    StartPolling(SweepId),
    /// Read the brightness for one poll tick.
    PollBrightness(SweepId),
    /// Arm a one-shot reversal after the wait interval.
    ScheduleReversal {
        /// Sweep the reversal belongs to.
        sweep: SweepId,
        /// Direction to dim in when it fires.
        direction: DimDirection,
    },
}

/// Maps button events on one input to dimmer actions.
///
/// | Event | Effects |
/// |---|---|
/// | `single_push` | cancel timers, toggle |
/// | `double_push` | full brightness |
/// | `long_push` | unblock, cancel timers, turn on, read brightness |
/// | `btn_up` | block; after a `long_push`: dim stop, cancel timers |
///
/// When the start brightness arrives and dimming is still unblocked, the
/// light dims away from it and polling starts. A poll reading of exactly
/// 100 or 1 schedules one reversal after the wait interval.
///
/// # Examples
///
/// ```
/// use shelly_automation::event::{ComponentEvent, EventKind};
/// use shelly_automation::gesture::{Effect, GestureInterpreter};
/// use shelly_automation::types::{Brightness, DimDirection};
///
/// let mut interpreter = GestureInterpreter::new(0);
/// let effects = interpreter.on_event(&ComponentEvent::input(0, EventKind::LongPush));
/// let Some(&Effect::QueryStartBrightness(sweep)) = effects.last() else { panic!() };
///
/// let effects = interpreter.on_start_brightness(sweep, Brightness::clamped(80));
/// assert_eq!(effects[0], Effect::Dim(DimDirection::Down));
/// ```
#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    input: u8,
    last_event: Option<EventKind>,
    dimming_blocked: bool,
    reversal_pending: bool,
    sweep: SweepId,
}

impl GestureInterpreter {
    /// Creates an interpreter listening to `input:<input>`.
    #[must_use]
    pub fn new(input: u8) -> Self {
        Self {
            input,
            last_event: None,
            dimming_blocked: false,
            reversal_pending: false,
            sweep: 0,
        }
    }

    /// Returns the input this interpreter listens to.
    #[must_use]
    pub fn input(&self) -> u8 {
        self.input
    }

    /// Returns the last event seen on the input.
    #[must_use]
    pub fn last_event(&self) -> Option<&EventKind> {
        self.last_event.as_ref()
    }

    /// Returns `true` once the button was released after a sweep request.
    #[must_use]
    pub fn is_dimming_blocked(&self) -> bool {
        self.dimming_blocked
    }

    /// Returns `true` while a reversal is scheduled.
    #[must_use]
    pub fn is_reversal_pending(&self) -> bool {
        self.reversal_pending
    }

    /// Returns the current sweep id.
    #[must_use]
    pub fn sweep(&self) -> SweepId {
        self.sweep
    }

    /// Handles one button event.
    ///
    /// Events from other components or inputs are ignored and do not
    /// change the last event.
    pub fn on_event(&mut self, event: &ComponentEvent) -> Vec<Effect> {
        if event.input_id() != Some(self.input) {
            return Vec::new();
        }

        let mut effects = Vec::new();
        match event.kind() {
            EventKind::SinglePush => {
                self.cancel_sweep(&mut effects);
                effects.push(Effect::Toggle);
            }
            EventKind::DoublePush => effects.push(Effect::SetMaxBrightness),
            EventKind::LongPush => {
                self.dimming_blocked = false;
                self.cancel_sweep(&mut effects);
                effects.push(Effect::TurnOn);
                effects.push(Effect::QueryStartBrightness(self.sweep));
            }
            EventKind::ButtonUp => {
                self.dimming_blocked = true;
                if self.last_event == Some(EventKind::LongPush) {
                    effects.push(Effect::DimStop);
                    self.cancel_sweep(&mut effects);
                }
            }
            _ => {}
        }

        self.last_event = Some(event.kind().clone());
        effects
    }

    /// Handles the brightness read when a long press started a sweep.
    pub fn on_start_brightness(&mut self, sweep: SweepId, brightness: Brightness) -> Vec<Effect> {
        if sweep != self.sweep || self.dimming_blocked {
            return Vec::new();
        }

        let mut effects = Vec::new();
        self.dim(DimDirection::away_from(brightness), &mut effects);
        self.cancel_sweep(&mut effects);
        effects.push(Effect::StartPolling(self.sweep));
        effects
    }

    /// Handles one tick of the poll timer.
    pub fn on_poll_tick(&mut self, sweep: SweepId) -> Vec<Effect> {
        if sweep != self.sweep || self.reversal_pending {
            return Vec::new();
        }
        vec![Effect::PollBrightness(sweep)]
    }

    /// Handles a brightness reading taken by the poll.
    pub fn on_poll_brightness(&mut self, sweep: SweepId, brightness: Brightness) -> Vec<Effect> {
        if sweep != self.sweep || self.reversal_pending {
            return Vec::new();
        }

        let direction = if brightness.is_sweep_top() {
            DimDirection::Down
        } else if brightness.is_sweep_floor() {
            DimDirection::Up
        } else {
            return Vec::new();
        };

        self.reversal_pending = true;
        vec![Effect::ScheduleReversal { sweep, direction }]
    }

    /// Handles the reversal timer firing.
    pub fn on_reversal_due(&mut self, sweep: SweepId, direction: DimDirection) -> Vec<Effect> {
        if sweep != self.sweep {
            return Vec::new();
        }
        let mut effects = Vec::new();
        self.dim(direction, &mut effects);
        effects
    }

    fn dim(&mut self, direction: DimDirection, effects: &mut Vec<Effect>) {
        self.reversal_pending = false;
        effects.push(Effect::Dim(direction));
    }

    fn cancel_sweep(&mut self, effects: &mut Vec<Effect>) {
        self.sweep = self.sweep.wrapping_add(1);
        self.reversal_pending = false;
        effects.push(Effect::CancelTimers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: EventKind) -> ComponentEvent {
        ComponentEvent::input(0, kind)
    }

    fn long_press(interpreter: &mut GestureInterpreter) -> SweepId {
        let effects = interpreter.on_event(&event(EventKind::LongPush));
        match effects.last() {
            Some(&Effect::QueryStartBrightness(sweep)) => sweep,
            other => panic!("unexpected effects {other:?}"),
        }
    }

    fn start_sweep(interpreter: &mut GestureInterpreter, brightness: u8) -> SweepId {
        let sweep = long_press(interpreter);
        let effects = interpreter.on_start_brightness(sweep, Brightness::clamped(brightness));
        match effects.last() {
            Some(&Effect::StartPolling(sweep)) => sweep,
            other => panic!("unexpected effects {other:?}"),
        }
    }

    #[test]
    fn single_push_cancels_then_toggles() {
        let mut interpreter = GestureInterpreter::new(0);
        let effects = interpreter.on_event(&event(EventKind::SinglePush));
        assert_eq!(effects, vec![Effect::CancelTimers, Effect::Toggle]);
        assert_eq!(interpreter.last_event(), Some(&EventKind::SinglePush));
    }

    #[test]
    fn single_push_during_sweep_cancels_timers() {
        let mut interpreter = GestureInterpreter::new(0);
        let sweep = start_sweep(&mut interpreter, 30);
        interpreter.on_poll_brightness(sweep, Brightness::MAX);
        assert!(interpreter.is_reversal_pending());

        let effects = interpreter.on_event(&event(EventKind::SinglePush));
        assert_eq!(effects[0], Effect::CancelTimers);
        assert!(!interpreter.is_reversal_pending());
        assert!(interpreter.on_reversal_due(sweep, DimDirection::Down).is_empty());
    }

    #[test]
    fn double_push_leaves_timers_alone() {
        let mut interpreter = GestureInterpreter::new(0);
        let sweep = start_sweep(&mut interpreter, 30);
        let effects = interpreter.on_event(&event(EventKind::DoublePush));
        assert_eq!(effects, vec![Effect::SetMaxBrightness]);
        assert_eq!(
            interpreter.on_poll_tick(sweep),
            vec![Effect::PollBrightness(sweep)]
        );
    }

    #[test]
    fn long_push_cancels_before_anything_else() {
        let mut interpreter = GestureInterpreter::new(0);
        let before = interpreter.sweep();
        let effects = interpreter.on_event(&event(EventKind::LongPush));
        assert_eq!(
            effects,
            vec![
                Effect::CancelTimers,
                Effect::TurnOn,
                Effect::QueryStartBrightness(before + 1),
            ]
        );
        assert!(!interpreter.is_dimming_blocked());
    }

    #[test]
    fn start_brightness_picks_direction_away_from_reading() {
        let mut interpreter = GestureInterpreter::new(0);
        let sweep = long_press(&mut interpreter);
        let effects = interpreter.on_start_brightness(sweep, Brightness::clamped(80));
        assert_eq!(effects[0], Effect::Dim(DimDirection::Down));
        assert_eq!(effects[1], Effect::CancelTimers);

        let sweep = long_press(&mut interpreter);
        let effects = interpreter.on_start_brightness(sweep, Brightness::clamped(50));
        assert_eq!(effects[0], Effect::Dim(DimDirection::Up));
    }

    #[test]
    fn start_brightness_after_release_is_ignored() {
        let mut interpreter = GestureInterpreter::new(0);
        let sweep = long_press(&mut interpreter);
        interpreter.on_event(&event(EventKind::ButtonUp));
        assert!(
            interpreter
                .on_start_brightness(sweep, Brightness::clamped(80))
                .is_empty()
        );
    }

    #[test]
    fn blocked_flag_alone_suppresses_the_sweep() {
        let mut interpreter = GestureInterpreter::new(0);
        let sweep = long_press(&mut interpreter);
        interpreter.on_event(&event(EventKind::ButtonDown));
        interpreter.on_event(&event(EventKind::ButtonUp));
        assert!(interpreter.is_dimming_blocked());
        // The release followed btn_down, so the sweep id was not advanced.
        assert_eq!(interpreter.sweep(), sweep);
        assert!(
            interpreter
                .on_start_brightness(sweep, Brightness::clamped(20))
                .is_empty()
        );
    }

    #[test]
    fn release_after_long_push_stops_and_cancels() {
        let mut interpreter = GestureInterpreter::new(0);
        start_sweep(&mut interpreter, 10);
        let effects = interpreter.on_event(&event(EventKind::ButtonUp));
        assert_eq!(effects, vec![Effect::DimStop, Effect::CancelTimers]);
    }

    #[test]
    fn release_without_long_push_does_nothing_visible() {
        let mut interpreter = GestureInterpreter::new(0);
        let sweep = start_sweep(&mut interpreter, 10);
        interpreter.on_event(&event(EventKind::ButtonDown));

        let effects = interpreter.on_event(&event(EventKind::ButtonUp));
        assert!(effects.is_empty());
        assert_eq!(interpreter.sweep(), sweep);
        assert_eq!(
            interpreter.on_poll_tick(sweep),
            vec![Effect::PollBrightness(sweep)]
        );
    }

    #[test]
    fn readings_at_the_ends_schedule_one_reversal() {
        let mut interpreter = GestureInterpreter::new(0);
        let sweep = start_sweep(&mut interpreter, 80);

        assert_eq!(
            interpreter.on_poll_brightness(sweep, Brightness::MAX),
            vec![Effect::ScheduleReversal {
                sweep,
                direction: DimDirection::Down
            }]
        );
        assert!(interpreter.on_poll_tick(sweep).is_empty());
        assert!(
            interpreter
                .on_poll_brightness(sweep, Brightness::MAX)
                .is_empty()
        );

        assert_eq!(
            interpreter.on_reversal_due(sweep, DimDirection::Down),
            vec![Effect::Dim(DimDirection::Down)]
        );
        assert!(!interpreter.is_reversal_pending());

        assert_eq!(
            interpreter.on_poll_brightness(sweep, Brightness::SWEEP_FLOOR),
            vec![Effect::ScheduleReversal {
                sweep,
                direction: DimDirection::Up
            }]
        );
    }

    #[test]
    fn other_readings_schedule_nothing() {
        let mut interpreter = GestureInterpreter::new(0);
        let sweep = start_sweep(&mut interpreter, 80);
        for value in [0, 2, 50, 99] {
            assert!(
                interpreter
                    .on_poll_brightness(sweep, Brightness::clamped(value))
                    .is_empty()
            );
        }
        assert!(!interpreter.is_reversal_pending());
    }

    #[test]
    fn stale_messages_are_dropped() {
        let mut interpreter = GestureInterpreter::new(0);
        let old = start_sweep(&mut interpreter, 80);
        let new = start_sweep(&mut interpreter, 80);
        assert_ne!(old, new);

        assert!(interpreter.on_poll_tick(old).is_empty());
        assert!(interpreter.on_poll_brightness(old, Brightness::MAX).is_empty());
        assert!(interpreter.on_reversal_due(old, DimDirection::Up).is_empty());
        assert!(
            interpreter
                .on_start_brightness(old, Brightness::clamped(10))
                .is_empty()
        );
    }

    #[test]
    fn other_inputs_are_ignored() {
        let mut interpreter = GestureInterpreter::new(2);
        assert!(
            interpreter
                .on_event(&ComponentEvent::input(1, EventKind::SinglePush))
                .is_empty()
        );
        assert!(
            interpreter
                .on_event(&ComponentEvent::new("switch:2", Some(2), EventKind::SinglePush))
                .is_empty()
        );
        assert_eq!(interpreter.last_event(), None);
    }

    #[test]
    fn every_matching_event_updates_last_event() {
        let mut interpreter = GestureInterpreter::new(0);
        interpreter.on_event(&event(EventKind::TriplePush));
        assert_eq!(interpreter.last_event(), Some(&EventKind::TriplePush));
        interpreter.on_event(&event(EventKind::ButtonDown));
        assert_eq!(interpreter.last_event(), Some(&EventKind::ButtonDown));
    }
}
