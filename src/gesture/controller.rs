// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-target gesture actor.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::dimmer::{RemoteDimmer, SweepTiming};
use crate::error::Result;
use crate::event::{ComponentEvent, Notification};
use crate::timer::TimerHandle;
use crate::types::{Brightness, DimDirection, FadeRate};

use super::{Effect, GestureInterpreter, SweepId};

const MAILBOX_CAPACITY: usize = 32;

/// Input processed by a controller, one at a time.
#[derive(Debug, Clone)]
enum Message {
    Event(ComponentEvent),
    StartBrightness(SweepId, Brightness),
    PollTick(SweepId),
    PollBrightness(SweepId, Brightness),
    ReversalDue(SweepId, DimDirection),
}

/// Runs the gesture state machine for one dimmer target.
///
/// The controller owns the interpreter, the poll timer and the reversal
/// timer. Button events, timer ticks and brightness readings all arrive
/// through one mailbox, so they are handled strictly in arrival order.
/// Remote calls are spawned and never awaited by the controller; a failed
/// call is logged at debug level and otherwise ignored.
#[derive(Debug)]
pub struct GestureController<D: RemoteDimmer> {
    interpreter: GestureInterpreter,
    dimmer: Arc<D>,
    fade_rate: FadeRate,
    timing: SweepTiming,
    mailbox: mpsc::Sender<Message>,
    poll_timer: TimerHandle,
    reversal_timer: TimerHandle,
}

/// Handle to a running [`GestureController`].
///
/// Dropping the handle stops the controller and its timers.
#[derive(Debug)]
pub struct GestureHandle {
    input: u8,
    mailbox: mpsc::Sender<Message>,
    task: JoinHandle<()>,
}

impl<D: RemoteDimmer> GestureController<D> {
    /// Spawns a controller for `input:<input>` driving `dimmer`.
    ///
    /// The dimmer is initialised in the background; a failed initialisation
    /// is logged and gestures are handled meanwhile.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use shelly_automation::dimmer::DimmerTarget;
    /// use shelly_automation::event::{ComponentEvent, EventKind};
    /// use shelly_automation::gesture::GestureController;
    ///
    /// # async fn example() -> shelly_automation::Result<()> {
    /// let target = DimmerTarget::new("192.168.1.60", 1);
    /// let handle = GestureController::spawn(0, target.rpc_dimmer()?, target.fade_rate(), target.timing());
    /// handle.dispatch(ComponentEvent::input(0, EventKind::SinglePush)).await;
    /// # Ok(())
    /// # }
    /// ```
    pub fn spawn(input: u8, dimmer: D, fade_rate: FadeRate, timing: SweepTiming) -> GestureHandle {
        let (mailbox, inbox) = mpsc::channel(MAILBOX_CAPACITY);
        let controller = Self {
            interpreter: GestureInterpreter::new(input),
            dimmer: Arc::new(dimmer),
            fade_rate,
            timing,
            mailbox: mailbox.clone(),
            poll_timer: TimerHandle::idle(),
            reversal_timer: TimerHandle::idle(),
        };
        let task = tokio::spawn(controller.run(inbox));
        GestureHandle {
            input,
            mailbox,
            task,
        }
    }

    async fn run(mut self, mut inbox: mpsc::Receiver<Message>) {
        let dimmer = Arc::clone(&self.dimmer);
        let input = self.interpreter.input();
        tokio::spawn(async move {
            if let Err(e) = dimmer.initialize().await {
                tracing::warn!(input, error = %e, "Dimmer initialisation failed");
            }
        });

        while let Some(message) = inbox.recv().await {
            let effects = self.interpret(message);
            for effect in effects {
                self.apply(effect);
            }
        }
    }

    fn interpret(&mut self, message: Message) -> Vec<Effect> {
        match message {
            Message::Event(event) => {
                tracing::debug!(input = self.interpreter.input(), event = %event.kind(), "Button event");
                self.interpreter.on_event(&event)
            }
            Message::StartBrightness(sweep, brightness) => {
                tracing::debug!(%brightness, "Sweep start brightness");
                self.interpreter.on_start_brightness(sweep, brightness)
            }
            Message::PollTick(sweep) => self.interpreter.on_poll_tick(sweep),
            Message::PollBrightness(sweep, brightness) => {
                tracing::trace!(%brightness, "Sweep poll");
                self.interpreter.on_poll_brightness(sweep, brightness)
            }
            Message::ReversalDue(sweep, direction) => {
                self.interpreter.on_reversal_due(sweep, direction)
            }
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::CancelTimers => {
                self.poll_timer.cancel();
                self.reversal_timer.cancel();
            }
            Effect::Toggle => self.call("toggle", |dimmer| async move { dimmer.toggle().await }),
            Effect::SetMaxBrightness => self.call("set_brightness", |dimmer| async move {
                dimmer.set_brightness(Brightness::MAX).await
            }),
            Effect::TurnOn => self.call("turn_on", |dimmer| async move { dimmer.turn_on().await }),
            Effect::Dim(direction) => {
                let fade_rate = self.fade_rate;
                tracing::debug!(direction = direction.as_str(), "Dimming");
                self.call("dim", move |dimmer| async move {
                    dimmer.dim(direction, fade_rate).await
                });
            }
            Effect::DimStop => self.call("dim_stop", |dimmer| async move { dimmer.dim_stop().await }),
            Effect::QueryStartBrightness(sweep) => {
                self.read_brightness(move |brightness| Message::StartBrightness(sweep, brightness));
            }
            Effect::StartPolling(sweep) => {
                self.poll_timer = TimerHandle::repeating(
                    self.timing.poll,
                    self.mailbox.clone(),
                    Message::PollTick(sweep),
                );
            }
            Effect::PollBrightness(sweep) => {
                self.read_brightness(move |brightness| Message::PollBrightness(sweep, brightness));
            }
            Effect::ScheduleReversal { sweep, direction } => {
                tracing::debug!(direction = direction.as_str(), wait = ?self.timing.wait, "Reversal scheduled");
                self.reversal_timer = TimerHandle::once(
                    self.timing.wait,
                    self.mailbox.clone(),
                    Message::ReversalDue(sweep, direction),
                );
            }
        }
    }

    fn call<F, Fut>(&self, name: &'static str, call: F)
    where
        F: FnOnce(Arc<D>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let dimmer = Arc::clone(&self.dimmer);
        tokio::spawn(async move {
            if let Err(e) = call(dimmer).await {
                tracing::debug!(call = name, error = %e, "Remote call failed");
            }
        });
    }

    fn read_brightness<F>(&self, reply: F)
    where
        F: FnOnce(Brightness) -> Message + Send + 'static,
    {
        let dimmer = Arc::clone(&self.dimmer);
        let mailbox = self.mailbox.clone();
        tokio::spawn(async move {
            match dimmer.brightness().await {
                Ok(brightness) => {
                    let _ = mailbox.send(reply(brightness)).await;
                }
                Err(e) => tracing::debug!(error = %e, "Brightness read failed"),
            }
        });
    }
}

impl GestureHandle {
    /// Returns the input the controller listens to.
    #[must_use]
    pub fn input(&self) -> u8 {
        self.input
    }

    /// Queues an event for the controller.
    ///
    /// Events for other inputs are accepted and ignored by the controller.
    pub async fn dispatch(&self, event: ComponentEvent) {
        if self.mailbox.send(Message::Event(event)).await.is_err() {
            tracing::warn!(input = self.input, "Gesture controller stopped");
        }
    }

    /// Feeds every event from a notification stream to the controller until
    /// the stream closes.
    pub async fn run(self, mut notifications: broadcast::Receiver<Notification>) {
        loop {
            match notifications.recv().await {
                Ok(Notification::Event(event)) => self.dispatch(event).await,
                Ok(Notification::Status(_)) => {}
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(input = self.input, missed, "Dropped button events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

impl Drop for GestureHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
