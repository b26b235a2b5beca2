// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cancellable timers that post messages to an actor.
//!
//! A timer is a spawned task that sleeps and then sends a message on the
//! owner's channel. The owner processes the message like any other input,
//! so timer callbacks never run concurrently with event handling.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Handle to a one-shot or repeating timer.
///
/// Cancelling a handle that already fired or was never armed is a no-op.
/// Dropping a handle cancels its timer.
///
/// A message sent just before cancellation may already sit in the owner's
/// queue; owners that care tag messages so late ones can be recognised.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use shelly_automation::timer::TimerHandle;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (tx, mut rx) = tokio::sync::mpsc::channel(4);
/// let mut timer = TimerHandle::once(Duration::from_millis(10), tx, "tick");
/// assert_eq!(rx.recv().await, Some("tick"));
/// timer.cancel();
/// # }
/// ```
#[derive(Debug, Default)]
pub struct TimerHandle {
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    /// Returns a handle with no timer armed.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Sends `message` once after `delay`.
    #[must_use]
    pub fn once<M>(delay: Duration, tx: mpsc::Sender<M>, message: M) -> Self
    where
        M: Send + 'static,
    {
        let task = tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(message).await;
        });
        Self { task: Some(task) }
    }

    /// Shortest period of a repeating timer.
    pub const MIN_PERIOD: Duration = Duration::from_millis(1);

    /// Sends a clone of `message` every `period`, the first one after one
    /// full period.
    ///
    /// Periods below [`Self::MIN_PERIOD`] are raised to it. The timer stops
    /// by itself once the receiving side is gone.
    #[must_use]
    pub fn repeating<M>(period: Duration, tx: mpsc::Sender<M>, message: M) -> Self
    where
        M: Clone + Send + 'static,
    {
        let period = period.max(Self::MIN_PERIOD);
        let task = tokio::spawn(async move {
            let mut ticks = time::interval_at(time::Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if tx.send(message.clone()).await.is_err() {
                    break;
                }
            }
        });
        Self { task: Some(task) }
    }

    /// Stops the timer.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Returns `true` while the timer can still fire.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn once_fires_after_delay() {
        let (tx, mut rx) = mpsc::channel(4);
        let start = time::Instant::now();
        let _timer = TimerHandle::once(Duration::from_secs(1), tx, 7);

        assert_eq!(rx.recv().await, Some(7));
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_once_never_fires() {
        let (tx, mut rx) = mpsc::channel::<u8>(4);
        let mut timer = TimerHandle::once(Duration::from_secs(1), tx, 7);
        timer.cancel();

        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
        assert!(!timer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_repeats_at_the_minimum() {
        let (tx, mut rx) = mpsc::channel(4);
        let start = time::Instant::now();
        let timer = TimerHandle::repeating(Duration::ZERO, tx, ());

        rx.recv().await;
        rx.recv().await;
        assert_eq!(start.elapsed(), TimerHandle::MIN_PERIOD * 2);
        assert!(timer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn repeating_first_tick_after_one_period() {
        let (tx, mut rx) = mpsc::channel(4);
        let start = time::Instant::now();
        let _timer = TimerHandle::repeating(Duration::from_millis(1500), tx, ());

        rx.recv().await;
        assert_eq!(start.elapsed(), Duration::from_millis(1500));
        rx.recv().await;
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_cancels() {
        let (tx, mut rx) = mpsc::channel::<()>(4);
        drop(TimerHandle::repeating(Duration::from_secs(1), tx, ()));

        time::sleep(Duration::from_secs(3)).await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn cancel_idle_is_noop() {
        let mut timer = TimerHandle::idle();
        timer.cancel();
        timer.cancel();
        assert!(!timer.is_armed());
    }
}
