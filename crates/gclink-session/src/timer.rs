//! Owned background timers.
//!
//! A [`RetryTimer`] runs one action, either once after a delay or
//! periodically, on a spawned Tokio task. It owns that task: re-arming
//! replaces it, and disarming or dropping the timer aborts it. At most one
//! task per timer is ever alive.
//!
//! Periodic timers use [`MissedTickBehavior::Skip`]: if the runtime stalls,
//! missed periods are dropped rather than fired back to back.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// A named, re-armable background timer.
pub struct RetryTimer {
    name: &'static str,
    task: Option<JoinHandle<()>>,
}

impl RetryTimer {
    /// Creates a disarmed timer. `name` only shows up in logs.
    pub fn new(name: &'static str) -> Self {
        Self { name, task: None }
    }

    /// Runs `action` after `first`, then every `period` until it returns
    /// `ControlFlow::Break` or the timer is disarmed.
    ///
    /// Replaces whatever the timer was doing before.
    pub fn arm<F, Fut>(&mut self, first: Duration, period: Duration, mut action: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        self.disarm();
        let name = self.name;
        tracing::trace!(timer = name, ?first, ?period, "timer armed");
        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if action().await.is_break() {
                    tracing::trace!(timer = name, "timer finished");
                    break;
                }
            }
        }));
    }

    /// Runs `action` once after `delay`.
    ///
    /// Replaces whatever the timer was doing before.
    pub fn arm_once<F, Fut>(&mut self, delay: Duration, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.disarm();
        tracing::trace!(timer = self.name, ?delay, "one-shot timer armed");
        self.task = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            action().await;
        }));
    }

    /// Stops the timer. Safe to call when not armed.
    pub fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                tracing::trace!(timer = self.name, "timer disarmed");
            }
            task.abort();
        }
    }

    /// Whether an action is still scheduled or running.
    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for RetryTimer {
    fn drop(&mut self) {
        self.disarm();
    }
}
