use std::time::Duration;

use chrono::{DateTime, Utc};
use practice_core::Clock;
use practice_core::model::{TimerIndicator, TimerThreshold, format_stopwatch};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerPillVm {
    /// Elapsed time as `mm:ss`.
    pub elapsed_label: String,
    /// Elapsed time as `mm:ss.cc`.
    pub stopwatch_label: String,
    pub threshold_label: String,
    pub indicator: TimerIndicator,
    pub pulse: bool,
}

#[must_use]
pub fn map_timer_pill(elapsed_millis: u64, threshold: TimerThreshold) -> TimerPillVm {
    TimerPillVm {
        elapsed_label: format_minutes_seconds(elapsed_millis),
        stopwatch_label: format_stopwatch(elapsed_millis),
        threshold_label: threshold.format_mm_ss(),
        indicator: threshold.indicator(elapsed_millis),
        pulse: threshold.pulses(elapsed_millis),
    }
}

fn format_minutes_seconds(millis: u64) -> String {
    let seconds = millis / 1_000;
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn elapsed_since(clock: Clock, anchor: DateTime<Utc>) -> u64 {
    u64::try_from((clock.now() - anchor).num_milliseconds()).unwrap_or(0)
}

/// Publishes the elapsed time since a stopwatch anchor every 100 ms.
///
/// Read-only: it never touches the session. The task is aborted when the
/// ticker is restarted or dropped.
pub struct StopwatchTicker {
    clock: Clock,
    anchor: DateTime<Utc>,
    elapsed: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl StopwatchTicker {
    /// Start ticking from `anchor`. Must be called inside a tokio runtime.
    #[must_use]
    pub fn spawn(clock: Clock, anchor: DateTime<Utc>) -> Self {
        let (elapsed, task) = spawn_ticks(clock, anchor);
        Self {
            clock,
            anchor,
            elapsed,
            task,
        }
    }

    /// Follow a new anchor; a no-op when it did not change.
    pub fn restart(&mut self, anchor: DateTime<Utc>) {
        if anchor == self.anchor && !self.task.is_finished() {
            return;
        }
        self.task.abort();
        let (elapsed, task) = spawn_ticks(self.clock, anchor);
        self.anchor = anchor;
        self.elapsed = elapsed;
        self.task = task;
    }

    /// Latest published elapsed milliseconds.
    #[must_use]
    pub fn elapsed_millis(&self) -> u64 {
        *self.elapsed.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.elapsed.clone()
    }
}

impl Drop for StopwatchTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn spawn_ticks(clock: Clock, anchor: DateTime<Utc>) -> (watch::Receiver<u64>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(elapsed_since(clock, anchor));
    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if tx.send(elapsed_since(clock, anchor)).is_err() {
                break;
            }
        }
    });
    (rx, task)
}
