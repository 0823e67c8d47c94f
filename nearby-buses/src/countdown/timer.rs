//! Per-element countdown timers.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::trace;

use crate::view::{Element, Surface};

use super::clock::Clock;
use super::format::{CountdownFloor, Reading};

/// How often a countdown recomputes its text.
pub const TICK: Duration = Duration::from_secs(1);

/// Shared settings for every countdown a panel starts.
#[derive(Clone)]
pub struct CountdownContext {
    pub clock: Arc<dyn Clock>,
    pub floor: CountdownFloor,
}

impl CountdownContext {
    pub fn new(clock: Arc<dyn Clock>, floor: CountdownFloor) -> Self {
        Self { clock, floor }
    }

    /// What a slot targeting `target` shows right now.
    pub fn read(&self, target: DateTime<Utc>) -> Reading {
        Reading::at(target, self.clock.now(), self.floor)
    }
}

/// The live timers of one panel.
///
/// Timers are tokio tasks; dropping or cancelling the set aborts them.
#[derive(Debug, Default)]
pub struct CountdownSet {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl CountdownSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn handles(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.handles.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a timer that keeps `element_id` on `surface` up to date.
    ///
    /// The timer stops by itself once the element is gone from the surface
    /// or the countdown passes the floor.
    pub fn start(
        &self,
        element_id: String,
        target: DateTime<Utc>,
        surface: Surface,
        context: CountdownContext,
    ) {
        let handle = tokio::spawn(run(element_id, target, surface, context));
        let mut handles = self.handles();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Abort every timer in the set.
    pub fn cancel_all(&self) {
        let handles = std::mem::take(&mut *self.handles());
        if !handles.is_empty() {
            trace!(count = handles.len(), "cancelling countdowns");
        }
        for handle in handles {
            handle.abort();
        }
    }

    /// Number of timers still running.
    pub fn live(&self) -> usize {
        self.handles().iter().filter(|h| !h.is_finished()).count()
    }
}

impl Drop for CountdownSet {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

async fn run(element_id: String, target: DateTime<Utc>, surface: Surface, context: CountdownContext) {
    let mut ticker = tokio::time::interval(TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; the element already holds the
    // reading taken at render time.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let reading = context.read(target);
        if !surface.update(&element_id, Element::from(&reading)).await {
            trace!(element = %element_id, "element detached, stopping countdown");
            return;
        }
        if reading == Reading::Expired {
            trace!(element = %element_id, "countdown passed floor");
            return;
        }
    }
}
