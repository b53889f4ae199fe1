//! Observers of critter state changes.
//!
//! Rendering, animation, tray icons, and logging subscribe through
//! [`CritterObserver`]. Every operation on a
//! [`Critter`](crate::critter::Critter) also returns the events it emitted,
//! so observers are a convenience: the simulation never depends on them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use critter_types::CritterEvent;

use crate::critter::TickReport;

/// Callback invoked when a critter changes.
pub trait CritterObserver: Send {
    /// Called for each event, in the order it happened.
    fn on_event(&mut self, event: &CritterEvent);

    /// Called after every stat update.
    fn on_tick(&mut self, _report: &TickReport) {}
}

/// An observer that records events into a shared log and counts stat
/// updates.
///
/// Clones share the same log, so one clone can be registered with a
/// critter while another is read.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<CritterEvent>>>,
    ticks: Arc<AtomicU64>,
}

impl EventLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event recorded so far.
    pub fn events(&self) -> Vec<CritterEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Number of tick reports delivered so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Remove and return every recorded event.
    pub fn drain(&self) -> Vec<CritterEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl CritterObserver for EventLog {
    fn on_event(&mut self, event: &CritterEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(*event);
        }
    }

    fn on_tick(&mut self, _report: &TickReport) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }
}
