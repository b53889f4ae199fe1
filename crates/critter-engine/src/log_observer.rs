//! Observer that reports critter changes through `tracing`.
//!
//! The engine has no UI; this is how a person watching the logs sees the
//! critter fall asleep, get sick, or grow up. Each event is also rendered
//! as a JSON object so a log shipper can pick it up as-is.

use critter_core::CritterObserver;
use critter_core::critter::TickReport;
use critter_types::{CritterEvent, CritterId};
use tracing::{debug, info};

/// Logs every event at `info` and every stat update at `debug`.
pub struct LogObserver {
    id: CritterId,
}

impl LogObserver {
    /// Create an observer labelled with the critter's id.
    pub const fn new(id: CritterId) -> Self {
        Self { id }
    }
}

impl CritterObserver for LogObserver {
    fn on_event(&mut self, event: &CritterEvent) {
        let payload = serde_json::to_string(event).unwrap_or_default();
        info!(critter = %self.id, event = %payload, "Critter event");
    }

    fn on_tick(&mut self, report: &TickReport) {
        let stats = report.stats;
        debug!(
            critter = %self.id,
            behavior = ?report.behavior,
            hunger = stats.hunger,
            happiness = stats.happiness,
            energy = stats.energy,
            health = stats.health,
            cleanliness = stats.cleanliness,
            social = stats.social,
            age_days = report.age,
            "Stats"
        );
    }
}
