//! Change notifications emitted by the simulation.
//!
//! Rendering, animation, and tray layers subscribe to these. The simulation
//! never reads them back, so dropping every notification is harmless to
//! its correctness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{GrowthStage, WakeReason};
use crate::ids::WasteEventId;

/// A state change worth telling observers about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type")]
#[ts(export, export_to = "bindings/")]
pub enum CritterEvent {
    /// The sickness classification flipped.
    SicknessChanged {
        /// The new classification.
        is_sick: bool,
    },
    /// The growth stage changed.
    StageChanged {
        /// Stage before the transition.
        from: GrowthStage,
        /// Stage after the transition.
        to: GrowthStage,
    },
    /// A waste event was generated.
    WasteCreated {
        /// The new event's identifier.
        id: WasteEventId,
        /// When it was generated.
        at: DateTime<Utc>,
    },
    /// A waste event was cleaned up.
    WasteRemoved {
        /// The removed event's identifier.
        id: WasteEventId,
    },
    /// The critter fell asleep.
    SleepStarted {
        /// Expected sleep length in minutes.
        duration_minutes: f64,
    },
    /// The critter woke up.
    SleepEnded {
        /// Why sleep ended.
        reason: WakeReason,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = CritterEvent::StageChanged {
            from: GrowthStage::Baby,
            to: GrowthStage::Child,
        };
        let json = serde_json::to_value(event).unwrap_or_default();
        assert_eq!(json["type"], "StageChanged");
        assert_eq!(json["from"], "Baby");
        assert_eq!(json["to"], "Child");
    }
}
