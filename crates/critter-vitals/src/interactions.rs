//! Caller interactions: feed, play, clean, give medicine, pet.
//!
//! Each interaction is a fixed batch of stat deltas from
//! [`InteractionConfig`], applied through the ledger so every change is
//! clamped. Two interactions also touch elimination: feeding adds a food
//! unit of pressure, cleaning removes every active waste event.
//!
//! A sleeping critter is woken by anything except medicine.

use critter_types::{Interaction, Stat, StatBlock, WasteEvent};

use crate::config::{InteractionConfig, StatDeltas, VitalsConfig};
use crate::elimination::EliminationPressure;
use crate::ledger::StatLedger;

/// Food units registered by one feeding.
pub const FOOD_UNITS_PER_FEED: u32 = 1;

/// What an interaction did.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionOutcome {
    /// The interaction performed.
    pub interaction: Interaction,
    /// Stat values after the interaction.
    pub stats: StatBlock,
    /// Whether the interaction woke the critter.
    pub woke: bool,
    /// Waste events removed (cleaning only).
    pub removed_events: Vec<WasteEvent>,
}

/// The configured delta batch for an interaction.
pub const fn deltas_for(interaction: Interaction, config: &InteractionConfig) -> &StatDeltas {
    match interaction {
        Interaction::Feed => &config.feed,
        Interaction::Play => &config.play,
        Interaction::Clean => &config.clean,
        Interaction::GiveMedicine => &config.give_medicine,
        Interaction::Pet => &config.pet,
    }
}

/// Whether the interaction disturbs a sleeping critter.
pub const fn wakes_critter(interaction: Interaction) -> bool {
    !matches!(interaction, Interaction::GiveMedicine)
}

/// Apply `interaction` to the ledger and elimination state.
pub fn perform(
    interaction: Interaction,
    ledger: &mut StatLedger,
    elimination: &mut EliminationPressure,
    config: &VitalsConfig,
) -> InteractionOutcome {
    let woke = wakes_critter(interaction) && ledger.force_wake();

    let deltas = deltas_for(interaction, &config.interactions);
    for stat in Stat::ALL {
        ledger.apply(stat, deltas.get(stat));
    }

    let removed_events = match interaction {
        Interaction::Feed => {
            elimination.add_food_consumed(FOOD_UNITS_PER_FEED, &config.elimination);
            Vec::new()
        }
        Interaction::Clean => elimination.clear_events(),
        Interaction::Play | Interaction::GiveMedicine | Interaction::Pet => Vec::new(),
    };

    InteractionOutcome {
        interaction,
        stats: ledger.stats(),
        woke,
        removed_events,
    }
}
