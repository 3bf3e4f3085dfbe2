//! Archetype-specific presets.
//!
//! Consolidates per-archetype characteristics and the behavior states each
//! archetype runs.

use shamble_core::components::Characteristics;
use shamble_core::enums::{Archetype, ScreamPosition, StateId};

/// Preset for one archetype.
pub struct AgentProfile {
    pub characteristics: Characteristics,
    /// Behavior states registered at spawn.
    pub states: &'static [StateId],
    /// Visit waypoints in random order.
    pub random_patrol: bool,
}

const ALL_STATES: &[StateId] = &StateId::ALL;

/// Stalkers never stop to eat.
const HUNTER_STATES: &[StateId] = &[
    StateId::Idle,
    StateId::Alerted,
    StateId::Patrol,
    StateId::Pursuit,
    StateId::Attack,
];

/// Get the preset for a given archetype.
pub fn get_profile(archetype: Archetype) -> AgentProfile {
    let base = Characteristics::default();
    match archetype {
        Archetype::Shambler => AgentProfile {
            characteristics: base,
            states: ALL_STATES,
            random_patrol: false,
        },
        Archetype::Stalker => AgentProfile {
            characteristics: Characteristics {
                fov: 90.0,
                sight: 0.9,
                hearing: 0.8,
                aggression: 0.9,
                intelligence: 0.9,
                scream_chance: 0.6,
                scream_position: ScreamPosition::Threat,
                sensor_radius: 15.0,
                ..base
            },
            states: HUNTER_STATES,
            random_patrol: true,
        },
        Archetype::Crawler => AgentProfile {
            characteristics: Characteristics {
                sight: 0.3,
                hearing: 0.6,
                intelligence: 0.2,
                lower_body_damage: base.crawl_threshold,
                max_health: 60,
                health: 60,
                ..base
            },
            states: ALL_STATES,
            random_patrol: false,
        },
        Archetype::Glutton => AgentProfile {
            characteristics: Characteristics {
                satisfaction: 0.5,
                depletion_rate: 0.4,
                replenish_rate: 2.0,
                aggression: 0.2,
                max_health: 150,
                health: 150,
                ..base
            },
            states: ALL_STATES,
            random_patrol: false,
        },
    }
}
