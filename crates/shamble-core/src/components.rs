//! Per-agent plain data carried by the AI core.
//!
//! These structs hold tunable scalars and accumulators only. Behavior lives
//! in `shamble-ai`.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{BoneAlignment, ScreamPosition};

/// Tunable perception, temperament and health scalars of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Characteristics {
    /// Full field-of-view angle in degrees. Half of it is used per side.
    pub fov: f32,
    /// 0..1, attenuates the effective line-of-sight range.
    pub sight: f32,
    /// 0..1, attenuates how far away sounds are heard.
    pub hearing: f32,
    pub aggression: f32,
    /// 0..1, probability of turning the analytically correct way when searching.
    pub intelligence: f32,
    /// 0..1 hunger gauge. 1 is fully fed.
    pub satisfaction: f32,
    pub replenish_rate: f32,
    pub depletion_rate: f32,
    pub scream_chance: f32,
    pub scream_radius: f32,
    pub scream_position: ScreamPosition,
    pub sensor_radius: f32,
    pub melee_radius: f32,
    pub health: i32,
    pub max_health: i32,
    pub upper_body_damage: i32,
    pub lower_body_damage: i32,
    pub upper_body_threshold: i32,
    pub limp_threshold: i32,
    pub crawl_threshold: i32,
    pub root_bone_alignment: BoneAlignment,
}

impl Default for Characteristics {
    fn default() -> Self {
        Self {
            fov: DEFAULT_FOV,
            sight: 0.5,
            hearing: 1.0,
            aggression: 0.5,
            intelligence: 0.5,
            satisfaction: 1.0,
            replenish_rate: DEFAULT_REPLENISH_RATE,
            depletion_rate: DEFAULT_DEPLETION_RATE,
            scream_chance: 0.0,
            scream_radius: DEFAULT_SCREAM_RADIUS,
            scream_position: ScreamPosition::Entity,
            sensor_radius: SENSOR_RADIUS,
            melee_radius: MELEE_RADIUS,
            health: DEFAULT_HEALTH,
            max_health: DEFAULT_HEALTH,
            upper_body_damage: 0,
            lower_body_damage: 0,
            upper_body_threshold: DEFAULT_UPPER_BODY_THRESHOLD,
            limp_threshold: DEFAULT_LIMP_THRESHOLD,
            crawl_threshold: DEFAULT_CRAWL_THRESHOLD,
            root_bone_alignment: BoneAlignment::ZAxis,
        }
    }
}

impl Characteristics {
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn is_crawling(&self) -> bool {
        self.lower_body_damage >= self.crawl_threshold
    }

    pub fn is_limping(&self) -> bool {
        self.lower_body_damage > self.limp_threshold && !self.is_crawling()
    }

    pub fn upper_body_hurt(&self) -> bool {
        self.upper_body_damage > self.upper_body_threshold
    }
}
