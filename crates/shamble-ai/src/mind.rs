//! Per-agent decision data shared by every behavior state.

use std::sync::Arc;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use shamble_core::components::Characteristics;
use shamble_core::config::AiTuning;
use shamble_core::enums::TargetKind;
use shamble_core::events::AiEvent;
use shamble_core::target::Target;
use shamble_core::types::{AgentId, ColliderId, LayerMask};
use shamble_core::waypoint::{WaypointCursor, WaypointNetwork};

/// Proximity volume placed on the committed target. Overlapping it means
/// "close enough" for the current behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetTrigger {
    pub position: Vec3,
    pub radius: f32,
    pub enabled: bool,
}

impl TargetTrigger {
    fn idle(radius: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            radius,
            enabled: false,
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        self.enabled && self.position.distance(point) <= self.radius
    }
}

/// Targets, threat buffers, characteristics and animator intent of one agent.
pub struct AgentMind {
    pub id: AgentId,
    pub characteristics: Characteristics,
    pub tuning: AiTuning,
    /// Best visible candidate this tick.
    pub visual_threat: Target,
    /// Best audible candidate this tick.
    pub audio_threat: Target,
    target: Target,
    target_trigger: TargetTrigger,
    pub is_target_reached: bool,
    pub in_melee_range: bool,
    /// Non-interruptible scripted animation in progress.
    pub cinematic: bool,
    pub waypoints: Option<Arc<WaypointNetwork>>,
    pub waypoint_cursor: WaypointCursor,
    /// Layers considered by line-of-sight to the player.
    pub player_mask: LayerMask,
    /// Layers considered by line-of-sight to everything else, and by floor probes.
    pub visual_mask: LayerMask,
    pub speed: f32,
    pub seeking: i32,
    pub feeding: bool,
    pub attack_type: i32,
    /// Simulation seconds, stamped onto targets.
    pub time: f32,
    pub rng: ChaCha8Rng,
    events: Vec<AiEvent>,
}

impl AgentMind {
    pub fn new(id: AgentId, characteristics: Characteristics, tuning: AiTuning, seed: u64) -> Self {
        let stopping = tuning.stopping_distance.0;
        Self {
            id,
            characteristics,
            tuning,
            visual_threat: Target::NONE,
            audio_threat: Target::NONE,
            target: Target::NONE,
            target_trigger: TargetTrigger::idle(stopping),
            is_target_reached: false,
            in_melee_range: false,
            cinematic: false,
            waypoints: None,
            waypoint_cursor: WaypointCursor::sequential(),
            player_mask: LayerMask::ALL,
            visual_mask: LayerMask::ALL,
            speed: 0.0,
            seeking: 0,
            feeding: false,
            attack_type: 0,
            time: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// The committed target.
    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn target_kind(&self) -> TargetKind {
        self.target.kind
    }

    pub fn target_trigger(&self) -> &TargetTrigger {
        &self.target_trigger
    }

    pub fn sensor_radius(&self) -> f32 {
        self.characteristics.sensor_radius
    }

    /// Commit to a target, placing the target trigger on it with the
    /// machine-wide stopping distance.
    pub fn set_target(
        &mut self,
        kind: TargetKind,
        collider: Option<ColliderId>,
        position: Vec3,
        distance: f32,
    ) {
        let radius = self.tuning.stopping_distance.0;
        self.set_target_with_radius(kind, collider, position, distance, radius);
    }

    pub fn set_target_with_radius(
        &mut self,
        kind: TargetKind,
        collider: Option<ColliderId>,
        position: Vec3,
        distance: f32,
        trigger_radius: f32,
    ) {
        if kind == TargetKind::None {
            self.clear_target();
            return;
        }
        self.target.set(kind, collider, position, distance, self.time);
        self.target_trigger = TargetTrigger {
            position,
            radius: trigger_radius,
            enabled: true,
        };
        tracing::trace!(agent = self.id.0, ?kind, distance, "target committed");
    }

    /// Commit a copy of a perceived threat.
    pub fn commit(&mut self, threat: Target) {
        self.set_target(threat.kind, threat.collider, threat.position, threat.distance);
    }

    pub fn clear_target(&mut self) {
        self.target.clear();
        self.target_trigger = TargetTrigger::idle(self.tuning.stopping_distance.0);
    }

    /// Re-measure the committed target from `position`.
    pub fn refresh_target_distance(&mut self, position: Vec3) {
        if !self.target.is_none() {
            self.target.distance = position.distance(self.target.position);
        }
    }

    /// Resolve the current patrol waypoint (advancing when `increment` is
    /// set) and commit to it. `None` without a usable waypoint network.
    pub fn waypoint_position(&mut self, increment: bool, from: Vec3) -> Option<Vec3> {
        let network = self.waypoints.clone()?;
        let rng = &mut self.rng;
        let index = self
            .waypoint_cursor
            .resolve(network.len(), increment, |n| rng.gen_range(0..n))?;
        let position = network.position(index)?;
        self.set_target(TargetKind::Waypoint, None, position, position.distance(from));
        Some(position)
    }

    pub fn push_event(&mut self, event: AiEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = AiEvent> + '_ {
        self.events.drain(..)
    }
}
