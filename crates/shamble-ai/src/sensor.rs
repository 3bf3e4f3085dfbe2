//! Perception: turns sensor-volume overlaps into threat buffer updates.
//!
//! The host reports every stimulus overlapping an agent's sensor volume.
//! Candidates only ever replace a buffered threat when they outrank it or are
//! closer than it, so the order in which the host reports overlaps within a
//! tick does not change the outcome.

use glam::Vec3;

use shamble_core::constants::FOOD_INTEREST_THRESHOLD;
use shamble_core::enums::{TargetKind, TriggerPhase};
use shamble_core::types::{angle_between, ColliderId, LayerMask};

use crate::body::AgentBody;
use crate::fsm::StateContext;
use crate::mind::AgentMind;
use crate::services::PhysicsQuery;

/// What kind of thing entered the sensor volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StimulusSource {
    Player,
    /// A flashlight beam whose volume reaches `range` meters.
    Flashlight { range: f32 },
    /// A sound emitter's sphere.
    SoundEmitter { radius: f32 },
    Food,
}

/// One overlapping trigger volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stimulus {
    pub collider: ColliderId,
    pub position: Vec3,
    pub source: StimulusSource,
}

/// Update the threat buffers from a sensor event. Exit events are ignored.
pub fn evaluate(cx: &mut StateContext<'_>, phase: TriggerPhase, stimulus: &Stimulus) {
    if phase == TriggerPhase::Exit {
        return;
    }

    let origin = cx.body.sensor_origin();
    let distance = origin.distance(stimulus.position);
    let current = cx.mind.visual_threat.kind;
    let time = cx.mind.time;

    match stimulus.source {
        StimulusSource::Player => {
            if current == TargetKind::VisualPlayer && distance >= cx.mind.visual_threat.distance {
                return;
            }
            let mask = cx.mind.player_mask;
            if collider_is_visible(cx.body, cx.mind, cx.physics, stimulus, mask) {
                cx.mind.visual_threat.set(
                    TargetKind::VisualPlayer,
                    Some(stimulus.collider),
                    stimulus.position,
                    distance,
                    time,
                );
                tracing::trace!(agent = cx.mind.id.0, distance, "player sighted");
            }
        }
        StimulusSource::Flashlight { range } => {
            if current == TargetKind::VisualPlayer || range <= 0.0 {
                return;
            }
            if current == TargetKind::VisualLight && distance >= cx.mind.visual_threat.distance {
                return;
            }
            let aggravation = distance / range;
            let c = &cx.mind.characteristics;
            if aggravation <= c.sight && aggravation <= c.intelligence {
                cx.mind.visual_threat.set(
                    TargetKind::VisualLight,
                    Some(stimulus.collider),
                    stimulus.position,
                    distance,
                    time,
                );
            }
        }
        StimulusSource::SoundEmitter { radius } => {
            if radius <= f32::EPSILON {
                return;
            }
            let mut factor = distance / radius;
            factor += factor * (1.0 - cx.mind.characteristics.hearing);
            if factor > 1.0 {
                tracing::trace!(agent = cx.mind.id.0, factor, "sound too faint");
                return;
            }
            if distance < cx.mind.audio_threat.effective_distance() {
                cx.mind.audio_threat.set(
                    TargetKind::Audio,
                    Some(stimulus.collider),
                    stimulus.position,
                    distance,
                    time,
                );
            }
        }
        StimulusSource::Food => {
            if matches!(current, TargetKind::VisualPlayer | TargetKind::VisualLight)
                || cx.mind.characteristics.satisfaction > FOOD_INTEREST_THRESHOLD
                || !cx.mind.audio_threat.is_none()
            {
                return;
            }
            if distance >= cx.mind.visual_threat.effective_distance() {
                return;
            }
            let mask = cx.mind.visual_mask;
            if collider_is_visible(cx.body, cx.mind, cx.physics, stimulus, mask) {
                cx.mind.visual_threat.set(
                    TargetKind::VisualFood,
                    Some(stimulus.collider),
                    stimulus.position,
                    distance,
                    time,
                );
            }
        }
    }
}

/// Field-of-view and line-of-sight test from the agent's sensor origin.
///
/// The nearest ray hit that does not belong to the agent's own body must be
/// the stimulus itself. No physics service, or no hits, means not visible.
pub fn collider_is_visible(
    body: &AgentBody,
    mind: &AgentMind,
    physics: Option<&dyn PhysicsQuery>,
    stimulus: &Stimulus,
    mask: LayerMask,
) -> bool {
    let Some(physics) = physics else {
        return false;
    };

    let origin = body.sensor_origin();
    let direction = stimulus.position - origin;
    if angle_between(direction, body.forward()) > mind.characteristics.fov * 0.5 {
        return false;
    }

    let max_distance = mind.sensor_radius() * mind.characteristics.sight;
    let hits = physics.raycast_all(origin, direction.normalize_or_zero(), max_distance, mask);
    hits.iter()
        .filter(|hit| physics.owner_of(hit.collider) != Some(mind.id))
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
        .is_some_and(|hit| hit.collider == stimulus.collider)
}
