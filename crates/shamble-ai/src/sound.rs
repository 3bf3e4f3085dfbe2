//! Sound emitters and the scream behavior that spawns them.

use glam::Vec3;

use shamble_core::constants::{SCREAMING_CURVE_THRESHOLD, SOUND_MIN_DECAY};
use shamble_core::enums::ScreamPosition;
use shamble_core::events::AiEvent;

use crate::body::AgentBody;
use crate::mind::AgentMind;
use crate::services::params;

/// A proximity volume announcing "audible here". Its radius eases toward the
/// requested radius: growth is immediate, shrinking takes `decay_secs`.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundEmitter {
    pub position: Vec3,
    radius: f32,
    source_radius: f32,
    target_radius: f32,
    interpolator: f32,
    speed: f32,
}

impl SoundEmitter {
    pub fn new(position: Vec3, decay_secs: f32) -> Self {
        let speed = if decay_secs > SOUND_MIN_DECAY {
            1.0 / decay_secs
        } else {
            0.0
        };
        Self {
            position,
            radius: 0.0,
            source_radius: 0.0,
            target_radius: 0.0,
            interpolator: 0.0,
            speed,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn target_radius(&self) -> f32 {
        self.target_radius
    }

    /// Audible while the radius is non-zero.
    pub fn is_enabled(&self) -> bool {
        self.radius > f32::EPSILON
    }

    /// Start easing toward `radius`. `instant` skips the easing.
    pub fn set_radius(&mut self, radius: f32, instant: bool) {
        if radius == self.target_radius {
            return;
        }
        self.source_radius = if instant || radius > self.radius {
            radius
        } else {
            self.radius
        };
        self.target_radius = radius;
        self.interpolator = 0.0;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.speed > 0.0 {
            self.interpolator = (self.interpolator + dt * self.speed).clamp(0.0, 1.0);
        } else {
            self.interpolator = 1.0;
        }
        self.radius = self.source_radius + (self.target_radius - self.source_radius) * self.interpolator;
    }
}

/// Whether the animator's scream curve says a scream is playing.
pub fn is_screaming(body: &AgentBody) -> bool {
    body.animator
        .as_deref()
        .is_some_and(|animator| animator.get_float(params::SCREAMING) > SCREAMING_CURVE_THRESHOLD)
}

/// Start a scream. Returns `true` if one is playing afterwards.
///
/// A new scream pushes [`AiEvent::Screamed`]; the host spawns the matching
/// [`SoundEmitter`] from it.
pub fn scream(mind: &mut AgentMind, body: &mut AgentBody) -> bool {
    if is_screaming(body) {
        return true;
    }
    let cinematic = mind.cinematic;
    let Some(animator) = body.anim() else {
        return false;
    };
    if cinematic || animator.layer_weight(params::CINEMATIC_LAYER) > 0.5 {
        return false;
    }
    animator.set_trigger(params::SCREAM);

    let position = match mind.characteristics.scream_position {
        ScreamPosition::Entity => body.position,
        ScreamPosition::Threat if !mind.visual_threat.is_none() => mind.visual_threat.position,
        ScreamPosition::Threat => mind.target().position,
    };
    let radius = mind.characteristics.scream_radius;
    tracing::debug!(agent = mind.id.0, ?position, radius, "scream");
    mind.push_event(AiEvent::Screamed {
        agent: mind.id,
        position,
        radius,
    });
    true
}
