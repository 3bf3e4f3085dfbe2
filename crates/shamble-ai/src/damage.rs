//! Damage routing: animated hit reactions versus going limp.

use glam::Vec3;

use shamble_core::components::Characteristics;
use shamble_core::constants::{HEAD_REACTION_ANGLE, UPPER_BODY_REACTION_ANGLE};
use shamble_core::enums::{BodyRegion, BoneControlMode, HitDirection, HitReaction};
use shamble_core::events::AiEvent;
use shamble_core::types::{flatten, signed_angle_about_up, JointId};

use crate::agent::Agent;
use crate::services::params;

/// The ragdoll segment a hit landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyPart {
    pub joint: JointId,
    pub region: BodyRegion,
}

/// One weapon hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    /// World-space hit point.
    pub position: Vec3,
    pub impulse: Vec3,
    pub amount: i32,
    pub body_part: Option<BodyPart>,
    /// Where the attacker stood.
    pub instigator: Option<Vec3>,
    pub direction_hint: HitDirection,
}

impl DamageEvent {
    pub fn new(position: Vec3, impulse: Vec3, amount: i32) -> Self {
        Self {
            position,
            impulse,
            amount,
            body_part: None,
            instigator: None,
            direction_hint: HitDirection::Auto,
        }
    }

    pub fn on(mut self, joint: JointId, region: BodyRegion) -> Self {
        self.body_part = Some(BodyPart { joint, region });
        self
    }

    pub fn from_instigator(mut self, instigator: Vec3) -> Self {
        self.instigator = Some(instigator);
        self
    }

    pub fn with_hint(mut self, hint: HitDirection) -> Self {
        self.direction_hint = hint;
        self
    }
}

/// Apply `amount` to the accumulator for `region`. Negative amounts count as
/// zero so damage never heals.
pub fn route_damage(characteristics: &mut Characteristics, region: BodyRegion, amount: i32) {
    let amount = amount.max(0);
    match region {
        BodyRegion::Head => {
            characteristics.health = characteristics.health.saturating_sub(amount).max(0);
        }
        BodyRegion::UpperBody => {
            characteristics.upper_body_damage = characteristics.upper_body_damage.saturating_add(amount);
        }
        BodyRegion::LowerBody => {
            characteristics.lower_body_damage = characteristics.lower_body_damage.saturating_add(amount);
        }
    }
}

/// Pick the animated reaction for a hit `angle` degrees off the hit vector
/// toward forward. Lower-body hits have no animated reaction.
pub fn hit_reaction(region: BodyRegion, angle: f32, hint: HitDirection) -> Option<HitReaction> {
    let (threshold, left, center, right) = match region {
        BodyRegion::Head => (
            HEAD_REACTION_ANGLE,
            HitReaction::HeadLeft,
            HitReaction::HeadCenter,
            HitReaction::HeadRight,
        ),
        BodyRegion::UpperBody => (
            UPPER_BODY_REACTION_ANGLE,
            HitReaction::UpperLeft,
            HitReaction::UpperCenter,
            HitReaction::UpperRight,
        ),
        BodyRegion::LowerBody => return None,
    };
    let reaction = if angle < -threshold || hint == HitDirection::Left {
        left
    } else if angle > threshold || hint == HitDirection::Right {
        right
    } else {
        center
    };
    Some(reaction)
}

impl Agent {
    /// Apply a weapon hit. Dead agents ignore further damage.
    pub fn take_damage(&mut self, hit: DamageEvent) {
        if self.mind.characteristics.is_dead() {
            return;
        }
        let threshold = self.mind.tuning.ragdoll.impulse_threshold;
        let strong = hit.impulse.length() > threshold;

        if self.ragdoll().mode() == BoneControlMode::Ragdoll {
            if let Some(part) = hit.body_part {
                if strong {
                    if let Some(rig) = self.body.rig.as_deref_mut() {
                        rig.apply_impulse(part.joint, hit.impulse);
                    }
                }
                route_damage(&mut self.mind.characteristics, part.region, hit.amount);
                self.sync_damage_params();
            }
            if self.mind.characteristics.is_dead() {
                self.ragdoll_mut().cancel_reanimation();
                self.announce_death();
            } else {
                let wait = self.mind.tuning.ragdoll.wait_secs;
                self.ragdoll_mut().schedule_reanimation(wait);
            }
            return;
        }

        let forward = self.body.forward();
        let behind = hit
            .instigator
            .is_some_and(|attacker| (attacker - self.body.position).dot(forward) < 0.0);
        let mut should_ragdoll = strong || behind;

        if let Some(part) = hit.body_part {
            route_damage(&mut self.mind.characteristics, part.region, hit.amount);
            self.sync_damage_params();
            match part.region {
                BodyRegion::Head if self.mind.characteristics.is_dead() => should_ragdoll = true,
                BodyRegion::LowerBody => should_ragdoll = true,
                _ => {}
            }
        }

        if self.ragdoll().mode() != BoneControlMode::Animated
            || self.mind.characteristics.is_crawling()
            || self.mind.cinematic
        {
            should_ragdoll = true;
        }

        if !should_ragdoll {
            self.play_hit_reaction(&hit);
            return;
        }

        if self.mind.characteristics.is_dead() {
            self.announce_death();
        }
        let joint = hit.body_part.map(|part| part.joint);
        self.go_limp(hit.impulse, joint);
        if !self.mind.characteristics.is_dead() {
            let wait = self.mind.tuning.ragdoll.wait_secs;
            self.ragdoll_mut().schedule_reanimation(wait);
        }
    }

    /// Restore health to a living agent, up to its maximum.
    pub fn heal(&mut self, amount: i32) {
        let c = &mut self.mind.characteristics;
        if c.is_dead() {
            return;
        }
        c.health = c.health.saturating_add(amount.max(0)).min(c.max_health);
    }

    fn play_hit_reaction(&mut self, hit: &DamageEvent) {
        let Some(part) = hit.body_part else {
            return;
        };
        let angle = if hit.direction_hint == HitDirection::Auto {
            let to_hit = flatten(hit.position - self.body.position);
            signed_angle_about_up(to_hit, self.body.forward())
        } else {
            0.0
        };
        let Some(reaction) = hit_reaction(part.region, angle, hit.direction_hint) else {
            return;
        };
        if let Some(animator) = self.body.anim() {
            animator.set_int(params::HIT_TYPE, reaction as i32);
            animator.set_trigger(params::HIT);
        }
        tracing::debug!(agent = self.mind.id.0, ?reaction, "hit reaction");
        self.mind.push_event(AiEvent::HitReaction {
            agent: self.mind.id,
            reaction,
        });
    }

    fn sync_damage_params(&mut self) {
        let upper = self.mind.characteristics.upper_body_damage;
        let lower = self.mind.characteristics.lower_body_damage;
        if let Some(animator) = self.body.anim() {
            animator.set_int(params::UPPER_BODY_DAMAGE, upper);
            animator.set_int(params::LOWER_BODY_DAMAGE, lower);
        }
    }

    fn announce_death(&mut self) {
        tracing::info!(agent = self.mind.id.0, "died");
        self.mind.push_event(AiEvent::Died { agent: self.mind.id });
    }
}
