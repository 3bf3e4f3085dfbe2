use glam::Vec3;
use rand::Rng;

use shamble_core::constants::ATTACK_VARIANT_LIMIT;
use shamble_core::enums::{StateId, TargetKind};
use shamble_core::types::{angle_between, flatten};

use super::{face, turn_toward, BehaviorState};
use crate::fsm::StateContext;

/// Melee combat against a visible player.
#[derive(Debug, Clone, Default)]
pub struct AttackState {
    look_at_weight: f32,
}

impl AttackState {
    pub fn look_at_weight(&self) -> f32 {
        self.look_at_weight
    }
}

fn roll_attack(cx: &mut StateContext<'_>) {
    cx.mind.attack_type = cx.mind.rng.gen_range(1..ATTACK_VARIANT_LIMIT);
}

impl BehaviorState for AttackState {
    fn state_id(&self) -> StateId {
        StateId::Attack
    }

    fn on_enter(&mut self, cx: &mut StateContext<'_>) {
        cx.mind.seeking = 0;
        cx.mind.feeding = false;
        cx.mind.speed = cx.mind.tuning.attack.speed;
        cx.body.nav_rotation_control(false);
        roll_attack(cx);
        self.look_at_weight = 0.0;
    }

    fn on_exit(&mut self, cx: &mut StateContext<'_>) {
        cx.mind.attack_type = 0;
    }

    fn on_update(&mut self, cx: &mut StateContext<'_>) -> StateId {
        let tuning = &cx.mind.tuning.attack;
        let to_target = cx.mind.target().position - cx.body.position;
        cx.mind.speed = if to_target.length() < tuning.stopping_distance {
            0.0
        } else {
            tuning.speed
        };

        let visual = cx.mind.visual_threat;
        if visual.is(TargetKind::VisualPlayer) {
            cx.mind.commit(visual);
            if !cx.mind.in_melee_range {
                return StateId::Pursuit;
            }
            if !cx.body.uses_root_rotation() {
                let t = cx.dt * cx.mind.tuning.attack.slerp_speed;
                let to_target = flatten(cx.mind.target().position - cx.body.position);
                turn_toward(cx.body, to_target, t);
            }
            roll_attack(cx);
            return StateId::Attack;
        }

        // Lost sight: face the last known position once, then search.
        if !cx.body.uses_root_rotation() {
            face(cx.body, flatten(to_target));
        }
        StateId::Alerted
    }

    fn on_animator_ik(&mut self, cx: &mut StateContext<'_>) {
        let tuning = &cx.mind.tuning.attack;
        let target = cx.mind.target().position;
        let to_target = target - cx.body.position;
        let within = angle_between(cx.body.forward(), to_target) < tuning.look_at_angle_threshold;
        let goal = if within { tuning.look_at_weight } else { 0.0 };
        let t = cx.dt.clamp(0.0, 1.0);
        self.look_at_weight += (goal - self.look_at_weight) * t;

        let weight = self.look_at_weight;
        if let Some(animator) = cx.body.anim() {
            animator.set_look_at(target + Vec3::Y, weight);
        }
    }
}
