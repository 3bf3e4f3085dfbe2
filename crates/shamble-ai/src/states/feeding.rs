use shamble_core::enums::{StateId, TargetKind};
use shamble_core::types::flatten;

use super::{turn_toward, BehaviorState};
use crate::fsm::StateContext;

/// Eats until satisfied, dropping the meal for any other threat.
#[derive(Debug, Clone, Default)]
pub struct FeedingState;

impl BehaviorState for FeedingState {
    fn state_id(&self) -> StateId {
        StateId::Feeding
    }

    fn on_enter(&mut self, cx: &mut StateContext<'_>) {
        cx.mind.feeding = true;
        cx.mind.seeking = 0;
        cx.mind.speed = 0.0;
        cx.mind.attack_type = 0;
        cx.body.nav_rotation_control(false);
    }

    fn on_exit(&mut self, cx: &mut StateContext<'_>) {
        cx.mind.feeding = false;
    }

    fn on_update(&mut self, cx: &mut StateContext<'_>) -> StateId {
        let visual = cx.mind.visual_threat;
        if !visual.is_none() && !visual.is(TargetKind::VisualFood) {
            cx.mind.commit(visual);
            return StateId::Alerted;
        }
        let audio = cx.mind.audio_threat;
        if audio.is(TargetKind::Audio) {
            cx.mind.commit(audio);
            return StateId::Alerted;
        }

        let tuning = &cx.mind.tuning.feeding;
        let eating = cx
            .body
            .animator
            .as_deref()
            .is_some_and(|animator| animator.is_state_active(&tuning.layer, &tuning.state));
        if eating {
            let c = &mut cx.mind.characteristics;
            c.satisfaction = (c.satisfaction + cx.dt * c.replenish_rate / 100.0).min(1.0);
        }

        if cx.mind.characteristics.satisfaction >= cx.mind.tuning.feeding.satisfied_threshold {
            cx.mind.waypoint_position(false, cx.body.position);
            return StateId::Alerted;
        }

        if !cx.body.uses_root_rotation() {
            let t = cx.dt * cx.mind.tuning.feeding.slerp_speed;
            let to_food = flatten(cx.mind.target().position - cx.body.position);
            turn_toward(cx.body, to_food, t);
        }
        StateId::Feeding
    }
}
