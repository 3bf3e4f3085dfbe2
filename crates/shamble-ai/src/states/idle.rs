use rand::Rng;

use shamble_core::enums::{StateId, TargetKind};

use super::{reset_intent, BehaviorState};
use crate::fsm::StateContext;

/// Stands still for a random duration, then patrols.
#[derive(Debug, Clone, Default)]
pub struct IdleState {
    remaining: f32,
}

impl IdleState {
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl BehaviorState for IdleState {
    fn state_id(&self) -> StateId {
        StateId::Idle
    }

    fn on_enter(&mut self, cx: &mut StateContext<'_>) {
        let tuning = &cx.mind.tuning.idle;
        let (min, max) = (tuning.min_secs, tuning.max_secs);
        self.remaining = if max > min {
            cx.mind.rng.gen_range(min..=max)
        } else {
            min
        };

        reset_intent(cx);
        cx.mind.speed = 0.0;
        cx.mind.clear_target();
        cx.body.nav_rotation_control(false);
        if let Some(nav) = cx.body.nav() {
            nav.set_stopped(true);
        }
    }

    fn on_update(&mut self, cx: &mut StateContext<'_>) -> StateId {
        self.remaining -= cx.dt;

        let visual = cx.mind.visual_threat;
        match visual.kind {
            TargetKind::VisualPlayer => {
                cx.mind.commit(visual);
                return StateId::Pursuit;
            }
            TargetKind::VisualLight => {
                cx.mind.commit(visual);
                return StateId::Alerted;
            }
            _ => {}
        }

        let audio = cx.mind.audio_threat;
        if audio.is(TargetKind::Audio) {
            cx.mind.commit(audio);
            return StateId::Alerted;
        }

        if visual.is(TargetKind::VisualFood) {
            cx.mind.commit(visual);
            return StateId::Pursuit;
        }

        if self.remaining <= 0.0 {
            return StateId::Patrol;
        }
        StateId::Idle
    }
}
