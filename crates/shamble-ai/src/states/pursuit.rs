use shamble_core::enums::{PathStatus, StateId, TargetKind};
use shamble_core::target::Target;

use super::{face, follow_desired_velocity, reset_intent, BehaviorState};
use crate::fsm::StateContext;

/// Chases the committed target along the navigation path.
#[derive(Debug, Clone, Default)]
pub struct PursuitState {
    elapsed: f32,
    repath_timer: f32,
}

/// Which repath cadence limits apply.
#[derive(Clone, Copy)]
enum Cadence {
    Visual,
    Audio,
}

impl PursuitState {
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Re-issue the destination when the threat moved and the
    /// distance-scaled cooldown has passed. Farther threats repath less often.
    fn repath(&mut self, cx: &mut StateContext<'_>, threat: &Target, cadence: Cadence) {
        if cx.mind.target().position == threat.position {
            return;
        }
        let tuning = &cx.mind.tuning.pursuit;
        let (min, max) = match cadence {
            Cadence::Visual => (tuning.repath_visual_min, tuning.repath_visual_max),
            Cadence::Audio => (tuning.repath_audio_min, tuning.repath_audio_max),
        };
        let interval = (threat.distance * tuning.repath_distance_multiplier).clamp(min, max);
        if interval < self.repath_timer {
            if let Some(nav) = cx.body.nav() {
                nav.set_destination(threat.position);
            }
            self.repath_timer = 0.0;
        }
    }
}

impl BehaviorState for PursuitState {
    fn state_id(&self) -> StateId {
        StateId::Pursuit
    }

    fn on_enter(&mut self, cx: &mut StateContext<'_>) {
        reset_intent(cx);
        cx.mind.speed = cx.mind.tuning.pursuit.speed;
        cx.body.nav_rotation_control(false);
        let destination = cx.mind.target().position;
        cx.body.go_to(destination);
        self.elapsed = 0.0;
        self.repath_timer = 0.0;
    }

    fn on_update(&mut self, cx: &mut StateContext<'_>) -> StateId {
        self.elapsed += cx.dt;
        self.repath_timer += cx.dt;

        if self.elapsed > cx.mind.tuning.pursuit.max_duration {
            return StateId::Patrol;
        }

        let target = *cx.mind.target();
        if target.is(TargetKind::VisualPlayer) && cx.mind.in_melee_range {
            return StateId::Attack;
        }

        if cx.mind.is_target_reached {
            match target.kind {
                TargetKind::Audio | TargetKind::VisualLight => {
                    cx.mind.clear_target();
                    return StateId::Alerted;
                }
                TargetKind::VisualFood => return StateId::Feeding,
                _ => {}
            }
        }

        let path = cx.body.nav().map(|nav| {
            let lost = nav.is_path_stale()
                || (!nav.has_path() && !nav.path_pending())
                || nav.path_status() != PathStatus::Complete;
            (lost, nav.path_pending())
        });
        if let Some((lost, pending)) = path {
            if lost {
                return StateId::Alerted;
            }
            if pending {
                cx.mind.speed = 0.0;
            } else {
                cx.mind.speed = cx.mind.tuning.pursuit.speed;
                let root_rotation = cx.body.uses_root_rotation();
                let reached = cx.mind.is_target_reached;
                if !root_rotation
                    && target.is(TargetKind::VisualPlayer)
                    && cx.mind.visual_threat.is(TargetKind::VisualPlayer)
                    && reached
                {
                    face(cx.body, target.position - cx.body.position);
                } else if !root_rotation && !reached {
                    let t = cx.dt * cx.mind.tuning.pursuit.slerp_speed;
                    follow_desired_velocity(cx.body, t);
                } else if reached {
                    return StateId::Alerted;
                }
            }
        }

        let visual = cx.mind.visual_threat;
        let audio = cx.mind.audio_threat;

        if visual.is(TargetKind::VisualPlayer) {
            self.repath(cx, &visual, Cadence::Visual);
            cx.mind.commit(visual);
            return StateId::Pursuit;
        }

        // Keep heading for the last known player position.
        if target.is(TargetKind::VisualPlayer) {
            return StateId::Pursuit;
        }

        if visual.is(TargetKind::VisualLight) {
            match target.kind {
                TargetKind::Audio | TargetKind::VisualFood => {
                    cx.mind.commit(visual);
                    return StateId::Alerted;
                }
                TargetKind::VisualLight if target.same_source(&visual) => {
                    self.repath(cx, &visual, Cadence::Visual);
                    cx.mind.commit(visual);
                    return StateId::Pursuit;
                }
                TargetKind::VisualLight => {
                    cx.mind.commit(visual);
                    return StateId::Alerted;
                }
                _ => {}
            }
        } else if audio.is(TargetKind::Audio) {
            match target.kind {
                TargetKind::VisualFood => {
                    cx.mind.commit(audio);
                    return StateId::Alerted;
                }
                TargetKind::Audio if target.same_source(&audio) => {
                    self.repath(cx, &audio, Cadence::Audio);
                    cx.mind.commit(audio);
                    return StateId::Pursuit;
                }
                TargetKind::Audio => {
                    cx.mind.commit(audio);
                    return StateId::Alerted;
                }
                _ => {}
            }
        }

        StateId::Pursuit
    }
}
