use shamble_core::enums::{PathStatus, StateId, TargetKind};
use shamble_core::types::angle_between;

use super::{follow_desired_velocity, reset_intent, BehaviorState};
use crate::fsm::StateContext;

/// Walks the waypoint network.
#[derive(Debug, Clone, Default)]
pub struct PatrolState;

/// Commit to the next waypoint and head for it.
fn next_waypoint(cx: &mut StateContext<'_>) {
    if let Some(destination) = cx.mind.waypoint_position(true, cx.body.position) {
        cx.body.go_to(destination);
    }
}

impl BehaviorState for PatrolState {
    fn state_id(&self) -> StateId {
        StateId::Patrol
    }

    fn on_enter(&mut self, cx: &mut StateContext<'_>) {
        reset_intent(cx);
        cx.body.nav_rotation_control(false);
        next_waypoint(cx);
    }

    fn on_update(&mut self, cx: &mut StateContext<'_>) -> StateId {
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

        // Hungrier agents notice food from further away.
        if visual.is(TargetKind::VisualFood) {
            let hunger = 1.0 - cx.mind.characteristics.satisfaction;
            if hunger > visual.distance / cx.mind.sensor_radius() {
                cx.mind.commit(visual);
                return StateId::Pursuit;
            }
        }

        let Some(nav) = cx.body.nav() else {
            return StateId::Patrol;
        };
        if nav.path_pending() {
            cx.mind.speed = 0.0;
            return StateId::Patrol;
        }
        cx.mind.speed = cx.mind.tuning.patrol.speed;
        let steering = nav.steering_target();
        let needs_new_path =
            nav.is_path_stale() || !nav.has_path() || nav.path_status() != PathStatus::Complete;

        let to_steering = steering - cx.body.position;
        if angle_between(cx.body.forward(), to_steering) > cx.mind.tuning.patrol.turn_on_spot_threshold {
            return StateId::Alerted;
        }

        if !cx.body.uses_root_rotation() {
            let t = cx.dt * cx.mind.tuning.patrol.slerp_speed;
            follow_desired_velocity(cx.body, t);
        }

        if needs_new_path {
            next_waypoint(cx);
        }
        StateId::Patrol
    }

    fn on_destination_reached(&mut self, cx: &mut StateContext<'_>, reached: bool) {
        if reached && cx.mind.target_kind() == TargetKind::Waypoint {
            next_waypoint(cx);
        }
    }
}
