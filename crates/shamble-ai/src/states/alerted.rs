use glam::Quat;
use rand::Rng;

use shamble_core::enums::{StateId, TargetKind};
use shamble_core::types::signed_angle_about_up;

use super::{reset_intent, sign, BehaviorState};
use crate::fsm::StateContext;
use crate::sound;

/// Stands and scans for the source of a disturbance.
#[derive(Debug, Clone, Default)]
pub struct AlertedState {
    /// Counts down from the configured max duration.
    timer: f32,
    direction_change_timer: f32,
    /// Positive while this visit may still scream on sighting the player.
    scream_roll: f32,
}

impl AlertedState {
    pub fn timer(&self) -> f32 {
        self.timer
    }

    fn direction_change_due(&self, cx: &StateContext<'_>) -> bool {
        self.direction_change_timer > cx.mind.tuning.alerted.direction_change_time
    }

    fn change_direction(&mut self, cx: &mut StateContext<'_>, seeking: i32) {
        cx.mind.seeking = seeking;
        self.direction_change_timer = 0.0;
    }
}

impl BehaviorState for AlertedState {
    fn state_id(&self) -> StateId {
        StateId::Alerted
    }

    fn on_enter(&mut self, cx: &mut StateContext<'_>) {
        reset_intent(cx);
        cx.mind.speed = 0.0;
        cx.body.nav_rotation_control(false);
        self.timer = cx.mind.tuning.alerted.max_duration;
        self.direction_change_timer = 0.0;
        let roll: f32 = cx.mind.rng.gen();
        self.scream_roll = cx.mind.characteristics.scream_chance - roll;
    }

    fn on_update(&mut self, cx: &mut StateContext<'_>) -> StateId {
        let tuning = cx.mind.tuning.alerted.clone();
        self.timer -= cx.dt;
        self.direction_change_timer += cx.dt;

        if self.timer <= 0.0 {
            if let Some(destination) = cx.mind.waypoint_position(false, cx.body.position) {
                cx.body.go_to(destination);
            }
            self.timer = tuning.max_duration;
        }

        let visual = cx.mind.visual_threat;
        let audio = cx.mind.audio_threat;
        if visual.is(TargetKind::VisualPlayer) {
            cx.mind.commit(visual);
            if self.scream_roll > 0.0 {
                self.scream_roll = f32::NEG_INFINITY;
                if sound::scream(cx.mind, cx.body) {
                    return StateId::Alerted;
                }
            }
            return StateId::Pursuit;
        }
        if visual.is(TargetKind::VisualLight) {
            cx.mind.commit(visual);
            self.timer = tuning.max_duration;
        } else if audio.is(TargetKind::Audio) {
            cx.mind.commit(audio);
            self.timer = tuning.max_duration;
        }

        if audio.is_none() && visual.is(TargetKind::VisualFood) && cx.mind.target().is_none() {
            cx.mind.commit(visual);
            return StateId::Pursuit;
        }

        let target = *cx.mind.target();
        let searching = matches!(target.kind, TargetKind::Audio | TargetKind::VisualLight);
        let steering = cx
            .body
            .nav()
            .filter(|nav| !nav.path_pending())
            .map(|nav| nav.steering_target());

        if searching && !cx.mind.is_target_reached {
            let angle = signed_angle_about_up(cx.body.forward(), target.position - cx.body.position);
            if target.is(TargetKind::Audio) && angle.abs() < tuning.threat_angle_threshold {
                return StateId::Pursuit;
            }
            if self.direction_change_due(cx) {
                // Smarter agents more often turn the right way.
                let roll: f32 = cx.mind.rng.gen();
                let seeking = if roll < cx.mind.characteristics.intelligence {
                    sign(angle)
                } else {
                    sign(cx.mind.rng.gen_range(-1.0..1.0))
                };
                self.change_direction(cx, seeking);
            }
        } else if let (TargetKind::Waypoint, Some(steering)) = (target.kind, steering) {
            let angle = signed_angle_about_up(cx.body.forward(), steering - cx.body.position);
            // Never hand back a heading Patrol would immediately reject.
            let resume_angle = tuning
                .waypoint_angle_threshold
                .min(cx.mind.tuning.patrol.turn_on_spot_threshold);
            if angle.abs() < resume_angle {
                return StateId::Patrol;
            }
            if self.direction_change_due(cx) {
                self.change_direction(cx, sign(angle));
            }
        } else if self.direction_change_due(cx) {
            let seeking = sign(cx.mind.rng.gen_range(-1.0..1.0));
            self.change_direction(cx, seeking);
        }

        if !cx.body.uses_root_rotation() {
            let degrees = tuning.turn_speed * cx.mind.seeking as f32 * cx.dt;
            cx.body.rotation = (Quat::from_rotation_y(degrees.to_radians()) * cx.body.rotation).normalize();
        }
        StateId::Alerted
    }
}
