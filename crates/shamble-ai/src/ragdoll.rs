//! Bone-control hand-over between animation and ragdoll physics.
//!
//! Going limp gives the skeleton to physics. After a countdown the current
//! physics pose is snapshotted and the stand-up animation is blended in from
//! it: first the body root is moved under the ragdoll and turned to match
//! it, then every joint eases from its snapshot to the animated pose.

use glam::{Quat, Vec3};

use shamble_core::constants::{FLOOR_PROBE_LIFT, NAVMESH_SNAP_DISTANCE};
use shamble_core::enums::{BoneAlignment, BoneControlMode, ReanimateFrom};
use shamble_core::events::AiEvent;
use shamble_core::types::{flatten, JointId};

use crate::fsm::StateContext;
use crate::services::{params, HumanBone, Rig};

/// Pose of one joint captured when reanimation begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointSnapshot {
    pub joint: JointId,
    pub position: Vec3,
    pub rotation: Quat,
    pub local_rotation: Quat,
}

#[derive(Debug, Clone, Default)]
pub struct RagdollController {
    mode: BoneControlMode,
    /// Seconds until reanimation starts. Restarted, never stacked.
    reanimation_in: Option<f32>,
    /// Seconds since reanimation started.
    blend_elapsed: f32,
    snapshots: Vec<JointSnapshot>,
    hip: Vec3,
    head: Vec3,
    feet: Vec3,
}

fn alignment_axis(alignment: BoneAlignment) -> Vec3 {
    match alignment {
        BoneAlignment::XAxis => Vec3::X,
        BoneAlignment::XAxisInverted => -Vec3::X,
        BoneAlignment::YAxis => Vec3::Y,
        BoneAlignment::YAxisInverted => -Vec3::Y,
        BoneAlignment::ZAxis => Vec3::Z,
        BoneAlignment::ZAxisInverted => -Vec3::Z,
    }
}

/// Head and feet-midpoint positions of the rig's current pose.
fn head_and_feet(rig: &dyn Rig, fallback: Vec3) -> (Vec3, Vec3) {
    let head = rig.bone_position(HumanBone::Head).unwrap_or(fallback);
    let feet = match (
        rig.bone_position(HumanBone::LeftFoot),
        rig.bone_position(HumanBone::RightFoot),
    ) {
        (Some(left), Some(right)) => (left + right) * 0.5,
        (Some(foot), None) | (None, Some(foot)) => foot,
        (None, None) => fallback,
    };
    (head, feet)
}

impl RagdollController {
    pub fn mode(&self) -> BoneControlMode {
        self.mode
    }

    /// Seconds left before reanimation, if one is scheduled.
    pub fn reanimation_in(&self) -> Option<f32> {
        self.reanimation_in
    }

    pub fn snapshots(&self) -> &[JointSnapshot] {
        self.snapshots.as_slice()
    }

    /// Replace any pending reanimation with a fresh countdown.
    pub fn schedule_reanimation(&mut self, wait_secs: f32) {
        self.reanimation_in = Some(wait_secs);
    }

    pub fn cancel_reanimation(&mut self) {
        self.reanimation_in = None;
    }

    /// Hand the skeleton to physics. The caller halts the state machine first.
    pub fn go_limp(&mut self, cx: &mut StateContext<'_>, impulse: Vec3, joint: Option<JointId>) {
        let body = &mut *cx.body;
        if let Some(nav) = body.nav() {
            nav.set_enabled(false);
        }
        if let Some(animator) = body.anim() {
            animator.set_enabled(false);
        }
        body.hit_collider_enabled = false;
        body.voice_muted = true;
        cx.mind.in_melee_range = false;
        cx.mind.speed = 0.0;

        if let Some(rig) = body.rig.as_deref_mut() {
            rig.set_segments_kinematic(false);
            if let Some(joint) = joint {
                if impulse.length() > cx.mind.tuning.ragdoll.impulse_threshold {
                    rig.apply_impulse(joint, impulse);
                }
            }
        }

        self.mode = BoneControlMode::Ragdoll;
        self.reanimation_in = None;
        self.snapshots.clear();

        tracing::info!(agent = cx.mind.id.0, position = ?body.position, "ragdoll");
        cx.mind.push_event(AiEvent::RagdollStarted {
            agent: cx.mind.id,
            position: body.position,
        });
    }

    /// Count down a pending reanimation and start it when due.
    pub fn tick(&mut self, cx: &mut StateContext<'_>) {
        let Some(remaining) = self.reanimation_in else {
            return;
        };
        let remaining = remaining - cx.dt;
        if remaining > 0.0 {
            self.reanimation_in = Some(remaining);
            return;
        }
        self.reanimation_in = None;
        if self.mode == BoneControlMode::Ragdoll && !cx.mind.characteristics.is_dead() {
            self.reanimate(cx);
        }
    }

    fn reanimate(&mut self, cx: &mut StateContext<'_>) {
        let body = &mut *cx.body;
        let fallback = body.position;
        let alignment = alignment_axis(cx.mind.characteristics.root_bone_alignment);
        let mut up = 0.0;

        self.snapshots.clear();
        self.hip = fallback;
        self.head = fallback;
        self.feet = fallback;
        if let Some(rig) = body.rig.as_deref_mut() {
            rig.set_segments_kinematic(true);
            self.snapshots = rig
                .joints()
                .into_iter()
                .filter_map(|joint| {
                    rig.joint_pose(joint).map(|pose| JointSnapshot {
                        joint,
                        position: pose.position,
                        rotation: pose.rotation,
                        local_rotation: pose.local_rotation,
                    })
                })
                .collect();
            (self.head, self.feet) = head_and_feet(rig, fallback);
            if let Some(root) = rig.root_joint().and_then(|joint| rig.joint_pose(joint)) {
                self.hip = root.position;
                up = (root.rotation * alignment).y;
            }
        }

        self.mode = BoneControlMode::RagdollToAnimated;
        self.blend_elapsed = 0.0;

        let from = if up >= 0.0 {
            ReanimateFrom::Back
        } else {
            ReanimateFrom::Front
        };
        if let Some(animator) = body.anim() {
            animator.set_enabled(true);
            animator.set_trigger(match from {
                ReanimateFrom::Back => params::REANIMATE_FROM_BACK,
                ReanimateFrom::Front => params::REANIMATE_FROM_FRONT,
            });
        }

        tracing::info!(agent = cx.mind.id.0, ?from, "reanimation started");
        cx.mind.push_event(AiEvent::ReanimationStarted {
            agent: cx.mind.id,
            from,
        });
    }

    /// Late-frame blend from the snapshot to the animated pose. Returns
    /// `true` on the tick control is handed back to animation.
    pub fn late_update(&mut self, cx: &mut StateContext<'_>) -> bool {
        if self.mode != BoneControlMode::RagdollToAnimated {
            return false;
        }
        let tuning = cx.mind.tuning.ragdoll.clone();
        self.blend_elapsed += cx.dt;

        if self.blend_elapsed <= tuning.transition_secs {
            self.realign(cx);
        }

        let factor = ((self.blend_elapsed - tuning.transition_secs) / tuning.blend_secs).clamp(0.0, 1.0);
        if let Some(rig) = cx.body.rig.as_deref_mut() {
            let root = rig.root_joint();
            for snapshot in &self.snapshots {
                let Some(current) = rig.joint_pose(snapshot.joint) else {
                    continue;
                };
                if Some(snapshot.joint) == root {
                    rig.set_joint_world(
                        snapshot.joint,
                        snapshot.position.lerp(current.position, factor),
                        snapshot.rotation.slerp(current.rotation, factor),
                    );
                } else {
                    rig.set_joint_local_rotation(
                        snapshot.joint,
                        snapshot.local_rotation.slerp(current.local_rotation, factor),
                    );
                }
            }
        }

        if factor < 1.0 {
            return false;
        }
        self.finish(cx);
        true
    }

    /// Move the body root under the ragdoll's hips and turn it to lie the
    /// same way the ragdoll does.
    fn realign(&mut self, cx: &mut StateContext<'_>) {
        let body = &mut *cx.body;
        let Some(rig) = body.rig.as_deref() else {
            return;
        };
        let Some(animated_root) = rig.root_joint().and_then(|joint| rig.joint_pose(joint)) else {
            return;
        };
        let (animated_head, animated_feet) = head_and_feet(rig, body.position);

        let mut root = body.position + (self.hip - animated_root.position);

        if let Some(physics) = cx.physics {
            let own = cx.mind.id;
            let floor = physics
                .raycast_all(root + Vec3::Y * FLOOR_PROBE_LIFT, -Vec3::Y, f32::MAX, cx.mind.visual_mask)
                .into_iter()
                .filter(|hit| physics.owner_of(hit.collider) != Some(own))
                .map(|hit| hit.point.y)
                .reduce(f32::max);
            root.y = floor.unwrap_or(body.position.y);
        }

        let (snapped, base_offset) = match body.navigator.as_deref() {
            Some(nav) => (
                nav.sample_position(root, NAVMESH_SNAP_DISTANCE),
                nav.base_offset(),
            ),
            None => (None, 0.0),
        };
        body.position = snapped.unwrap_or(root) + Vec3::Y * base_offset;

        let ragdoll_dir = flatten(self.head - self.feet).normalize_or_zero();
        let animated_dir = flatten(animated_head - animated_feet).normalize_or_zero();
        if ragdoll_dir != Vec3::ZERO && animated_dir != Vec3::ZERO {
            body.rotation = (Quat::from_rotation_arc(animated_dir, ragdoll_dir) * body.rotation).normalize();
        }
    }

    fn finish(&mut self, cx: &mut StateContext<'_>) {
        let body = &mut *cx.body;
        self.mode = BoneControlMode::Animated;
        self.snapshots.clear();

        let position = body.position;
        if let Some(nav) = body.nav() {
            nav.set_enabled(true);
            nav.warp(position);
        }
        body.hit_collider_enabled = true;
        body.voice_muted = false;

        tracing::info!(agent = cx.mind.id.0, "reanimated");
        cx.mind.push_event(AiEvent::Reanimated { agent: cx.mind.id });
    }
}
