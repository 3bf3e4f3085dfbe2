//! Headless stand-ins for the engine services an agent talks to.
//!
//! `FlatNavigator` walks straight lines over a flat floor, `ParameterAnimator`
//! records parameters and derives the few curves and sub-states the AI reads
//! back, and `SkeletonRig` is a five-joint skeleton that collapses in place
//! instead of running a physics integration.

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use shamble_ai::services::{params, Animator, HumanBone, JointPose, Navigator, Rig};
use shamble_core::constants::{FEEDING_LAYER, FEEDING_STATE, SCREAM_CURVE_SECS, WALK_SPEED};
use shamble_core::enums::PathStatus;
use shamble_core::types::JointId;

// ---- Navigation ----

/// Straight-line path following on a flat floor.
#[derive(Debug, Clone)]
pub struct FlatNavigator {
    position: Vec3,
    destination: Option<Vec3>,
    floor_height: f32,
    speed: f32,
    stopped: bool,
    enabled: bool,
}

impl FlatNavigator {
    pub fn new(position: Vec3, floor_height: f32) -> Self {
        Self {
            position,
            destination: None,
            floor_height,
            speed: 0.0,
            stopped: true,
            enabled: true,
        }
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn to_destination(&self) -> Vec3 {
        self.destination
            .map_or(Vec3::ZERO, |d| Vec3::new(d.x - self.position.x, 0.0, d.z - self.position.z))
    }
}

impl Navigator for FlatNavigator {
    fn set_destination(&mut self, destination: Vec3) {
        self.destination = Some(destination);
    }

    fn has_path(&self) -> bool {
        self.destination.is_some()
    }

    fn path_pending(&self) -> bool {
        false
    }

    fn is_path_stale(&self) -> bool {
        false
    }

    fn path_status(&self) -> PathStatus {
        PathStatus::Complete
    }

    fn remaining_distance(&self) -> f32 {
        self.to_destination().length()
    }

    fn steering_target(&self) -> Vec3 {
        self.destination.unwrap_or(self.position)
    }

    fn desired_velocity(&self) -> Vec3 {
        if self.stopped || !self.enabled {
            return Vec3::ZERO;
        }
        self.to_destination().normalize_or_zero() * self.speed * WALK_SPEED
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_update_rotation(&mut self, _enabled: bool) {}

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn warp(&mut self, position: Vec3) {
        self.position = position;
    }

    fn sample_position(&self, position: Vec3, max_distance: f32) -> Option<Vec3> {
        ((position.y - self.floor_height).abs() <= max_distance)
            .then(|| Vec3::new(position.x, self.floor_height, position.z))
    }

    fn advance(&mut self, dt: f32) {
        if !self.enabled || self.stopped {
            return;
        }
        let to = self.to_destination();
        let step = self.speed * WALK_SPEED * dt;
        let distance = to.length();
        if distance <= f32::EPSILON || step <= 0.0 {
            return;
        }
        self.position += to * (step.min(distance) / distance);
    }
}

// ---- Animation ----

/// Records parameters and fakes the curves the AI reads back.
#[derive(Debug, Clone, Default)]
pub struct ParameterAnimator {
    floats: HashMap<String, f32>,
    ints: HashMap<String, i32>,
    bools: HashMap<String, bool>,
    /// Triggers fired since the last `advance`.
    pending: Vec<String>,
    /// Every trigger fired so far, oldest first.
    history: Vec<String>,
    layer_weights: HashMap<String, f32>,
    look_at: Option<(Vec3, f32)>,
    disabled: bool,
}

impl ParameterAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn int(&self, name: &str) -> i32 {
        self.ints.get(name).copied().unwrap_or(0)
    }

    pub fn bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    pub fn triggers(&self) -> &[String] {
        &self.history
    }

    pub fn look_at(&self) -> Option<(Vec3, f32)> {
        self.look_at
    }

    pub fn set_layer_weight(&mut self, layer: &str, weight: f32) {
        self.layer_weights.insert(layer.to_string(), weight);
    }
}

impl Animator for ParameterAnimator {
    fn set_float(&mut self, name: &str, value: f32) {
        self.floats.insert(name.to_string(), value);
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.ints.insert(name.to_string(), value);
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.bools.insert(name.to_string(), value);
    }

    fn set_trigger(&mut self, name: &str) {
        self.pending.push(name.to_string());
        self.history.push(name.to_string());
    }

    fn get_float(&self, name: &str) -> f32 {
        self.floats.get(name).copied().unwrap_or(0.0)
    }

    fn layer_weight(&self, layer: &str) -> f32 {
        self.layer_weights.get(layer).copied().unwrap_or(0.0)
    }

    /// The eating clip plays whenever the `feeding` flag is up.
    fn is_state_active(&self, layer: &str, state: &str) -> bool {
        !self.disabled && layer == FEEDING_LAYER && state == FEEDING_STATE && self.bool(params::FEEDING)
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    fn is_enabled(&self) -> bool {
        !self.disabled
    }

    fn set_look_at(&mut self, position: Vec3, weight: f32) {
        self.look_at = Some((position, weight));
    }

    fn advance(&mut self, dt: f32) {
        let screaming = self.get_float(params::SCREAMING);
        let mut curve = (screaming - dt / SCREAM_CURVE_SECS).max(0.0);
        for trigger in self.pending.drain(..) {
            if trigger == params::SCREAM {
                curve = 1.0;
            }
        }
        self.floats.insert(params::SCREAMING.to_string(), curve);
    }
}

// ---- Skeleton ----

/// Rest offsets from the body root, in body space.
const REST_POSE: [Vec3; 5] = [
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 1.3, 0.0),
    Vec3::new(0.0, 1.7, 0.0),
    Vec3::new(-0.12, 0.05, 0.0),
    Vec3::new(0.12, 0.05, 0.0),
];

/// Height of the hips above the floor once collapsed.
const LYING_HIP_HEIGHT: f32 = 0.15;
/// Metres a collapsed body slides per unit of impulse.
const IMPULSE_SLIDE: f32 = 0.05;

/// Five-joint skeleton: hips (root), spine, head and both feet.
#[derive(Debug, Clone)]
pub struct SkeletonRig {
    poses: Vec<JointPose>,
    kinematic: bool,
    impulses: Vec<(JointId, Vec3)>,
}

impl SkeletonRig {
    pub const HIPS: JointId = JointId(0);
    pub const SPINE: JointId = JointId(1);
    pub const HEAD: JointId = JointId(2);
    pub const LEFT_FOOT: JointId = JointId(3);
    pub const RIGHT_FOOT: JointId = JointId(4);

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        let mut rig = Self {
            poses: Vec::with_capacity(REST_POSE.len()),
            kinematic: true,
            impulses: Vec::new(),
        };
        rig.place(position, rotation);
        rig
    }

    pub fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    pub fn impulses(&self) -> &[(JointId, Vec3)] {
        &self.impulses
    }

    /// Pose every joint rigidly around `root`, keeping the rest offsets.
    fn place(&mut self, root: Vec3, rotation: Quat) {
        self.poses = REST_POSE
            .iter()
            .enumerate()
            .map(|(i, offset)| JointPose {
                position: root + rotation * *offset,
                rotation,
                local_rotation: if i == 0 { rotation } else { Quat::IDENTITY },
            })
            .collect();
    }

    fn hips(&self) -> Option<&JointPose> {
        self.poses.first()
    }

    /// Fall over around the hips: backward (face up) or forward (face down).
    fn collapse(&mut self, face_down: bool) {
        let Some(hips) = self.hips().copied() else {
            return;
        };
        // Feet keep the last animated pose; the root may be mid-blend.
        let (standing, floor) = match self.poses.get(3..) {
            Some(feet) if !feet.is_empty() => (
                feet[0].rotation,
                feet.iter().map(|foot| foot.position.y).fold(f32::INFINITY, f32::min) - REST_POSE[3].y,
            ),
            _ => (hips.rotation, hips.position.y - REST_POSE[0].y),
        };
        let tip = Quat::from_rotation_x(if face_down { FRAC_PI_2 } else { -FRAC_PI_2 });
        let lying = (standing * tip).normalize();
        let hip = Vec3::new(hips.position.x, floor + LYING_HIP_HEIGHT, hips.position.z);
        self.place(hip - lying * REST_POSE[0], lying);
    }
}

impl Rig for SkeletonRig {
    fn joints(&self) -> Vec<JointId> {
        (0..self.poses.len() as u32).map(JointId).collect()
    }

    fn root_joint(&self) -> Option<JointId> {
        Some(Self::HIPS)
    }

    fn joint_pose(&self, joint: JointId) -> Option<JointPose> {
        self.poses.get(joint.0 as usize).copied()
    }

    fn set_joint_world(&mut self, joint: JointId, position: Vec3, rotation: Quat) {
        if let Some(pose) = self.poses.get_mut(joint.0 as usize) {
            pose.position = position;
            pose.rotation = rotation;
        }
    }

    fn set_joint_local_rotation(&mut self, joint: JointId, rotation: Quat) {
        if let Some(pose) = self.poses.get_mut(joint.0 as usize) {
            pose.local_rotation = rotation;
        }
    }

    fn bone_position(&self, bone: HumanBone) -> Option<Vec3> {
        let index = match bone {
            HumanBone::Hips => Self::HIPS,
            HumanBone::Head => Self::HEAD,
            HumanBone::LeftFoot => Self::LEFT_FOOT,
            HumanBone::RightFoot => Self::RIGHT_FOOT,
        };
        self.poses.get(index.0 as usize).map(|pose| pose.position)
    }

    fn set_segments_kinematic(&mut self, kinematic: bool) {
        let falling = self.kinematic && !kinematic;
        self.kinematic = kinematic;
        if falling {
            self.collapse(false);
        }
    }

    /// A push from behind turns the body face down; any push slides it.
    fn apply_impulse(&mut self, joint: JointId, impulse: Vec3) {
        self.impulses.push((joint, impulse));
        if self.kinematic {
            return;
        }
        let Some(hips) = self.hips().copied() else {
            return;
        };
        // Lying face up, the head points away from where the body faced.
        let head_dir = hips.rotation * Vec3::Y;
        let push = Vec3::new(impulse.x, 0.0, impulse.z);
        if Vec3::new(head_dir.x, 0.0, head_dir.z).dot(push) < 0.0 {
            let upright = (hips.rotation * Quat::from_rotation_x(FRAC_PI_2)).normalize();
            let root = Vec3::new(hips.position.x, hips.position.y - LYING_HIP_HEIGHT, hips.position.z);
            self.place(root, upright);
            self.collapse(true);
        }
        let slide = push * IMPULSE_SLIDE;
        for pose in &mut self.poses {
            pose.position += slide;
        }
    }

    fn pose_from_animation(&mut self, root_position: Vec3, root_rotation: Quat) {
        if self.kinematic {
            self.place(root_position, root_rotation);
        }
    }
}
