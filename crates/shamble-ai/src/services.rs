//! Service boundaries to the host engine.
//!
//! The AI core issues queries and commands through these traits and never
//! implements locomotion, animation playback or physics itself. Every
//! collaborator is optional on an agent; code that needs one skips the
//! dependent behavior for the tick when it is absent.

use glam::{Quat, Vec3};

use shamble_core::enums::PathStatus;
use shamble_core::types::{AgentId, ColliderId, JointId, LayerMask};

/// Animator parameter names written and read by the AI.
pub mod params {
    pub const SPEED: &str = "speed";
    pub const SEEKING: &str = "seeking";
    pub const FEEDING: &str = "feeding";
    pub const ATTACK: &str = "attack";
    pub const STATE: &str = "state";
    pub const CRAWLING: &str = "crawling";
    pub const UPPER_BODY_DAMAGE: &str = "upper_body_damage";
    pub const LOWER_BODY_DAMAGE: &str = "lower_body_damage";
    pub const HIT_TYPE: &str = "hit_type";
    pub const HIT: &str = "hit";
    pub const SCREAM: &str = "scream";
    pub const SCREAMING: &str = "screaming";
    pub const REANIMATE_FROM_BACK: &str = "reanimate_from_back";
    pub const REANIMATE_FROM_FRONT: &str = "reanimate_from_front";
    pub const CINEMATIC_LAYER: &str = "Cinematic";
}

/// Path-following locomotion agent (one per AI agent).
pub trait Navigator: Send + Sync {
    fn set_destination(&mut self, destination: Vec3);
    fn has_path(&self) -> bool;
    fn path_pending(&self) -> bool;
    fn is_path_stale(&self) -> bool;
    fn path_status(&self) -> PathStatus;
    fn remaining_distance(&self) -> f32;
    /// Next corner of the current path.
    fn steering_target(&self) -> Vec3;
    fn desired_velocity(&self) -> Vec3;
    fn set_stopped(&mut self, stopped: bool);
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
    /// Whether the navigator may rotate the body itself.
    fn set_update_rotation(&mut self, enabled: bool);
    /// Normalized locomotion speed requested by the current behavior.
    fn set_speed(&mut self, speed: f32);
    fn position(&self) -> Vec3;
    /// Teleport onto `position` without pathing.
    fn warp(&mut self, position: Vec3);
    /// Nearest navigable point within `max_distance`.
    fn sample_position(&self, position: Vec3, max_distance: f32) -> Option<Vec3>;
    /// Height of the body root above the navigable surface.
    fn base_offset(&self) -> f32 {
        0.0
    }
    /// Host integration hook: advance along the path. Engines that move
    /// their agents themselves leave this as a no-op.
    fn advance(&mut self, _dt: f32) {}
}

/// Animation state machine parameters and queries.
pub trait Animator: Send + Sync {
    fn set_float(&mut self, name: &str, value: f32);
    fn set_int(&mut self, name: &str, value: i32);
    fn set_bool(&mut self, name: &str, value: bool);
    fn set_trigger(&mut self, name: &str);
    fn get_float(&self, name: &str) -> f32;
    fn layer_weight(&self, layer: &str) -> f32;
    /// Whether `state` is the active sub-state on `layer`.
    fn is_state_active(&self, layer: &str, state: &str) -> bool;
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
    fn set_look_at(&mut self, position: Vec3, weight: f32);
    /// Host integration hook: advance playback and animation curves.
    fn advance(&mut self, _dt: f32) {}
}

/// One intersection returned by a ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
    pub collider: ColliderId,
}

/// Scene-level collision queries.
pub trait PhysicsQuery {
    /// All intersections along the ray, in any order.
    fn raycast_all(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<RayHit>;

    /// The agent whose body owns `collider`, if any.
    fn owner_of(&self, collider: ColliderId) -> Option<AgentId>;
}

/// World and parent-relative pose of one joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointPose {
    pub position: Vec3,
    pub rotation: Quat,
    pub local_rotation: Quat,
}

/// Named bones the ragdoll controller needs to locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumanBone {
    Hips,
    Head,
    LeftFoot,
    RightFoot,
}

/// The agent's skeleton and its ragdoll segments.
pub trait Rig: Send + Sync {
    /// Every joint under (and including) the root bone, parents before children.
    fn joints(&self) -> Vec<JointId>;
    fn root_joint(&self) -> Option<JointId>;
    fn joint_pose(&self, joint: JointId) -> Option<JointPose>;
    fn set_joint_world(&mut self, joint: JointId, position: Vec3, rotation: Quat);
    fn set_joint_local_rotation(&mut self, joint: JointId, rotation: Quat);
    fn bone_position(&self, bone: HumanBone) -> Option<Vec3>;
    /// Kinematic segments follow the skeleton; dynamic ones are simulated.
    fn set_segments_kinematic(&mut self, kinematic: bool);
    fn apply_impulse(&mut self, joint: JointId, impulse: Vec3);
    /// Host hook: the animation system writes its pose for a body rooted at
    /// `root_position`/`root_rotation`.
    fn pose_from_animation(&mut self, root_position: Vec3, root_rotation: Quat);
}
