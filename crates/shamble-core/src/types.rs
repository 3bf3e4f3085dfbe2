//! Fundamental identity, time and geometry types.
//!
//! World space is right-handed, y = Up, with the agent's forward along +Z
//! (so a rotation of `Quat::IDENTITY` faces +Z). Distances are meters and
//! angles are degrees unless a name says otherwise.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Stable handle of an agent in the host's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u64);

/// Identity of a collider or trigger volume owned by the host's physics scene.
/// The AI never owns the collider; it only compares identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderId(pub u64);

/// Identity of one rigid ragdoll segment / skeleton joint on an agent's rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JointId(pub u32);

/// Bit mask selecting collision layers for ray queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const NONE: LayerMask = LayerMask(0);

    pub const fn contains(self, layer: u32) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }

    pub const fn with(self, layer: u32) -> Self {
        LayerMask(self.0 | (1 << layer))
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f32,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

/// Project onto the horizontal plane.
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Unsigned angle between two vectors in degrees. Zero-length input gives 0.
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let (a, b) = (a.normalize_or_zero(), b.normalize_or_zero());
    if a == Vec3::ZERO || b == Vec3::ZERO {
        return 0.0;
    }
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Signed angle (degrees) to rotate `from` onto `to` about the world up axis,
/// measured on the horizontal plane. Positive is clockwise seen from above
/// (towards the agent's right).
pub fn signed_angle_about_up(from: Vec3, to: Vec3) -> f32 {
    let (from, to) = (flatten(from), flatten(to));
    let angle = angle_between(from, to);
    let cross = from.cross(to);
    if cross.y < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Rotation that faces `direction` with world up kept up. Returns `None` for a
/// degenerate (zero or vertical) direction.
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    let flat = flatten(direction).normalize_or_zero();
    if flat == Vec3::ZERO {
        return None;
    }
    Some(Quat::from_rotation_arc(Vec3::Z, flat))
}

/// Forward (+Z) axis of a rotation.
pub fn forward_of(rotation: Quat) -> Vec3 {
    rotation * Vec3::Z
}

/// Slerp from `current` toward `target` by a clamped fraction `t`.
pub fn slerp_toward(current: Quat, target: Quat, t: f32) -> Quat {
    current.slerp(target, t.clamp(0.0, 1.0)).normalize()
}
