//! Ray-castable collider scene.
//!
//! Colliders are analytic shapes (ground plane, spheres, boxes) tagged with a
//! collision layer and, for agent bodies, the owning agent. Trigger volumes
//! such as sound emitters only reserve an id and never block rays.

use std::collections::BTreeMap;

use glam::Vec3;

use shamble_ai::services::{PhysicsQuery, RayHit};
use shamble_core::types::{AgentId, ColliderId, LayerMask};

/// Collision layers used by the headless scene.
pub mod layers {
    pub const GROUND: u32 = 0;
    pub const BODY: u32 = 1;
    pub const OBSTACLE: u32 = 2;
    pub const PLAYER: u32 = 3;
    pub const FOOD: u32 = 4;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Infinite horizontal plane at `height`.
    Ground { height: f32 },
    Sphere { center: Vec3, radius: f32 },
    /// Axis-aligned box.
    Aabb { min: Vec3, max: Vec3 },
}

impl Shape {
    /// Distance along a normalized ray to the first surface crossing, and the
    /// surface normal there.
    fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<(f32, Vec3)> {
        match *self {
            Shape::Ground { height } => {
                if direction.y.abs() <= f32::EPSILON {
                    return None;
                }
                let t = (height - origin.y) / direction.y;
                (t >= 0.0).then_some((t, Vec3::Y))
            }
            Shape::Sphere { center, radius } => {
                let oc = origin - center;
                let b = oc.dot(direction);
                let c = oc.length_squared() - radius * radius;
                let disc = b * b - c;
                if disc < 0.0 {
                    return None;
                }
                let root = disc.sqrt();
                let t = if -b - root >= 0.0 { -b - root } else { -b + root };
                if t < 0.0 {
                    return None;
                }
                let normal = (origin + direction * t - center).normalize_or_zero();
                Some((t, normal))
            }
            Shape::Aabb { min, max } => {
                let mut t_near = f32::NEG_INFINITY;
                let mut t_far = f32::INFINITY;
                let mut normal = Vec3::ZERO;
                for axis in 0..3 {
                    let (o, d) = (origin[axis], direction[axis]);
                    if d.abs() <= f32::EPSILON {
                        if o < min[axis] || o > max[axis] {
                            return None;
                        }
                        continue;
                    }
                    let (mut t0, mut t1) = ((min[axis] - o) / d, (max[axis] - o) / d);
                    let mut face = Vec3::ZERO;
                    face[axis] = -d.signum();
                    if t0 > t1 {
                        std::mem::swap(&mut t0, &mut t1);
                    }
                    if t0 > t_near {
                        t_near = t0;
                        normal = face;
                    }
                    t_far = t_far.min(t1);
                    if t_near > t_far {
                        return None;
                    }
                }
                if t_far < 0.0 {
                    return None;
                }
                // Starting inside the box: report the exit.
                if t_near < 0.0 {
                    return Some((t_far, -normal));
                }
                Some((t_near, normal))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub shape: Shape,
    pub layer: u32,
    pub enabled: bool,
}

/// Every collider in the scene plus the collider → agent side-table.
#[derive(Debug, Default)]
pub struct PhysicsScene {
    colliders: BTreeMap<ColliderId, Collider>,
    owners: BTreeMap<ColliderId, AgentId>,
    next_id: u64,
}

impl PhysicsScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene with a flat ground plane at `height`.
    pub fn with_ground(height: f32) -> Self {
        let mut scene = Self::new();
        scene.insert(Shape::Ground { height }, layers::GROUND, None);
        scene
    }

    /// Allocate an id without a shape (trigger volumes).
    pub fn reserve(&mut self) -> ColliderId {
        self.next_id += 1;
        ColliderId(self.next_id)
    }

    pub fn insert(&mut self, shape: Shape, layer: u32, owner: Option<AgentId>) -> ColliderId {
        let id = self.reserve();
        self.colliders.insert(
            id,
            Collider {
                shape,
                layer,
                enabled: true,
            },
        );
        if let Some(owner) = owner {
            self.owners.insert(id, owner);
        }
        id
    }

    pub fn get(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(&id)
    }

    pub fn set_shape(&mut self, id: ColliderId, shape: Shape) {
        if let Some(collider) = self.colliders.get_mut(&id) {
            collider.shape = shape;
        }
    }

    pub fn set_enabled(&mut self, id: ColliderId, enabled: bool) {
        if let Some(collider) = self.colliders.get_mut(&id) {
            collider.enabled = enabled;
        }
    }

    pub fn remove(&mut self, id: ColliderId) {
        self.colliders.remove(&id);
        self.owners.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl PhysicsQuery for PhysicsScene {
    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> Vec<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return Vec::new();
        }
        self.colliders
            .iter()
            .filter(|(_, collider)| collider.enabled && mask.contains(collider.layer))
            .filter_map(|(&id, collider)| {
                let (distance, normal) = collider.shape.intersect(origin, direction)?;
                (distance <= max_distance).then(|| RayHit {
                    distance,
                    point: origin + direction * distance,
                    normal,
                    collider: id,
                })
            })
            .collect()
    }

    fn owner_of(&self, collider: ColliderId) -> Option<AgentId> {
        self.owners.get(&collider).copied()
    }
}
