//! Target value type: one candidate (or committed) thing an agent reacts to.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::TargetKind;
use crate::types::ColliderId;

/// A perceived or committed target.
///
/// Plain `Copy` value: threat buffers are overwritten in place each tick and
/// the committed target is only ever replaced by copying a whole `Target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub kind: TargetKind,
    /// Originating trigger volume, for identity comparison only.
    pub collider: Option<ColliderId>,
    pub position: Vec3,
    /// Distance from the agent when last measured. Infinite when `kind` is `None`.
    pub distance: f32,
    /// Simulation seconds at the last `set`.
    pub timestamp: f32,
}

impl Default for Target {
    fn default() -> Self {
        Self::NONE
    }
}

impl Target {
    pub const NONE: Target = Target {
        kind: TargetKind::None,
        collider: None,
        position: Vec3::ZERO,
        distance: f32::INFINITY,
        timestamp: 0.0,
    };

    pub fn new(
        kind: TargetKind,
        collider: Option<ColliderId>,
        position: Vec3,
        distance: f32,
        timestamp: f32,
    ) -> Self {
        Self {
            kind,
            collider,
            position,
            distance,
            timestamp,
        }
    }

    pub fn set(
        &mut self,
        kind: TargetKind,
        collider: Option<ColliderId>,
        position: Vec3,
        distance: f32,
        timestamp: f32,
    ) {
        *self = Self::new(kind, collider, position, distance, timestamp);
    }

    pub fn clear(&mut self) {
        *self = Self::NONE;
    }

    pub fn is_none(&self) -> bool {
        self.kind == TargetKind::None
    }

    pub fn is(&self, kind: TargetKind) -> bool {
        self.kind == kind
    }

    /// Distance to use for comparisons: infinite when there is no target.
    pub fn effective_distance(&self) -> f32 {
        if self.is_none() {
            f32::INFINITY
        } else {
            self.distance
        }
    }

    /// Whether this target refers to the same trigger volume as `other`.
    pub fn same_source(&self, other: &Target) -> bool {
        self.collider.is_some() && self.collider == other.collider
    }
}
