//! The agent's physical presence: transform, collaborators and body flags.

use glam::{Quat, Vec3};

use shamble_core::constants::SENSOR_HEIGHT;
use shamble_core::types::forward_of;

use crate::services::{Animator, Navigator, Rig};

/// Transform and engine-side collaborators of one agent.
pub struct AgentBody {
    pub position: Vec3,
    pub rotation: Quat,
    pub navigator: Option<Box<dyn Navigator>>,
    pub animator: Option<Box<dyn Animator>>,
    pub rig: Option<Box<dyn Rig>>,
    /// Sensor origin relative to the root, in body space.
    pub sensor_offset: Vec3,
    /// The capsule that receives weapon hits while animated.
    pub hit_collider_enabled: bool,
    pub voice_muted: bool,
    root_position_requests: u32,
    root_rotation_requests: u32,
}

impl Default for AgentBody {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

impl AgentBody {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            navigator: None,
            animator: None,
            rig: None,
            sensor_offset: Vec3::new(0.0, SENSOR_HEIGHT, 0.0),
            hit_collider_enabled: true,
            voice_muted: false,
            root_position_requests: 0,
            root_rotation_requests: 0,
        }
    }

    pub fn with_navigator(mut self, navigator: Box<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn with_animator(mut self, animator: Box<dyn Animator>) -> Self {
        self.animator = Some(animator);
        self
    }

    pub fn with_rig(mut self, rig: Box<dyn Rig>) -> Self {
        self.rig = Some(rig);
        self
    }

    pub fn forward(&self) -> Vec3 {
        forward_of(self.rotation)
    }

    pub fn sensor_origin(&self) -> Vec3 {
        self.position + self.rotation * self.sensor_offset
    }

    pub fn nav(&mut self) -> Option<&mut (dyn Navigator + 'static)> {
        self.navigator.as_deref_mut()
    }

    pub fn anim(&mut self) -> Option<&mut (dyn Animator + 'static)> {
        self.animator.as_deref_mut()
    }

    /// Animation layers request ownership of root motion; requests nest.
    pub fn add_root_motion_request(&mut self, position: i32, rotation: i32) {
        self.root_position_requests = self.root_position_requests.saturating_add_signed(position);
        self.root_rotation_requests = self.root_rotation_requests.saturating_add_signed(rotation);
    }

    pub fn uses_root_position(&self) -> bool {
        self.root_position_requests > 0
    }

    /// When set, rotation is driven by animation and behaviors only express intent.
    pub fn uses_root_rotation(&self) -> bool {
        self.root_rotation_requests > 0
    }

    /// Let the navigator turn the body, or keep turning with the behaviors.
    pub fn nav_rotation_control(&mut self, enabled: bool) {
        if let Some(nav) = self.nav() {
            nav.set_update_rotation(enabled);
        }
    }

    /// Set the navigator destination and resume movement.
    pub fn go_to(&mut self, destination: Vec3) {
        if let Some(nav) = self.nav() {
            nav.set_destination(destination);
            nav.set_stopped(false);
        }
    }
}
