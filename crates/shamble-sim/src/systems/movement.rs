//! Movement system: integrates navigation, poses the skeleton from the
//! animated root and keeps the body colliders in place.

use glam::Vec3;
use hecs::World;

use shamble_ai::services::HumanBone;
use shamble_ai::Agent;
use shamble_core::constants::{AGENT_BODY_RADIUS, AGENT_HIP_HEIGHT};
use shamble_core::enums::BoneControlMode;

use crate::components::BodyCollider;
use crate::physics::{PhysicsScene, Shape};

/// Advance navigators and animators, follow the navigator while animated,
/// then run the animation IK pass. Bodies whose position is owned by root
/// motion stay where the animation put them.
pub fn run(world: &mut World, dt: f32) {
    for (_entity, agent) in world.query_mut::<&mut Agent>() {
        let animated = agent.bone_control() == BoneControlMode::Animated;
        let body = &mut agent.body;

        if let Some(nav) = body.nav() {
            nav.advance(dt);
        }
        if animated && !body.uses_root_position() {
            let walked = body
                .navigator
                .as_deref()
                .filter(|nav| nav.is_enabled())
                .map(|nav| nav.position());
            if let Some(position) = walked {
                body.position = position;
            }
        }

        let (position, rotation) = (body.position, body.rotation);
        if let Some(rig) = body.rig.as_deref_mut() {
            rig.pose_from_animation(position, rotation);
        }
        if let Some(animator) = body.anim() {
            animator.advance(dt);
        }

        agent.animator_ik(dt);
    }
}

/// Move each body sphere to the hips: the animated root while standing,
/// the skeleton's hips while ragdolled.
pub fn sync_colliders(world: &mut World, scene: &mut PhysicsScene) {
    for (_entity, (agent, collider)) in world.query_mut::<(&Agent, &BodyCollider)>() {
        let standing = agent.body.position + Vec3::Y * AGENT_HIP_HEIGHT;
        let center = match agent.bone_control() {
            BoneControlMode::Animated => standing,
            _ => agent
                .body
                .rig
                .as_deref()
                .and_then(|rig| rig.bone_position(HumanBone::Hips))
                .unwrap_or(standing),
        };
        scene.set_shape(
            collider.0,
            Shape::Sphere {
                center,
                radius: AGENT_BODY_RADIUS,
            },
        );
    }
}
