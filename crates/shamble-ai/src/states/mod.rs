//! Behavior states and their shared capability interface.

mod alerted;
mod attack;
mod feeding;
mod idle;
mod patrol;
mod pursuit;

pub use alerted::AlertedState;
pub use attack::AttackState;
pub use feeding::FeedingState;
pub use idle::IdleState;
pub use patrol::PatrolState;
pub use pursuit::PursuitState;

use glam::Vec3;

use shamble_core::enums::{StateId, TriggerPhase};
use shamble_core::types::{look_rotation, slerp_toward};

use crate::body::AgentBody;
use crate::fsm::StateContext;
use crate::sensor::{self, Stimulus};

/// Callbacks the state machine invokes on its current state.
pub trait BehaviorState {
    fn state_id(&self) -> StateId;

    fn on_enter(&mut self, _cx: &mut StateContext<'_>) {}

    fn on_exit(&mut self, _cx: &mut StateContext<'_>) {}

    /// Run one tick and return the state to be in next.
    fn on_update(&mut self, cx: &mut StateContext<'_>) -> StateId;

    /// Sensor-volume events feed the shared threat buffers by default.
    fn on_trigger_event(&mut self, cx: &mut StateContext<'_>, phase: TriggerPhase, stimulus: &Stimulus) {
        sensor::evaluate(cx, phase, stimulus);
    }

    /// The agent entered (`true`) or left (`false`) the target trigger.
    fn on_destination_reached(&mut self, _cx: &mut StateContext<'_>, _reached: bool) {}

    fn on_animator_ik(&mut self, _cx: &mut StateContext<'_>) {}
}

/// Closed set of behavior implementations, dispatched without type lookup.
#[derive(Debug, Clone)]
pub enum Behavior {
    Idle(IdleState),
    Alerted(AlertedState),
    Patrol(PatrolState),
    Attack(AttackState),
    Feeding(FeedingState),
    Pursuit(PursuitState),
}

macro_rules! dispatch {
    ($self:ident, $state:ident => $body:expr) => {
        match $self {
            Behavior::Idle($state) => $body,
            Behavior::Alerted($state) => $body,
            Behavior::Patrol($state) => $body,
            Behavior::Attack($state) => $body,
            Behavior::Feeding($state) => $body,
            Behavior::Pursuit($state) => $body,
        }
    };
}

impl Behavior {
    /// Fresh instance of the state `id`.
    pub fn for_state(id: StateId) -> Self {
        match id {
            StateId::Idle => Behavior::Idle(IdleState::default()),
            StateId::Alerted => Behavior::Alerted(AlertedState::default()),
            StateId::Patrol => Behavior::Patrol(PatrolState),
            StateId::Attack => Behavior::Attack(AttackState::default()),
            StateId::Feeding => Behavior::Feeding(FeedingState),
            StateId::Pursuit => Behavior::Pursuit(PursuitState::default()),
        }
    }
}

impl BehaviorState for Behavior {
    fn state_id(&self) -> StateId {
        dispatch!(self, s => s.state_id())
    }

    fn on_enter(&mut self, cx: &mut StateContext<'_>) {
        dispatch!(self, s => s.on_enter(cx))
    }

    fn on_exit(&mut self, cx: &mut StateContext<'_>) {
        dispatch!(self, s => s.on_exit(cx))
    }

    fn on_update(&mut self, cx: &mut StateContext<'_>) -> StateId {
        dispatch!(self, s => s.on_update(cx))
    }

    fn on_trigger_event(&mut self, cx: &mut StateContext<'_>, phase: TriggerPhase, stimulus: &Stimulus) {
        dispatch!(self, s => s.on_trigger_event(cx, phase, stimulus))
    }

    fn on_destination_reached(&mut self, cx: &mut StateContext<'_>, reached: bool) {
        dispatch!(self, s => s.on_destination_reached(cx, reached))
    }

    fn on_animator_ik(&mut self, cx: &mut StateContext<'_>) {
        dispatch!(self, s => s.on_animator_ik(cx))
    }
}

/// Slerp the body toward facing `direction` on the horizontal plane.
fn turn_toward(body: &mut AgentBody, direction: Vec3, t: f32) {
    if let Some(target) = look_rotation(direction) {
        body.rotation = slerp_toward(body.rotation, target, t);
    }
}

/// Face `direction` immediately.
fn face(body: &mut AgentBody, direction: Vec3) {
    if let Some(target) = look_rotation(direction) {
        body.rotation = target;
    }
}

/// Slerp toward the navigator's desired velocity.
fn follow_desired_velocity(body: &mut AgentBody, t: f32) {
    let desired = body.nav().map(|nav| nav.desired_velocity());
    if let Some(desired) = desired {
        turn_toward(body, desired, t);
    }
}

/// `+1` or `-1`; zero counts as positive.
fn sign(value: f32) -> i32 {
    if value >= 0.0 {
        1
    } else {
        -1
    }
}

/// Reset the animator intent every state sets on entry.
fn reset_intent(cx: &mut StateContext<'_>) {
    cx.mind.seeking = 0;
    cx.mind.feeding = false;
    cx.mind.attack_type = 0;
}
