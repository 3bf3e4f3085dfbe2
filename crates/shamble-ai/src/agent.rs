//! One AI-controlled character: mind, body, state machine and ragdoll.
//!
//! The host drives each agent through the per-tick phases in order:
//! [`Agent::fixed_update`], any number of [`Agent::on_trigger_event`] calls,
//! [`Agent::update`], [`Agent::animator_ik`] and finally
//! [`Agent::late_update`] once the animation pose for the tick is known.

use glam::Vec3;

use shamble_core::enums::{BoneControlMode, StateId, TargetKind, TriggerPhase};
use shamble_core::events::AiEvent;
use shamble_core::types::{AgentId, ColliderId, JointId};

use crate::body::AgentBody;
use crate::fsm::{StateContext, StateMachine};
use crate::mind::AgentMind;
use crate::ragdoll::RagdollController;
use crate::sensor::Stimulus;
use crate::services::{params, PhysicsQuery};
use crate::sound;

pub struct Agent {
    pub mind: AgentMind,
    pub body: AgentBody,
    machine: StateMachine,
    ragdoll: RagdollController,
}

impl Agent {
    pub fn new(mind: AgentMind, body: AgentBody, machine: StateMachine) -> Self {
        Self {
            mind,
            body,
            machine,
            ragdoll: RagdollController::default(),
        }
    }

    pub fn id(&self) -> AgentId {
        self.mind.id
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn ragdoll(&self) -> &RagdollController {
        &self.ragdoll
    }

    pub(crate) fn ragdoll_mut(&mut self) -> &mut RagdollController {
        &mut self.ragdoll
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.machine.current()
    }

    pub fn bone_control(&self) -> BoneControlMode {
        self.ragdoll.mode()
    }

    pub fn is_dead(&self) -> bool {
        self.mind.characteristics.is_dead()
    }

    fn parts<'a>(
        &'a mut self,
        physics: Option<&'a dyn PhysicsQuery>,
        dt: f32,
    ) -> (StateContext<'a>, &'a mut StateMachine, &'a mut RagdollController) {
        let cx = StateContext {
            mind: &mut self.mind,
            body: &mut self.body,
            physics,
            dt,
        };
        (cx, &mut self.machine, &mut self.ragdoll)
    }

    /// Enter the initial state.
    pub fn start(&mut self, physics: Option<&dyn PhysicsQuery>) {
        let (mut cx, machine, _) = self.parts(physics, 0.0);
        machine.start(&mut cx);
    }

    pub fn fixed_update(&mut self, physics: Option<&dyn PhysicsQuery>, dt: f32) {
        let (mut cx, machine, _) = self.parts(physics, dt);
        machine.fixed_update(&mut cx);
    }

    /// A stimulus entered, stayed in or left the sensor volume.
    pub fn on_trigger_event(
        &mut self,
        physics: Option<&dyn PhysicsQuery>,
        phase: TriggerPhase,
        stimulus: &Stimulus,
    ) {
        let (mut cx, machine, _) = self.parts(physics, 0.0);
        machine.trigger_event(&mut cx, phase, stimulus);
    }

    /// Run the current behavior, count down reanimation and publish the
    /// resulting intent to the animator and navigator.
    pub fn update(&mut self, physics: Option<&dyn PhysicsQuery>, dt: f32) {
        self.mind.time += dt;
        {
            let (mut cx, machine, ragdoll) = self.parts(physics, dt);
            machine.update(&mut cx);
            ragdoll.tick(&mut cx);
        }
        self.bookkeeping(dt);
    }

    pub fn animator_ik(&mut self, dt: f32) {
        let (mut cx, machine, _) = self.parts(None, dt);
        machine.animator_ik(&mut cx);
    }

    /// Ragdoll-to-animation blend. Finishing hands control back to the
    /// behaviors in the Alerted state.
    pub fn late_update(&mut self, physics: Option<&dyn PhysicsQuery>, dt: f32) {
        let (mut cx, machine, ragdoll) = self.parts(physics, dt);
        if ragdoll.late_update(&mut cx) {
            machine.force_state(&mut cx, StateId::Alerted);
        }
    }

    /// Switch behaviors from outside (debug tools, scripted sequences).
    /// Ignored while the body is not animated.
    pub fn force_state(&mut self, id: StateId) {
        if self.ragdoll.mode() != BoneControlMode::Animated {
            return;
        }
        let (mut cx, machine, _) = self.parts(None, 0.0);
        machine.force_state(&mut cx, id);
    }

    /// Scream if possible. See [`sound::scream`].
    pub fn scream(&mut self) -> bool {
        sound::scream(&mut self.mind, &mut self.body)
    }

    pub fn set_target(&mut self, kind: TargetKind, collider: Option<ColliderId>, position: Vec3) {
        let distance = self.body.position.distance(position);
        self.mind.set_target(kind, collider, position, distance);
    }

    pub fn clear_target(&mut self) {
        self.mind.clear_target();
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = AiEvent> + '_ {
        self.mind.drain_events()
    }

    /// Halt the behaviors and give the skeleton to physics.
    pub(crate) fn go_limp(&mut self, impulse: Vec3, joint: Option<JointId>) {
        let (mut cx, machine, ragdoll) = self.parts(None, 0.0);
        machine.halt(&mut cx);
        ragdoll.go_limp(&mut cx, impulse, joint);
    }

    fn bookkeeping(&mut self, dt: f32) {
        let speed = self.mind.speed;
        let c = &mut self.mind.characteristics;
        c.satisfaction = (c.satisfaction - c.depletion_rate * dt / 100.0 * speed.powi(3)).max(0.0);
        let crawling = c.is_crawling();

        let state = self.machine.current().map_or(0, StateId::ordinal);
        let mind = &self.mind;
        if let Some(nav) = self.body.nav() {
            nav.set_speed(speed);
        }
        if let Some(animator) = self.body.anim() {
            animator.set_float(params::SPEED, speed);
            animator.set_int(params::SEEKING, mind.seeking);
            animator.set_bool(params::FEEDING, mind.feeding);
            animator.set_int(params::ATTACK, mind.attack_type);
            animator.set_int(params::STATE, state);
            animator.set_bool(params::CRAWLING, crawling);
        }
    }
}
