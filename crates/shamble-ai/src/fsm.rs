//! Behavior state machine.
//!
//! Each agent owns one machine holding an enum-indexed registry of behavior
//! states, populated at spawn and fixed afterward. The machine drives the
//! current state, performs transitions (exit before enter) and tracks the
//! target trigger that tells states when the committed target is reached.

use shamble_core::enums::{StateId, TriggerPhase};
use shamble_core::events::AiEvent;

use crate::body::AgentBody;
use crate::mind::AgentMind;
use crate::sensor::Stimulus;
use crate::services::PhysicsQuery;
use crate::states::{Behavior, BehaviorState};

/// Everything a behavior state may read or mutate during one callback.
pub struct StateContext<'a> {
    pub mind: &'a mut AgentMind,
    pub body: &'a mut AgentBody,
    pub physics: Option<&'a dyn PhysicsQuery>,
    /// Seconds since the previous update.
    pub dt: f32,
}

/// Per-agent registry of behavior states plus the current-state pointer.
pub struct StateMachine {
    states: [Option<Behavior>; StateId::COUNT],
    current: Option<StateId>,
    /// Whether the agent was inside the target trigger at the last fixed update.
    trigger_inside: bool,
}

impl StateMachine {
    /// Build a machine from the enabled behaviors. A later behavior with the
    /// same id replaces an earlier one.
    pub fn new(behaviors: impl IntoIterator<Item = Behavior>) -> Self {
        let mut states: [Option<Behavior>; StateId::COUNT] = Default::default();
        for behavior in behaviors {
            let slot = behavior.state_id().index();
            states[slot] = Some(behavior);
        }
        Self {
            states,
            current: None,
            trigger_inside: false,
        }
    }

    /// Machine with a default instance of every listed state.
    pub fn with_states(ids: &[StateId]) -> Self {
        Self::new(ids.iter().map(|&id| Behavior::for_state(id)))
    }

    pub fn current(&self) -> Option<StateId> {
        self.current
    }

    pub fn is_registered(&self, id: StateId) -> bool {
        self.states[id.index()].is_some()
    }

    pub fn state(&self, id: StateId) -> Option<&Behavior> {
        self.states[id.index()].as_ref()
    }

    pub fn registered(&self) -> impl Iterator<Item = StateId> + '_ {
        StateId::ALL.into_iter().filter(|id| self.is_registered(*id))
    }

    /// Enter Idle. Without an Idle state the machine stays inactive.
    pub fn start(&mut self, cx: &mut StateContext<'_>) {
        if self.current.is_some() {
            return;
        }
        if self.is_registered(StateId::Idle) {
            self.switch(cx, StateId::Idle);
        } else {
            tracing::warn!(agent = cx.mind.id.0, "no idle state registered, machine stays inactive");
        }
    }

    /// Run the current state and perform the transition it asks for.
    pub fn update(&mut self, cx: &mut StateContext<'_>) {
        let Some(current) = self.current else {
            return;
        };
        let Some(state) = self.states[current.index()].as_mut() else {
            return;
        };
        let requested = state.on_update(cx);
        if requested == current {
            return;
        }

        let next = if self.is_registered(requested) {
            requested
        } else {
            tracing::debug!(
                agent = cx.mind.id.0,
                ?requested,
                "requested state not registered, falling back to idle"
            );
            StateId::Idle
        };
        if next != current && self.is_registered(next) {
            self.switch(cx, next);
        }
    }

    /// Per-physics-step bookkeeping: clear the threat buffers, re-measure the
    /// committed target and report target trigger enter/exit to the state.
    pub fn fixed_update(&mut self, cx: &mut StateContext<'_>) {
        cx.mind.visual_threat.clear();
        cx.mind.audio_threat.clear();
        cx.mind.refresh_target_distance(cx.body.position);
        cx.mind.is_target_reached = false;

        let inside = cx.mind.target_trigger().contains(cx.body.position);
        let was_inside = self.trigger_inside;
        self.trigger_inside = inside;
        if inside {
            cx.mind.is_target_reached = true;
        }
        if inside != was_inside {
            if let Some(state) = self.current_mut() {
                state.on_destination_reached(cx, inside);
            }
        }
    }

    /// Forward a sensor-volume event to the current state.
    pub fn trigger_event(&mut self, cx: &mut StateContext<'_>, phase: TriggerPhase, stimulus: &Stimulus) {
        if let Some(state) = self.current_mut() {
            state.on_trigger_event(cx, phase, stimulus);
        }
    }

    pub fn animator_ik(&mut self, cx: &mut StateContext<'_>) {
        if let Some(state) = self.current_mut() {
            state.on_animator_ik(cx);
        }
    }

    /// Switch to `id` regardless of what the current state wants.
    /// Unregistered ids and the current state are ignored.
    pub fn force_state(&mut self, cx: &mut StateContext<'_>, id: StateId) {
        if self.current == Some(id) {
            return;
        }
        if !self.is_registered(id) {
            tracing::debug!(agent = cx.mind.id.0, ?id, "cannot force unregistered state");
            return;
        }
        self.switch(cx, id);
    }

    /// Exit the current state and leave the machine without one.
    pub fn halt(&mut self, cx: &mut StateContext<'_>) {
        if let Some(state) = self.current_mut() {
            state.on_exit(cx);
        }
        if let Some(from) = self.current.take() {
            tracing::debug!(agent = cx.mind.id.0, ?from, "state machine halted");
        }
    }

    fn current_mut(&mut self) -> Option<&mut Behavior> {
        let id = self.current?;
        self.states[id.index()].as_mut()
    }

    fn switch(&mut self, cx: &mut StateContext<'_>, to: StateId) {
        let from = self.current;
        if let Some(state) = self.current_mut() {
            state.on_exit(cx);
        }
        self.current = Some(to);
        if let Some(state) = self.states[to.index()].as_mut() {
            state.on_enter(cx);
        }
        tracing::debug!(agent = cx.mind.id.0, ?from, ?to, "state transition");
        cx.mind.push_event(AiEvent::StateChanged {
            agent: cx.mind.id,
            from,
            to,
        });
    }
}
