//! NPC perception and behavior core for Shamble.
//!
//! Implements the per-agent behavior state machine, threat perception,
//! damage routing and the ragdoll/animation hand-over. Engine services
//! (navigation, animation, physics, the skeleton) are reached only through
//! the traits in [`services`].

pub mod agent;
pub mod body;
pub mod damage;
pub mod fsm;
pub mod mind;
pub mod profiles;
pub mod ragdoll;
pub mod sensor;
pub mod services;
pub mod sound;
pub mod states;

pub use shamble_core as core;

pub use agent::Agent;
pub use damage::{BodyPart, DamageEvent};
pub use fsm::{StateContext, StateMachine};
pub use sensor::{Stimulus, StimulusSource};

#[cfg(test)]
mod tests;
