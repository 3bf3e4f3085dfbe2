//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! They own no state; everything lives in components.

pub mod behavior;
pub mod cleanup;
pub mod movement;
pub mod perception;
pub mod ragdoll;
pub mod snapshot;
pub mod sound;
