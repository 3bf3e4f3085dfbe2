//! Headless simulation host for the Shamble AI.
//!
//! Owns the hecs ECS world and a ray-castable collider scene, drives every
//! agent through the per-tick phases and produces WorldSnapshots.

pub mod components;
pub mod engine;
pub mod error;
pub mod headless;
pub mod physics;
pub mod scenario;
pub mod systems;
pub mod world_setup;

pub use shamble_core as core;
pub use engine::{SimConfig, SimulationEngine};
pub use error::SimError;
