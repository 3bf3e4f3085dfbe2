//! Core types and definitions for the Shamble AI.
//!
//! This crate defines the vocabulary shared across all other crates:
//! identities, targets, characteristics, tuning, waypoints, commands,
//! events and snapshots. It has no dependency on any engine or host.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod target;
pub mod types;
pub mod waypoint;

pub use glam;
