//! Waypoint networks: shared, read-only patrol routes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One named patrol point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    pub position: Vec3,
}

/// An ordered set of waypoints populated by scene setup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointNetwork {
    pub name: String,
    pub waypoints: Vec<Waypoint>,
}

impl WaypointNetwork {
    pub fn new(name: impl Into<String>, positions: impl IntoIterator<Item = Vec3>) -> Self {
        let name = name.into();
        let waypoints = positions
            .into_iter()
            .enumerate()
            .map(|(i, position)| Waypoint {
                name: format!("{name}/{i}"),
                position,
            })
            .collect();
        Self { name, waypoints }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.waypoints.get(index).map(|w| w.position)
    }
}

/// Agent-local progress through a waypoint network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaypointCursor {
    /// `None` until the first waypoint is requested.
    pub index: Option<usize>,
    /// Visit waypoints in random order instead of sequence.
    pub random: bool,
}

impl WaypointCursor {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn random() -> Self {
        Self {
            index: None,
            random: true,
        }
    }

    /// Resolve the current waypoint, first selecting one if none has been
    /// chosen yet, otherwise advancing when `increment` is set.
    ///
    /// `pick(n)` must return a uniformly random index in `0..n`; it is only
    /// called in random mode. Returns `None` for an empty network.
    pub fn resolve(
        &mut self,
        len: usize,
        increment: bool,
        mut pick: impl FnMut(usize) -> usize,
    ) -> Option<usize> {
        if len == 0 {
            return None;
        }
        match self.index {
            None => {
                self.index = Some(if self.random { pick(len) % len } else { 0 });
            }
            Some(current) if increment => {
                let next = if self.random && len > 1 {
                    // Draw among the other len - 1 slots: never the current one.
                    let offset = pick(len - 1) % (len - 1);
                    (current + 1 + offset) % len
                } else if current + 1 >= len {
                    0
                } else {
                    current + 1
                };
                self.index = Some(next);
            }
            Some(current) if current >= len => {
                self.index = Some(0);
            }
            Some(_) => {}
        }
        self.index
    }
}
