use thiserror::Error;

use shamble_core::error::ConfigError;
use shamble_core::types::AgentId;

/// Errors from wiring the simulation or applying commands to it.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("no agent with id {}", .0 .0)]
    UnknownAgent(AgentId),

    #[error("no waypoint network named `{0}`")]
    UnknownNetwork(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
