//! Error types for the scramble engine

use thiserror::Error;

use crate::ids::{ManagerId, NodeId, ObjectId};
use crate::state::ControlState;

/// Error types for scene access and manager operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScrambleError {
    /// The scene adapter was asked about an object it does not know
    #[error("Unknown scene object: {0}")]
    UnknownObject(ObjectId),

    /// A node operation was routed to a manager that does not own the node
    #[error("Node {node} is not registered with manager {manager}")]
    NotRegistered {
        /// Node that was looked up
        node: NodeId,
        /// Manager that was asked
        manager: ManagerId,
    },

    /// Configuration values out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Only the resting states can be forced
    #[error("Cannot force transition to {0}: only STOP and NONE can be forced")]
    NotForceable(ControlState),

    /// A control state name could not be parsed
    #[error("Unknown control state: {0}")]
    UnknownState(String),

    /// Host-specific scene failure
    #[error("Scene error: {0}")]
    Scene(String),
}

/// Result type using ScrambleError
pub type Result<T> = std::result::Result<T, ScrambleError>;
