//! Errors raised by tree and collection operations.

use crate::tree::NodeId;

/// Errors that can occur while mutating the HUD tree.
///
/// Registration errors are contract violations: the operation that raised
/// them made no change to the tree, and retrying it will fail the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HudError {
    /// The node is already registered to the requested parent.
    AlreadyRegistered { node: NodeId, parent: NodeId },

    /// Ownership could not be transferred to the requested parent.
    RegistrationFailed { node: NodeId, parent: NodeId },

    /// Node not found in the tree.
    NodeNotFound(NodeId),

    /// The node does not carry a collection.
    NotACollection(NodeId),

    /// Container index out of bounds.
    IndexOutOfRange { index: usize, len: usize },

    /// Container range out of bounds.
    InvalidRange {
        start: usize,
        count: usize,
        len: usize,
    },
}

impl std::fmt::Display for HudError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HudError::AlreadyRegistered { node, parent } => {
                write!(f, "Node {:?} is already registered to {:?}", node, parent)
            }
            HudError::RegistrationFailed { node, parent } => {
                write!(f, "Failed to register node {:?} to {:?}", node, parent)
            }
            HudError::NodeNotFound(id) => write!(f, "Node {:?} not found", id),
            HudError::NotACollection(id) => write!(f, "Node {:?} is not a collection", id),
            HudError::IndexOutOfRange { index, len } => {
                write!(f, "Container index {} out of range (len {})", index, len)
            }
            HudError::InvalidRange { start, count, len } => write!(
                f,
                "Invalid container range: {}..{} (len {})",
                start,
                start + count,
                len
            ),
        }
    }
}

impl std::error::Error for HudError {}

/// Result type for tree operations.
pub type HudResult<T> = Result<T, HudError>;
