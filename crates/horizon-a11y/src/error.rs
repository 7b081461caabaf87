//! Error types for the accessibility bridge.
//!
//! Errors here are only ever returned to the application or the surface
//! lifecycle code. Host queries never see them: a failed lookup on the query
//! path becomes an absent result.

use accesskit::NodeId;

/// Result type alias for tree operations.
pub type TreeResult<T> = std::result::Result<T, TreeError>;

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors from mutating an [`AccessibilityTree`](crate::AccessibilityTree).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The node is not in the tree.
    #[error("node {0:?} is not in the tree")]
    UnknownNode(NodeId),

    /// A node with this id is already live.
    #[error("node {0:?} is already in the tree")]
    DuplicateId(NodeId),

    /// The id does not fit the platform's virtual view id space.
    #[error("node {0:?} is outside the virtual view id range")]
    IdOutOfRange(NodeId),

    /// The change would make a node its own ancestor or give it two parents.
    #[error("node {0:?} would appear twice in the tree")]
    Cycle(NodeId),

    /// The root can be replaced by a tree update but never removed.
    #[error("the root node {0:?} cannot be removed")]
    RootRemoval(NodeId),
}

/// Errors from creating and configuring adapters.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Handle creation failed; no handle was produced.
    #[error("adapter registry is full ({capacity} live adapters)")]
    RegistryFull {
        /// Configured maximum number of live adapters.
        capacity: usize,
    },

    /// The configuration file could not be read.
    #[error("failed to read bridge configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration could not be parsed.
    #[error("invalid bridge configuration: {0}")]
    Config(#[from] toml::de::Error),
}
