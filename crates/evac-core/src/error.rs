//! Invalid-input error shared by the cost model and graph construction.
//!
//! Sub-crates wrap [`DomainError`] as one variant of their own error enums
//! via `#[from]`.  A domain error is never retried: it aborts the planning
//! operation that hit it.

use thiserror::Error;

use crate::{LinkId, NodeId};

/// Input that violates a precondition of the routing core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("link length must be positive and finite, got {0}")]
    InvalidLength(f64),

    #[error("altitude difference must be finite, got {0}")]
    InvalidAltitude(f64),

    #[error("link {link} references unknown node {node}")]
    UnknownNode { link: String, node: String },

    #[error("link {link} references {node}, but the graph has {node_count} nodes")]
    NodeOutOfRange {
        link:       LinkId,
        node:       NodeId,
        node_count: usize,
    },

    #[error("fitness score must be between 1 and 10, got {0}")]
    InvalidFitness(u8),

    #[error("{what} index overflows the u32 arena")]
    ArenaOverflow { what: &'static str },
}

/// Shorthand result type for domain validation.
pub type DomainResult<T> = Result<T, DomainError>;
