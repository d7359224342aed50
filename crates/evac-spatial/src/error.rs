//! Spatial-subsystem error type.

use thiserror::Error;

use evac_core::{DomainError, NodeId};

/// Errors produced by `evac-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "itn")]
    #[error("ITN parse error: {0}")]
    Itn(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
