//! Planning error type.

use thiserror::Error;

use evac_core::{DomainError, NodeId};
use evac_elevation::ElevationError;
use evac_spatial::SpatialError;

/// Errors produced by `evac-plan`.
///
/// Only the highest-point search retries (by widening its radius); every
/// variant here ends the planning call that produced it.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid search configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The user and the destination snap to the same road node.
    #[error("user and destination both resolve to road node {node}; no route to plan")]
    NoRouteAvailable { node: NodeId },

    #[error("destination node {to} is unreachable from {from}")]
    NoPathFound { from: NodeId, to: NodeId },

    #[error("elevation error: {0}")]
    Elevation(#[from] ElevationError),

    #[error("road network has no nodes")]
    EmptyNetwork,

    #[error("routing error: {0}")]
    Spatial(SpatialError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SpatialError> for PlanError {
    fn from(e: SpatialError) -> Self {
        match e {
            SpatialError::NoPath { from, to } => PlanError::NoPathFound { from, to },
            SpatialError::Domain(d) => PlanError::Domain(d),
            other => PlanError::Spatial(other),
        }
    }
}

pub type PlanResult<T> = Result<T, PlanError>;
