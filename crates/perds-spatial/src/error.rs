//! Spatial-subsystem error types.

use thiserror::Error;

use perds_core::{CoreError, NodeId};

/// Contract violations on [`IndexedMinHeap`][crate::IndexedMinHeap].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeapError {
    #[error("index {0} is already in the heap")]
    AlreadyPresent(usize),

    #[error("index {0} is not in the heap")]
    Absent(usize),

    #[error("priority for index {0} is NaN")]
    NanPriority(usize),

    #[error("decrease_key({index}) would raise priority from {current} to {requested}")]
    PriorityIncrease {
        index:     usize,
        current:   f64,
        requested: f64,
    },

    #[error("extract_min on an empty heap")]
    Empty,
}

/// Errors produced by `perds-spatial`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpatialError {
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("edge {from} -> {to} not found in graph")]
    EdgeNotFound { from: NodeId, to: NodeId },

    #[error("edge cost for {from} -> {to} is {cost}; costs must be non-negative or +inf")]
    InvalidEdgeCost { from: NodeId, to: NodeId, cost: f64 },

    #[error("a route needs at least one node")]
    EmptyRoute,

    #[error("could not allocate a virtual source id after {attempts} attempts")]
    VirtualSourceExhausted { attempts: usize },

    #[error("multi-source route consists only of the virtual source node")]
    DegenerateVirtualRoute,

    #[error("invalid value: {0}")]
    Invalid(#[from] CoreError),

    #[error("priority queue: {0}")]
    Heap(#[from] HeapError),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
