//! `perds-spatial`: versioned road graph and shortest-path routing.
//!
//! # Crate layout
//!
//! | Module             | Contents                                                   |
//! |--------------------|------------------------------------------------------------|
//! | [`graph`]          | `Graph`, `GraphView`, `Node`, `Edge`, `EdgeWeights`        |
//! | [`heap`]           | `IndexedMinHeap` (decrease-key priority queue)             |
//! | [`cost`]           | `EdgeCost` trait, `CostModel`                              |
//! | [`router`]         | `Router` trait, `Route`, `DijkstraRouter`, `AStarRouter`   |
//! | [`virtual_source`] | `VirtualSourceView`, `MultiSourceRouter`                   |
//! | [`error`]          | `SpatialError`, `HeapError`, `SpatialResult<T>`            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod cost;
pub mod error;
pub mod graph;
pub mod heap;
pub mod router;
pub mod virtual_source;


pub use cost::{CostModel, EdgeCost};
pub use error::{HeapError, SpatialError, SpatialResult};
pub use graph::{Edge, EdgeKey, EdgeStatus, EdgeWeights, Graph, GraphView, Node, NodeType};
pub use heap::IndexedMinHeap;
pub use router::{
    AStarRouter, DijkstraRouter, Heuristic, Route, Router, StraightLineHeuristic, ZeroHeuristic,
};
pub use virtual_source::{MultiSourceRouter, VirtualSourceView, VIRTUAL_SOURCE_LABEL};
