//! Mutable, versioned road graph.
//!
//! # Data layout
//!
//! Nodes live in a `BTreeMap<NodeId, Node>`; outgoing edges are stored as an
//! adjacency table `from → (to → Edge)`.  Both maps are ordered so every
//! traversal (and therefore every search tie-break) is deterministic.
//!
//! # Versioning
//!
//! Every mutating operation bumps `version` and returns the new value.  A
//! [`Route`][crate::Route] records the version it was computed against; the
//! route is *stale* once the graph version has moved past it.  Staleness is
//! informational only: the controller's edge-change cascade is what repairs
//! affected assignments.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use perds_core::{CoreError, CoreResult, GeoPoint, NodeId};

use crate::{SpatialError, SpatialResult};

// ── Nodes ─────────────────────────────────────────────────────────────────────

/// Classification of a road node.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeType {
    City,
    DispatchCentre,
    Other,
}

/// A road-network node.  Immutable once added; re-adding replaces it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id:        NodeId,
    pub node_type: NodeType,
    pub location:  Option<GeoPoint>,
    pub label:     String,
}

impl Node {
    pub fn new(id: NodeId, node_type: NodeType, label: impl Into<String>) -> Self {
        Self { id, node_type, location: None, label: label.into() }
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }
}

// ── Edges ─────────────────────────────────────────────────────────────────────

/// Validated per-edge weights.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeWeights {
    distance_km:  f64,
    travel_time:  Duration,
    availability: f64,
}

impl EdgeWeights {
    /// # Errors
    /// - [`CoreError::NegativeOrNonFinite`] if `distance_km` is negative, NaN
    ///   or infinite.
    /// - [`CoreError::OutOfUnitRange`] if `availability` is outside `[0, 1]`.
    pub fn new(distance_km: f64, travel_time: Duration, availability: f64) -> CoreResult<Self> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(CoreError::NegativeOrNonFinite { field: "distance_km", value: distance_km });
        }
        if !(0.0..=1.0).contains(&availability) {
            return Err(CoreError::OutOfUnitRange { field: "availability", value: availability });
        }
        Ok(Self { distance_km, travel_time, availability })
    }

    /// Zero distance, zero time, fully available.
    pub const fn zero() -> Self {
        Self { distance_km: 0.0, travel_time: Duration::ZERO, availability: 1.0 }
    }

    #[inline] pub fn distance_km(&self) -> f64 { self.distance_km }
    #[inline] pub fn travel_time(&self) -> Duration { self.travel_time }
    #[inline] pub fn availability(&self) -> f64 { self.availability }
}

/// Whether an edge may currently be traversed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeStatus {
    Open,
    Closed,
}

/// A directed road segment.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub from:    NodeId,
    pub to:      NodeId,
    pub weights: EdgeWeights,
    pub status:  EdgeStatus,
}

impl Edge {
    /// An `Open` edge.
    pub fn new(from: NodeId, to: NodeId, weights: EdgeWeights) -> Self {
        Self { from, to, weights, status: EdgeStatus::Open }
    }

    pub fn with_status(mut self, status: EdgeStatus) -> Self {
        self.status = status;
        self
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == EdgeStatus::Open
    }

    /// The `(from, to)` key of this edge.
    pub fn key(&self) -> EdgeKey {
        EdgeKey { from: self.from.clone(), to: self.to.clone() }
    }
}

/// Ordered `(from, to)` pair identifying a directed edge.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeKey {
    pub from: NodeId,
    pub to:   NodeId,
}

impl EdgeKey {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

// ── Read-only view ────────────────────────────────────────────────────────────

/// Read-only graph contract used by routers.
///
/// Implemented by [`Graph`] and by decorators such as
/// [`VirtualSourceView`][crate::VirtualSourceView].
pub trait GraphView {
    /// Current graph version.
    fn version(&self) -> u64;

    fn node(&self, id: &NodeId) -> Option<&Node>;

    fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    fn edge(&self, from: &NodeId, to: &NodeId) -> Option<&Edge>;

    /// Outgoing edges of `from` in ascending destination order.  Empty for
    /// unknown nodes.
    fn outgoing_edges<'a>(&'a self, from: &NodeId) -> Box<dyn Iterator<Item = &'a Edge> + 'a>;

    /// All node ids in ascending order.
    fn node_ids(&self) -> Vec<NodeId>;
}

impl<G: GraphView + ?Sized> GraphView for &G {
    fn version(&self) -> u64 {
        (**self).version()
    }

    fn node(&self, id: &NodeId) -> Option<&Node> {
        (**self).node(id)
    }

    fn edge(&self, from: &NodeId, to: &NodeId) -> Option<&Edge> {
        (**self).edge(from, to)
    }

    fn outgoing_edges<'a>(&'a self, from: &NodeId) -> Box<dyn Iterator<Item = &'a Edge> + 'a> {
        (**self).outgoing_edges(from)
    }

    fn node_ids(&self) -> Vec<NodeId> {
        (**self).node_ids()
    }
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// Mutable directed road graph with at most one edge per ordered node pair.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes:     BTreeMap<NodeId, Node>,
    adjacency: BTreeMap<NodeId, BTreeMap<NodeId, Edge>>,
    version:   u64,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every edge in `(from, to)` order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacency.values().flat_map(BTreeMap::values)
    }

    /// Every edge that starts or ends at `id`, in `(from, to)` order.
    pub fn edges_touching(&self, id: &NodeId) -> Vec<Edge> {
        self.edges()
            .filter(|e| &e.from == id || &e.to == id)
            .cloned()
            .collect()
    }

    fn bump(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    // ── Mutators ──────────────────────────────────────────────────────────

    /// Insert `node`, replacing any node with the same id.  Existing edges
    /// are kept.
    pub fn add_node(&mut self, node: Node) -> u64 {
        self.nodes.insert(node.id.clone(), node);
        self.bump()
    }

    /// Remove a node and prune every edge that references it.
    ///
    /// # Errors
    /// [`SpatialError::NodeNotFound`] if `id` is unknown.
    pub fn remove_node(&mut self, id: &NodeId) -> SpatialResult<u64> {
        if self.nodes.remove(id).is_none() {
            return Err(SpatialError::NodeNotFound(id.clone()));
        }
        self.adjacency.remove(id);
        for out in self.adjacency.values_mut() {
            out.remove(id);
        }
        Ok(self.bump())
    }

    /// Insert or replace the edge `(edge.from, edge.to)`.
    ///
    /// # Errors
    /// [`SpatialError::NodeNotFound`] if either endpoint is unknown.
    pub fn put_edge(&mut self, edge: Edge) -> SpatialResult<u64> {
        for end in [&edge.from, &edge.to] {
            if !self.nodes.contains_key(end) {
                return Err(SpatialError::NodeNotFound(end.clone()));
            }
        }
        self.adjacency
            .entry(edge.from.clone())
            .or_default()
            .insert(edge.to.clone(), edge);
        Ok(self.bump())
    }

    /// # Errors
    /// [`SpatialError::EdgeNotFound`] if no such edge exists.
    pub fn remove_edge(&mut self, from: &NodeId, to: &NodeId) -> SpatialResult<u64> {
        let removed = self.adjacency.get_mut(from).and_then(|out| out.remove(to));
        if removed.is_none() {
            return Err(SpatialError::EdgeNotFound { from: from.clone(), to: to.clone() });
        }
        if self.adjacency.get(from).is_some_and(BTreeMap::is_empty) {
            self.adjacency.remove(from);
        }
        Ok(self.bump())
    }

    /// Replace the weights and status of an existing edge.
    ///
    /// # Errors
    /// [`SpatialError::EdgeNotFound`] if the edge does not exist; edges are
    /// never created as a side effect.
    pub fn update_edge(
        &mut self,
        from:    &NodeId,
        to:      &NodeId,
        weights: EdgeWeights,
        status:  EdgeStatus,
    ) -> SpatialResult<u64> {
        let edge = self
            .adjacency
            .get_mut(from)
            .and_then(|out| out.get_mut(to))
            .ok_or_else(|| SpatialError::EdgeNotFound { from: from.clone(), to: to.clone() })?;
        edge.weights = weights;
        edge.status = status;
        Ok(self.bump())
    }
}

impl GraphView for Graph {
    fn version(&self) -> u64 {
        self.version
    }

    fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn edge(&self, from: &NodeId, to: &NodeId) -> Option<&Edge> {
        self.adjacency.get(from).and_then(|out| out.get(to))
    }

    fn outgoing_edges<'a>(&'a self, from: &NodeId) -> Box<dyn Iterator<Item = &'a Edge> + 'a> {
        match self.adjacency.get(from) {
            Some(out) => Box::new(out.values()),
            None      => Box::new(std::iter::empty()),
        }
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().cloned().collect()
    }
}
