//! Multi-source routing through a synthetic "virtual source" node.
//!
//! To find the nearest of several start nodes to one goal, the real graph is
//! wrapped in a read-only [`VirtualSourceView`] that adds one extra node with
//! a zero-cost, zero-time, always-open edge to every candidate.  One ordinary
//! search from that node to the goal then answers the question; the synthetic
//! node is stripped from the front of the result.
//!
//! ```text
//!            ┌──0──► c1 ─── … ──┐
//!   virtual ─┼──0──► c2 ─── … ──┼──► goal
//!            └──0──► c3 ─── … ──┘
//! ```

use std::collections::BTreeSet;

use perds_core::NodeId;

use crate::graph::{Edge, EdgeWeights, GraphView, Node, NodeType};
use crate::{EdgeCost, Route, Router, SpatialError, SpatialResult};

/// Label tried first for the synthetic node id.
pub const VIRTUAL_SOURCE_LABEL: &str = "__virtual_source__";

/// Default bound on id allocation attempts.
pub const DEFAULT_MAX_ID_ATTEMPTS: usize = 64;

/// Read-only decorator adding one synthetic source node to `inner`.
pub struct VirtualSourceView<'a, G: GraphView + ?Sized> {
    inner:  &'a G,
    source: Node,
    edges:  Vec<Edge>,
}

impl<'a, G: GraphView + ?Sized> VirtualSourceView<'a, G> {
    /// Wrap `inner` with a synthetic node joined to every candidate.
    ///
    /// Candidates are deduplicated and visited in ascending id order.
    ///
    /// # Errors
    /// - [`SpatialError::NodeNotFound`] if a candidate is not in `inner`.
    /// - [`SpatialError::VirtualSourceExhausted`] if no free id is found
    ///   within `max_attempts` probes.
    pub fn new(
        inner:        &'a G,
        candidates:   impl IntoIterator<Item = NodeId>,
        max_attempts: usize,
    ) -> SpatialResult<Self> {
        let candidates: BTreeSet<NodeId> = candidates.into_iter().collect();
        if let Some(missing) = candidates.iter().find(|c| !inner.contains_node(c)) {
            return Err(SpatialError::NodeNotFound(missing.clone()));
        }

        let id = allocate_source_id(inner, &candidates, max_attempts)?;
        let edges = candidates
            .into_iter()
            .map(|to| Edge::new(id.clone(), to, EdgeWeights::zero()))
            .collect();
        let source = Node::new(id, NodeType::Other, "virtual source");
        Ok(Self { inner, source, edges })
    }

    /// Id of the synthetic node.
    pub fn source_id(&self) -> &NodeId {
        &self.source.id
    }

    #[inline]
    fn is_source(&self, id: &NodeId) -> bool {
        id == &self.source.id
    }
}

/// Probe the reserved label, then `label#1`, `label#2`, … until an id is
/// found that collides with neither the graph nor the candidates.
fn allocate_source_id<G: GraphView + ?Sized>(
    inner:        &G,
    candidates:   &BTreeSet<NodeId>,
    max_attempts: usize,
) -> SpatialResult<NodeId> {
    for attempt in 0..max_attempts {
        let raw = if attempt == 0 {
            VIRTUAL_SOURCE_LABEL.to_owned()
        } else {
            format!("{VIRTUAL_SOURCE_LABEL}#{attempt}")
        };
        let id = NodeId::new(raw)?;
        if !inner.contains_node(&id) && !candidates.contains(&id) {
            return Ok(id);
        }
    }
    Err(SpatialError::VirtualSourceExhausted { attempts: max_attempts })
}

impl<G: GraphView + ?Sized> GraphView for VirtualSourceView<'_, G> {
    fn version(&self) -> u64 {
        self.inner.version()
    }

    fn node(&self, id: &NodeId) -> Option<&Node> {
        if self.is_source(id) {
            Some(&self.source)
        } else {
            self.inner.node(id)
        }
    }

    fn edge(&self, from: &NodeId, to: &NodeId) -> Option<&Edge> {
        if self.is_source(from) {
            self.edges.iter().find(|e| &e.to == to)
        } else {
            self.inner.edge(from, to)
        }
    }

    fn outgoing_edges<'s>(&'s self, from: &NodeId) -> Box<dyn Iterator<Item = &'s Edge> + 's> {
        if self.is_source(from) {
            Box::new(self.edges.iter())
        } else {
            self.inner.outgoing_edges(from)
        }
    }

    fn node_ids(&self) -> Vec<NodeId> {
        let mut ids = self.inner.node_ids();
        ids.push(self.source.id.clone());
        ids.sort();
        ids
    }
}

/// Wraps a cost function so edges leaving the synthetic node cost zero
/// regardless of what the inner function says.
struct SourceAwareCost<'c, C: EdgeCost + ?Sized> {
    inner:  &'c C,
    source: &'c NodeId,
}

impl<C: EdgeCost + ?Sized> EdgeCost for SourceAwareCost<'_, C> {
    fn cost(&self, edge: &Edge) -> f64 {
        if &edge.from == self.source {
            0.0
        } else {
            self.inner.cost(edge)
        }
    }
}

/// Answers "which of these start nodes is nearest to the goal?" with a single
/// search.
#[derive(Copy, Clone, Debug)]
pub struct MultiSourceRouter<R: Router> {
    pub router:          R,
    pub max_id_attempts: usize,
}

impl<R: Router> MultiSourceRouter<R> {
    pub fn new(router: R) -> Self {
        Self { router, max_id_attempts: DEFAULT_MAX_ID_ATTEMPTS }
    }

    pub fn with_max_id_attempts(mut self, attempts: usize) -> Self {
        self.max_id_attempts = attempts;
        self
    }

    /// Cheapest route from any of `candidates` to `goal`.  The returned route
    /// starts at the chosen candidate; `Ok(None)` if none can reach `goal`.
    ///
    /// # Errors
    /// Unknown candidate or goal, id exhaustion, invalid edge costs, or a
    /// result consisting only of the synthetic node.
    pub fn route_from_any<G, C>(
        &self,
        graph:      &G,
        candidates: impl IntoIterator<Item = NodeId>,
        goal:       &NodeId,
        cost:       &C,
    ) -> SpatialResult<Option<Route>>
    where
        G: GraphView + ?Sized,
        C: EdgeCost + ?Sized,
    {
        let view = VirtualSourceView::new(graph, candidates, self.max_id_attempts)?;
        if view.edges.is_empty() {
            return Ok(None);
        }
        let source = view.source_id().clone();
        let cost = SourceAwareCost { inner: cost, source: &source };

        match self.router.route(&view, &source, goal, &cost)? {
            Some(route) => Ok(Some(route.without_first_node()?)),
            None => Ok(None),
        }
    }
}
