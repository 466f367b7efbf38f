//! Routing trait, `Route`, and the Dijkstra / A* implementations.
//!
//! # Pluggability
//!
//! Callers route through the [`Router`] trait with any [`GraphView`] and any
//! [`EdgeCost`], so the same search serves the live graph, the virtual-source
//! decorator, and whichever cost model the dispatch policy uses.
//!
//! # Search outline
//!
//! ```text
//! 1. start == goal            → trivial single-node route
//! 2. discover nodes lazily    → dense index 0, 1, 2, … per search
//! 3. IndexedMinHeap over the dense indices, keyed by g (+ h for A*)
//! 4. goal popped              → backtrack predecessors
//! 5. re-walk the path edges   → total distance / travel time
//! ```
//!
//! An unreachable goal is `Ok(None)`; unknown endpoints and invalid edge costs
//! are errors.

use std::collections::HashMap;
use std::time::Duration;

use perds_core::NodeId;

use crate::graph::{EdgeKey, GraphView, Node};
use crate::{EdgeCost, IndexedMinHeap, SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// An ordered, non-empty node path with aggregated totals and the graph
/// version it was computed against.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    nodes:             Vec<NodeId>,
    total_cost:        f64,
    total_distance_km: f64,
    total_travel_time: Duration,
    graph_version:     u64,
}

impl Route {
    /// Zero-cost route that starts and ends at `node`.
    pub fn trivial(node: NodeId, graph_version: u64) -> Self {
        Self {
            nodes: vec![node],
            total_cost: 0.0,
            total_distance_km: 0.0,
            total_travel_time: Duration::ZERO,
            graph_version,
        }
    }

    /// Build a route along `nodes`, summing distance and travel time over the
    /// edges of `graph`.  `total_cost` is taken as given.
    ///
    /// # Errors
    /// - [`SpatialError::EmptyRoute`] if `nodes` is empty.
    /// - [`SpatialError::EdgeNotFound`] if consecutive nodes are not joined
    ///   by an edge.
    pub fn from_path<G: GraphView + ?Sized>(
        graph:      &G,
        nodes:      Vec<NodeId>,
        total_cost: f64,
    ) -> SpatialResult<Self> {
        if nodes.is_empty() {
            return Err(SpatialError::EmptyRoute);
        }
        let mut total_distance_km = 0.0;
        let mut total_travel_time = Duration::ZERO;
        for pair in nodes.windows(2) {
            let edge = graph.edge(&pair[0], &pair[1]).ok_or_else(|| SpatialError::EdgeNotFound {
                from: pair[0].clone(),
                to:   pair[1].clone(),
            })?;
            total_distance_km += edge.weights.distance_km();
            total_travel_time += edge.weights.travel_time();
        }
        Ok(Self {
            nodes,
            total_cost,
            total_distance_km,
            total_travel_time,
            graph_version: graph.version(),
        })
    }

    pub fn nodes(&self) -> &[NodeId] { &self.nodes }
    pub fn total_cost(&self) -> f64 { self.total_cost }
    pub fn total_distance_km(&self) -> f64 { self.total_distance_km }
    pub fn total_travel_time(&self) -> Duration { self.total_travel_time }
    pub fn graph_version(&self) -> u64 { self.graph_version }

    pub fn start(&self) -> &NodeId {
        &self.nodes[0]
    }

    pub fn goal(&self) -> &NodeId {
        &self.nodes[self.nodes.len() - 1]
    }

    /// `true` if the route never leaves its start node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() == 1
    }

    /// `true` once the graph has been mutated since this route was computed.
    pub fn is_stale(&self, current_version: u64) -> bool {
        current_version > self.graph_version
    }

    /// The directed edges traversed, in order.
    pub fn edge_keys(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.nodes
            .windows(2)
            .map(|pair| EdgeKey::new(pair[0].clone(), pair[1].clone()))
    }

    /// Drop the first node; totals are kept.  Used to strip a synthetic source.
    pub(crate) fn without_first_node(mut self) -> SpatialResult<Self> {
        if self.nodes.len() < 2 {
            return Err(SpatialError::DegenerateVirtualRoute);
        }
        self.nodes.remove(0);
        Ok(self)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable single-source shortest-path search.
pub trait Router: Send + Sync {
    /// Cheapest route from `start` to `goal` under `cost`.
    ///
    /// Returns `Ok(None)` when `goal` is unreachable.
    ///
    /// # Errors
    /// - [`SpatialError::NodeNotFound`] if `start` or `goal` is unknown.
    /// - [`SpatialError::InvalidEdgeCost`] if `cost` yields NaN or a negative
    ///   value for any examined edge.
    fn route<G, C>(
        &self,
        graph: &G,
        start: &NodeId,
        goal:  &NodeId,
        cost:  &C,
    ) -> SpatialResult<Option<Route>>
    where
        G: GraphView + ?Sized,
        C: EdgeCost + ?Sized;
}

// ── Heuristics ────────────────────────────────────────────────────────────────

/// Lower-bound estimate of the remaining cost from `from` to `goal`.
///
/// A* returns optimal routes whenever the estimate never exceeds the true
/// remaining cost (admissibility).
pub trait Heuristic: Send + Sync {
    fn estimate(&self, from: &Node, goal: &Node) -> f64;
}

/// Always zero; turns A* into Dijkstra.
#[derive(Copy, Clone, Debug, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    #[inline]
    fn estimate(&self, _from: &Node, _goal: &Node) -> f64 {
        0.0
    }
}

/// Great-circle distance scaled into cost units.
///
/// Nodes without a location estimate zero.
#[derive(Copy, Clone, Debug)]
pub struct StraightLineHeuristic {
    cost_per_km: f64,
}

impl StraightLineHeuristic {
    /// For costs measured in kilometres (`CostModel::Distance`).  Admissible
    /// when every edge's distance is at least the straight line between its
    /// endpoints.
    pub fn for_distance() -> Self {
        Self { cost_per_km: 1.0 }
    }

    /// For costs measured in seconds, assuming no edge is traversed faster
    /// than `max_speed_kmh`.
    pub fn for_travel_time(max_speed_kmh: f64) -> Self {
        Self { cost_per_km: 3_600.0 / max_speed_kmh }
    }
}

impl Heuristic for StraightLineHeuristic {
    fn estimate(&self, from: &Node, goal: &Node) -> f64 {
        match (from.location, goal.location) {
            (Some(a), Some(b)) => a.distance_km(b) * self.cost_per_km,
            _ => 0.0,
        }
    }
}

// ── Routers ───────────────────────────────────────────────────────────────────

/// Dijkstra's algorithm over an [`IndexedMinHeap`].
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route<G, C>(
        &self,
        graph: &G,
        start: &NodeId,
        goal:  &NodeId,
        cost:  &C,
    ) -> SpatialResult<Option<Route>>
    where
        G: GraphView + ?Sized,
        C: EdgeCost + ?Sized,
    {
        best_first(graph, start, goal, cost, &ZeroHeuristic)
    }
}

/// A* search.  Same total cost as [`DijkstraRouter`] for every reachable pair
/// when `H` is admissible; the node sequence may differ between equal-cost
/// optima.
#[derive(Copy, Clone, Debug, Default)]
pub struct AStarRouter<H: Heuristic> {
    pub heuristic: H,
}

impl<H: Heuristic> AStarRouter<H> {
    pub fn new(heuristic: H) -> Self {
        Self { heuristic }
    }
}

impl<H: Heuristic> Router for AStarRouter<H> {
    fn route<G, C>(
        &self,
        graph: &G,
        start: &NodeId,
        goal:  &NodeId,
        cost:  &C,
    ) -> SpatialResult<Option<Route>>
    where
        G: GraphView + ?Sized,
        C: EdgeCost + ?Sized,
    {
        best_first(graph, start, goal, cost, &self.heuristic)
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// No predecessor.
const NONE: usize = usize::MAX;

fn best_first<G, C, H>(
    graph:     &G,
    start:     &NodeId,
    goal:      &NodeId,
    cost:      &C,
    heuristic: &H,
) -> SpatialResult<Option<Route>>
where
    G: GraphView + ?Sized,
    C: EdgeCost + ?Sized,
    H: Heuristic + ?Sized,
{
    let version = graph.version();
    let start_node = graph.node(start).ok_or_else(|| SpatialError::NodeNotFound(start.clone()))?;
    let goal_node  = graph.node(goal).ok_or_else(|| SpatialError::NodeNotFound(goal.clone()))?;

    if start == goal {
        return Ok(Some(Route::trivial(start.clone(), version)));
    }

    // Dense per-search indices, assigned on discovery.
    let mut ids:      Vec<NodeId>              = vec![start.clone()];
    let mut index_of: HashMap<NodeId, usize>   = HashMap::from([(start.clone(), 0)]);
    let mut g:        Vec<f64>                 = vec![0.0];
    let mut h:        Vec<f64>                 = vec![heuristic.estimate(start_node, goal_node)];
    let mut prev:     Vec<usize>               = vec![NONE];

    let mut open = IndexedMinHeap::new();
    open.insert(0, h[0])?;
    let mut popped = 0usize;

    while !open.is_empty() {
        let u = open.extract_min()?;
        popped += 1;

        if &ids[u] == goal {
            let route = reconstruct(graph, &ids, &prev, u, g[u])?;
            tracing::trace!(
                %start, %goal, popped, discovered = ids.len(),
                cost = route.total_cost(), "route found"
            );
            return Ok(Some(route));
        }

        // `ids` grows while relaxing, so hold an owned key.
        let from = ids[u].clone();
        for edge in graph.outgoing_edges(&from) {
            let c = cost.cost(edge);
            if c.is_nan() || c < 0.0 {
                return Err(SpatialError::InvalidEdgeCost {
                    from: edge.from.clone(),
                    to:   edge.to.clone(),
                    cost: c,
                });
            }
            if c.is_infinite() {
                continue;
            }
            let candidate = g[u] + c;

            match index_of.get(&edge.to) {
                None => {
                    let v = ids.len();
                    let estimate = graph
                        .node(&edge.to)
                        .map_or(0.0, |n| heuristic.estimate(n, goal_node));
                    ids.push(edge.to.clone());
                    index_of.insert(edge.to.clone(), v);
                    g.push(candidate);
                    h.push(estimate);
                    prev.push(u);
                    open.insert(v, candidate + estimate)?;
                }
                Some(&v) if candidate < g[v] => {
                    g[v] = candidate;
                    prev[v] = u;
                    if open.contains(v) {
                        open.decrease_key(v, candidate + h[v])?;
                    } else {
                        // Reopen: only reachable with an inconsistent heuristic.
                        open.insert(v, candidate + h[v])?;
                    }
                }
                Some(_) => {}
            }
        }
    }

    tracing::trace!(%start, %goal, popped, "goal unreachable");
    Ok(None)
}

fn reconstruct<G: GraphView + ?Sized>(
    graph:  &G,
    ids:    &[NodeId],
    prev:   &[usize],
    goal:   usize,
    cost:   f64,
) -> SpatialResult<Route> {
    let mut path = Vec::new();
    let mut cur = goal;
    while cur != NONE {
        path.push(ids[cur].clone());
        cur = prev[cur];
    }
    path.reverse();
    Route::from_path(graph, path, cost)
}
