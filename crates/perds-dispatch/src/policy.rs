//! The `DispatchPolicy` trait and the two built-in policies.

use std::collections::BTreeMap;

use perds_core::{Incident, NodeId, ResponseUnit};
use perds_spatial::{
    CostModel, DijkstraRouter, EdgeCost, Graph, GraphView, MultiSourceRouter, Route, Router,
    SpatialResult,
};

use crate::priority::{compare_candidates, compare_co_located, Candidate};
use crate::{DispatchDecision, Snapshot};

/// Pluggable unit selection.
///
/// A policy looks at one incident against a read-only [`Snapshot`] and picks
/// at most one unit.  It never fails: routing problems mean "no decision".
///
/// # Example
///
/// ```rust,ignore
/// let policy = NearestAvailablePolicy::new(DijkstraRouter, CostModel::TravelTime);
/// let engine = DispatchEngine::new(policy);
/// let outcome = engine.run(snapshot);
/// ```
pub trait DispatchPolicy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Best unit for `incident`, or `None` if no eligible unit can reach it.
    fn decide(&self, snapshot: &Snapshot<'_>, incident: &Incident) -> Option<DispatchDecision>;

    /// Single-source route under this policy's router and cost function.
    ///
    /// The controller uses it to reroute live assignments and to validate
    /// repositioning moves, so both follow the same costs as dispatch.
    fn route(&self, graph: &Graph, start: &NodeId, goal: &NodeId) -> SpatialResult<Option<Route>>;
}

// ── Nearest available ─────────────────────────────────────────────────────────

/// One search per eligible unit; keeps the best by the canonical candidate
/// order.
#[derive(Copy, Clone, Debug, Default)]
pub struct NearestAvailablePolicy<R: Router = DijkstraRouter, C: EdgeCost = CostModel> {
    pub router: R,
    pub cost:   C,
}

impl<R: Router, C: EdgeCost> NearestAvailablePolicy<R, C> {
    pub fn new(router: R, cost: C) -> Self {
        Self { router, cost }
    }
}

impl<R, C> DispatchPolicy for NearestAvailablePolicy<R, C>
where
    R: Router,
    C: EdgeCost + Send + Sync,
{
    fn name(&self) -> &'static str {
        "nearest-available"
    }

    fn decide(&self, snapshot: &Snapshot<'_>, incident: &Incident) -> Option<DispatchDecision> {
        let best = snapshot
            .eligible_units(incident)
            .filter_map(|unit| {
                match self.router.route(snapshot.graph, unit.location(), incident.location(), &self.cost) {
                    Ok(Some(route)) => Some(Candidate { unit, route }),
                    Ok(None) => None,
                    Err(err) => {
                        tracing::debug!(
                            incident = %incident.id(), unit = %unit.id(), %err,
                            "candidate skipped: routing failed"
                        );
                        None
                    }
                }
            })
            .min_by(|a, b| compare_candidates(a, b, incident.severity()))?;

        Some(DispatchDecision {
            incident:   incident.id().clone(),
            unit:       best.unit.id().clone(),
            rationale:  format!(
                "{}: nearest eligible {} at cost {:.3}",
                self.name(),
                best.unit.unit_type(),
                best.route.total_cost()
            ),
            route:      best.route,
            decided_at: snapshot.now,
        })
    }

    fn route(&self, graph: &Graph, start: &NodeId, goal: &NodeId) -> SpatialResult<Option<Route>> {
        self.router.route(graph, start, goal, &self.cost)
    }
}

// ── Multi-source ──────────────────────────────────────────────────────────────

/// One virtual-source search per incident over the nodes holding eligible
/// units.  Nodes that tie on cost are confirmed with further searches, and
/// their units are ranked by the canonical candidate order.
#[derive(Copy, Clone, Debug)]
pub struct MultiSourcePolicy<R: Router = DijkstraRouter, C: EdgeCost = CostModel> {
    pub router: MultiSourceRouter<R>,
    pub cost:   C,
}

impl<R: Router, C: EdgeCost> MultiSourcePolicy<R, C> {
    pub fn new(router: R, cost: C) -> Self {
        Self { router: MultiSourceRouter::new(router), cost }
    }

    /// Bound on synthetic source id probes.
    pub fn with_max_id_attempts(mut self, attempts: usize) -> Self {
        self.router = self.router.with_max_id_attempts(attempts);
        self
    }

    /// One virtual-source search from `nodes`.  Errors degrade to `None`.
    fn search<'n>(
        &self,
        snapshot: &Snapshot<'_>,
        incident: &Incident,
        nodes:    impl IntoIterator<Item = &'n NodeId>,
    ) -> Option<Route> {
        let mut nodes = nodes.into_iter().cloned().peekable();
        nodes.peek()?;
        match self.router.route_from_any(snapshot.graph, nodes, incident.location(), &self.cost) {
            Ok(route) => route,
            Err(err) => {
                tracing::debug!(incident = %incident.id(), %err, "multi-source search failed");
                None
            }
        }
    }
}

impl<R, C> DispatchPolicy for MultiSourcePolicy<R, C>
where
    R: Router,
    C: EdgeCost + Send + Sync,
{
    fn name(&self) -> &'static str {
        "multi-source"
    }

    fn decide(&self, snapshot: &Snapshot<'_>, incident: &Incident) -> Option<DispatchDecision> {
        // Units parked on nodes that have since been removed cannot start a
        // search; leave them out rather than failing the whole incident.
        let mut by_node: BTreeMap<&NodeId, Vec<&ResponseUnit>> = BTreeMap::new();
        for unit in snapshot.eligible_units(incident) {
            if snapshot.graph.contains_node(unit.location()) {
                by_node.entry(unit.location()).or_default().push(unit);
            }
        }
        if by_node.is_empty() {
            return None;
        }

        let route = self.search(snapshot, incident, by_node.keys().copied())?;
        let best_cost = route.total_cost();

        // Further searches over the remaining nodes find every other node that
        // reaches the incident at exactly the same cost.
        let mut tied = vec![route.start().clone()];
        loop {
            let rest = by_node.keys().copied().filter(|n| !tied.contains(n));
            match self.search(snapshot, incident, rest) {
                Some(next) if next.total_cost().total_cmp(&best_cost).is_eq() => {
                    tied.push(next.start().clone());
                }
                _ => break,
            }
        }

        let best = if tied.len() == 1 {
            let unit = by_node
                .get(route.start())?
                .iter()
                .copied()
                .min_by(|a, b| compare_co_located(a, b, incident.severity()))?;
            Candidate { unit, route }
        } else {
            // Units on different nodes are compared on the same single-source
            // routes the nearest-available policy would see.
            tied.iter()
                .filter_map(|node| {
                    let route = self.route(snapshot.graph, node, incident.location()).ok().flatten()?;
                    Some(by_node.get(node)?.iter().copied().map(move |unit| Candidate { unit, route: route.clone() }))
                })
                .flatten()
                .min_by(|a, b| compare_candidates(a, b, incident.severity()))?
        };

        Some(DispatchDecision {
            incident:   incident.id().clone(),
            unit:       best.unit.id().clone(),
            rationale:  format!(
                "{}: closest of {} staging nodes ({} tied), {} at cost {:.3}",
                self.name(),
                by_node.len(),
                tied.len(),
                best.unit.unit_type(),
                best.route.total_cost()
            ),
            route:      best.route,
            decided_at: snapshot.now,
        })
    }

    fn route(&self, graph: &Graph, start: &NodeId, goal: &NodeId) -> SpatialResult<Option<Route>> {
        self.router.router.route(graph, start, goal, &self.cost)
    }
}
