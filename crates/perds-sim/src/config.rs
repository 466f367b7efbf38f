//! Run configuration and the runtime policy/router it selects.

use std::time::Duration;

use perds_core::{Incident, NodeId, SimTime};
use perds_dispatch::{DispatchDecision, DispatchPolicy, MultiSourcePolicy, NearestAvailablePolicy, Snapshot};
use perds_spatial::virtual_source::DEFAULT_MAX_ID_ATTEMPTS;
use perds_spatial::{
    AStarRouter, CostModel, DijkstraRouter, EdgeCost, Graph, GraphView, Route, Router,
    SpatialResult, StraightLineHeuristic,
};

use crate::{SimError, SimResult, SystemCommand, TimedEvent};

/// Which dispatch policy to run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolicyKind {
    #[default]
    NearestAvailable,
    MultiSource,
}

/// Top-level dispatch configuration.
///
/// Typically deserialized by the application crate (with the `serde`
/// feature) and validated before use.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerdsConfig {
    pub policy: PolicyKind,

    /// Edge cost used for dispatch, rerouting and repositioning.
    pub cost_model: CostModel,

    /// Route with A* and a straight-line heuristic assuming no road is
    /// faster than this.  `None` routes with Dijkstra.  Ignored by the
    /// heuristic for `CostModel::Distance`, which needs no speed bound.
    pub astar_max_speed_kmh: Option<f64>,

    /// Bound on synthetic source id probes for the multi-source policy.
    pub max_virtual_source_attempts: usize,

    /// Issue a `PrepositionUnits` command every horizon.  `None` disables
    /// prepositioning.
    pub preposition_horizon: Option<Duration>,
}

impl Default for PerdsConfig {
    fn default() -> Self {
        Self {
            policy:                      PolicyKind::NearestAvailable,
            cost_model:                  CostModel::TravelTime,
            astar_max_speed_kmh:         None,
            max_virtual_source_attempts: DEFAULT_MAX_ID_ATTEMPTS,
            preposition_horizon:         None,
        }
    }
}

impl PerdsConfig {
    /// # Errors
    /// [`SimError::Config`] describing the first invalid field.
    pub fn validate(&self) -> SimResult<()> {
        if self.max_virtual_source_attempts == 0 {
            return Err(SimError::Config("max_virtual_source_attempts must be at least 1".into()));
        }
        if let Some(speed) = self.astar_max_speed_kmh {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(SimError::Config(format!(
                    "astar_max_speed_kmh must be positive and finite, got {speed}"
                )));
            }
        }
        if self.preposition_horizon.is_some_and(|h| h.is_zero()) {
            return Err(SimError::Config("preposition_horizon must be positive".into()));
        }
        Ok(())
    }

    /// Validate and build the configured router.
    pub fn build_router(&self) -> SimResult<ConfiguredRouter> {
        self.validate()?;
        Ok(match (self.astar_max_speed_kmh, self.cost_model) {
            (None, _) => ConfiguredRouter::Dijkstra(DijkstraRouter),
            (Some(_), CostModel::Distance) => {
                ConfiguredRouter::AStar(AStarRouter::new(StraightLineHeuristic::for_distance()))
            }
            // Availability only ever inflates travel time, so the time bound
            // stays admissible.
            (Some(speed), CostModel::TravelTime | CostModel::AvailabilityWeighted) => {
                ConfiguredRouter::AStar(AStarRouter::new(StraightLineHeuristic::for_travel_time(speed)))
            }
        })
    }

    /// Validate and build the configured dispatch policy.
    pub fn build_policy(&self) -> SimResult<ConfiguredPolicy> {
        let router = self.build_router()?;
        Ok(match self.policy {
            PolicyKind::NearestAvailable => {
                ConfiguredPolicy::NearestAvailable(NearestAvailablePolicy::new(router, self.cost_model))
            }
            PolicyKind::MultiSource => ConfiguredPolicy::MultiSource(
                MultiSourcePolicy::new(router, self.cost_model)
                    .with_max_id_attempts(self.max_virtual_source_attempts),
            ),
        })
    }

    /// `PrepositionUnits` events at `from`, `from + horizon`, … strictly
    /// before `until_exclusive`.  Empty when prepositioning is disabled.
    pub fn prepositioning_events(&self, from: SimTime, until_exclusive: SimTime) -> Vec<TimedEvent> {
        let Some(horizon) = self.preposition_horizon.filter(|h| !h.is_zero()) else {
            return vec![];
        };
        let mut events = Vec::new();
        let mut at = from;
        while at < until_exclusive {
            events.push(TimedEvent::new(at, SystemCommand::PrepositionUnits { horizon }));
            let next = at + horizon;
            if next == at {
                break;
            }
            at = next;
        }
        events
    }
}

// ── Runtime selections ────────────────────────────────────────────────────────

/// The router chosen by [`PerdsConfig`].
#[derive(Copy, Clone, Debug)]
pub enum ConfiguredRouter {
    Dijkstra(DijkstraRouter),
    AStar(AStarRouter<StraightLineHeuristic>),
}

impl Router for ConfiguredRouter {
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
        match self {
            ConfiguredRouter::Dijkstra(r) => r.route(graph, start, goal, cost),
            ConfiguredRouter::AStar(r)    => r.route(graph, start, goal, cost),
        }
    }
}

/// The dispatch policy chosen by [`PerdsConfig`].
#[derive(Copy, Clone, Debug)]
pub enum ConfiguredPolicy {
    NearestAvailable(NearestAvailablePolicy<ConfiguredRouter, CostModel>),
    MultiSource(MultiSourcePolicy<ConfiguredRouter, CostModel>),
}

impl DispatchPolicy for ConfiguredPolicy {
    fn name(&self) -> &'static str {
        match self {
            ConfiguredPolicy::NearestAvailable(p) => p.name(),
            ConfiguredPolicy::MultiSource(p)      => p.name(),
        }
    }

    fn decide(&self, snapshot: &Snapshot<'_>, incident: &Incident) -> Option<DispatchDecision> {
        match self {
            ConfiguredPolicy::NearestAvailable(p) => p.decide(snapshot, incident),
            ConfiguredPolicy::MultiSource(p)      => p.decide(snapshot, incident),
        }
    }

    fn route(&self, graph: &Graph, start: &NodeId, goal: &NodeId) -> SpatialResult<Option<Route>> {
        match self {
            ConfiguredPolicy::NearestAvailable(p) => p.route(graph, start, goal),
            ConfiguredPolicy::MultiSource(p)      => p.route(graph, start, goal),
        }
    }
}
