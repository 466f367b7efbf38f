//! Collaborator interfaces for demand forecasting and unit prepositioning.
//!
//! Forecasting models and prepositioning heuristics live outside this crate;
//! the controller only feeds them incidents and validates the moves they
//! propose.

use std::collections::BTreeMap;
use std::time::Duration;

use perds_core::{Incident, NodeId, SimTime, UnitId};
use perds_dispatch::Snapshot;
use perds_spatial::Route;

/// Expected incident count per zone.  Zones are node ids.
pub type Forecast = BTreeMap<NodeId, f64>;

/// Learns from reported incidents and predicts future demand.
pub trait DemandForecaster {
    /// Called once for every accepted `ReportIncident`.
    fn observe(&mut self, incident: &Incident);

    /// Expected incidents per zone over `[at, at + horizon)`.
    fn forecast(&self, at: SimTime, horizon: Duration) -> Forecast;
}

/// A proposed repositioning of one available unit.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositionMove {
    pub unit:   UnitId,
    pub target: NodeId,
    pub reason: String,
    /// Pre-computed route; the controller recomputes it when absent or
    /// stale.
    pub route:  Option<Route>,
}

/// Turns a forecast into repositioning moves.
pub trait PrepositioningStrategy {
    fn plan(&self, snapshot: &Snapshot<'_>, forecast: &Forecast) -> Vec<RepositionMove>;
}

/// Forecasts nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopForecaster;

impl DemandForecaster for NoopForecaster {
    fn observe(&mut self, _incident: &Incident) {}

    fn forecast(&self, _at: SimTime, _horizon: Duration) -> Forecast {
        Forecast::new()
    }
}

/// Never moves anyone.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopPrepositioning;

impl PrepositioningStrategy for NoopPrepositioning {
    fn plan(&self, _snapshot: &Snapshot<'_>, _forecast: &Forecast) -> Vec<RepositionMove> {
        vec![]
    }
}
