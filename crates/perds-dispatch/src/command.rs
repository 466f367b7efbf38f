//! Dispatch decisions and the commands they turn into.

use perds_core::{IncidentId, SimTime, UnitId};
use perds_spatial::Route;

/// A state change requested by the dispatch engine or by the controller's
/// reroute/cancel cascade.
///
/// Commands are applied strictly in the order they are produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DispatchCommand {
    /// Send `unit` to `incident` along `route`.
    AssignUnit {
        incident:  IncidentId,
        unit:      UnitId,
        route:     Route,
        rationale: String,
    },

    /// Replace the route of the live assignment held by `unit`.  The route
    /// must start at the unit's current node.
    RerouteUnit {
        unit:   UnitId,
        route:  Route,
        reason: String,
    },

    /// Drop the live assignment of `incident`; the incident is requeued and
    /// its unit freed.
    CancelAssignment {
        incident: IncidentId,
        reason:   String,
    },
}

impl DispatchCommand {
    /// Short tag for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchCommand::AssignUnit { .. }       => "assign",
            DispatchCommand::RerouteUnit { .. }      => "reroute",
            DispatchCommand::CancelAssignment { .. } => "cancel",
        }
    }
}

/// One policy decision: which unit answers which incident, and how it gets
/// there.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatchDecision {
    pub incident:   IncidentId,
    pub unit:       UnitId,
    pub route:      Route,
    pub rationale:  String,
    pub decided_at: SimTime,
}

impl DispatchDecision {
    /// The `AssignUnit` command carrying this decision.
    pub fn to_command(&self) -> DispatchCommand {
        DispatchCommand::AssignUnit {
            incident:  self.incident.clone(),
            unit:      self.unit.clone(),
            route:     self.route.clone(),
            rationale: self.rationale.clone(),
        }
    }
}
