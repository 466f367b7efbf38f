//! External commands and their timestamped form.

use std::time::Duration;

use perds_core::{
    CoreError, CoreResult, DispatchCentre, Incident, IncidentId, NodeId, ResponseUnit, SimTime,
    UnitId, UnitStatus,
};
use perds_spatial::{Edge, EdgeStatus, EdgeWeights, Node};

/// Every way the outside world can change controller state.
///
/// The controller handles these with one exhaustive `match`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SystemCommand {
    ReportIncident(Incident),
    ResolveIncident(IncidentId),
    AddNode(Node),
    RemoveNode(NodeId),
    PutEdge(Edge),
    RemoveEdge {
        from: NodeId,
        to:   NodeId,
    },
    UpdateEdge {
        from:    NodeId,
        to:      NodeId,
        weights: EdgeWeights,
        status:  EdgeStatus,
    },
    RegisterUnit(ResponseUnit),
    SetUnitStatus {
        unit:   UnitId,
        status: UnitStatus,
    },
    MoveUnit {
        unit: UnitId,
        node: NodeId,
    },
    /// Ask the prepositioning strategy for moves covering `horizon`.
    /// Build through [`SystemCommand::preposition_units`].
    PrepositionUnits {
        horizon: Duration,
    },
    RegisterDispatchCentre(DispatchCentre),
}

impl SystemCommand {
    /// # Errors
    /// [`CoreError::NonPositiveDuration`] if `horizon` is zero.
    pub fn preposition_units(horizon: Duration) -> CoreResult<Self> {
        if horizon.is_zero() {
            return Err(CoreError::NonPositiveDuration("prepositioning horizon"));
        }
        Ok(SystemCommand::PrepositionUnits { horizon })
    }

    /// Short tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SystemCommand::ReportIncident(_)         => "report-incident",
            SystemCommand::ResolveIncident(_)        => "resolve-incident",
            SystemCommand::AddNode(_)                => "add-node",
            SystemCommand::RemoveNode(_)             => "remove-node",
            SystemCommand::PutEdge(_)                => "put-edge",
            SystemCommand::RemoveEdge { .. }         => "remove-edge",
            SystemCommand::UpdateEdge { .. }         => "update-edge",
            SystemCommand::RegisterUnit(_)           => "register-unit",
            SystemCommand::SetUnitStatus { .. }      => "set-unit-status",
            SystemCommand::MoveUnit { .. }           => "move-unit",
            SystemCommand::PrepositionUnits { .. }   => "preposition-units",
            SystemCommand::RegisterDispatchCentre(_) => "register-dispatch-centre",
        }
    }
}

/// A command scheduled at a simulation time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedEvent {
    pub time:    SimTime,
    pub command: SystemCommand,
}

impl TimedEvent {
    pub fn new(time: SimTime, command: SystemCommand) -> Self {
        Self { time, command }
    }
}
