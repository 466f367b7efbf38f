use thiserror::Error;

use perds_core::{IncidentId, NodeId, UnitId};
use perds_spatial::SpatialError;

/// Errors produced when a decision cannot be folded into a snapshot.
///
/// Policies never return these; the engine drops an offending decision and
/// logs it instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("incident {0} is not in the snapshot")]
    UnknownIncident(IncidentId),

    #[error("unit {0} is not in the snapshot")]
    UnknownUnit(UnitId),

    #[error("incident {0} already has a live assignment")]
    IncidentAlreadyAssigned(IncidentId),

    #[error("incident {0} is not awaiting dispatch")]
    IncidentNotAwaitingDispatch(IncidentId),

    #[error("unit {0} cannot take an assignment")]
    UnitNotDispatchable(UnitId),

    #[error("route for {unit} runs {start} -> {goal}, expected {expected_start} -> {expected_goal}")]
    RouteMismatch {
        unit:           UnitId,
        start:          NodeId,
        goal:           NodeId,
        expected_start: NodeId,
        expected_goal:  NodeId,
    },

    #[error("routing error: {0}")]
    Routing(#[from] SpatialError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
