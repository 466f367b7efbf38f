use thiserror::Error;

use perds_core::{CoreError, DispatchCentreId, IncidentId, NodeId, UnitId};
use perds_dispatch::DispatchError;
use perds_spatial::SpatialError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("incident {0} not found")]
    IncidentNotFound(IncidentId),

    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("incident {0} is already registered")]
    DuplicateIncident(IncidentId),

    #[error("unit {0} is already registered")]
    DuplicateUnit(UnitId),

    #[error("dispatch centre {0} is already registered")]
    DuplicateCentre(DispatchCentreId),

    #[error("incident {0} has no live assignment")]
    NoAssignment(IncidentId),

    #[error("unit {unit} is at {actual}, but the route starts at {route_start}")]
    RouteStartMismatch {
        unit:        UnitId,
        actual:      NodeId,
        route_start: NodeId,
    },

    #[error("rejected command: {0}")]
    InvalidCommand(String),

    #[error("invalid value: {0}")]
    Invalid(#[from] CoreError),

    #[error("graph error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

pub type SimResult<T> = Result<T, SimError>;
