//! `perds-core`: foundational types for the `perds` dispatch simulator.
//!
//! This crate is a dependency of every other `perds-*` crate.  It has no
//! `perds-*` dependencies and only `thiserror` (plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`ids`]      | `NodeId`, `UnitId`, `IncidentId`, `DispatchCentreId`          |
//! | [`geo`]      | `GeoPoint`, haversine distance                                |
//! | [`time`]     | `SimTime`                                                     |
//! | [`incident`] | `Incident`, `Severity`, `IncidentStatus`                      |
//! | [`unit`]     | `ResponseUnit`, `UnitType`, `UnitStatus`, `DispatchCentre`    |
//! | [`error`]    | `CoreError`, `CoreResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod incident;
pub mod time;
pub mod unit;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{DispatchCentreId, IncidentId, NodeId, UnitId};
pub use incident::{Incident, IncidentStatus, Severity};
pub use time::SimTime;
pub use unit::{DispatchCentre, ResponseUnit, UnitStatus, UnitType};
