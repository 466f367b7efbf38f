//! `perds-dispatch`: matching incidents to response units.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                         |
//! |--------------|------------------------------------------------------------------|
//! | [`snapshot`] | `Snapshot<'a>` working view, `Assignment`                        |
//! | [`command`]  | `DispatchCommand` (`AssignUnit`, `RerouteUnit`, `CancelAssignment`), `DispatchDecision` |
//! | [`priority`] | incident prioritization and the canonical candidate order        |
//! | [`policy`]   | `DispatchPolicy` trait, `NearestAvailablePolicy`, `MultiSourcePolicy` |
//! | [`engine`]   | `DispatchEngine`, `DispatchOutcome`                              |
//! | [`error`]    | `DispatchError`, `DispatchResult<T>`                             |
//!
//! # Design notes
//!
//! A dispatch cycle is a pure function of its [`Snapshot`]:
//!
//! 1. **Prioritize**: eligible incidents sorted by severity (desc), report
//!    time (asc), id (asc).
//! 2. **Fold**: for each incident ask the policy for a decision against the
//!    current working snapshot; an accepted decision produces the next
//!    snapshot, so a unit taken by one incident is invisible to the rest.
//! 3. **Emit**: one `AssignUnit` per accepted decision, in fold order.
//!
//! Nothing here mutates controller state; the controller applies the
//! returned commands itself.

pub mod command;
pub mod engine;
pub mod error;
pub mod policy;
pub mod priority;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use command::{DispatchCommand, DispatchDecision};
pub use engine::{DispatchEngine, DispatchOutcome};
pub use error::{DispatchError, DispatchResult};
pub use policy::{DispatchPolicy, MultiSourcePolicy, NearestAvailablePolicy};
pub use priority::{compare_candidates, compare_co_located, prioritize, Candidate};
pub use snapshot::{check_route, unit_satisfies, Assignment, Snapshot};
