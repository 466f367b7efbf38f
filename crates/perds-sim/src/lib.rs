//! `perds-sim`: controller state machine and discrete-event replay.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`command`]    | `SystemCommand` (12 variants), `TimedEvent`                  |
//! | [`index`]      | `AssignmentRouteIndex` (edge ↔ incident)                     |
//! | [`controller`] | `Controller<P, O>`, `PendingMove`                            |
//! | [`builder`]    | `ControllerBuilder`                                          |
//! | [`engine`]     | `SimulationEngine`, `CommandExecutor`                        |
//! | [`forecast`]   | `DemandForecaster`, `PrepositioningStrategy` + no-op impls   |
//! | [`observer`]   | `DispatchObserver`, `NoopObserver`, `DispatchMetrics`        |
//! | [`config`]     | `PerdsConfig`, `ConfiguredPolicy`, `ConfiguredRouter`        |
//! | [`error`]      | `SimError`, `SimResult<T>`                                   |
//!
//! # Event loop
//!
//! ```text
//! SimulationEngine::run_until(controller, t_end):
//!   while next event time < t_end:
//!     Controller::execute(command, time)
//!       ① complete due repositioning moves
//!       ② apply command (graph / incident / unit mutation)
//!       ③ reroute-or-cancel assignments over changed edges
//!       ④ dispatch cycle → AssignUnit commands
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use perds_sim::{ControllerBuilder, PerdsConfig, SimulationEngine, TimedEvent};
//!
//! let mut controller = ControllerBuilder::from_config(&PerdsConfig::default())?
//!     .graph(graph)
//!     .units(units)
//!     .build()?;
//! let mut sim = SimulationEngine::new();
//! sim.schedule_all(events);
//! let executed = sim.run_until(&mut controller, SimTime::from_secs(3_600))?;
//! ```

pub mod builder;
pub mod command;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod index;
pub mod observer;


pub use builder::ControllerBuilder;
pub use command::{SystemCommand, TimedEvent};
pub use config::{ConfiguredPolicy, ConfiguredRouter, PerdsConfig, PolicyKind};
pub use controller::{Controller, PendingMove};
pub use engine::{CommandExecutor, SimulationEngine};
pub use error::{SimError, SimResult};
pub use forecast::{
    DemandForecaster, Forecast, NoopForecaster, NoopPrepositioning, PrepositioningStrategy,
    RepositionMove,
};
pub use index::AssignmentRouteIndex;
pub use observer::{DispatchMetrics, DispatchObserver, NoopObserver};
