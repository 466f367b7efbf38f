//! Fluent builder for constructing a [`Controller`].

use std::collections::BTreeMap;

use perds_core::{DispatchCentre, ResponseUnit};
use perds_dispatch::{DispatchEngine, DispatchPolicy};
use perds_spatial::Graph;

use crate::forecast::{DemandForecaster, NoopForecaster, NoopPrepositioning, PrepositioningStrategy};
use crate::{
    AssignmentRouteIndex, ConfiguredPolicy, Controller, DispatchObserver, NoopObserver,
    PerdsConfig, SimResult,
};

/// Fluent builder for [`Controller<P, O>`].
///
/// # Required inputs
///
/// - `P: DispatchPolicy`, e.g. [`perds_dispatch::NearestAvailablePolicy`],
///   or [`ConfiguredPolicy`] via [`ControllerBuilder::from_config`].
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                |
/// |------------------------|------------------------|
/// | `.graph(g)`            | empty `Graph`          |
/// | `.unit(u)`/`.units(v)` | no units               |
/// | `.centre(c)`           | no dispatch centres    |
/// | `.forecaster(f)`       | `NoopForecaster`       |
/// | `.prepositioning(s)`   | `NoopPrepositioning`   |
/// | `.observer(o)`         | `NoopObserver`         |
///
/// # Example
///
/// ```rust,ignore
/// let mut controller = ControllerBuilder::new(NearestAvailablePolicy::default())
///     .graph(graph)
///     .units(units)
///     .observer(DispatchMetrics::new())
///     .build()?;
/// controller.execute(SystemCommand::ReportIncident(incident), now)?;
/// ```
pub struct ControllerBuilder<P: DispatchPolicy, O: DispatchObserver = NoopObserver> {
    policy:         P,
    observer:       O,
    graph:          Option<Graph>,
    units:          Vec<ResponseUnit>,
    centres:        Vec<DispatchCentre>,
    forecaster:     Option<Box<dyn DemandForecaster>>,
    prepositioning: Option<Box<dyn PrepositioningStrategy>>,
}

impl<P: DispatchPolicy> ControllerBuilder<P, NoopObserver> {
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            observer:       NoopObserver,
            graph:          None,
            units:          Vec::new(),
            centres:        Vec::new(),
            forecaster:     None,
            prepositioning: None,
        }
    }
}

impl ControllerBuilder<ConfiguredPolicy, NoopObserver> {
    /// Builder whose policy, router and cost model come from `config`.
    ///
    /// # Errors
    /// [`SimError::Config`][crate::SimError::Config] if `config` is invalid.
    pub fn from_config(config: &PerdsConfig) -> SimResult<Self> {
        Ok(Self::new(config.build_policy()?))
    }
}

impl<P: DispatchPolicy, O: DispatchObserver> ControllerBuilder<P, O> {
    pub fn graph(mut self, graph: Graph) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn unit(mut self, unit: ResponseUnit) -> Self {
        self.units.push(unit);
        self
    }

    pub fn units(mut self, units: impl IntoIterator<Item = ResponseUnit>) -> Self {
        self.units.extend(units);
        self
    }

    pub fn centre(mut self, centre: DispatchCentre) -> Self {
        self.centres.push(centre);
        self
    }

    pub fn forecaster(mut self, forecaster: impl DemandForecaster + 'static) -> Self {
        self.forecaster = Some(Box::new(forecaster));
        self
    }

    pub fn prepositioning(mut self, strategy: impl PrepositioningStrategy + 'static) -> Self {
        self.prepositioning = Some(Box::new(strategy));
        self
    }

    /// Replace the observer; changes the builder's observer type.
    pub fn observer<O2: DispatchObserver>(self, observer: O2) -> ControllerBuilder<P, O2> {
        ControllerBuilder {
            policy:         self.policy,
            observer,
            graph:          self.graph,
            units:          self.units,
            centres:        self.centres,
            forecaster:     self.forecaster,
            prepositioning: self.prepositioning,
        }
    }

    /// Validate units and centres against the graph and return a controller
    /// with no incidents.
    ///
    /// # Errors
    /// The same errors as `RegisterUnit` / `RegisterDispatchCentre`:
    /// duplicates, unknown nodes, or units that are not registrable.
    pub fn build(self) -> SimResult<Controller<P, O>> {
        let mut controller = Controller {
            graph:          self.graph.unwrap_or_default(),
            units:          BTreeMap::new(),
            incidents:      BTreeMap::new(),
            centres:        BTreeMap::new(),
            assignments:    BTreeMap::new(),
            index:          AssignmentRouteIndex::new(),
            pending_moves:  BTreeMap::new(),
            engine:         DispatchEngine::new(self.policy),
            forecaster:     self.forecaster.unwrap_or_else(|| Box::new(NoopForecaster)),
            prepositioning: self.prepositioning.unwrap_or_else(|| Box::new(NoopPrepositioning)),
            observer:       self.observer,
        };

        for centre in self.centres {
            controller.register_centre(centre)?;
        }
        for unit in self.units {
            controller.register_unit(unit)?;
        }

        tracing::info!(
            policy = controller.policy().name(),
            nodes = controller.graph.node_count(),
            edges = controller.graph.edge_count(),
            units = controller.units.len(),
            centres = controller.centres.len(),
            "controller built"
        );
        Ok(controller)
    }
}
