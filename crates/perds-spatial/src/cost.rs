//! Pluggable edge-cost functions.
//!
//! A cost function maps an [`Edge`] to a non-negative finite cost, or to
//! `f64::INFINITY` when the edge must not be traversed.  Returning NaN or a
//! negative value is a contract violation; routers reject it with
//! [`SpatialError::InvalidEdgeCost`][crate::SpatialError::InvalidEdgeCost].
//!
//! Any `Fn(&Edge) -> f64` closure is a cost function, which keeps tests and
//! ad-hoc experiments cheap.

use crate::Edge;

/// Maps an edge to its traversal cost.
pub trait EdgeCost {
    fn cost(&self, edge: &Edge) -> f64;
}

impl<F> EdgeCost for F
where
    F: Fn(&Edge) -> f64,
{
    #[inline]
    fn cost(&self, edge: &Edge) -> f64 {
        self(edge)
    }
}

/// Built-in cost models.  All of them treat `Closed` edges as untraversable.
///
/// | Model                  | Cost unit                                       |
/// |------------------------|-------------------------------------------------|
/// | `TravelTime`           | seconds                                         |
/// | `Distance`             | kilometres                                      |
/// | `AvailabilityWeighted` | seconds ÷ availability (∞ when availability = 0)|
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CostModel {
    #[default]
    TravelTime,
    Distance,
    AvailabilityWeighted,
}

impl EdgeCost for CostModel {
    fn cost(&self, edge: &Edge) -> f64 {
        if !edge.is_open() {
            return f64::INFINITY;
        }
        let w = &edge.weights;
        match self {
            CostModel::TravelTime => w.travel_time().as_secs_f64(),
            CostModel::Distance   => w.distance_km(),
            CostModel::AvailabilityWeighted => {
                if w.availability() <= 0.0 {
                    f64::INFINITY
                } else {
                    w.travel_time().as_secs_f64() / w.availability()
                }
            }
        }
    }
}
