/// Recompute pass: selection → filtered views → metrics + charts.
///
/// ```text
///   DatasetStore ──┐
///                  ▼
///   FilterSelection ─► filter ─► (employee view, satisfaction view)
///                                      │                 │
///                                      ▼                 ▼
///                                  aggregate        build_charts
///                                      └──────┬──────────┘
///                                             ▼
///                                      DashboardBundle
/// ```
pub mod charts;
pub mod metrics;

use serde::Serialize;

use crate::data::filter::{filter, FilterSelection};
use crate::data::model::DatasetStore;

use charts::{build_charts, ChartBundle};
use metrics::{aggregate, MetricCards, MetricsBundle};

/// Everything the dashboard shows for one selection, produced in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardBundle {
    pub selection: FilterSelection,
    pub metrics: MetricsBundle,
    pub cards: MetricCards,
    pub charts: ChartBundle,
}

/// Pure recompute of every metric and chart for `selection`.
pub fn recompute(store: &DatasetStore, selection: &FilterSelection) -> DashboardBundle {
    let employees = filter(store.employees(), selection);
    let satisfaction = filter(store.satisfaction(), selection);
    log::debug!(
        "Recomputing for {selection:?} (restricted: {}): {} employee rows, {} satisfaction rows",
        employees.is_restricted(),
        employees.len(),
        satisfaction.len()
    );

    let metrics = aggregate(&employees, &satisfaction);
    DashboardBundle {
        selection: selection.clone(),
        metrics,
        cards: metrics.cards(),
        charts: build_charts(&employees, &satisfaction),
    }
}
