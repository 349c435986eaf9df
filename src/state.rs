use crate::color::DepartmentColors;
use crate::data::filter::FilterSelection;
use crate::data::model::DatasetStore;
use crate::pipeline::{recompute, DashboardBundle};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Workbook loaded at startup; never mutated afterwards.
    pub store: DatasetStore,

    /// Current multi-select values.
    pub selection: FilterSelection,

    /// Metrics and charts for `selection`, replaced as a whole on change.
    pub bundle: DashboardBundle,

    /// Department → colour, fixed for the lifetime of the store.
    pub colors: DepartmentColors,
}

impl AppState {
    pub fn new(store: DatasetStore, selection: FilterSelection) -> Self {
        let colors = DepartmentColors::new(store.departments());
        let bundle = recompute(&store, &selection);
        Self {
            store,
            selection,
            bundle,
            colors,
        }
    }

    /// Recompute `bundle` after a selection change.
    pub fn refresh(&mut self) {
        self.bundle = recompute(&self.store, &self.selection);
    }

    /// Toggle a single department in the department filter.
    pub fn toggle_department(&mut self, department: &str) {
        if !self.selection.departments.remove(department) {
            self.selection.departments.insert(department.to_string());
        }
        self.refresh();
    }

    /// Toggle a single year in the year filter.
    pub fn toggle_year(&mut self, year: i64) {
        if !self.selection.years.remove(&year) {
            self.selection.years.insert(year);
        }
        self.refresh();
    }

    /// Back to "all departments, all years".
    pub fn clear_filters(&mut self) {
        self.selection = FilterSelection::default();
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{EmployeeRecord, SatisfactionRecord};

    fn state() -> AppState {
        let employees = vec![
            EmployeeRecord {
                department: Some("HR".into()),
                year: Some(2022),
                satisfaction_score: Some(80.0),
                ..Default::default()
            },
            EmployeeRecord {
                department: Some("Eng".into()),
                year: Some(2023),
                satisfaction_score: Some(60.0),
                ..Default::default()
            },
        ];
        let satisfaction = vec![SatisfactionRecord {
            department: Some("HR".into()),
            year: Some(2022),
            ..Default::default()
        }];
        AppState::new(DatasetStore::new(employees, satisfaction), FilterSelection::default())
    }

    #[test]
    fn toggling_recomputes_the_bundle() {
        let mut state = state();
        assert_eq!(state.bundle.metrics.total_employees, 2);

        state.toggle_department("HR");
        assert_eq!(state.bundle.metrics.total_employees, 1);
        assert_eq!(state.bundle.metrics.avg_satisfaction, 80.0);

        state.toggle_department("HR");
        assert!(state.selection.is_unrestricted());
        assert_eq!(state.bundle.metrics.total_employees, 2);
    }

    #[test]
    fn clearing_filters_restores_everything() {
        let mut state = state();
        state.toggle_year(2023);
        state.toggle_department("HR");
        assert_eq!(state.bundle.metrics.total_employees, 0);

        state.clear_filters();
        assert_eq!(state.bundle.selection, FilterSelection::default());
        assert_eq!(state.bundle.metrics.total_employees, 2);
    }
}
