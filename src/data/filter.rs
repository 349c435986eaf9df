use std::collections::BTreeSet;

use serde::Serialize;

use super::model::Dimensions;

// ---------------------------------------------------------------------------
// Filter selection: which departments / years the user picked
// ---------------------------------------------------------------------------

/// The pair of multi-select values. An empty set means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub departments: BTreeSet<String>,
    pub years: BTreeSet<i64>,
}

impl FilterSelection {
    /// Whether neither control restricts anything.
    pub fn is_unrestricted(&self) -> bool {
        self.departments.is_empty() && self.years.is_empty()
    }

    /// Row predicate shared by both sheets.
    ///
    /// Once any control is active, rows missing either dimension drop out.
    pub fn matches<R: Dimensions>(&self, row: &R) -> bool {
        if self.is_unrestricted() {
            return true;
        }
        let (Some(dept), Some(year)) = (row.department(), row.year()) else {
            return false;
        };
        (self.departments.is_empty() || self.departments.contains(dept))
            && (self.years.is_empty() || self.years.contains(&year))
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Rows of one sheet that pass a [`FilterSelection`], in sheet order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a, R> {
    rows: Vec<&'a R>,
    restricted: bool,
}

impl<'a, R> FilteredView<'a, R> {
    pub fn iter(&self) -> impl Iterator<Item = &'a R> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `false` when the view came from an unrestricted selection, so an empty
    /// table and an empty match stay distinguishable.
    pub fn is_restricted(&self) -> bool {
        self.restricted
    }
}

/// Apply `selection` to `table`, keeping row order.
pub fn filter<'a, R: Dimensions>(table: &'a [R], selection: &FilterSelection) -> FilteredView<'a, R> {
    FilteredView {
        rows: table.iter().filter(|row| selection.matches(*row)).collect(),
        restricted: !selection.is_unrestricted(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{EmployeeRecord, SatisfactionRecord};

    fn row(dept: Option<&str>, year: Option<i64>, score: f64) -> EmployeeRecord {
        EmployeeRecord {
            department: dept.map(str::to_string),
            year,
            satisfaction_score: Some(score),
            ..Default::default()
        }
    }

    fn table() -> Vec<EmployeeRecord> {
        vec![
            row(Some("HR"), Some(2022), 1.0),
            row(Some("Eng"), Some(2023), 2.0),
            row(None, Some(2022), 3.0),
            row(Some("HR"), None, 4.0),
            row(Some("Eng"), Some(2022), 5.0),
        ]
    }

    fn scores(view: &FilteredView<'_, EmployeeRecord>) -> Vec<f64> {
        view.iter().filter_map(|r| r.satisfaction_score).collect()
    }

    fn selection(depts: &[&str], years: &[i64]) -> FilterSelection {
        FilterSelection {
            departments: depts.iter().map(|d| d.to_string()).collect(),
            years: years.iter().copied().collect(),
        }
    }

    #[test]
    fn empty_selection_keeps_every_row_in_order() {
        let table = table();
        let view = filter(&table, &FilterSelection::default());
        assert_eq!(view.len(), table.len());
        assert_eq!(scores(&view), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(!view.is_restricted());
    }

    #[test]
    fn department_filter_drops_null_departments() {
        let table = table();
        let view = filter(&table, &selection(&["HR"], &[]));
        // The HR row without a year is dropped too: any active filter
        // requires both dimensions.
        assert_eq!(scores(&view), vec![1.0]);
    }

    #[test]
    fn year_filter_drops_null_rows() {
        let table = table();
        let view = filter(&table, &selection(&[], &[2022]));
        assert_eq!(scores(&view), vec![1.0, 5.0]);
    }

    #[test]
    fn department_and_year_compose_conjunctively() {
        let table = table();
        let view = filter(&table, &selection(&["Eng", "HR"], &[2022]));
        assert_eq!(scores(&view), vec![1.0, 5.0]);
        for r in view.iter() {
            assert!(r.year == Some(2022));
        }
    }

    #[test]
    fn unknown_department_yields_restricted_empty_view() {
        let table = table();
        let view = filter(&table, &selection(&["Legal"], &[]));
        assert!(view.is_empty());
        assert!(view.is_restricted());
    }

    #[test]
    fn same_selection_applies_to_both_sheets() {
        let sat = vec![
            SatisfactionRecord {
                department: Some("HR".into()),
                year: Some(2022),
                ..Default::default()
            },
            SatisfactionRecord {
                department: Some("Eng".into()),
                year: Some(2022),
                ..Default::default()
            },
        ];
        let sel = selection(&["HR"], &[2022]);
        assert_eq!(filter(&sat, &sel).len(), 1);
        assert_eq!(filter(&table(), &sel).len(), 1);
    }
}
