use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Cell – a single value read from a sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed sheet cell, as produced by every sheet reader before
/// the typed record conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::String(s) => write!(f, "{s}"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Null => write!(f, "<null>"),
        }
    }
}

impl Cell {
    /// Interpret a raw text cell the way a spreadsheet would: blank is null,
    /// numbers are numbers, everything else stays text.
    pub fn from_text(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return Cell::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Cell::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Cell::Float(f);
        }
        Cell::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Records – one typed row per sheet
// ---------------------------------------------------------------------------

/// Shared filter dimensions of both sheets.
pub trait Dimensions {
    fn department(&self) -> Option<&str>;
    fn year(&self) -> Option<i64>;
}

/// One row of the `Employee_Productivity` sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmployeeRecord {
    pub department: Option<String>,
    pub year: Option<i64>,
    pub satisfaction_score: Option<f64>,
    pub task_duration: Option<f64>,
    pub project_completion_times: Option<f64>,
    pub burnout_indicator: Option<f64>,
}

/// One row of the `Productivity_Satisfaction` sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SatisfactionRecord {
    pub department: Option<String>,
    pub year: Option<i64>,
    pub email_response_rate: Option<f64>,
    pub internet_stability: Option<f64>,
    pub workspace_setup: Option<f64>,
    pub work_tool_hours: Option<f64>,
    pub downtime: Option<f64>,
}

impl Dimensions for EmployeeRecord {
    fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    fn year(&self) -> Option<i64> {
        self.year
    }
}

impl Dimensions for SatisfactionRecord {
    fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    fn year(&self) -> Option<i64> {
        self.year
    }
}

// ---------------------------------------------------------------------------
// DatasetStore – the complete loaded workbook
// ---------------------------------------------------------------------------

/// Both sheets plus the distinct values that populate the filter controls.
///
/// Built once at startup and only ever handed out by shared reference.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    employees: Vec<EmployeeRecord>,
    satisfaction: Vec<SatisfactionRecord>,
    departments: Vec<String>,
    years: Vec<i64>,
}

/// Distinct filter options, sorted ascending with nulls removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions<'a> {
    pub departments: &'a [String],
    pub years: &'a [i64],
}

impl DatasetStore {
    /// Build the store and its filter indices from the two typed sheets.
    ///
    /// Department options come from the satisfaction sheet and year options
    /// from the employee sheet, matching where each control is primarily used.
    pub fn new(employees: Vec<EmployeeRecord>, satisfaction: Vec<SatisfactionRecord>) -> Self {
        let departments: BTreeSet<String> = satisfaction
            .iter()
            .filter_map(|r| r.department.clone())
            .collect();
        let years: BTreeSet<i64> = employees.iter().filter_map(|r| r.year).collect();

        DatasetStore {
            employees,
            satisfaction,
            departments: departments.into_iter().collect(),
            years: years.into_iter().collect(),
        }
    }

    pub fn employees(&self) -> &[EmployeeRecord] {
        &self.employees
    }

    pub fn satisfaction(&self) -> &[SatisfactionRecord] {
        &self.satisfaction
    }

    pub fn filter_options(&self) -> FilterOptions<'_> {
        FilterOptions {
            departments: &self.departments,
            years: &self.years,
        }
    }

    /// Sorted department names used for filter options and colouring.
    pub fn departments(&self) -> &[String] {
        &self.departments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(dept: Option<&str>, year: Option<i64>) -> EmployeeRecord {
        EmployeeRecord {
            department: dept.map(str::to_string),
            year,
            ..Default::default()
        }
    }

    fn satisfaction(dept: Option<&str>, year: i64) -> SatisfactionRecord {
        SatisfactionRecord {
            department: dept.map(str::to_string),
            year: Some(year),
            ..Default::default()
        }
    }

    #[test]
    fn filter_options_are_sorted_distinct_and_skip_nulls() {
        let store = DatasetStore::new(
            vec![
                employee(Some("HR"), Some(2023)),
                employee(None, Some(2021)),
                employee(Some("Eng"), None),
                employee(Some("Eng"), Some(2023)),
            ],
            vec![
                satisfaction(Some("Sales"), 2022),
                satisfaction(None, 2022),
                satisfaction(Some("Eng"), 2021),
                satisfaction(Some("Sales"), 2021),
            ],
        );

        let options = store.filter_options();
        assert_eq!(options.departments, ["Eng".to_string(), "Sales".to_string()]);
        assert_eq!(options.years, [2021, 2023]);
    }

    #[test]
    fn text_cells_are_typed_like_a_spreadsheet() {
        assert_eq!(Cell::from_text("  "), Cell::Null);
        assert_eq!(Cell::from_text("2022"), Cell::Integer(2022));
        assert_eq!(Cell::from_text("3.5"), Cell::Float(3.5));
        assert_eq!(Cell::from_text("HR"), Cell::String("HR".into()));
        assert_eq!(Cell::from_text("true"), Cell::String("true".into()));
    }
}
