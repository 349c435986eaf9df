use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::filter::FilteredView;
use crate::data::model::{EmployeeRecord, SatisfactionRecord};

use super::metrics::mean;

// ---------------------------------------------------------------------------
// Chart datasets
// ---------------------------------------------------------------------------

/// One named line of a line chart. Values are kept in view order; the
/// position in the view is the x coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: &'static str,
    pub values: Vec<Option<f64>>,
}

impl Series {
    fn from_rows<'a, R: 'a>(
        name: &'static str,
        rows: impl Iterator<Item = &'a R>,
        value: impl Fn(&R) -> Option<f64>,
    ) -> Self {
        Series {
            name,
            values: rows.map(value).collect(),
        }
    }

    /// `(index, value)` pairs in row order. Blank cells leave a gap.
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub series: Vec<Series>,
}

impl LineChart {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(Series::is_empty)
    }
}

/// A single bar; one per source row, not one per department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub department: Option<String>,
    pub value: Option<f64>,
}

pub const ENVIRONMENT_COLUMNS: [&str; 2] = ["Internet_Stability", "Workspace_Setup"];

/// Department × environment-score means, departments ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapMatrix {
    pub columns: [&'static str; 2],
    pub rows: Vec<HeatmapRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub department: String,
    pub cells: [Option<f64>; 2],
}

impl HeatmapMatrix {
    /// `(min, max)` over all present cells.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter().flatten().copied())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub satisfaction_score: f64,
    pub burnout_indicator: f64,
    pub department: Option<String>,
}

/// The five chart datasets, always built together from the same views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBundle {
    pub work_hours: LineChart,
    pub communication: Vec<Bar>,
    pub environment: HeatmapMatrix,
    pub work_tools: LineChart,
    pub engagement: Vec<ScatterPoint>,
}

impl ChartBundle {
    pub fn is_empty(&self) -> bool {
        self.work_hours.is_empty()
            && self.communication.is_empty()
            && self.environment.rows.is_empty()
            && self.work_tools.is_empty()
            && self.engagement.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn build_charts(
    employees: &FilteredView<'_, EmployeeRecord>,
    satisfaction: &FilteredView<'_, SatisfactionRecord>,
) -> ChartBundle {
    ChartBundle {
        work_hours: work_hours(employees),
        communication: communication(satisfaction),
        environment: environment(satisfaction),
        work_tools: work_tools(satisfaction),
        engagement: engagement(employees),
    }
}

pub fn work_hours(employees: &FilteredView<'_, EmployeeRecord>) -> LineChart {
    LineChart {
        series: vec![
            Series::from_rows("Task_Duration", employees.iter(), |r| r.task_duration),
            Series::from_rows("Project_Completion_Times", employees.iter(), |r| {
                r.project_completion_times
            }),
        ],
    }
}

pub fn communication(satisfaction: &FilteredView<'_, SatisfactionRecord>) -> Vec<Bar> {
    satisfaction
        .iter()
        .map(|r| Bar {
            department: r.department.clone(),
            value: r.email_response_rate,
        })
        .collect()
}

pub fn environment(satisfaction: &FilteredView<'_, SatisfactionRecord>) -> HeatmapMatrix {
    let mut groups: BTreeMap<&str, Vec<&SatisfactionRecord>> = BTreeMap::new();
    for r in satisfaction.iter() {
        if let Some(dept) = r.department.as_deref() {
            groups.entry(dept).or_default().push(r);
        }
    }

    let rows = groups
        .into_iter()
        .map(|(dept, rows)| HeatmapRow {
            department: dept.to_string(),
            cells: [
                mean(rows.iter().map(|r| r.internet_stability)),
                mean(rows.iter().map(|r| r.workspace_setup)),
            ],
        })
        .filter(|row| row.cells.iter().any(Option::is_some))
        .collect();

    HeatmapMatrix {
        columns: ENVIRONMENT_COLUMNS,
        rows,
    }
}

pub fn work_tools(satisfaction: &FilteredView<'_, SatisfactionRecord>) -> LineChart {
    LineChart {
        series: vec![
            Series::from_rows("Work_Tool_Hours", satisfaction.iter(), |r| r.work_tool_hours),
            Series::from_rows("Downtime", satisfaction.iter(), |r| r.downtime),
        ],
    }
}

pub fn engagement(employees: &FilteredView<'_, EmployeeRecord>) -> Vec<ScatterPoint> {
    employees
        .iter()
        .filter_map(|r| {
            Some(ScatterPoint {
                satisfaction_score: r.satisfaction_score?,
                burnout_indicator: r.burnout_indicator?,
                department: r.department.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, FilterSelection};

    fn env_row(dept: &str, internet: f64, workspace: f64) -> SatisfactionRecord {
        SatisfactionRecord {
            department: Some(dept.to_string()),
            year: Some(2022),
            email_response_rate: Some(internet * 10.0),
            internet_stability: Some(internet),
            workspace_setup: Some(workspace),
            work_tool_hours: Some(workspace + 1.0),
            downtime: Some(0.5),
        }
    }

    fn employee(dept: &str, task: f64, score: Option<f64>) -> EmployeeRecord {
        EmployeeRecord {
            department: Some(dept.to_string()),
            year: Some(2023),
            satisfaction_score: score,
            task_duration: Some(task),
            project_completion_times: Some(task * 2.0),
            burnout_indicator: Some(0.3),
        }
    }

    #[test]
    fn environment_pivot_averages_per_department() {
        let rows = vec![env_row("HR", 4.0, 5.0), env_row("HR", 2.0, 3.0)];
        let matrix = environment(&filter(&rows, &FilterSelection::default()));

        assert_eq!(matrix.columns, ENVIRONMENT_COLUMNS);
        assert_eq!(
            matrix.rows,
            vec![HeatmapRow {
                department: "HR".into(),
                cells: [Some(3.0), Some(4.0)],
            }]
        );
        assert_eq!(matrix.value_range(), Some((3.0, 4.0)));
    }

    #[test]
    fn environment_rows_are_sorted_and_limited_to_present_departments() {
        let rows = vec![
            env_row("Sales", 1.0, 1.0),
            env_row("Eng", 2.0, 2.0),
            env_row("HR", 3.0, 3.0),
        ];
        let sel = FilterSelection {
            departments: ["Sales", "Eng"].map(String::from).into(),
            ..Default::default()
        };
        let matrix = environment(&filter(&rows, &sel));
        let depts: Vec<&str> = matrix.rows.iter().map(|r| r.department.as_str()).collect();
        assert_eq!(depts, ["Eng", "Sales"]);
    }

    #[test]
    fn communication_emits_one_bar_per_row() {
        let rows = vec![env_row("HR", 4.0, 5.0), env_row("HR", 2.0, 3.0), env_row("Eng", 1.0, 1.0)];
        let bars = communication(&filter(&rows, &FilterSelection::default()));
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].department.as_deref(), Some("HR"));
        assert_eq!(bars[1].value, Some(20.0));
    }

    #[test]
    fn line_series_are_indexed_by_view_position() {
        let rows = vec![
            employee("HR", 1.0, Some(50.0)),
            employee("Eng", 2.0, Some(60.0)),
            employee("HR", 3.0, Some(70.0)),
        ];
        let sel = FilterSelection {
            departments: ["HR".to_string()].into(),
            ..Default::default()
        };
        let chart = work_hours(&filter(&rows, &sel));

        let task: Vec<(usize, f64)> = chart.series[0].points().collect();
        assert_eq!(chart.series[0].name, "Task_Duration");
        assert_eq!(task, vec![(0, 1.0), (1, 3.0)]);
        let completion: Vec<(usize, f64)> = chart.series[1].points().collect();
        assert_eq!(completion, vec![(0, 2.0), (1, 6.0)]);
    }

    #[test]
    fn scatter_skips_rows_without_coordinates() {
        let rows = vec![employee("HR", 1.0, Some(50.0)), employee("Eng", 2.0, None)];
        let points = engagement(&filter(&rows, &FilterSelection::default()));
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].satisfaction_score, 50.0);
        assert_eq!(points[0].department.as_deref(), Some("HR"));
    }

    #[test]
    fn empty_views_build_empty_datasets() {
        let employees = vec![employee("HR", 1.0, Some(50.0))];
        let satisfaction = vec![env_row("HR", 1.0, 2.0)];
        let sel = FilterSelection {
            years: [1999].into(),
            ..Default::default()
        };
        let charts = build_charts(&filter(&employees, &sel), &filter(&satisfaction, &sel));

        assert!(charts.is_empty());
        assert_eq!(charts.work_hours.series.len(), 2);
        assert_eq!(charts.work_tools.series[1].points().count(), 0);
        assert_eq!(charts.environment.value_range(), None);
    }
}
