use std::fmt;

use serde::{Serialize, Serializer};

use crate::data::filter::FilteredView;
use crate::data::model::{EmployeeRecord, SatisfactionRecord};

// ---------------------------------------------------------------------------
// MetricsBundle – the four metric cards
// ---------------------------------------------------------------------------

/// Scalar summaries of the current filtered views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricsBundle {
    pub total_employees: usize,
    pub avg_satisfaction: Average,
    pub avg_email_response: Average,
    pub avg_project_completion: Average,
}

/// A mean rounded to two decimals, or the fallback for a view with no values.
///
/// The fallback is numerically `0` but displays as a bare `0`, while a real
/// mean always keeps a fractional digit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Average(Option<f64>);

impl Average {
    pub fn of(values: impl IntoIterator<Item = Option<f64>>) -> Self {
        Average(mean(values).map(round2))
    }

    pub fn value(self) -> f64 {
        self.0.unwrap_or(0.0)
    }
}

impl PartialEq<f64> for Average {
    fn eq(&self, other: &f64) -> bool {
        self.value() == *other
    }
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => f.write_str(&display_number(v)),
            None => f.write_str("0"),
        }
    }
}

impl Serialize for Average {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

/// The metric values as the cards display them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCards {
    pub total_employees: String,
    pub avg_satisfaction: String,
    pub avg_email_response: String,
    pub avg_project_completion: String,
}

impl MetricsBundle {
    pub fn cards(&self) -> MetricCards {
        MetricCards {
            total_employees: self.total_employees.to_string(),
            avg_satisfaction: self.avg_satisfaction.to_string(),
            avg_email_response: format!("{}%", self.avg_email_response),
            avg_project_completion: format!("{} hrs", self.avg_project_completion),
        }
    }
}

pub fn aggregate(
    employees: &FilteredView<'_, EmployeeRecord>,
    satisfaction: &FilteredView<'_, SatisfactionRecord>,
) -> MetricsBundle {
    MetricsBundle {
        total_employees: employees.len(),
        avg_satisfaction: Average::of(employees.iter().map(|r| r.satisfaction_score)),
        avg_email_response: Average::of(satisfaction.iter().map(|r| r.email_response_rate)),
        avg_project_completion: Average::of(employees.iter().map(|r| r.project_completion_times)),
    }
}

/// Arithmetic mean of the present values, `None` when there are none.
pub fn mean(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Round to two decimals from the exact stored value, ties to even
/// (2.675 is stored as 2.67499.. and rounds down).
pub fn round2(v: f64) -> f64 {
    format!("{v:.2}").parse().unwrap_or(v)
}

/// Shortest round-trip rendering that always keeps a fractional part,
/// e.g. `80.0`, `3.25`.
pub fn display_number(v: f64) -> String {
    let s = v.to_string();
    if v.is_finite() && !s.contains(['.', 'e']) {
        format!("{s}.0")
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, FilterSelection};

    fn employee(dept: &str, year: i64, score: f64, completion: f64) -> EmployeeRecord {
        EmployeeRecord {
            department: Some(dept.to_string()),
            year: Some(year),
            satisfaction_score: Some(score),
            project_completion_times: Some(completion),
            ..Default::default()
        }
    }

    fn response(dept: &str, rate: Option<f64>) -> SatisfactionRecord {
        SatisfactionRecord {
            department: Some(dept.to_string()),
            year: Some(2022),
            email_response_rate: rate,
            ..Default::default()
        }
    }

    fn select(depts: &[&str]) -> FilterSelection {
        FilterSelection {
            departments: depts.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn single_department_metrics() {
        let employees = vec![employee("HR", 2022, 80.0, 10.0), employee("Eng", 2023, 60.0, 20.0)];
        let satisfaction: Vec<SatisfactionRecord> = vec![];
        let sel = select(&["HR"]);

        let metrics = aggregate(&filter(&employees, &sel), &filter(&satisfaction, &sel));
        assert_eq!(metrics.total_employees, 1);
        assert_eq!(metrics.avg_satisfaction, 80.0);
        assert_eq!(metrics.avg_project_completion, 10.0);
        assert_eq!(metrics.avg_email_response, 0.0);
    }

    #[test]
    fn averages_round_to_two_decimals_and_skip_blanks() {
        let employees = vec![
            employee("HR", 2022, 70.0, 1.0),
            employee("HR", 2022, 70.0, 1.0),
            employee("HR", 2022, 71.0, 2.0),
        ];
        let satisfaction = vec![response("HR", Some(90.0)), response("HR", None), response("HR", Some(95.0))];
        let sel = FilterSelection::default();

        let metrics = aggregate(&filter(&employees, &sel), &filter(&satisfaction, &sel));
        assert_eq!(metrics.avg_satisfaction, 70.33);
        assert_eq!(metrics.avg_project_completion, 1.33);
        assert_eq!(metrics.avg_email_response, 92.5);
    }

    #[test]
    fn unknown_department_falls_back_to_zero() {
        let employees = vec![employee("HR", 2022, 80.0, 10.0)];
        let satisfaction = vec![response("HR", Some(90.0))];
        let sel = select(&["Legal"]);

        let metrics = aggregate(&filter(&employees, &sel), &filter(&satisfaction, &sel));
        assert_eq!(metrics, MetricsBundle::default());
    }

    #[test]
    fn cards_append_unit_suffixes() {
        let metrics = MetricsBundle {
            total_employees: 12,
            avg_satisfaction: Average(Some(80.0)),
            avg_email_response: Average(Some(92.5)),
            avg_project_completion: Average(Some(3.25)),
        };
        let cards = metrics.cards();
        assert_eq!(cards.total_employees, "12");
        assert_eq!(cards.avg_satisfaction, "80.0");
        assert_eq!(cards.avg_email_response, "92.5%");
        assert_eq!(cards.avg_project_completion, "3.25 hrs");
    }

    #[test]
    fn empty_views_display_a_bare_zero() {
        let cards = MetricsBundle::default().cards();
        assert_eq!(cards.total_employees, "0");
        assert_eq!(cards.avg_satisfaction, "0");
        assert_eq!(cards.avg_email_response, "0%");
        assert_eq!(cards.avg_project_completion, "0 hrs");

        // A genuine zero mean keeps its fractional digit.
        assert_eq!(Average::of([Some(0.0)]).to_string(), "0.0");
    }

    #[test]
    fn round2_rounds_the_stored_value_half_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.625), 0.62);
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(80.125), 80.12);
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(70.3333333), 70.33);
        assert_eq!(round2(-1.236), -1.24);
    }

    #[test]
    fn averages_serialize_as_plain_numbers() {
        let metrics = MetricsBundle {
            total_employees: 1,
            avg_satisfaction: Average(Some(80.5)),
            ..Default::default()
        };
        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json["avg_satisfaction"], 80.5);
        assert_eq!(json["avg_email_response"], 0.0);
    }

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(mean([None, None]), None);
        assert_eq!(mean([Some(2.0), None, Some(4.0)]), Some(3.0));
    }
}
