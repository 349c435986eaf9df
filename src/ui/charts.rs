use std::collections::BTreeMap;

use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{series_color, viridis, DepartmentColors};
use crate::pipeline::charts::{Bar as BarDatum, HeatmapMatrix, LineChart, ScatterPoint};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 300.0;

/// Label used for rows whose department cell is blank.
const BLANK_DEPARTMENT: &str = "(blank)";

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render all five charts, two per row with the scatter plot full width.
pub fn chart_grid(ui: &mut Ui, state: &AppState) {
    let charts = &state.bundle.charts;

    ui.columns(2, |columns: &mut [Ui]| {
        line_chart(
            &mut columns[0],
            "work_hours_chart",
            "Work Hours and Task Productivity",
            &charts.work_hours,
        );
        communication_chart(&mut columns[1], &charts.communication, &state.colors);
    });
    ui.add_space(12.0);

    ui.columns(2, |columns: &mut [Ui]| {
        environment_heatmap(&mut columns[0], &charts.environment);
        line_chart(
            &mut columns[1],
            "work_tools_chart",
            "Work Tools Usage",
            &charts.work_tools,
        );
    });
    ui.add_space(12.0);

    engagement_chart(ui, &charts.engagement, &state.colors);
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong().size(16.0).color(Color32::WHITE));
}

// ---------------------------------------------------------------------------
// Line charts (work hours, work tools)
// ---------------------------------------------------------------------------

fn line_chart(ui: &mut Ui, id: &str, title: &str, chart: &LineChart) {
    chart_title(ui, title);
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Magnitude")
        .y_axis_label("Time in Hrs")
        .show_grid(false)
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let points: PlotPoints = series
                    .points()
                    .map(|(i, v)| [i as f64, v])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name(series.name)
                        .color(series_color(series.name))
                        .width(1.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Communication bars
// ---------------------------------------------------------------------------

/// x slot per department: known departments in sorted order, then blanks.
fn department_slots<'a>(bars: &'a [BarDatum], colors: &'a DepartmentColors) -> BTreeMap<&'a str, usize> {
    let mut slots: BTreeMap<&str, usize> = BTreeMap::new();
    let known = colors.legend_entries().map(|(d, _)| d);
    let present = bars
        .iter()
        .map(|b| b.department.as_deref().unwrap_or(BLANK_DEPARTMENT));
    for dept in known.filter(|d| bars.iter().any(|b| b.department.as_deref() == Some(*d))).chain(present) {
        let next = slots.len();
        slots.entry(dept).or_insert(next);
    }
    slots
}

fn communication_chart(ui: &mut Ui, bars: &[BarDatum], colors: &DepartmentColors) {
    chart_title(ui, "Communication Metrics");

    let slots = department_slots(bars, colors);
    let labels: BTreeMap<usize, String> = slots.iter().map(|(d, i)| (*i, d.to_string())).collect();

    // Rows sharing a department stack on top of each other, one bar per row.
    let mut stacked: BTreeMap<usize, f64> = BTreeMap::new();
    let mut per_department: BTreeMap<usize, (Color32, Vec<Bar>)> = BTreeMap::new();
    for bar in bars {
        let Some(value) = bar.value else { continue };
        let slot = slots[bar.department.as_deref().unwrap_or(BLANK_DEPARTMENT)];
        let color = colors.color_for(bar.department.as_deref());
        let base = stacked.entry(slot).or_insert(0.0);
        per_department
            .entry(slot)
            .or_insert_with(|| (color, Vec::new()))
            .1
            .push(Bar::new(slot as f64, value).base_offset(*base).width(0.7).fill(color));
        *base += value;
    }

    let formatter_labels = labels.clone();
    Plot::new("communication_chart")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Department")
        .y_axis_label("Email Response Rate")
        .show_grid(false)
        .x_axis_formatter(move |mark, _range| {
            let slot = mark.value.round();
            if (mark.value - slot).abs() > f64::EPSILON || slot < 0.0 {
                return String::new();
            }
            formatter_labels.get(&(slot as usize)).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (slot, (color, bars)) in per_department {
                let name = labels.get(&slot).cloned().unwrap_or_default();
                plot_ui.bar_chart(BarChart::new(bars).name(name).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Environmental heatmap
// ---------------------------------------------------------------------------

fn environment_heatmap(ui: &mut Ui, matrix: &HeatmapMatrix) {
    chart_title(ui, "Environmental Context");

    if matrix.rows.is_empty() {
        ui.label("No data for the current selection.");
        return;
    }
    let (lo, hi) = matrix.value_range().unwrap_or((0.0, 1.0));
    let span = hi - lo;

    TableBuilder::new(ui)
        .striped(false)
        .resizable(false)
        .vscroll(false)
        .column(Column::auto().at_least(120.0))
        .columns(Column::remainder(), matrix.columns.len())
        .header(24.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Department");
            });
            for column in matrix.columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(column);
                });
            }
        })
        .body(|mut body| {
            for row in &matrix.rows {
                body.row(32.0, |mut table_row| {
                    table_row.col(|ui: &mut Ui| {
                        ui.label(&row.department);
                    });
                    for cell in row.cells {
                        table_row.col(|ui: &mut Ui| {
                            let Some(v) = cell else {
                                ui.label("–");
                                return;
                            };
                            let t = if span.abs() < f64::EPSILON { 0.5 } else { (v - lo) / span };
                            ui.painter().rect_filled(ui.max_rect(), 0.0, viridis(t));
                            let text = if t > 0.6 { Color32::BLACK } else { Color32::WHITE };
                            ui.label(RichText::new(format!("{v:.2}")).color(text));
                        });
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Engagement scatter
// ---------------------------------------------------------------------------

fn engagement_chart(ui: &mut Ui, points: &[ScatterPoint], colors: &DepartmentColors) {
    chart_title(ui, "Engagement and Well-being");

    let mut by_department: BTreeMap<Option<&str>, Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        by_department
            .entry(p.department.as_deref())
            .or_default()
            .push([p.satisfaction_score, p.burnout_indicator]);
    }

    Plot::new("engagement_chart")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Satisfaction Score")
        .y_axis_label("Burnout Indicator")
        .show_grid(false)
        .show(ui, |plot_ui| {
            for (dept, coords) in by_department {
                plot_ui.points(
                    Points::new(PlotPoints::from(coords))
                        .name(dept.unwrap_or(BLANK_DEPARTMENT))
                        .color(colors.color_for(dept))
                        .radius(6.0),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_slots_follow_sorted_departments_then_blanks() {
        let colors = DepartmentColors::new(&["Eng".to_string(), "HR".to_string(), "Ops".to_string()]);
        let bar = |d: Option<&str>| BarDatum {
            department: d.map(str::to_string),
            value: Some(1.0),
        };
        let bars = vec![bar(Some("HR")), bar(None), bar(Some("Eng")), bar(Some("HR"))];

        let slots = department_slots(&bars, &colors);
        assert_eq!(slots["Eng"], 0);
        assert_eq!(slots["HR"], 1);
        assert_eq!(slots[BLANK_DEPARTMENT], 2);
        assert!(!slots.contains_key("Ops"));
    }
}
