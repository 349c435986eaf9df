use eframe::egui::{self, Color32, RichText, Ui};

use crate::pipeline::metrics::MetricCards;
use crate::state::AppState;

pub const TITLE: &str = "Amazon Remote Work Productivity Dashboard";

const ACCENT: Color32 = Color32::from_rgb(0xff, 0x8c, 0x00);
const CARD_FILL: Color32 = Color32::from_rgb(0x16, 0x1b, 0x22);

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with the loaded row counts.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(RichText::new(TITLE).color(Color32::ORANGE).strong());
        ui.separator();
        ui.label(format!(
            "{} employee rows, {} satisfaction rows",
            state.store.employees().len(),
            state.store.satisfaction().len()
        ));
    });
}

// ---------------------------------------------------------------------------
// Filter row – department / year multi-selects
// ---------------------------------------------------------------------------

/// Render both multi-selects. Any toggle recomputes the bundle at once.
pub fn filter_row(ui: &mut Ui, state: &mut AppState) {
    // Clone the options so we can mutate state inside the popups.
    let options = state.store.filter_options();
    let departments = options.departments.to_vec();
    let years = options.years.to_vec();

    let mut toggled_department: Option<String> = None;
    let mut toggled_year: Option<i64> = None;

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Select Department");
        let summary = selection_summary(
            state.selection.departments.iter().map(String::as_str),
            "All Departments",
        );
        egui::ComboBox::from_id_salt("department_filter")
            .selected_text(summary)
            .width(220.0)
            .show_ui(ui, |ui: &mut Ui| {
                for dept in &departments {
                    let mut checked = state.selection.departments.contains(dept);
                    let text = RichText::new(dept).color(state.colors.color_for(Some(dept)));
                    if ui.checkbox(&mut checked, text).changed() {
                        toggled_department = Some(dept.clone());
                    }
                }
            });

        ui.add_space(16.0);

        ui.strong("Select Year");
        let year_labels: Vec<String> = state.selection.years.iter().map(i64::to_string).collect();
        let summary = selection_summary(year_labels.iter().map(String::as_str), "All Years");
        egui::ComboBox::from_id_salt("year_filter")
            .selected_text(summary)
            .width(160.0)
            .show_ui(ui, |ui: &mut Ui| {
                for &year in &years {
                    let mut checked = state.selection.years.contains(&year);
                    if ui.checkbox(&mut checked, year.to_string()).changed() {
                        toggled_year = Some(year);
                    }
                }
            });

        ui.add_space(16.0);

        if ui
            .add_enabled(!state.selection.is_unrestricted(), egui::Button::new("Clear"))
            .clicked()
        {
            log::info!("Filters cleared");
            state.clear_filters();
        }
    });

    if let Some(dept) = toggled_department {
        state.toggle_department(&dept);
    }
    if let Some(year) = toggled_year {
        state.toggle_year(year);
    }
}

/// Placeholder text when nothing is selected, otherwise the joined values.
fn selection_summary<'a>(values: impl Iterator<Item = &'a str>, placeholder: &str) -> String {
    let joined = values.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        placeholder.to_string()
    } else {
        joined
    }
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

pub fn metric_cards(ui: &mut Ui, cards: &MetricCards) {
    let entries = [
        ("Total Employees", &cards.total_employees),
        ("Avg Satisfaction Score", &cards.avg_satisfaction),
        ("Avg Email Response Rate", &cards.avg_email_response),
        ("Avg Project Completion Time", &cards.avg_project_completion),
    ];

    ui.columns(entries.len(), |columns: &mut [Ui]| {
        for (ui, (title, value)) in columns.iter_mut().zip(entries) {
            egui::Frame::group(ui.style())
                .fill(CARD_FILL)
                .inner_margin(12.0)
                .show(ui, |ui: &mut Ui| {
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.label(RichText::new(title).strong().color(Color32::WHITE));
                        ui.label(RichText::new(value.as_str()).size(28.0).strong().color(ACCENT));
                    });
                });
        }
    });
}
