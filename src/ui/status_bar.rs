//! Status bar UI rendering
//!
//! Handles the bottom status bar displaying the view position and schedule size.

use eframe::egui;
use egui::RichText;

use rhere::formatting::{format_duration, format_ratio, format_seconds};

use crate::app::AppState;
use crate::state::ScheduleOrigin;

/// Renders the status panel at the bottom of the window
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Reference to application state
pub fn render_status_bar(ui: &mut egui::Ui, state: &AppState) {
    ui.horizontal(|ui| {
        let origin = match state.schedule.origin() {
            Some(ScheduleOrigin::File(path)) => path.display().to_string(),
            Some(ScheduleOrigin::Demo { seed }) => format!("Demo schedule | Seed: {}", seed),
            None => {
                ui.label(RichText::new("No schedule loaded").strong());
                return;
            }
        };
        ui.label(RichText::new(origin).strong());

        let Some(timeline) = state.timeline.as_ref() else {
            return;
        };

        ui.label(RichText::new("|").strong());
        ui.label(RichText::new(format!(
            "Offset: {} | Ratio: {} | Duration: {} | Lanes: {} | Events: {} | Laid out: {}",
            format_seconds(timeline.current_offset()),
            format_ratio(timeline.ratio()),
            format_duration(timeline.timeline_duration() as i64),
            state.schedule.lane_ids().len(),
            state.schedule.events().len(),
            timeline.built_count(),
        )).strong());
    });
}
