//! Header panel UI rendering
//!
//! Handles the top bar with schedule controls, zoom buttons and the
//! "go to" time field.

use eframe::egui;
use egui::Color32;
use std::path::PathBuf;

use rhere::formatting::{format_ratio, format_seconds};

use crate::app::AppState;

/// Ratio multiplier of the zoom buttons
pub const ZOOM_STEP: f64 = 1.5;

/// Result of user interaction with the header panel
pub enum HeaderInteraction {
    /// User picked a schedule file
    OpenFileRequested(PathBuf),
    /// User clicked "Demo Schedule"
    DemoScheduleRequested,
    /// User clicked a zoom button; the value multiplies the ratio
    ZoomRequested(f64),
    /// User clicked "Fit"
    FitRequested,
    /// User confirmed the "go to" field
    GoToRequested(String),
    /// User clicked "Load more"
    LoadMoreRequested,
}

/// Renders the application header with schedule and view controls
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Mutable reference to application state
///
/// # Returns
/// * `Option<HeaderInteraction>` - User interaction result
pub fn render_header(ui: &mut egui::Ui, state: &mut AppState) -> Option<HeaderInteraction> {
    let mut interaction = None;

    ui.horizontal(|ui| {
        if ui.button("📁 Open Schedule").clicked() {
            let mut dialog = rfd::FileDialog::new()
                .add_filter("Schedules", &["schedule", "jsonl", "br"])
                .add_filter("All Files", &["*"]);

            if let Ok(cwd) = std::env::current_dir() {
                dialog = dialog.set_directory(cwd);
            }

            if let Some(path) = dialog.pick_file() {
                interaction = Some(HeaderInteraction::OpenFileRequested(path));
            }
        }

        if ui.button("🎲 Demo Schedule").clicked() {
            interaction = Some(HeaderInteraction::DemoScheduleRequested);
        }

        let Some(timeline) = state.timeline.as_ref() else {
            return;
        };
        let ratio = timeline.ratio();
        let offset = timeline.current_offset();

        ui.separator();

        if ui.button("🔍+").clicked() {
            interaction = Some(HeaderInteraction::ZoomRequested(ZOOM_STEP));
        }
        if ui.button("🔍-").clicked() {
            interaction = Some(HeaderInteraction::ZoomRequested(1.0 / ZOOM_STEP));
        }
        if ui.button("⛶ Fit").clicked() {
            interaction = Some(HeaderInteraction::FitRequested);
        }
        ui.label(format!("Zoom: {}", format_ratio(ratio)));

        ui.separator();

        ui.label("Go to:");
        let go_to = egui::TextEdit::singleline(state.view.go_to_text_mut())
            .hint_text(format_seconds(offset))
            .desired_width(80.0)
            .show(ui);
        let enter_pressed = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if go_to.response.lost_focus() && enter_pressed {
            let text = std::mem::take(state.view.go_to_text_mut());
            if !text.trim().is_empty() {
                interaction = Some(HeaderInteraction::GoToRequested(text));
            }
        }

        ui.separator();

        let load_more = ui.button("➕ Load more");
        if load_more.clicked() {
            interaction = Some(HeaderInteraction::LoadMoreRequested);
        }
        load_more.on_hover_text("Append more programmes after the last one on every lane");
    });

    if let Some(err) = &state.error_message {
        ui.colored_label(Color32::RED, err);
    }

    interaction
}
