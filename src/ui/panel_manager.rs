//! Panel orchestration and layout management.
//!
//! Coordinates the header, timeline and status panels and merges their
//! interactions into one result for the application coordinator.

use std::path::PathBuf;

use crate::app::AppState;
use crate::ui::{header, status_bar, timeline_panel};

/// Result of panel interactions that need to be handled by the application coordinator.
pub enum PanelInteraction {
    /// User requested to open a schedule file
    OpenFileRequested(PathBuf),
    /// User requested a generated demo schedule
    DemoScheduleRequested,
    /// Zoom button; multiplies the ratio
    ZoomRequested(f64),
    FitRequested,
    GoToRequested(String),
    LoadMoreRequested,
    /// Drag or wheel pan
    TimelinePanned { offset: f64 },
    /// Ctrl+wheel zoom around the pointer
    TimelineZoomed { factor: f64, anchor_x: f64 },
}

/// Manages the layout and rendering of all UI panels.
pub struct PanelManager;

impl PanelManager {
    /// Renders all panels in the application window.
    ///
    /// This is the main entry point for rendering the entire UI, called from
    /// the eframe::App::update() implementation.
    pub fn render_all_panels(ctx: &egui::Context, state: &mut AppState) -> Option<PanelInteraction> {
        let mut interaction: Option<PanelInteraction> = None;

        // Header panel at the top
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            if let Some(header_interaction) = header::render_header(ui, state) {
                interaction = Some(match header_interaction {
                    header::HeaderInteraction::OpenFileRequested(path) => {
                        PanelInteraction::OpenFileRequested(path)
                    }
                    header::HeaderInteraction::DemoScheduleRequested => {
                        PanelInteraction::DemoScheduleRequested
                    }
                    header::HeaderInteraction::ZoomRequested(factor) => {
                        PanelInteraction::ZoomRequested(factor)
                    }
                    header::HeaderInteraction::FitRequested => PanelInteraction::FitRequested,
                    header::HeaderInteraction::GoToRequested(text) => {
                        PanelInteraction::GoToRequested(text)
                    }
                    header::HeaderInteraction::LoadMoreRequested => {
                        PanelInteraction::LoadMoreRequested
                    }
                });
            }
        });

        // Status panel at the very bottom
        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            status_bar::render_status_bar(ui, state);
        });

        // Timeline fills the rest
        let timeline_frame = egui::Frame::default()
            .inner_margin(egui::Margin::same(4))
            .fill(ctx.style().visuals.panel_fill);

        egui::CentralPanel::default()
            .frame(timeline_frame)
            .show(ctx, |ui| {
                if let Some(timeline_interaction) = timeline_panel::render_timeline_panel(ui, ctx, state) {
                    interaction = Some(match timeline_interaction {
                        timeline_panel::TimelinePanelInteraction::Panned { offset } => {
                            PanelInteraction::TimelinePanned { offset }
                        }
                        timeline_panel::TimelinePanelInteraction::Zoomed { factor, anchor_x } => {
                            PanelInteraction::TimelineZoomed { factor, anchor_x }
                        }
                    });
                }
            });

        interaction
    }
}
