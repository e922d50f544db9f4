//! Timeline viewer GUI application
//!
//! An interactive viewer for schedule files built on the `rhere` timeline
//! widget and egui. The viewer features:
//! - Stacked lanes of programme bars coloured from their `color` attribute
//! - A time axis ruler that moves in lock-step with the lanes
//! - Drag and wheel panning, Ctrl+wheel zoom, animated "go to"
//! - Incremental "load more" that lays out only the new programmes
//! - Persistent view preferences
//!
//! The application is built with a modular architecture:
//! - `app/` - Application state management and coordination
//! - `state/` - Schedule and view state
//! - `presentation/` - Visual styling and color mapping
//! - `ui/` - UI panel rendering, interaction, and input handling

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod app;
mod presentation;
mod state;
mod ui;

use app::{AppState, ApplicationCoordinator, SettingsCoordinator};
use rhere::generator::DEFAULT_SEED;
use ui::panel_manager::{PanelInteraction, PanelManager};

/// Main application entry point that initializes logging and launches the viewer.
fn main() -> eframe::Result {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Optional schedule file to open on startup
    let initial_file = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 600.0])
            .with_title("Here Timeline Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "Here Timeline Viewer",
        options,
        Box::new(move |cc| Ok(Box::new(HereViewerApp::new(cc, initial_file)))),
    )
}

/// The main timeline viewer application.
///
/// Delegates most functionality:
/// - `ApplicationCoordinator` handles loading and timeline operations
/// - `SettingsCoordinator` handles preference persistence
/// - `PanelManager` handles UI panel layout and rendering
struct HereViewerApp {
    /// Centralized application state
    state: AppState,
    /// Optional file to load on first frame
    pending_file_load: Option<PathBuf>,
    /// Seed of the next demo schedule
    next_demo_seed: u64,
}

impl HereViewerApp {
    /// Creates a viewer with view preferences loaded from persistent storage.
    fn new(cc: &eframe::CreationContext, initial_file: Option<PathBuf>) -> Self {
        let preferences = SettingsCoordinator::load_view_preferences(cc.storage);
        tracing::debug!(?preferences, "view preferences loaded");

        Self {
            state: AppState::with_preferences(preferences),
            pending_file_load: initial_file,
            next_demo_seed: DEFAULT_SEED,
        }
    }

    /// Handles panel interactions by delegating to ApplicationCoordinator.
    fn handle_panel_interaction(&mut self, interaction: PanelInteraction) {
        match interaction {
            PanelInteraction::OpenFileRequested(path) => {
                ApplicationCoordinator::open_file(&mut self.state, path);
            }
            PanelInteraction::DemoScheduleRequested => {
                ApplicationCoordinator::open_demo_schedule(&mut self.state, self.next_demo_seed);
                self.next_demo_seed = self.next_demo_seed.wrapping_add(1);
            }
            PanelInteraction::ZoomRequested(factor) => {
                ApplicationCoordinator::zoom_by(&mut self.state, factor);
            }
            PanelInteraction::FitRequested => {
                ApplicationCoordinator::fit(&mut self.state);
            }
            PanelInteraction::GoToRequested(text) => {
                ApplicationCoordinator::go_to(&mut self.state, &text);
            }
            PanelInteraction::LoadMoreRequested => {
                ApplicationCoordinator::load_more(&mut self.state);
            }
            PanelInteraction::TimelinePanned { offset } => {
                ApplicationCoordinator::pan_to(&mut self.state, offset);
            }
            PanelInteraction::TimelineZoomed { factor, anchor_x } => {
                ApplicationCoordinator::zoom_at(&mut self.state, factor, anchor_x);
            }
        }
    }
}

impl eframe::App for HereViewerApp {
    /// Called when the app is being shut down - ensures preferences are saved.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        SettingsCoordinator::save_view_preferences(storage, self.state.view.preferences());
    }

    /// Main update loop.
    ///
    /// 1. Load the initial file if specified via command line
    /// 2. Render all panels via PanelManager
    /// 3. Handle panel interactions
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(path) = self.pending_file_load.take() {
            ApplicationCoordinator::open_file(&mut self.state, path);
        }

        if let Some(interaction) = PanelManager::render_all_panels(ctx, &mut self.state) {
            self.handle_panel_interaction(interaction);
            ctx.request_repaint();
        }
    }
}
