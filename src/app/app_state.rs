//! Centralized application state for the timeline viewer.
//!
//! Composes the focused state components with the timeline widget itself
//! and the handles shared with it (time axis, bar colours).

use rhere::{EguiSurface, TimeAxisPlot, TimelineWidget};

use crate::presentation::color_mapping::BarColors;
use crate::state::{ScheduleState, ViewPreferences, ViewState};

/// Main application state.
pub struct AppState {
    // ===== Focused State Components =====
    /// Schedule data and origin
    pub schedule: ScheduleState,

    /// View preferences and control buffers
    pub view: ViewState,

    // ===== Timeline =====
    /// Widget laying out the current schedule (None until one is loaded)
    pub timeline: Option<TimelineWidget<EguiSurface>>,

    /// Handle on the time axis the widget keeps in sync
    pub axis: TimeAxisPlot,

    /// Bar colours written by the widget's refresh hook
    pub bar_colors: BarColors,

    // ===== Top-Level State =====
    /// Current error message to display (if any)
    pub error_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_preferences(ViewPreferences::default())
    }

    /// Creates the state with view preferences loaded from storage.
    pub fn with_preferences(preferences: ViewPreferences) -> Self {
        Self {
            schedule: ScheduleState::new(),
            view: ViewState::with_preferences(preferences),
            timeline: None,
            axis: TimeAxisPlot::new(),
            bar_colors: BarColors::new(),
            error_message: None,
        }
    }

    /// Drops the current schedule and timeline.
    pub fn reset_schedule_state(&mut self) {
        self.timeline = None;
        self.schedule.clear();
        self.bar_colors.clear();
        self.error_message = None;
    }
}
