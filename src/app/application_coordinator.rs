//! Application-level coordination and workflow management.
//!
//! Handles high-level operations like loading schedules, building the
//! timeline widget and turning panel interactions into widget calls.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tracing::{debug, info};

use rhere::formatting::parse_clock;
use rhere::generator::{self, ScheduleGenerator};
use rhere::{coords, parse_schedule, EguiSurface, MoveTarget, Schedule, TimelineOptions, TimelineWidget};

use crate::app::AppState;
use crate::presentation::color_mapping;
use crate::state::{ScheduleOrigin, ViewState};

/// Name of the move target for the time axis ruler
pub const RULER_TARGET: &str = "ruler";

/// Programmes appended per lane by "load more"
pub const LOAD_MORE_PER_LANE: usize = 8;

/// Coordinates application-level operations and workflows.
///
/// This struct is responsible for:
/// - Loading schedule files and demo schedules
/// - Building the timeline widget with the viewer's hooks
/// - Applying zoom, pan and go-to requests
/// - Managing error states
pub struct ApplicationCoordinator;

impl ApplicationCoordinator {
    /// Loads a schedule file and shows it.
    pub fn open_file(state: &mut AppState, path: PathBuf) {
        state.reset_schedule_state();

        let loaded = parse_schedule(&path.to_string_lossy())
            .and_then(|schedule| Self::show_schedule(state, schedule, ScheduleOrigin::File(path.clone())));
        match loaded {
            Ok(()) => info!(path = %path.display(), "schedule opened"),
            Err(err) => {
                state.reset_schedule_state();
                state.error_message = Some(format!("Error loading schedule: {:#}", err));
            }
        }
    }

    /// Generates a random schedule in memory and shows it.
    pub fn open_demo_schedule(state: &mut AppState, seed: u64) {
        state.reset_schedule_state();

        let schedule = ScheduleGenerator::with_config(
            generator::DEFAULT_LANES,
            generator::DEFAULT_EVENTS_PER_LANE,
            generator::DEFAULT_TIMELINE_DURATION,
            seed,
        )
        .generate();

        if let Err(err) = Self::show_schedule(state, schedule, ScheduleOrigin::Demo { seed }) {
            state.error_message = Some(format!("Error generating demo schedule: {:#}", err));
        }
    }

    /// Stores the schedule and builds a fresh widget for it.
    fn show_schedule(state: &mut AppState, schedule: Schedule, origin: ScheduleOrigin) -> Result<()> {
        state
            .schedule
            .load(schedule, origin, rhere::config::DEFAULT_TIMELINE_DURATION);
        state.timeline = Some(Self::build_timeline(state)?);
        Ok(())
    }

    /// Builds the widget over the live event store.
    ///
    /// The ruler is added to every move through `on_move_before`, and bar
    /// colours are taken from each event's `color` attribute in
    /// `on_event_refreshed_after`.
    fn build_timeline(state: &AppState) -> Result<TimelineWidget<EguiSurface>> {
        let preferences = state.view.preferences();
        let colors = state.bar_colors.clone();
        colors.clear();

        let options = TimelineOptions::new()
            .event_source(state.schedule.events().clone())
            .time_plot(state.axis.clone())
            .timeline_duration(state.schedule.timeline_duration())
            .ratio(preferences.ratio)
            .move_to_animation(Duration::from_millis(preferences.move_to_animation_ms))
            .on_move_before(|mut targets| {
                targets.push(MoveTarget::named(RULER_TARGET));
                targets
            })
            .on_event_refreshed_after(move |event, _width, data| {
                colors.insert(event.id, color_mapping::bar_color(data, event.lane));
            });

        let widget = TimelineWidget::new(EguiSurface::new("timeline"), options)?;
        debug!(events = widget.built_count(), "timeline built");
        Ok(widget)
    }

    // ===== Timeline operations =====

    /// Appends a page of programmes to every lane and lays out only the new ones.
    ///
    /// # Returns
    /// The number of events laid out.
    pub fn load_more(state: &mut AppState) -> usize {
        let Some(timeline) = state.timeline.as_mut() else {
            return 0;
        };

        let events = state.schedule.events().clone();
        let mut next_id = state.schedule.next_event_id();
        for lane in state.schedule.lane_ids() {
            let start = events.lane_end(lane).unwrap_or(0);
            let page = generator::generate_lane_events(
                state.schedule.rng_mut(),
                lane,
                next_id,
                start,
                LOAD_MORE_PER_LANE,
            );
            next_id += page.len() as u64;
            events.extend(page);
        }

        let laid_out = timeline.refresh(false);
        info!(laid_out, total = events.len(), "loaded more events");
        laid_out
    }

    /// Zooms by `factor` keeping the left edge of the view in place.
    pub fn zoom_by(state: &mut AppState, factor: f64) {
        let Some(timeline) = state.timeline.as_ref() else {
            return;
        };
        let ratio = ViewState::zoomed_ratio(timeline.ratio(), factor);
        Self::apply_zoom(state, ratio, None);
    }

    /// Zooms by `factor` keeping the time under the pointer in place.
    ///
    /// # Arguments
    /// * `state` - Application state
    /// * `factor` - Ratio multiplier
    /// * `anchor_x` - Pointer distance from the timeline's left edge, in pixels
    pub fn zoom_at(state: &mut AppState, factor: f64, anchor_x: f64) {
        let Some(timeline) = state.timeline.as_ref() else {
            return;
        };
        let ratio = ViewState::zoomed_ratio(timeline.ratio(), factor);
        Self::apply_zoom(state, ratio, Some(anchor_x));
    }

    fn apply_zoom(state: &mut AppState, ratio: f64, anchor_x: Option<f64>) {
        let Some(timeline) = state.timeline.as_mut() else {
            return;
        };

        let offset = match anchor_x {
            Some(x) => anchored_offset(timeline.current_offset(), timeline.ratio(), ratio, x),
            None => timeline.current_offset(),
        };

        match timeline.zoom(ratio) {
            Ok(()) => {
                timeline.jump_to(offset);
                state.view.remember_ratio(ratio);
            }
            Err(err) => state.error_message = Some(format!("Zoom failed: {}", err)),
        }
    }

    /// Fits the whole timeline into the panel and scrolls back to the origin.
    pub fn fit(state: &mut AppState) {
        let Some(timeline) = state.timeline.as_mut() else {
            return;
        };
        match timeline.fit_to_viewport() {
            Ok(()) => {
                timeline.jump_to(0.0);
                state.view.remember_ratio(timeline.ratio());
            }
            Err(err) => state.error_message = Some(format!("Cannot fit timeline: {}", err)),
        }
    }

    /// Scrolls (animated) to a time typed by the user.
    pub fn go_to(state: &mut AppState, text: &str) {
        let Some(timeline) = state.timeline.as_mut() else {
            return;
        };
        match parse_go_to(text) {
            Ok(offset) => {
                timeline.move_to(offset);
                state.error_message = None;
            }
            Err(err) => state.error_message = Some(err.to_string()),
        }
    }

    /// Scrolls immediately to `offset`, e.g. while dragging.
    pub fn pan_to(state: &mut AppState, offset: f64) {
        if let Some(timeline) = state.timeline.as_mut() {
            timeline.jump_to(offset);
        }
    }
}

fn parse_go_to(text: &str) -> Result<f64> {
    parse_clock(text).ok_or_else(|| anyhow!("Invalid time '{}': expected HH:MM:SS, MM:SS or seconds", text.trim()))
}

/// Offset that keeps the time under `anchor_x` fixed when the ratio changes.
///
/// Rounded to whole seconds, which is the resolution the widget positions
/// the surface at.
fn anchored_offset(offset: f64, old_ratio: f64, new_ratio: f64, anchor_x: f64) -> f64 {
    let anchor_seconds = offset.trunc() + coords::pixels_to_seconds(anchor_x, old_ratio);
    (anchor_seconds - coords::pixels_to_seconds(anchor_x, new_ratio)).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchored_offset_keeps_pointer_time() {
        // 100s offset, pointer 200px in at 1 px/s => 300s under the pointer
        let offset = anchored_offset(100.0, 1.0, 2.0, 200.0);
        assert_eq!(offset, 200.0);
        assert_eq!(offset + coords::pixels_to_seconds(200.0, 2.0), 300.0);
    }

    #[test]
    fn test_anchored_offset_is_whole_seconds() {
        // 75px at 50 px/s => 101.5s under the pointer, 3s of it at 25 px/s
        let offset = anchored_offset(100.0, 50.0, 25.0, 75.0);
        assert_eq!(offset, 99.0);
        assert_eq!(offset.fract(), 0.0);
    }

    #[test]
    fn test_parse_go_to() {
        assert_eq!(parse_go_to("00:10:00").unwrap(), 600.0);
        assert!(parse_go_to("soon").unwrap_err().to_string().contains("Invalid time 'soon'"));
    }

    #[test]
    fn test_demo_schedule_builds_timeline() {
        let mut state = AppState::new();
        ApplicationCoordinator::open_demo_schedule(&mut state, 9);

        let timeline = state.timeline.as_ref().unwrap();
        assert_eq!(timeline.built_count(), state.schedule.events().len());
        assert_eq!(state.bar_colors.len(), timeline.built_count());
        assert!(timeline.surface().position(&MoveTarget::named(RULER_TARGET)).is_some());
        assert!(state.error_message.is_none());
    }

    #[test]
    fn test_load_more_lays_out_only_new_events() {
        let mut state = AppState::new();
        ApplicationCoordinator::open_demo_schedule(&mut state, 9);
        let before = state.schedule.events().len();
        let lanes = state.schedule.lane_ids().len();

        let laid_out = ApplicationCoordinator::load_more(&mut state);

        assert_eq!(laid_out, lanes * LOAD_MORE_PER_LANE);
        assert_eq!(state.schedule.events().len(), before + laid_out);
        assert_eq!(state.timeline.as_ref().unwrap().built_count(), before + laid_out);
    }

    #[test]
    fn test_zoom_and_go_to() {
        let mut state = AppState::new();
        ApplicationCoordinator::open_demo_schedule(&mut state, 1);

        ApplicationCoordinator::zoom_by(&mut state, 2.0);
        assert_eq!(state.timeline.as_ref().unwrap().ratio(), 2.0);
        assert_eq!(state.view.preferences().ratio, 2.0);

        ApplicationCoordinator::go_to(&mut state, "01:00:00");
        assert_eq!(state.timeline.as_ref().unwrap().current_offset(), 3600.0);

        ApplicationCoordinator::go_to(&mut state, "later");
        assert!(state.error_message.is_some());
        assert_eq!(state.timeline.as_ref().unwrap().current_offset(), 3600.0);
    }

    #[test]
    fn test_open_missing_file_reports_error() {
        let mut state = AppState::new();
        let path = std::env::temp_dir().join("rhere_missing_schedule.schedule");
        ApplicationCoordinator::open_file(&mut state, path);

        assert!(state.timeline.is_none());
        assert!(state.error_message.as_deref().unwrap_or_default().starts_with("Error loading schedule"));
    }
}
