//! The timeline widget.
//!
//! The widget owns two scalars, the ratio (pixels per second) and the
//! current offset (seconds from the origin), and turns them into host
//! mutations on demand. There are no intermediate states: every operation
//! recomputes what it needs synchronously; only `move_to` hands an animation
//! to the host and returns without waiting for it.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::config::{EventRefreshedHook, MoveBeforeHook, TimelineOptions};
use crate::coords;
use crate::error::{Result, TimelineError};
use crate::event::{EventId, LaneId, TimelineEvent};
use crate::traits::{EventPlacement, EventSource, MoveTarget, TimePlot, TimelineSurface};

/// What an event was laid out from: offset, duration and lane.
type BuiltKey = (i64, i64, LaneId);

fn built_key(event: &TimelineEvent) -> BuiltKey {
    (event.offset, event.duration, event.lane)
}

/// Scalar state shared with time plots.
///
/// Responsibilities:
/// - Holding the ratio and enforcing that it stays strictly positive
/// - Holding the current offset (never clamped)
/// - Knowing the total timeline duration
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineState {
    ratio: f64,
    current_offset: f64,
    timeline_duration: u64,
}

impl TimelineState {
    pub(crate) fn new(ratio: f64, timeline_duration: u64) -> Self {
        Self {
            ratio,
            current_offset: 0.0,
            timeline_duration,
        }
    }

    /// Pixels per second.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Replaces the ratio without any re-layout.
    ///
    /// Non-finite and non-positive values are rejected and leave the ratio unchanged.
    pub fn set_ratio(&mut self, ratio: f64) -> Result<()> {
        if !coords::is_valid_ratio(ratio) {
            return Err(TimelineError::InvalidRatio(ratio));
        }
        self.ratio = ratio;
        Ok(())
    }

    /// Seconds from the timeline origin currently aligned with the viewport's left edge.
    pub fn current_offset(&self) -> f64 {
        self.current_offset
    }

    /// Total seconds spanned by the timeline.
    pub fn timeline_duration(&self) -> u64 {
        self.timeline_duration
    }

    /// Converts seconds to pixels at the current ratio.
    pub fn seconds_to_pixels(&self, seconds: f64) -> f64 {
        coords::seconds_to_pixels(seconds, self.ratio)
    }
}

/// A horizontally scrollable timeline of events.
///
/// The widget drives a host [`TimelineSurface`]; it never reads layout back
/// from it. Events come from an [`EventSource`] that is queried again on
/// every refresh, and the events already laid out are remembered so that a
/// non-forced refresh only touches new or changed ones.
pub struct TimelineWidget<S: TimelineSurface> {
    surface: S,
    state: TimelineState,
    move_to_animation: Duration,
    /// Explicit outer container width; falls back to the surface's viewport
    viewport_width: Option<f64>,
    source: Box<dyn EventSource>,
    time_plot: Option<Box<dyn TimePlot>>,
    on_event_refreshed_after: EventRefreshedHook,
    on_move_before: MoveBeforeHook,
    /// Events already laid out, pruned to what the source still holds
    built: HashMap<EventId, BuiltKey>,
}

impl<S: TimelineSurface> TimelineWidget<S> {
    /// Creates the widget and performs the initial, forced refresh.
    ///
    /// # Arguments
    /// * `surface` - Host surface receiving positions and sizes
    /// * `options` - Configuration, event source, hooks and optional time plot
    ///
    /// # Errors
    /// Fails when the ratio or duration is invalid, or no event source is set.
    pub fn new(surface: S, options: TimelineOptions) -> Result<Self> {
        let TimelineOptions {
            config,
            source,
            viewport_width,
            mut time_plot,
            on_event_refreshed_after,
            on_move_before,
        } = options;

        config.validate()?;
        let source = source.ok_or(TimelineError::MissingEventSource)?;

        let mut state = TimelineState::new(config.ratio, config.timeline_duration);
        if let Some(plot) = time_plot.as_mut() {
            plot.initialize(&mut state);
        }
        state.current_offset = config.start_at;

        let mut widget = Self {
            surface,
            state,
            move_to_animation: config.move_to_animation(),
            viewport_width,
            source,
            time_plot,
            on_event_refreshed_after,
            on_move_before,
            built: HashMap::new(),
        };

        debug!(
            ratio = widget.state.ratio,
            start_at = widget.state.current_offset,
            duration = widget.state.timeline_duration,
            "timeline created"
        );
        widget.refresh(true);
        Ok(widget)
    }

    // ===== Queries =====

    pub fn ratio(&self) -> f64 {
        self.state.ratio()
    }

    pub fn current_offset(&self) -> f64 {
        self.state.current_offset()
    }

    pub fn timeline_duration(&self) -> u64 {
        self.state.timeline_duration()
    }

    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    /// Width of the outer container, if known.
    pub fn viewport_width(&self) -> Option<f64> {
        self.viewport_width.or_else(|| self.surface.viewport_width())
    }

    /// Returns true if the event was laid out and not invalidated since.
    pub fn is_built(&self, id: EventId) -> bool {
        self.built.contains_key(&id)
    }

    pub fn built_count(&self) -> usize {
        self.built.len()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    // ===== Movement =====

    /// Scrolls the timeline so that `offset` (seconds from the origin) sits at
    /// the viewport's left edge, animating the move.
    pub fn move_to(&mut self, offset: f64) {
        self.state.current_offset = offset;
        let left = coords::surface_left(offset, self.state.ratio);
        let targets = (self.on_move_before)(vec![MoveTarget::Surface]);
        debug!(offset, left, targets = targets.len(), "move_to");
        for target in &targets {
            self.surface.animate_left(target, left, self.move_to_animation);
        }
    }

    /// Like [`Self::move_to`] but without animation.
    pub fn jump_to(&mut self, offset: f64) {
        self.state.current_offset = offset;
        self.reposition();
    }

    // ===== Zoom =====

    /// Sets a new ratio and lays every event out again.
    pub fn zoom(&mut self, ratio: f64) -> Result<()> {
        self.set_ratio(ratio)?;
        self.refresh(true);
        Ok(())
    }

    /// Sets the ratio without refreshing.
    ///
    /// Meant for collaborators that compute a ratio themselves and then call
    /// [`Self::refresh`] explicitly.
    pub fn set_ratio(&mut self, ratio: f64) -> Result<()> {
        self.state.set_ratio(ratio).inspect_err(|err| warn!("{err}"))
    }

    /// Picks the ratio that makes the whole timeline fit the viewport and
    /// lays everything out again.
    pub fn fit_to_viewport(&mut self) -> Result<()> {
        let width = self.viewport_width().ok_or(TimelineError::UnknownViewport)?;
        let ratio = coords::fit_ratio(width, self.state.timeline_duration)
            .ok_or(TimelineError::UnknownViewport)?;
        self.zoom(ratio)
    }

    // ===== Refresh =====

    /// Forgets that an event was laid out so the next refresh handles it again.
    pub fn invalidate(&mut self, id: EventId) {
        self.built.remove(&id);
    }

    /// Recomputes the surface position and size, then lays out events.
    ///
    /// Without `force`, events laid out by an earlier refresh are skipped
    /// unless their offset, duration or lane changed since; this keeps
    /// appending a page of events cheap. With `force`, every event currently
    /// in the source is laid out again. Events that left the source are
    /// forgotten either way.
    ///
    /// # Returns
    /// The number of events laid out by this call.
    pub fn refresh(&mut self, force: bool) -> usize {
        self.reposition();

        let ratio = self.state.ratio;
        let surface_width = self.state.seconds_to_pixels(self.state.timeline_duration as f64);
        self.surface.set_width(surface_width);

        let events = self.source.discover();
        let discovered: HashSet<EventId> = events.iter().map(|e| e.id).collect();
        self.built.retain(|id, _| discovered.contains(id));

        let lanes: BTreeSet<_> = events.iter().map(|e| e.lane).collect();
        for lane in lanes {
            self.surface.set_lane_width(lane, surface_width);
        }

        let mut laid_out = 0;
        for (z_index, event) in events.iter().enumerate() {
            let key = built_key(event);
            if !force && self.built.get(&event.id) == Some(&key) {
                continue;
            }

            let placement = EventPlacement {
                left: coords::event_left(event.offset, ratio),
                width: coords::event_width(event.duration, ratio),
                z_index,
            };
            trace!(id = event.id, left = placement.left, width = placement.width, "event laid out");

            self.surface.place_event(event, placement);
            (self.on_event_refreshed_after)(event, placement.width, &event.data);
            self.built.insert(event.id, key);
            laid_out += 1;
        }

        if let Some(plot) = self.time_plot.as_mut() {
            plot.refresh_for_ratio(ratio);
        }

        debug!(force, ratio, laid_out, discovered = events.len(), "timeline refreshed");
        laid_out
    }

    /// Moves the surface (and hooked targets) to the current offset immediately.
    fn reposition(&mut self) {
        let left = coords::surface_left(self.state.current_offset, self.state.ratio);
        let targets = (self.on_move_before)(vec![MoveTarget::Surface]);
        for target in &targets {
            self.surface.set_left(target, left);
        }
    }
}

impl<S: TimelineSurface + std::fmt::Debug> std::fmt::Debug for TimelineWidget<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineWidget")
            .field("surface", &self.surface)
            .field("state", &self.state)
            .field("move_to_animation", &self.move_to_animation)
            .field("viewport_width", &self.viewport_width)
            .field("has_time_plot", &self.time_plot.is_some())
            .field("built", &self.built.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{LaneId, TimelineEvent};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct RecordingSurface {
        lefts: HashMap<MoveTarget, f64>,
        animations: Vec<(MoveTarget, f64, Duration)>,
        width: f64,
        lane_widths: HashMap<LaneId, f64>,
        placements: HashMap<EventId, EventPlacement>,
        place_calls: usize,
    }

    impl TimelineSurface for RecordingSurface {
        fn set_left(&mut self, target: &MoveTarget, left: f64) {
            self.lefts.insert(target.clone(), left);
        }

        fn animate_left(&mut self, target: &MoveTarget, left: f64, duration: Duration) {
            self.animations.push((target.clone(), left, duration));
        }

        fn set_width(&mut self, width: f64) {
            self.width = width;
        }

        fn set_lane_width(&mut self, lane: LaneId, width: f64) {
            self.lane_widths.insert(lane, width);
        }

        fn place_event(&mut self, event: &TimelineEvent, placement: EventPlacement) {
            self.placements.insert(event.id, placement);
            self.place_calls += 1;
        }

        fn viewport_width(&self) -> Option<f64> {
            Some(864.0)
        }
    }

    struct CountingPlot {
        ratios: Rc<RefCell<Vec<f64>>>,
        initial_ratio: Option<f64>,
    }

    impl TimePlot for CountingPlot {
        fn initialize(&mut self, timeline: &mut TimelineState) {
            if let Some(ratio) = self.initial_ratio {
                timeline.set_ratio(ratio).unwrap();
            }
        }

        fn refresh_for_ratio(&mut self, ratio: f64) {
            self.ratios.borrow_mut().push(ratio);
        }
    }

    fn event(id: EventId, offset: i64, duration: i64) -> TimelineEvent {
        TimelineEvent::new(id, offset, duration).unwrap()
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let err = TimelineWidget::new(RecordingSurface::default(), TimelineOptions::new()).unwrap_err();
        assert_eq!(err, TimelineError::MissingEventSource);
    }

    #[test]
    fn test_invalid_ratio_rejected_at_construction() {
        let options = TimelineOptions::new().events(vec![]).ratio(-2.0);
        let err = TimelineWidget::new(RecordingSurface::default(), options).unwrap_err();
        assert_eq!(err, TimelineError::InvalidRatio(-2.0));
    }

    #[test]
    fn test_initial_refresh_lays_out_events() {
        let options = TimelineOptions::new().events(vec![event(1, 5, 10)]).ratio(2.0);
        let widget = TimelineWidget::new(RecordingSurface::default(), options).unwrap();

        let placement = widget.surface().placements[&1];
        assert_eq!(placement.width, 20);
        assert_eq!(placement.left, 10);
        assert!(widget.is_built(1));
        assert_eq!(widget.surface().width, 172_800.0);
        assert_eq!(widget.surface().lane_widths[&0], 172_800.0);
    }

    #[test]
    fn test_start_at_positions_surface() {
        let options = TimelineOptions::new().events(vec![]).ratio(3.0).start_at(100.0);
        let widget = TimelineWidget::new(RecordingSurface::default(), options).unwrap();
        assert_eq!(widget.current_offset(), 100.0);
        assert_eq!(widget.surface().lefts[&MoveTarget::Surface], -300.0);
    }

    #[test]
    fn test_move_to_animates_hooked_targets() {
        let options = TimelineOptions::new()
            .events(vec![])
            .move_to_animation(Duration::from_millis(400))
            .on_move_before(|mut targets| {
                targets.push(MoveTarget::named("ruler"));
                targets
            });
        let mut widget = TimelineWidget::new(RecordingSurface::default(), options).unwrap();

        widget.move_to(120.0);

        assert_eq!(widget.current_offset(), 120.0);
        let animations = &widget.surface().animations;
        assert_eq!(animations.len(), 2);
        assert_eq!(animations[0], (MoveTarget::Surface, -120.0, Duration::from_millis(400)));
        assert_eq!(animations[1], (MoveTarget::named("ruler"), -120.0, Duration::from_millis(400)));
    }

    #[test]
    fn test_jump_to_sets_left_without_animation() {
        let options = TimelineOptions::new().events(vec![]).ratio(0.5);
        let mut widget = TimelineWidget::new(RecordingSurface::default(), options).unwrap();
        widget.jump_to(-40.0);
        assert_eq!(widget.surface().lefts[&MoveTarget::Surface], 20.0);
        assert!(widget.surface().animations.is_empty());
    }

    #[test]
    fn test_zoom_relays_all_events() {
        let options = TimelineOptions::new().events(vec![event(1, 5, 10), event(2, 100, 1)]);
        let mut widget = TimelineWidget::new(RecordingSurface::default(), options).unwrap();
        assert_eq!(widget.surface().place_calls, 2);

        widget.zoom(4.0).unwrap();

        assert_eq!(widget.ratio(), 4.0);
        assert_eq!(widget.surface().place_calls, 4);
        assert_eq!(widget.surface().placements[&1].width, 40);
        assert_eq!(widget.surface().placements[&2].left, 400);
    }

    #[test]
    fn test_zoom_with_invalid_ratio_keeps_state() {
        let options = TimelineOptions::new().events(vec![event(1, 0, 10)]).ratio(2.0);
        let mut widget = TimelineWidget::new(RecordingSurface::default(), options).unwrap();

        assert_eq!(widget.zoom(0.0), Err(TimelineError::InvalidRatio(0.0)));
        assert_eq!(widget.ratio(), 2.0);
        assert_eq!(widget.surface().place_calls, 1);
    }

    #[test]
    fn test_set_ratio_does_not_refresh() {
        let options = TimelineOptions::new().events(vec![event(1, 0, 10)]);
        let mut widget = TimelineWidget::new(RecordingSurface::default(), options).unwrap();

        widget.set_ratio(5.0).unwrap();

        assert_eq!(widget.ratio(), 5.0);
        assert_eq!(widget.surface().placements[&1].width, 10);
        assert_eq!(widget.surface().width, 86_400.0);
    }

    #[test]
    fn test_incremental_refresh_skips_built_events() {
        let options = TimelineOptions::new().events(vec![event(1, 0, 10)]);
        let mut widget = TimelineWidget::new(RecordingSurface::default(), options).unwrap();

        assert_eq!(widget.refresh(false), 0);
        assert_eq!(widget.refresh(true), 1);

        widget.invalidate(1);
        assert!(!widget.is_built(1));
        assert_eq!(widget.refresh(false), 1);
    }

    #[test]
    fn test_z_index_follows_discovery_order() {
        let options = TimelineOptions::new().events(vec![event(7, 0, 10), event(3, 0, 10), event(5, 0, 10)]);
        let widget = TimelineWidget::new(RecordingSurface::default(), options).unwrap();
        let placements = &widget.surface().placements;
        assert_eq!(placements[&7].z_index, 0);
        assert_eq!(placements[&3].z_index, 1);
        assert_eq!(placements[&5].z_index, 2);
    }

    #[test]
    fn test_hook_receives_width_and_data() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in_hook = Rc::clone(&seen);
        let data = serde_json::json!({"color": "#00ff00"});
        let options = TimelineOptions::new()
            .events(vec![event(1, 0, 30).with_data(data.clone())])
            .ratio(2.0)
            .on_event_refreshed_after(move |event, width, data| {
                seen_in_hook.borrow_mut().push((event.id, width, data.clone()));
            });
        TimelineWidget::new(RecordingSurface::default(), options).unwrap();

        assert_eq!(*seen.borrow(), vec![(1, 60, data)]);
    }

    #[test]
    fn test_time_plot_initialized_and_refreshed() {
        let ratios = Rc::new(RefCell::new(Vec::new()));
        let plot = CountingPlot {
            ratios: Rc::clone(&ratios),
            initial_ratio: Some(0.25),
        };
        let options = TimelineOptions::new().events(vec![]).time_plot(plot);
        let mut widget = TimelineWidget::new(RecordingSurface::default(), options).unwrap();

        assert_eq!(widget.ratio(), 0.25);
        widget.zoom(0.5).unwrap();
        widget.refresh(false);
        assert_eq!(*ratios.borrow(), vec![0.25, 0.5, 0.5]);
    }

    #[test]
    fn test_fit_to_viewport_uses_surface_viewport() {
        let options = TimelineOptions::new().events(vec![event(1, 43_200, 3600)]);
        let mut widget = TimelineWidget::new(RecordingSurface::default(), options).unwrap();

        widget.fit_to_viewport().unwrap();

        assert_eq!(widget.ratio(), 0.01);
        assert_eq!(widget.surface().placements[&1].left, 432);
        assert_eq!(widget.surface().placements[&1].width, 36);
    }

    #[test]
    fn test_viewport_override_wins() {
        let options = TimelineOptions::new().events(vec![]).viewport_width(1728.0);
        let mut widget = TimelineWidget::new(RecordingSurface::default(), options).unwrap();
        assert_eq!(widget.viewport_width(), Some(1728.0));
        widget.fit_to_viewport().unwrap();
        assert_eq!(widget.ratio(), 0.02);
    }
}
