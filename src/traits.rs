use std::time::Duration;

use crate::event::{LaneId, TimelineEvent};
use crate::widget::TimelineState;

/// Something whose horizontal position follows the timeline offset.
///
/// The scrollable surface itself is always moved; hosts can register extra
/// targets (a ruler, a minimap cursor) through the `on_move_before` hook so
/// they move in lock-step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MoveTarget {
    /// The scrollable surface holding every lane
    Surface,
    /// Any other host element, identified by name
    Named(String),
}

impl MoveTarget {
    /// Convenience constructor for a named target.
    pub fn named(name: impl Into<String>) -> Self {
        MoveTarget::Named(name.into())
    }
}

/// Pixel geometry computed for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventPlacement {
    /// Left edge relative to the surface origin
    pub left: i64,
    pub width: i64,
    /// Stacking order; higher values are drawn above lower ones
    pub z_index: usize,
}

/// Host-side element mutations the widget drives.
///
/// The widget never reads layout back from the host; every value it needs
/// comes from its own state and the event records.
pub trait TimelineSurface {
    /// Sets a target's horizontal position immediately.
    fn set_left(&mut self, target: &MoveTarget, left: f64);

    /// Starts animating a target's horizontal position.
    ///
    /// Fire-and-forget: a newer call for the same target overrides any
    /// animation still in flight.
    fn animate_left(&mut self, target: &MoveTarget, left: f64, duration: Duration);

    /// Sets the width of the scrollable surface.
    fn set_width(&mut self, width: f64);

    /// Sets the width of one lane (stacked timeline row).
    fn set_lane_width(&mut self, lane: LaneId, width: f64);

    /// Applies the computed geometry to an event element.
    fn place_event(&mut self, event: &TimelineEvent, placement: EventPlacement);

    /// Width of the outer container acting as the visible window, if known.
    fn viewport_width(&self) -> Option<f64> {
        None
    }
}

/// Auxiliary renderer kept in sync with the timeline ratio (axis ticks,
/// plots).
pub trait TimePlot {
    /// Called once during widget construction, before the first refresh.
    ///
    /// The plot may read the timeline state and adjust the ratio (for
    /// instance to fit the timeline into a known width). The borrow lasts
    /// for this call only: a plot cannot keep a handle to the widget or
    /// trigger a refresh later. Later ratio changes reach it through
    /// [`Self::refresh_for_ratio`], and fitting to the viewport after
    /// construction is done with `TimelineWidget::fit_to_viewport`.
    fn initialize(&mut self, timeline: &mut TimelineState);

    /// Re-renders for a new pixels-per-second ratio. Called at the end of every refresh.
    fn refresh_for_ratio(&mut self, ratio: f64);
}

/// Produces the events currently present on the timeline.
///
/// Sources are queried again on every refresh, so a live source can grow
/// between refreshes and only the new events get laid out.
pub trait EventSource {
    fn discover(&self) -> Vec<TimelineEvent>;
}

impl EventSource for Vec<TimelineEvent> {
    fn discover(&self) -> Vec<TimelineEvent> {
        self.clone()
    }
}
