//! Time axis rendering logic
//!
//! A [`TimePlot`] that keeps a tick scale in sync with the timeline ratio and
//! paints major/minor tick marks with `HH:MM:SS` labels.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::coords;
use crate::formatting::format_seconds;
use crate::traits::TimePlot;
use crate::widget::TimelineState;

/// Minimum distance between two labelled ticks, in pixels.
pub const DEFAULT_MIN_TICK_SPACING: f64 = 80.0;

/// Height of the axis strip drawn by [`TimeAxisPlot::paint`].
pub const AXIS_HEIGHT: f32 = 24.0;

/// One tick mark on the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Seconds from the timeline origin
    pub seconds: u64,
    /// Distance from the surface origin in pixels
    pub x: f64,
    pub major: bool,
}

#[derive(Debug, Clone)]
struct AxisScale {
    ratio: f64,
    timeline_duration: u64,
    interval: u64,
    min_spacing: f64,
}

/// Time axis collaborator.
///
/// Cloning gives another handle on the same scale: hand one clone to the
/// widget and keep another for painting.
#[derive(Debug, Clone)]
pub struct TimeAxisPlot {
    scale: Rc<RefCell<AxisScale>>,
}

impl Default for TimeAxisPlot {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeAxisPlot {
    pub fn new() -> Self {
        Self::with_min_spacing(DEFAULT_MIN_TICK_SPACING)
    }

    /// Creates an axis whose labelled ticks are at least `min_spacing` pixels apart.
    pub fn with_min_spacing(min_spacing: f64) -> Self {
        Self {
            scale: Rc::new(RefCell::new(AxisScale {
                ratio: 1.0,
                timeline_duration: 0,
                interval: coords::tick_interval(1.0, min_spacing),
                min_spacing,
            })),
        }
    }

    /// Ratio the axis was last refreshed for.
    pub fn ratio(&self) -> f64 {
        self.scale.borrow().ratio
    }

    /// Seconds between two major ticks.
    pub fn interval(&self) -> u64 {
        self.scale.borrow().interval
    }

    /// Ticks between `start` and `end` seconds (inclusive), clamped to the timeline.
    ///
    /// Every major interval is split into five minor ticks when it divides evenly.
    pub fn ticks(&self, start: f64, end: f64) -> Vec<Tick> {
        let scale = self.scale.borrow();
        let last = end.min(scale.timeline_duration as f64);
        if last < 0.0 || start > last {
            return Vec::new();
        }

        let minor_step = if scale.interval >= 5 && scale.interval % 5 == 0 {
            scale.interval / 5
        } else {
            scale.interval
        };

        let first = (start.max(0.0) as u64 / minor_step) * minor_step;
        let mut ticks = Vec::new();
        let mut seconds = first;
        while (seconds as f64) <= last {
            if seconds as f64 >= start {
                ticks.push(Tick {
                    seconds,
                    x: coords::seconds_to_pixels(seconds as f64, scale.ratio),
                    major: seconds % scale.interval == 0,
                });
            }
            seconds += minor_step;
        }
        ticks
    }

    /// Paints the axis into `rect`.
    ///
    /// # Arguments
    /// * `painter` - Painter clipped to the axis area
    /// * `rect` - Screen rect of the axis strip
    /// * `surface_left` - Current (possibly animated) left of the ruler, in pixels
    /// * `visuals` - Colours to draw with
    pub fn paint(&self, painter: &egui::Painter, rect: egui::Rect, surface_left: f32, visuals: &egui::Visuals) {
        painter.rect_filled(rect, 0.0, visuals.extreme_bg_color);

        let ratio = self.ratio();
        let visible_start = coords::pixels_to_seconds(-surface_left as f64, ratio);
        let visible_end = visible_start + coords::pixels_to_seconds(rect.width() as f64, ratio);
        let origin_x = rect.left() + surface_left;

        for tick in self.ticks(visible_start.floor(), visible_end.ceil()) {
            let x = origin_x + tick.x as f32;
            if tick.major {
                painter.line_segment(
                    [egui::pos2(x, rect.top()), egui::pos2(x, rect.top() + 8.0)],
                    egui::Stroke::new(2.0, visuals.text_color()),
                );
                painter.text(
                    egui::pos2(x, rect.top() + 12.0),
                    egui::Align2::CENTER_TOP,
                    format_seconds(tick.seconds as f64),
                    egui::FontId::proportional(10.0),
                    visuals.text_color(),
                );
            } else {
                painter.line_segment(
                    [egui::pos2(x, rect.top()), egui::pos2(x, rect.top() + 4.0)],
                    egui::Stroke::new(1.0, visuals.text_color().gamma_multiply(0.5)),
                );
            }
        }
    }
}

impl TimePlot for TimeAxisPlot {
    fn initialize(&mut self, timeline: &mut TimelineState) {
        let mut scale = self.scale.borrow_mut();
        scale.timeline_duration = timeline.timeline_duration();
        scale.ratio = timeline.ratio();
        scale.interval = coords::tick_interval(scale.ratio, scale.min_spacing);
    }

    fn refresh_for_ratio(&mut self, ratio: f64) {
        let mut scale = self.scale.borrow_mut();
        scale.ratio = ratio;
        scale.interval = coords::tick_interval(ratio, scale.min_spacing);
        trace!(ratio, interval = scale.interval, "time axis rescaled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(ratio: f64, duration: u64) -> TimeAxisPlot {
        let mut plot = TimeAxisPlot::new();
        let mut state = TimelineState::new(ratio, duration);
        plot.initialize(&mut state);
        plot
    }

    #[test]
    fn test_initialize_reads_state() {
        let plot = axis(1.0, 3600);
        assert_eq!(plot.ratio(), 1.0);
        assert_eq!(plot.interval(), 120);
    }

    #[test]
    fn test_refresh_updates_shared_handle() {
        let plot = axis(1.0, 86_400);
        let mut handle = plot.clone();
        handle.refresh_for_ratio(0.05);
        assert_eq!(plot.ratio(), 0.05);
        assert_eq!(plot.interval(), 1800);
    }

    #[test]
    fn test_ticks_major_and_minor() {
        let plot = axis(1.0, 3600);
        let ticks = plot.ticks(0.0, 240.0);

        let seconds: Vec<u64> = ticks.iter().map(|t| t.seconds).collect();
        assert_eq!(seconds, vec![0, 24, 48, 72, 96, 120, 144, 168, 192, 216, 240]);
        assert!(ticks[0].major);
        assert!(!ticks[1].major);
        assert!(ticks[5].major);
        assert_eq!(ticks[5].x, 120.0);
    }

    #[test]
    fn test_ticks_clamped_to_timeline() {
        let plot = axis(100.0, 3);
        let seconds: Vec<u64> = plot.ticks(-5.0, 10.0).iter().map(|t| t.seconds).collect();
        assert_eq!(seconds, vec![0, 1, 2, 3]);
        assert!(plot.ticks(10.0, 20.0).is_empty());
    }
}
