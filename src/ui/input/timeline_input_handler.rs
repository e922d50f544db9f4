//! Timeline input handling for panning and zooming.
//!
//! This module handles mouse input for the timeline view:
//! - Drag panning (left mouse + drag)
//! - Scroll wheel zoom (Ctrl + wheel), anchored at the pointer
//! - Scroll wheel pan (wheel without Ctrl)

use eframe::egui;
use rhere::coords;

/// Zoom change per scrolled point
const WHEEL_ZOOM_SENSITIVITY: f64 = 0.002;

/// Drag in progress: the offset it started from and the pixels moved since.
///
/// The widget positions the surface in whole seconds, so the drag is
/// accumulated in pixels and converted once per frame instead of adding up
/// rounded per-frame steps.
#[derive(Debug, Clone, Copy, Default)]
struct DragPan {
    start_offset: f64,
    delta_x: f64,
}

/// Result of timeline input handling
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineInputResult {
    /// No interaction occurred
    None,
    /// The view should jump to a new offset (seconds)
    Panned { offset: f64 },
    /// The ratio should be multiplied by `factor`, keeping the time under
    /// `anchor_x` (pixels from the canvas' left edge) in place
    Zoomed { factor: f64, anchor_x: f64 },
}

/// Handles timeline input events.
///
/// # Arguments
/// * `ctx` - The egui context for input access
/// * `canvas_rect` - Screen rect of the lanes area
/// * `canvas_response` - The canvas interaction response
/// * `current_offset` - Offset the timeline is currently at
/// * `ratio` - Current pixels per second
///
/// # Returns
/// The requested view change
pub fn handle_timeline_input(
    ctx: &egui::Context,
    canvas_rect: egui::Rect,
    canvas_response: &egui::Response,
    current_offset: f64,
    ratio: f64,
) -> TimelineInputResult {
    if canvas_response.dragged() {
        let key = canvas_response.id.with("drag_pan");
        let mut pan = ctx
            .data(|d| d.get_temp::<DragPan>(key))
            .filter(|_| !canvas_response.drag_started())
            .unwrap_or(DragPan {
                start_offset: current_offset,
                delta_x: 0.0,
            });

        let drag_delta = canvas_response.drag_delta();
        pan.delta_x += drag_delta.x as f64;
        ctx.data_mut(|d| d.insert_temp(key, pan));

        if drag_delta.x != 0.0 {
            return TimelineInputResult::Panned {
                offset: panned_offset(pan.start_offset, ratio, pan.delta_x),
            };
        }
    }

    let Some(hover_pos) = ctx.input(|i| i.pointer.hover_pos()) else {
        return TimelineInputResult::None;
    };
    if !canvas_rect.contains(hover_pos) {
        return TimelineInputResult::None;
    }

    ctx.input(|i| {
        // Try both raw_scroll_delta and smooth_scroll_delta for compatibility
        let scroll_y = if i.raw_scroll_delta.y != 0.0 {
            i.raw_scroll_delta.y
        } else {
            i.smooth_scroll_delta.y
        };
        if scroll_y == 0.0 {
            return TimelineInputResult::None;
        }

        if i.modifiers.ctrl {
            TimelineInputResult::Zoomed {
                factor: wheel_zoom_factor(scroll_y as f64),
                anchor_x: (hover_pos.x - canvas_rect.left()) as f64,
            }
        } else {
            // Scrolling down moves towards later times
            TimelineInputResult::Panned {
                offset: wheel_panned_offset(current_offset, ratio, scroll_y as f64),
            }
        }
    })
}

/// Offset, in whole seconds, after the content was dragged `delta_x` pixels
/// to the right.
pub fn panned_offset(current_offset: f64, ratio: f64, delta_x: f64) -> f64 {
    (current_offset - coords::pixels_to_seconds(delta_x, ratio)).round()
}

/// Like [`panned_offset`], but a non-zero wheel movement always moves at
/// least one second.
pub fn wheel_panned_offset(current_offset: f64, ratio: f64, scroll_y: f64) -> f64 {
    let offset = panned_offset(current_offset, ratio, scroll_y);
    if scroll_y != 0.0 && offset == current_offset.round() {
        offset - scroll_y.signum()
    } else {
        offset
    }
}

/// Ratio multiplier for a wheel movement; never zero or negative.
pub fn wheel_zoom_factor(scroll_y: f64) -> f64 {
    (1.0 + scroll_y * WHEEL_ZOOM_SENSITIVITY).max(0.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_right_moves_to_earlier_time() {
        assert_eq!(panned_offset(100.0, 2.0, 50.0), 75.0);
        assert_eq!(panned_offset(100.0, 0.5, -10.0), 120.0);
    }

    #[test]
    fn test_pan_lands_on_whole_seconds() {
        // 30px at 50 px/s is 0.6s
        assert_eq!(panned_offset(100.0, 50.0, 30.0), 99.0);
        // Accumulated drag: ten 5px frames from the same start
        assert_eq!(panned_offset(100.0, 50.0, 50.0), 99.0);
        assert_eq!(panned_offset(100.0, 50.0, 4.0), 100.0);
    }

    #[test]
    fn test_small_wheel_pan_moves_one_second() {
        assert_eq!(wheel_panned_offset(100.0, 50.0, 4.0), 99.0);
        assert_eq!(wheel_panned_offset(100.0, 50.0, -4.0), 101.0);
        assert_eq!(wheel_panned_offset(100.0, 1.0, 50.0), 50.0);
    }

    #[test]
    fn test_wheel_zoom_factor() {
        assert_eq!(wheel_zoom_factor(0.0), 1.0);
        assert!((wheel_zoom_factor(50.0) - 1.1).abs() < 1e-12);
        assert_eq!(wheel_zoom_factor(-10_000.0), 0.1);
    }

    #[test]
    fn test_no_input_is_none() {
        let ctx = egui::Context::default();
        let mut result = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let rect = ui.available_rect_before_wrap();
                let response = ui.interact(rect, ui.id().with("canvas"), egui::Sense::drag());
                result = Some(handle_timeline_input(ctx, rect, &response, 0.0, 1.0));
            });
        });
        assert_eq!(result, Some(TimelineInputResult::None));
    }
}
