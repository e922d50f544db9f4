//! Timeline panel UI rendering
//!
//! Paints what the widget laid out on the [`EguiSurface`]: the ruler on top,
//! then one row per lane with its programme bars. Pan and zoom gestures are
//! returned to the application instead of being applied here.

use eframe::egui;
use egui::Color32;

use rhere::egui_host::AXIS_HEIGHT;
use rhere::formatting::{format_duration, format_seconds};
use rhere::{EguiSurface, MoveTarget};

use crate::app::{AppState, RULER_TARGET};
use crate::presentation::color_mapping;
use crate::ui::input::timeline_input_handler::{self, TimelineInputResult};

/// Width of the lane name column
pub const LANE_LABEL_WIDTH: f32 = 110.0;

const MIN_LANE_HEIGHT: f32 = 22.0;
const MAX_LANE_HEIGHT: f32 = 48.0;
const LANE_GAP: f32 = 2.0;

/// Bars narrower than this get no title
const MIN_LABELLED_BAR_WIDTH: f32 = 40.0;

/// Result of timeline panel interactions that need to be handled by the application.
pub enum TimelinePanelInteraction {
    /// Jump to a new offset without animation
    Panned { offset: f64 },
    /// Zoom by `factor` around `anchor_x` pixels from the lanes' left edge
    Zoomed { factor: f64, anchor_x: f64 },
}

/// Renders the complete timeline panel with time axis and lanes.
pub fn render_timeline_panel(
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    state: &mut AppState,
) -> Option<TimelinePanelInteraction> {
    let lane_ids = state.schedule.lane_ids();
    let Some(timeline) = state.timeline.as_mut() else {
        ui.label("No schedule loaded - open a schedule file or generate a demo schedule");
        return None;
    };

    // The widget reads the viewport width from the surface (used by Fit)
    let lanes_width = (ui.available_width() - LANE_LABEL_WIDTH).max(1.0);
    timeline.surface_mut().set_viewport_width(lanes_width as f64);

    let visuals = ui.visuals().clone();
    let surface = timeline.surface();

    // Time axis header
    let (header_rect, _) =
        ui.allocate_exact_size(egui::vec2(ui.available_width(), AXIS_HEIGHT), egui::Sense::hover());
    let axis_rect = egui::Rect::from_min_max(
        egui::pos2(header_rect.left() + LANE_LABEL_WIDTH, header_rect.top()),
        header_rect.max,
    );
    let ruler_left = surface.animated_left(ctx, &MoveTarget::named(RULER_TARGET));
    state.axis.paint(&ui.painter_at(axis_rect), axis_rect, ruler_left, &visuals);

    ui.separator();

    // Lanes
    let canvas_rect = ui.available_rect_before_wrap();
    let lanes_rect = egui::Rect::from_min_max(
        egui::pos2(canvas_rect.left() + LANE_LABEL_WIDTH, canvas_rect.top()),
        canvas_rect.max,
    );
    let canvas_response = ui.interact(
        lanes_rect,
        ui.id().with("timeline_canvas"),
        egui::Sense::drag().union(egui::Sense::hover()),
    );

    let lane_height = if lane_ids.is_empty() {
        MAX_LANE_HEIGHT
    } else {
        (canvas_rect.height() / lane_ids.len() as f32 - LANE_GAP).clamp(MIN_LANE_HEIGHT, MAX_LANE_HEIGHT)
    };

    let surface_left = surface.animated_left(ctx, &MoveTarget::Surface);
    let label_painter = ui.painter_at(canvas_rect);
    let lanes_painter = ui.painter_at(lanes_rect);
    let hover_pos = canvas_response.hover_pos();
    let mut hovered_text = None;

    for (row, lane) in lane_ids.iter().enumerate() {
        let top = canvas_rect.top() + row as f32 * (lane_height + LANE_GAP);
        if top > canvas_rect.bottom() {
            break;
        }

        label_painter.text(
            egui::pos2(canvas_rect.left() + 4.0, top + lane_height / 2.0),
            egui::Align2::LEFT_CENTER,
            state.schedule.lane_name(*lane),
            egui::FontId::proportional(12.0),
            visuals.text_color(),
        );

        let row_rect = egui::Rect::from_min_size(
            egui::pos2(lanes_rect.left(), top),
            egui::vec2(lanes_rect.width(), lane_height),
        );
        let text = paint_lane(
            &lanes_painter,
            surface,
            *lane,
            row_rect,
            surface_left,
            &visuals,
            &state.bar_colors,
            hover_pos,
        );
        if text.is_some() {
            hovered_text = text;
        }
    }

    if let Some(text) = hovered_text {
        canvas_response.clone().on_hover_text_at_pointer(text);
    }

    match timeline_input_handler::handle_timeline_input(
        ctx,
        lanes_rect,
        &canvas_response,
        timeline.current_offset(),
        timeline.ratio(),
    ) {
        TimelineInputResult::None => None,
        TimelineInputResult::Panned { offset } => Some(TimelinePanelInteraction::Panned { offset }),
        TimelineInputResult::Zoomed { factor, anchor_x } => {
            Some(TimelinePanelInteraction::Zoomed { factor, anchor_x })
        }
    }
}

/// Paints one lane row and returns the tooltip of the bar under the pointer.
#[allow(clippy::too_many_arguments)]
fn paint_lane(
    painter: &egui::Painter,
    surface: &EguiSurface,
    lane: rhere::LaneId,
    row_rect: egui::Rect,
    surface_left: f32,
    visuals: &egui::Visuals,
    bar_colors: &color_mapping::BarColors,
    hover_pos: Option<egui::Pos2>,
) -> Option<String> {
    let origin_x = row_rect.left() + surface_left;

    // Lane background spans the surface width the widget assigned to it
    let lane_width = surface
        .lanes()
        .find(|(id, _)| *id == lane)
        .map_or(0.0, |(_, width)| width as f32);
    let background = egui::Rect::from_min_max(
        egui::pos2(origin_x, row_rect.top()),
        egui::pos2(origin_x + lane_width, row_rect.bottom()),
    );
    painter.rect_filled(background, 0.0, visuals.faint_bg_color);

    let mut tooltip = None;
    for placed in surface.lane_events(lane) {
        let left = origin_x + placed.placement.left as f32;
        let width = (placed.placement.width as f32).max(1.0);
        if left > row_rect.right() || left + width < row_rect.left() {
            continue;
        }

        let bar_rect = egui::Rect::from_min_size(
            egui::pos2(left, row_rect.top() + 1.0),
            egui::vec2(width, row_rect.height() - 2.0),
        );
        let fill = bar_colors
            .get(placed.event.id)
            .unwrap_or_else(|| color_mapping::lane_color(lane));
        painter.rect_filled(bar_rect, 2.0, fill);
        painter.rect_stroke(
            bar_rect,
            2.0,
            egui::Stroke::new(1.0, visuals.extreme_bg_color),
            egui::StrokeKind::Inside,
        );

        let title = placed
            .event
            .data
            .get("title")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", placed.event.id));

        if width >= MIN_LABELLED_BAR_WIDTH {
            painter.with_clip_rect(bar_rect.intersect(row_rect)).text(
                egui::pos2(bar_rect.left() + 4.0, bar_rect.center().y),
                egui::Align2::LEFT_CENTER,
                &title,
                egui::FontId::proportional(11.0),
                color_mapping::text_color_on(fill),
            );
        }

        if hover_pos.is_some_and(|pos| bar_rect.contains(pos) && row_rect.contains(pos)) {
            tooltip = Some(format!(
                "{}\n{} - {} ({})",
                title,
                format_seconds(placed.event.offset as f64),
                format_seconds(placed.event.end() as f64),
                format_duration(placed.event.duration),
            ));
        }
    }

    if lane_width <= 0.0 {
        painter.text(
            row_rect.center(),
            egui::Align2::CENTER_CENTER,
            "empty lane",
            egui::FontId::proportional(10.0),
            Color32::GRAY,
        );
    }

    tooltip
}
