//! Color mapping for timeline bars.
//!
//! Bars take the colour named in the event's `color` attribute; events
//! without one get a per-lane colour from a fixed palette.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use egui::Color32;
use rhere::{EventId, LaneId};

const LANE_PALETTE: [Color32; 6] = [
    Color32::from_rgb(0x4f, 0x7f, 0xd9),
    Color32::from_rgb(0x3f, 0xae, 0x5a),
    Color32::from_rgb(0xe0, 0xa0, 0x30),
    Color32::from_rgb(0x8a, 0x4f, 0xd9),
    Color32::from_rgb(0x2f, 0xa8, 0xa8),
    Color32::from_rgb(0xd9, 0x4f, 0x4f),
];

/// Parses `#rrggbb` (leading `#` optional).
pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color32::from_rgb(r, g, b))
}

/// Fallback colour of a lane.
pub fn lane_color(lane: LaneId) -> Color32 {
    LANE_PALETTE[lane as usize % LANE_PALETTE.len()]
}

/// Colour of an event bar, from its raw attributes.
///
/// # Arguments
/// * `data` - The event's attributes
/// * `lane` - Lane used for the fallback colour
pub fn bar_color(data: &serde_json::Value, lane: LaneId) -> Color32 {
    data.get("color")
        .and_then(|v| v.as_str())
        .and_then(parse_hex_color)
        .unwrap_or_else(|| lane_color(lane))
}

/// Picks black or white text, whichever reads better on `background`.
pub fn text_color_on(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32 + 0.587 * background.g() as f32 + 0.114 * background.b() as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

/// Bar colours filled in by the timeline's refresh hook and read by the
/// timeline panel while painting.
#[derive(Debug, Clone, Default)]
pub struct BarColors {
    colors: Rc<RefCell<HashMap<EventId, Color32>>>,
}

impl BarColors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: EventId, color: Color32) {
        self.colors.borrow_mut().insert(id, color);
    }

    pub fn get(&self, id: EventId) -> Option<Color32> {
        self.colors.borrow().get(&id).copied()
    }

    pub fn clear(&self) {
        self.colors.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.colors.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#d94f4f"), Some(Color32::from_rgb(0xd9, 0x4f, 0x4f)));
        assert_eq!(parse_hex_color("00FF00"), Some(Color32::from_rgb(0, 255, 0)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_bar_color_falls_back_to_lane() {
        let data = serde_json::json!({"color": "#000001"});
        assert_eq!(bar_color(&data, 3), Color32::from_rgb(0, 0, 1));
        assert_eq!(bar_color(&serde_json::Value::Null, 1), LANE_PALETTE[1]);
        assert_eq!(bar_color(&serde_json::json!({"color": 12}), 7), LANE_PALETTE[1]);
    }

    #[test]
    fn test_text_contrast() {
        assert_eq!(text_color_on(Color32::from_rgb(250, 250, 250)), Color32::BLACK);
        assert_eq!(text_color_on(Color32::from_rgb(20, 20, 60)), Color32::WHITE);
    }

    #[test]
    fn test_bar_colors_shared_between_clones() {
        let colors = BarColors::new();
        let hook_side = colors.clone();
        hook_side.insert(5, Color32::RED);
        assert_eq!(colors.get(5), Some(Color32::RED));
        assert_eq!(colors.len(), 1);
        colors.clear();
        assert_eq!(hook_side.get(5), None);
    }
}
