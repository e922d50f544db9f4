//! Timeline surface backed by egui.
//!
//! The widget writes positions, widths and placements into an
//! [`EguiSurface`]; panels read them back while painting. Animated moves are
//! resolved with egui's own value animation, so a newer target simply
//! takes over from wherever the previous animation had got to.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::event::{EventId, LaneId, TimelineEvent};
use crate::traits::{EventPlacement, MoveTarget, TimelineSurface};

/// Latest horizontal position requested for a move target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPosition {
    pub left: f64,
    /// Zero for immediate moves
    pub animation: Duration,
}

/// An event together with the geometry the widget computed for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedEvent {
    pub event: TimelineEvent,
    pub placement: EventPlacement,
}

/// Retained-state surface for egui hosts.
#[derive(Debug)]
pub struct EguiSurface {
    id: egui::Id,
    positions: HashMap<MoveTarget, TargetPosition>,
    width: f64,
    lane_widths: BTreeMap<LaneId, f64>,
    events: HashMap<EventId, PlacedEvent>,
    viewport_width: Option<f64>,
}

impl EguiSurface {
    /// Creates an empty surface. `id_salt` keeps animations of several
    /// timelines apart.
    pub fn new(id_salt: impl std::hash::Hash) -> Self {
        Self {
            id: egui::Id::new(id_salt),
            positions: HashMap::new(),
            width: 0.0,
            lane_widths: BTreeMap::new(),
            events: HashMap::new(),
            viewport_width: None,
        }
    }

    /// Records the width of the panel the timeline is shown in.
    ///
    /// Called by the host every frame before painting.
    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = Some(width);
    }

    // ===== Queries =====

    pub fn position(&self, target: &MoveTarget) -> Option<TargetPosition> {
        self.positions.get(target).copied()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Lanes that received a width, in id order.
    pub fn lanes(&self) -> impl Iterator<Item = (LaneId, f64)> + '_ {
        self.lane_widths.iter().map(|(lane, width)| (*lane, *width))
    }

    pub fn placed(&self, id: EventId) -> Option<&PlacedEvent> {
        self.events.get(&id)
    }

    /// Events of one lane, lowest z-index first (paint order).
    pub fn lane_events(&self, lane: LaneId) -> Vec<&PlacedEvent> {
        let mut events: Vec<&PlacedEvent> = self
            .events
            .values()
            .filter(|p| p.event.lane == lane)
            .collect();
        events.sort_by_key(|p| p.placement.z_index);
        events
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Drops every placement, e.g. before showing a different schedule.
    pub fn clear_events(&mut self) {
        self.events.clear();
        self.lane_widths.clear();
    }

    /// Resolves the on-screen left of a target for this frame.
    ///
    /// Animated targets ease toward their latest requested position;
    /// immediate ones snap. Unknown targets sit at 0.
    pub fn animated_left(&self, ctx: &egui::Context, target: &MoveTarget) -> f32 {
        let Some(position) = self.position(target) else {
            return 0.0;
        };

        let left = position.left as f32;
        let animated = ctx.animate_value_with_time(
            self.id.with(target),
            left,
            position.animation.as_secs_f32(),
        );
        if position.animation.is_zero() {
            left
        } else {
            animated
        }
    }
}

impl TimelineSurface for EguiSurface {
    fn set_left(&mut self, target: &MoveTarget, left: f64) {
        self.positions.insert(
            target.clone(),
            TargetPosition {
                left,
                animation: Duration::ZERO,
            },
        );
    }

    fn animate_left(&mut self, target: &MoveTarget, left: f64, duration: Duration) {
        self.positions.insert(
            target.clone(),
            TargetPosition {
                left,
                animation: duration,
            },
        );
    }

    fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    fn set_lane_width(&mut self, lane: LaneId, width: f64) {
        self.lane_widths.insert(lane, width);
    }

    fn place_event(&mut self, event: &TimelineEvent, placement: EventPlacement) {
        self.events.insert(
            event.id,
            PlacedEvent {
                event: event.clone(),
                placement,
            },
        );
    }

    fn viewport_width(&self) -> Option<f64> {
        self.viewport_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(left: i64, width: i64, z_index: usize) -> EventPlacement {
        EventPlacement { left, width, z_index }
    }

    #[test]
    fn test_positions_record_animation() {
        let mut surface = EguiSurface::new("test");
        surface.set_left(&MoveTarget::Surface, -10.0);
        assert_eq!(
            surface.position(&MoveTarget::Surface),
            Some(TargetPosition { left: -10.0, animation: Duration::ZERO })
        );

        surface.animate_left(&MoveTarget::Surface, -50.0, Duration::from_secs(1));
        assert_eq!(surface.position(&MoveTarget::Surface).unwrap().animation, Duration::from_secs(1));
        assert_eq!(surface.position(&MoveTarget::named("ruler")), None);
    }

    #[test]
    fn test_lane_events_sorted_by_z_index() {
        let mut surface = EguiSurface::new("test");
        let a = TimelineEvent::new(1, 0, 10).unwrap();
        let b = TimelineEvent::new(2, 5, 10).unwrap();
        let c = TimelineEvent::new(3, 0, 10).unwrap().with_lane(1);
        surface.place_event(&b, placement(5, 10, 1));
        surface.place_event(&a, placement(0, 10, 0));
        surface.place_event(&c, placement(0, 10, 2));

        let ids: Vec<EventId> = surface.lane_events(0).iter().map(|p| p.event.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(surface.event_count(), 3);

        surface.clear_events();
        assert_eq!(surface.event_count(), 0);
    }

    #[test]
    fn test_immediate_move_snaps() {
        let ctx = egui::Context::default();
        let mut surface = EguiSurface::new("snap");
        surface.set_left(&MoveTarget::Surface, -120.0);
        assert_eq!(surface.animated_left(&ctx, &MoveTarget::Surface), -120.0);
        assert_eq!(surface.animated_left(&ctx, &MoveTarget::named("missing")), 0.0);
    }

    #[test]
    fn test_viewport_width_reported() {
        let mut surface = EguiSurface::new("vp");
        assert_eq!(surface.viewport_width(), None);
        surface.set_viewport_width(640.0);
        assert_eq!(TimelineSurface::viewport_width(&surface), Some(640.0));
    }
}
