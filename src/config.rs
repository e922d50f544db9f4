//! Timeline configuration.
//!
//! `TimelineConfig` is the plain-data part (serializable, merged over
//! defaults field by field). `TimelineOptions` wraps it together with the
//! behavioural pieces: the event source, the hooks and the time plot.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::coords;
use crate::error::{Result, TimelineError};
use crate::event::TimelineEvent;
use crate::traits::{EventSource, MoveTarget, TimePlot};

/// Default pixels per second
pub const DEFAULT_RATIO: f64 = 1.0;

/// Default `move_to` animation length in milliseconds
pub const DEFAULT_MOVE_TO_ANIMATION_MS: u64 = 1000;

/// Default timeline length: one day
pub const DEFAULT_TIMELINE_DURATION: u64 = 86_400;

/// Callback fired after an event got its size and position.
///
/// Receives the event, its new width in pixels and its raw attribute data.
pub type EventRefreshedHook = Box<dyn FnMut(&TimelineEvent, i64, &serde_json::Value)>;

/// Callback fired before the timeline moves horizontally.
///
/// Receives the targets about to move and returns the set that actually
/// moves; append to it to keep other elements in lock-step.
pub type MoveBeforeHook = Box<dyn FnMut(Vec<MoveTarget>) -> Vec<MoveTarget>>;

/// Serializable timeline settings.
///
/// Every field has a default, so a partial JSON object is merged over the
/// defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Pixels representing one second; must be strictly positive
    pub ratio: f64,
    /// Length of the `move_to` animation
    pub move_to_animation_ms: u64,
    /// Seconds spanned by the whole timeline
    pub timeline_duration: u64,
    /// Offset, in seconds from the origin, shown when the widget is created
    pub start_at: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_RATIO,
            move_to_animation_ms: DEFAULT_MOVE_TO_ANIMATION_MS,
            timeline_duration: DEFAULT_TIMELINE_DURATION,
            start_at: 0.0,
        }
    }
}

impl TimelineConfig {
    /// Parses a JSON object, filling missing fields with defaults.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Checks the invariants the widget relies on.
    pub fn validate(&self) -> Result<()> {
        if !coords::is_valid_ratio(self.ratio) {
            return Err(TimelineError::InvalidRatio(self.ratio));
        }
        if self.timeline_duration == 0 {
            return Err(TimelineError::InvalidDuration(self.timeline_duration));
        }
        Ok(())
    }

    pub fn move_to_animation(&self) -> Duration {
        Duration::from_millis(self.move_to_animation_ms)
    }
}

/// Everything needed to build a [`crate::TimelineWidget`].
///
/// # Examples
/// ```
/// use rhere::{TimelineEvent, TimelineOptions};
///
/// let events = vec![TimelineEvent::new(1, 5, 10).unwrap()];
/// let options = TimelineOptions::new()
///     .events(events)
///     .ratio(2.0)
///     .start_at(100.0);
/// assert_eq!(options.config().ratio, 2.0);
/// ```
pub struct TimelineOptions {
    pub(crate) config: TimelineConfig,
    pub(crate) source: Option<Box<dyn EventSource>>,
    pub(crate) viewport_width: Option<f64>,
    pub(crate) time_plot: Option<Box<dyn TimePlot>>,
    pub(crate) on_event_refreshed_after: EventRefreshedHook,
    pub(crate) on_move_before: MoveBeforeHook,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineOptions {
    /// Creates options with every default in place and no event source.
    pub fn new() -> Self {
        Self::with_config(TimelineConfig::default())
    }

    /// Creates options from an already-resolved config.
    pub fn with_config(config: TimelineConfig) -> Self {
        Self {
            config,
            source: None,
            viewport_width: None,
            time_plot: None,
            on_event_refreshed_after: Box::new(|_, _, _| {}),
            on_move_before: Box::new(|targets| targets),
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    // ===== Required =====

    /// Sets where events come from. Required.
    pub fn event_source(mut self, source: impl EventSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Uses a fixed, pre-supplied set of events.
    pub fn events(self, events: Vec<TimelineEvent>) -> Self {
        self.event_source(events)
    }

    // ===== Optional =====

    /// Width of the outer container. Defaults to the surface's own viewport.
    pub fn viewport_width(mut self, width: f64) -> Self {
        self.viewport_width = Some(width);
        self
    }

    pub fn time_plot(mut self, plot: impl TimePlot + 'static) -> Self {
        self.time_plot = Some(Box::new(plot));
        self
    }

    pub fn ratio(mut self, ratio: f64) -> Self {
        self.config.ratio = ratio;
        self
    }

    pub fn move_to_animation(mut self, duration: Duration) -> Self {
        self.config.move_to_animation_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn timeline_duration(mut self, seconds: u64) -> Self {
        self.config.timeline_duration = seconds;
        self
    }

    pub fn start_at(mut self, offset: f64) -> Self {
        self.config.start_at = offset;
        self
    }

    pub fn on_event_refreshed_after<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&TimelineEvent, i64, &serde_json::Value) + 'static,
    {
        self.on_event_refreshed_after = Box::new(hook);
        self
    }

    pub fn on_move_before<F>(mut self, hook: F) -> Self
    where
        F: FnMut(Vec<MoveTarget>) -> Vec<MoveTarget> + 'static,
    {
        self.on_move_before = Box::new(hook);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TimelineConfig::default();
        assert_eq!(config.ratio, 1.0);
        assert_eq!(config.move_to_animation_ms, 1000);
        assert_eq!(config.timeline_duration, 86_400);
        assert_eq!(config.start_at, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let config = TimelineConfig::from_json_str(r#"{"ratio": 0.5, "start_at": 3600}"#).unwrap();
        assert_eq!(config.ratio, 0.5);
        assert_eq!(config.start_at, 3600.0);
        assert_eq!(config.timeline_duration, DEFAULT_TIMELINE_DURATION);
        assert_eq!(config.move_to_animation_ms, DEFAULT_MOVE_TO_ANIMATION_MS);
    }

    #[test]
    fn test_validate_rejects_bad_ratio_and_duration() {
        let config = TimelineConfig { ratio: 0.0, ..TimelineConfig::default() };
        assert_eq!(config.validate(), Err(TimelineError::InvalidRatio(0.0)));

        let config = TimelineConfig { timeline_duration: 0, ..TimelineConfig::default() };
        assert_eq!(config.validate(), Err(TimelineError::InvalidDuration(0)));
    }

    #[test]
    fn test_builder_sets_fields() {
        let options = TimelineOptions::new()
            .ratio(3.0)
            .timeline_duration(3600)
            .start_at(60.0)
            .move_to_animation(Duration::from_millis(250))
            .viewport_width(800.0);

        assert_eq!(options.config().ratio, 3.0);
        assert_eq!(options.config().timeline_duration, 3600);
        assert_eq!(options.config().start_at, 60.0);
        assert_eq!(options.config().move_to_animation(), Duration::from_millis(250));
        assert_eq!(options.viewport_width, Some(800.0));
        assert!(options.source.is_none());
    }
}
