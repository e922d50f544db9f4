//! View preferences and transient view input state.

use serde::{Deserialize, Serialize};

use rhere::config::{DEFAULT_MOVE_TO_ANIMATION_MS, DEFAULT_RATIO};
use rhere::coords;

/// Smallest ratio reachable by zooming out (about 3 days on a 1000px panel).
pub const MIN_RATIO: f64 = 0.004;
/// Largest ratio reachable by zooming in.
pub const MAX_RATIO: f64 = 50.0;

/// View settings remembered between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewPreferences {
    /// Last ratio the user zoomed to
    pub ratio: f64,
    pub move_to_animation_ms: u64,
}

impl Default for ViewPreferences {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_RATIO,
            move_to_animation_ms: DEFAULT_MOVE_TO_ANIMATION_MS,
        }
    }
}

impl ViewPreferences {
    /// Replaces out-of-range values read from storage with defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            ratio: if coords::is_valid_ratio(self.ratio) {
                self.ratio.clamp(MIN_RATIO, MAX_RATIO)
            } else {
                defaults.ratio
            },
            move_to_animation_ms: self.move_to_animation_ms.min(10_000),
        }
    }
}

/// State of the view controls.
///
/// Responsibilities:
/// - Holding the persisted preferences
/// - Holding the "go to" text field buffer
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    preferences: ViewPreferences,
    go_to_text: String,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferences(preferences: ViewPreferences) -> Self {
        Self {
            preferences: preferences.sanitized(),
            go_to_text: String::new(),
        }
    }

    pub fn preferences(&self) -> &ViewPreferences {
        &self.preferences
    }

    /// Records the ratio the timeline currently uses.
    pub fn remember_ratio(&mut self, ratio: f64) {
        if coords::is_valid_ratio(ratio) {
            self.preferences.ratio = ratio;
        }
    }

    /// Ratio after zooming by `factor`, kept within [`MIN_RATIO`, `MAX_RATIO`].
    pub fn zoomed_ratio(current: f64, factor: f64) -> f64 {
        (current * factor).clamp(MIN_RATIO, MAX_RATIO)
    }

    pub fn go_to_text_mut(&mut self) -> &mut String {
        &mut self.go_to_text
    }
}
