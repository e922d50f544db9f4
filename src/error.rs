//! Error types for the timeline widget.
//!
//! Only construction-time validation and ratio changes can fail; layout
//! itself is infallible once the inputs are known to be sane.

use thiserror::Error;

use crate::event::EventId;

/// Result type alias for timeline operations
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Errors reported by the timeline widget and event parsing.
#[derive(Debug, Error, PartialEq)]
pub enum TimelineError {
    #[error("Invalid ratio: {0} (pixels per second must be finite and strictly positive)")]
    InvalidRatio(f64),

    #[error("Invalid timeline duration: {0} (must be at least one second)")]
    InvalidDuration(u64),

    #[error("Viewport width is unknown; cannot fit the timeline")]
    UnknownViewport,

    #[error("No event source configured")]
    MissingEventSource,

    #[error("Event {event}: invalid `{attribute}` attribute {value:?}")]
    InvalidAttribute {
        event: EventId,
        attribute: &'static str,
        value: String,
    },

    #[error("Event {event}: negative duration {duration}")]
    NegativeDuration { event: EventId, duration: i64 },
}
