//! Timeline event descriptors.
//!
//! An event is an immutable record of where it sits on the timeline
//! (`offset`, seconds from the origin) and how long it lasts (`duration`,
//! seconds). Layout never reads anything else; the free-form `data`
//! attributes are only handed back to hooks.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};

/// Identifier of an event, unique within one event source
pub type EventId = u64;

/// Identifier of a lane (one stacked timeline row)
pub type LaneId = u32;

/// Attribute key holding the duration in seconds
pub const DURATION_ATTR: &str = "duration";

/// Attribute key holding the offset in seconds from the timeline origin
pub const OFFSET_ATTR: &str = "offset";

/// A single event placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: EventId,
    /// Seconds from the timeline origin
    pub offset: i64,
    /// Length in seconds, never negative
    pub duration: i64,
    #[serde(default)]
    pub lane: LaneId,
    /// Raw attributes, passed untouched to `on_event_refreshed_after`
    #[serde(default)]
    pub data: serde_json::Value,
}

impl TimelineEvent {
    /// Creates an event on lane 0 without extra attributes.
    ///
    /// # Arguments
    /// * `id` - Event identifier
    /// * `offset` - Start, in seconds from the timeline origin
    /// * `duration` - Length in seconds (must be >= 0)
    pub fn new(id: EventId, offset: i64, duration: i64) -> Result<Self> {
        if duration < 0 {
            return Err(TimelineError::NegativeDuration { event: id, duration });
        }
        Ok(Self {
            id,
            offset,
            duration,
            lane: 0,
            data: serde_json::Value::Null,
        })
    }

    /// Moves the event onto another lane.
    pub fn with_lane(mut self, lane: LaneId) -> Self {
        self.lane = lane;
        self
    }

    /// Attaches free-form attributes to the event.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Builds an event from markup-style attributes.
    ///
    /// `duration` and `offset` may be JSON numbers or strings. Strings are
    /// read like an integer prefix (`"90"`, `" 90s"` and `"90.5"` all give
    /// 90); anything without leading digits is rejected. The whole attribute
    /// map is kept as the event's `data`.
    ///
    /// # Arguments
    /// * `id` - Event identifier
    /// * `attributes` - Attribute map, e.g. parsed `data-*` attributes
    pub fn from_attributes(
        id: EventId,
        attributes: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self> {
        let duration = read_seconds(id, attributes, DURATION_ATTR)?;
        let offset = read_seconds(id, attributes, OFFSET_ATTR)?;
        let lane = attributes
            .get("lane")
            .and_then(|v| v.as_u64())
            .and_then(|v| LaneId::try_from(v).ok())
            .unwrap_or(0);

        Ok(Self::new(id, offset, duration)?
            .with_lane(lane)
            .with_data(serde_json::Value::Object(attributes.clone())))
    }

    /// End of the event in seconds from the origin.
    pub fn end(&self) -> i64 {
        self.offset + self.duration
    }
}

fn read_seconds(
    id: EventId,
    attributes: &serde_json::Map<String, serde_json::Value>,
    attribute: &'static str,
) -> Result<i64> {
    let invalid = |value: String| TimelineError::InvalidAttribute {
        event: id,
        attribute,
        value,
    };

    match attributes.get(attribute) {
        Some(serde_json::Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
                    .ok_or_else(|| invalid(n.to_string()))
            }
        }
        Some(serde_json::Value::String(s)) => parse_int_prefix(s).ok_or_else(|| invalid(s.clone())),
        Some(other) => Err(invalid(other.to_string())),
        None => Err(invalid("<missing>".to_string())),
    }
}

/// Parses the leading integer of a string, ignoring surrounding whitespace
/// and any trailing characters.
///
/// # Examples
/// ```
/// use rhere::event::parse_int_prefix;
///
/// assert_eq!(parse_int_prefix("42"), Some(42));
/// assert_eq!(parse_int_prefix("  -7px"), Some(-7));
/// assert_eq!(parse_int_prefix("3.9"), Some(3));
/// assert_eq!(parse_int_prefix("abc"), None);
/// ```
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
