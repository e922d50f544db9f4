//! Schedule files: line-delimited JSON describing lanes and events.
//!
//! A schedule file looks like this (one JSON object per line):
//!
//! ```text
//! {"type":"header","version":"1.0","timeline_duration":86400}
//! {"type":"lane","id":0,"name":"Channel 1"}
//! {"type":"event","id":1,"lane":0,"offset":0,"duration":1800,"data":{"title":"News"}}
//! {"type":"footer","total_lanes":1,"total_events":1}
//! ```
//!
//! Files ending in `.br` are Brotli-compressed.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::{anyhow, Context, Result};
use brotli::Decompressor;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::{EventId, LaneId, TimelineEvent};

/// Current schedule format version written by [`crate::ScheduleWriter`]
pub const SCHEDULE_VERSION: &str = "1.0";

/// A named lane (one stacked timeline row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub id: LaneId,
    pub name: String,
}

/// A fully loaded schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub version: String,
    /// Seconds spanned by the timeline, if the header specified it
    pub timeline_duration: Option<u64>,
    pub lanes: Vec<Lane>,
    pub events: Vec<TimelineEvent>,
}

impl Schedule {
    /// Latest event end, in seconds from the origin (0 when empty).
    pub fn extent(&self) -> i64 {
        self.events.iter().map(TimelineEvent::end).max().unwrap_or(0)
    }

    /// Name of a lane, or a generic label if the file did not declare it.
    pub fn lane_name(&self, lane: LaneId) -> String {
        self.lanes
            .iter()
            .find(|l| l.id == lane)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| format!("Lane {}", lane))
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ScheduleLine {
    Header {
        version: String,
        #[serde(default)]
        timeline_duration: Option<u64>,
    },
    Lane {
        id: LaneId,
        name: String,
    },
    Event {
        id: EventId,
        offset: i64,
        duration: i64,
        #[serde(default)]
        lane: LaneId,
        #[serde(default)]
        data: serde_json::Value,
    },
    Footer {
        total_lanes: Option<usize>,
        total_events: Option<usize>,
    },
}

/// Parses a schedule file.
///
/// Automatically decompresses files whose name ends with `.br`.
///
/// # Examples
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// let schedule = rhere::parse_schedule("tv.schedule")?;
/// println!("{} events", schedule.events.len());
/// # Ok(())
/// # }
/// ```
pub fn parse_schedule(file_path: &str) -> Result<Schedule> {
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open file: {}", file_path))?;

    let reader: Box<dyn BufRead> = if file_path.ends_with(".br") {
        Box::new(BufReader::new(Decompressor::new(file, 4096)))
    } else {
        Box::new(BufReader::new(file))
    };

    let schedule = read_schedule(reader)?;
    debug!(
        path = file_path,
        lanes = schedule.lanes.len(),
        events = schedule.events.len(),
        "schedule loaded"
    );
    Ok(schedule)
}

/// Parses a schedule from any buffered reader.
pub fn read_schedule(reader: impl BufRead) -> Result<Schedule> {
    let mut header: Option<(String, Option<u64>)> = None;
    let mut lanes: Vec<Lane> = Vec::new();
    let mut events: Vec<TimelineEvent> = Vec::new();
    let mut seen_ids: HashSet<EventId> = HashSet::new();
    let mut footer: Option<(Option<usize>, Option<usize>)> = None;

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result
            .with_context(|| format!("Failed to read line {}", line_num + 1))?;

        if line.trim().is_empty() {
            continue;
        }

        let schedule_line: ScheduleLine = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse JSON at line {}", line_num + 1))?;

        if header.is_none() && !matches!(schedule_line, ScheduleLine::Header { .. }) {
            return Err(anyhow!("Missing header before line {}", line_num + 1));
        }

        match schedule_line {
            ScheduleLine::Header { version, timeline_duration } => {
                if header.is_some() {
                    return Err(anyhow!("Duplicate header at line {}", line_num + 1));
                }
                header = Some((version, timeline_duration));
            }
            ScheduleLine::Lane { id, name } => {
                if lanes.iter().any(|l| l.id == id) {
                    return Err(anyhow!("Duplicate lane '{}' at line {}", id, line_num + 1));
                }
                lanes.push(Lane { id, name });
            }
            ScheduleLine::Event { id, offset, duration, lane, data } => {
                if !seen_ids.insert(id) {
                    return Err(anyhow!("Duplicate event ID '{}' at line {}", id, line_num + 1));
                }
                let event = TimelineEvent::new(id, offset, duration)
                    .with_context(|| format!("Invalid event at line {}", line_num + 1))?
                    .with_lane(lane)
                    .with_data(data);
                events.push(event);
            }
            ScheduleLine::Footer { total_lanes, total_events } => {
                footer = Some((total_lanes, total_events));
            }
        }
    }

    let (version, timeline_duration) = header.ok_or_else(|| anyhow!("Missing header line"))?;

    if !lanes.is_empty() {
        let declared: HashMap<LaneId, &Lane> = lanes.iter().map(|l| (l.id, l)).collect();
        if let Some(event) = events.iter().find(|e| !declared.contains_key(&e.lane)) {
            return Err(anyhow!("Event '{}' references unknown lane '{}'", event.id, event.lane));
        }
    }

    if let Some((total_lanes, total_events)) = footer {
        if total_lanes.is_some_and(|n| n != lanes.len()) {
            return Err(anyhow!(
                "Footer declares {} lanes, found {}",
                total_lanes.unwrap_or_default(),
                lanes.len()
            ));
        }
        if total_events.is_some_and(|n| n != events.len()) {
            return Err(anyhow!(
                "Footer declares {} events, found {}",
                total_events.unwrap_or_default(),
                events.len()
            ));
        }
    }

    Ok(Schedule {
        version,
        timeline_duration,
        lanes,
        events,
    })
}
