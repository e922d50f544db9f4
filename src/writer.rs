use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use anyhow::{Result, Context};
use brotli::enc::BrotliEncoderParams;
use brotli::CompressorWriter;

use crate::event::{LaneId, TimelineEvent};
use crate::schedule::SCHEDULE_VERSION;

pub struct ScheduleWriter {
    writer: Box<dyn Write>,
    lane_count: usize,
    event_count: usize,
}

impl ScheduleWriter {
    /// Creates a new ScheduleWriter for the specified file path.
    ///
    /// Automatically enables Brotli compression if the file path ends with `.br`
    /// (e.g., `day.schedule.br`).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use rhere::ScheduleWriter;
    /// # fn main() -> anyhow::Result<()> {
    /// let mut writer = ScheduleWriter::new("day.schedule")?;
    /// writer.write_header(Some(86_400))?;
    /// writer.write_lane(0, "Channel 1")?;
    /// writer.write_footer()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(file_path: &str) -> Result<Self> {
        let file = File::create(file_path)
            .with_context(|| format!("Failed to create file: {}", file_path))?;

        let writer: Box<dyn Write> = if file_path.ends_with(".br") {
            let params = BrotliEncoderParams {
                quality: 6,
                lgwin: 22,
                ..Default::default()
            };
            Box::new(CompressorWriter::with_params(BufWriter::new(file), 4096, &params))
        } else {
            Box::new(BufWriter::new(file))
        };

        Ok(ScheduleWriter {
            writer,
            lane_count: 0,
            event_count: 0,
        })
    }

    pub fn write_header(&mut self, timeline_duration: Option<u64>) -> Result<()> {
        let header = serde_json::json!({
            "type": "header",
            "version": SCHEDULE_VERSION,
            "timeline_duration": timeline_duration
        });

        self.write_line(&header)
    }

    pub fn write_lane(&mut self, id: LaneId, name: &str) -> Result<()> {
        let lane = serde_json::json!({
            "type": "lane",
            "id": id,
            "name": name
        });

        self.write_line(&lane)?;
        self.lane_count += 1;
        Ok(())
    }

    pub fn write_event(&mut self, event: &TimelineEvent) -> Result<()> {
        let mut map = serde_json::Map::new();
        map.insert("type".to_string(), serde_json::Value::String("event".to_string()));
        map.insert("id".to_string(), serde_json::Value::Number(event.id.into()));
        map.insert("lane".to_string(), serde_json::Value::Number(event.lane.into()));
        map.insert("offset".to_string(), serde_json::Value::Number(event.offset.into()));
        map.insert("duration".to_string(), serde_json::Value::Number(event.duration.into()));

        if !event.data.is_null() {
            map.insert("data".to_string(), event.data.clone());
        }

        self.write_line(&serde_json::Value::Object(map))?;
        self.event_count += 1;
        Ok(())
    }

    pub fn write_footer(&mut self) -> Result<()> {
        let footer = serde_json::json!({
            "type": "footer",
            "total_lanes": self.lane_count,
            "total_events": self.event_count
        });

        self.write_line(&footer)
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .context("Failed to serialize to JSON")?;

        writeln!(self.writer, "{}", json)
            .context("Failed to write line")?;

        self.writer.flush()
            .context("Failed to flush writer")?;

        Ok(())
    }
}

impl Drop for ScheduleWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
