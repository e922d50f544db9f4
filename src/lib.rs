pub mod error;
pub mod event;
pub mod coords;
pub mod traits;
pub mod source;
pub mod config;
pub mod widget;
pub mod schedule;
pub mod writer;
pub mod formatting;
pub mod generator;
pub mod egui_host;

// Export core widget
pub use widget::{TimelineWidget, TimelineState};
pub use config::{TimelineConfig, TimelineOptions};
pub use error::{TimelineError, Result};

// Export event model and discovery
pub use event::{TimelineEvent, EventId, LaneId};
pub use source::{SharedEvents, FilteredEvents};

// Export host/collaborator traits
pub use traits::{
    MoveTarget, EventPlacement,
    TimelineSurface, TimePlot, EventSource
};

// Export schedule files
pub use schedule::{Schedule, Lane, parse_schedule, read_schedule};
pub use writer::ScheduleWriter;
pub use generator::ScheduleGenerator;

// Export egui host
pub use egui_host::{EguiSurface, TimeAxisPlot};
