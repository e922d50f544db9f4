//! egui host adapter.
//!
//! - `surface` - retained [`EguiSurface`] the widget lays events out on
//! - `time_axis` - [`TimeAxisPlot`], a time plot that paints ruler ticks

mod surface;
mod time_axis;

pub use surface::{EguiSurface, PlacedEvent, TargetPosition};
pub use time_axis::{Tick, TimeAxisPlot, AXIS_HEIGHT, DEFAULT_MIN_TICK_SPACING};
