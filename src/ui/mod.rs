//! UI panel rendering subsystem
//!
//! This module contains all UI panel rendering logic for the timeline viewer:
//! - Header panel (schedule controls, zoom, go to, load more)
//! - Timeline panel (ruler and lanes, pan and zoom gestures)
//! - Status bar (view position and schedule size)
//! - Panel manager (panel orchestration and layout)
//! - Input handling (mouse interactions)

pub mod header;
pub mod timeline_panel;
pub mod status_bar;
pub mod panel_manager;
pub mod input;
