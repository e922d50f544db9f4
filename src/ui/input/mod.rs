//! Input handling subsystem for UI interactions.
//!
//! - Timeline input handling (drag pan, wheel pan, Ctrl+wheel zoom)

pub mod timeline_input_handler;
