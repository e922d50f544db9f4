//! Presentation layer: visual styling separated from timeline logic.

pub mod color_mapping;
