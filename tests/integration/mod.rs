//! Integration tests for the Stitch composition engine

mod collector_pipeline;
mod overlay_composition;
