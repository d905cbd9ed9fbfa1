//! Real-time driver tying synthesis, compositing, metrics and the sink together.

pub mod generator;
