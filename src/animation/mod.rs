/// Per-tick animation counters.
pub mod state;
