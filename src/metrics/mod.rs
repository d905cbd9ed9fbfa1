/// Render/send timing and fps tracking.
pub mod tracker;
