/// Precomputed background synthesis.
pub mod background;
/// Packed 32-bit pixel buffer.
pub mod buffer;
/// Per-tick frame assembly.
pub mod compositor;
/// Bitmap text stamping.
pub mod text;
