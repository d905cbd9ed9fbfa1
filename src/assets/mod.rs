/// 1bpp bitmap font atlas.
pub mod font;
/// Looping audio tone.
pub mod tone;
