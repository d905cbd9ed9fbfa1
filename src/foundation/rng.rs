/// Marsaglia xorshift32 stream.
///
/// Cheap enough to call once per tick inside the real-time loop; not suitable where statistical
/// quality matters. The state must never be zero, otherwise the stream is stuck at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Xorshift32(u32);

impl Xorshift32 {
    const FALLBACK_SEED: u32 = 0x9E37_79B9;

    pub(crate) fn new(seed: u32) -> Self {
        if seed == 0 {
            Self(Self::FALLBACK_SEED)
        } else {
            Self(seed)
        }
    }

    pub(crate) fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/rng.rs"]
mod tests;
