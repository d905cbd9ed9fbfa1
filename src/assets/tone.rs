use crate::foundation::error::{TestcardError, TestcardResult};

/// Whole sine periods stored per channel. The buffer loops seamlessly.
pub const TONE_CYCLES: usize = 20;

/// Precomputed looping sine tone, planar `f32` (all samples of channel 0, then channel 1, ...).
#[derive(Clone, Debug, PartialEq)]
pub struct ToneBuffer {
    sample_rate: u32,
    channels: u16,
    frequency_hz: u32,
    samples_per_channel: usize,
    samples: Vec<f32>,
}

impl ToneBuffer {
    /// Build [`TONE_CYCLES`] periods of a full-scale sine at `frequency_hz` on every channel.
    ///
    /// The period is `sample_rate / frequency_hz` samples (integer division), so frequencies that
    /// do not divide the sample rate are rounded to the nearest representable period.
    pub fn new(sample_rate: u32, channels: u16, frequency_hz: u32) -> TestcardResult<Self> {
        if sample_rate == 0 || channels == 0 || frequency_hz == 0 {
            return Err(TestcardError::validation(
                "tone sample_rate, channels and frequency must be non-zero",
            ));
        }
        if frequency_hz > sample_rate {
            return Err(TestcardError::validation(format!(
                "tone frequency {frequency_hz} Hz exceeds sample rate {sample_rate} Hz"
            )));
        }

        let period = (sample_rate / frequency_hz) as usize;
        let step = std::f64::consts::TAU / period as f64;
        let one_period: Vec<f32> = (0..period).map(|i| (step * i as f64).sin() as f32).collect();

        let samples_per_channel = period * TONE_CYCLES;
        let mut samples = Vec::with_capacity(samples_per_channel * usize::from(channels));
        for _ in 0..channels {
            for _ in 0..TONE_CYCLES {
                samples.extend_from_slice(&one_period);
            }
        }

        Ok(Self {
            sample_rate,
            channels,
            frequency_hz,
            samples_per_channel,
            samples,
        })
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Requested tone frequency in Hz.
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Samples stored per channel.
    pub fn samples_per_channel(&self) -> usize {
        self.samples_per_channel
    }

    /// Byte distance between the starts of consecutive channel planes.
    pub fn channel_stride_bytes(&self) -> usize {
        self.samples_per_channel * std::mem::size_of::<f32>()
    }

    /// All planes back to back.
    pub fn planar(&self) -> &[f32] {
        &self.samples
    }

    /// Samples of channel `c`, or `None` past the last channel.
    pub fn channel(&self, c: u16) -> Option<&[f32]> {
        if c >= self.channels {
            return None;
        }
        let start = usize::from(c) * self.samples_per_channel;
        Some(&self.samples[start..start + self.samples_per_channel])
    }

    /// Interleaved copy (`L R L R ...`) for consumers that want packed PCM.
    pub fn interleaved(&self) -> Vec<f32> {
        let ch = usize::from(self.channels);
        let mut out = vec![0.0f32; self.samples.len()];
        for (c, plane) in self.samples.chunks_exact(self.samples_per_channel).enumerate() {
            for (i, &s) in plane.iter().enumerate() {
                out[i * ch + c] = s;
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/tone.rs"]
mod tests;
