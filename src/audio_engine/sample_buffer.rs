//! Immutable decoded sample data shared between the voice bank and playing voices.

use std::sync::Arc;

/// A decoded one-shot sample, mono or stereo.
///
/// Channel data is reference counted so a voice holds the same allocation as the
/// bank that owns it. Cloning never copies audio.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    /// Source sample rate in Hz. Informational only; no conversion is done.
    pub sample_rate: u32,
    left: Arc<[f32]>,
    right: Option<Arc<[f32]>>,
}

impl SampleBuffer {
    /// Creates a single-channel sample.
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            sample_rate,
            left: Arc::from(samples.into_boxed_slice()),
            right: None,
        }
    }

    /// Creates a two-channel sample from separate left and right data.
    pub fn stereo(sample_rate: u32, left: Vec<f32>, right: Vec<f32>) -> Self {
        Self {
            sample_rate,
            left: Arc::from(left.into_boxed_slice()),
            right: Some(Arc::from(right.into_boxed_slice())),
        }
    }

    /// Number of channels (1 or 2).
    pub fn channels(&self) -> usize {
        if self.is_stereo() { 2 } else { 1 }
    }

    pub fn is_stereo(&self) -> bool {
        self.right.is_some()
    }

    /// Length in frames.
    pub fn frames(&self) -> usize {
        self.left.len()
    }

    /// Primary channel (left, or the only channel of a mono sample).
    pub fn left(&self) -> &[f32] {
        &self.left
    }

    /// Secondary channel, present only for stereo samples.
    pub fn right(&self) -> Option<&[f32]> {
        self.right.as_deref()
    }

    /// Returns `true` if the sample has frames and both channels agree in length.
    pub fn is_well_formed(&self) -> bool {
        if self.left.is_empty() {
            return false;
        }

        match &self.right {
            Some(right) => right.len() == self.left.len(),
            None => true,
        }
    }

    /// Duration in seconds at the source sample rate.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f32 / self.sample_rate as f32
    }
}
