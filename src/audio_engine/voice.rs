//! Voice management for real-time sample playback.
//!
//! This module provides the [`Voice`] struct which represents a single playing
//! one-shot sample with its current playback state.
//!
//! Voices live in the [`VoicePool`](crate::audio_engine::voice_pool::VoicePool) and
//! are created by the [`RtMixer`](crate::audio_engine::mixer::RtMixer) when a trigger
//! resolves to a round-robin group.

use crate::audio_engine::sample_buffer::SampleBuffer;

/// A single voice in the mixer, representing a playing sample.
#[derive(Debug, Clone)]
pub struct Voice {
    /// Trigger key that spawned this voice.
    pub key: u8,

    /// The sample buffer being played.
    pub sample: SampleBuffer,

    /// Current playback position in frames.
    pub frame_pos: usize,

    /// Total length in frames.
    pub length: usize,

    /// Output bus receiving the primary channel. Stereo samples also use `output + 1`.
    pub output: usize,

    /// Velocity gain (0.0 to 1.0).
    pub velocity: f32,

    /// Choke group inherited from the round-robin group (0 = none).
    pub choke_group: u32,
}

impl Voice {
    /// Creates a new voice for playing a sample.
    ///
    /// # Parameters
    ///
    /// - `key`: Trigger key that spawned the voice
    /// - `sample`: The sample buffer to play
    /// - `output`: Output bus index
    /// - `velocity`: Gain multiplier (0.0 to 1.0)
    /// - `choke_group`: Choke group id (0 = none)
    ///
    /// # Returns
    ///
    /// A new `Voice` with playback position set to 0 and length taken from the sample.
    pub fn new(
        key: u8,
        sample: SampleBuffer,
        output: usize,
        velocity: f32,
        choke_group: u32,
    ) -> Self {
        let length = sample.frames();
        Self {
            key,
            sample,
            frame_pos: 0,
            length,
            output,
            velocity,
            choke_group,
        }
    }

    /// Frames left to play.
    pub fn remaining(&self) -> usize {
        self.length - self.frame_pos
    }

    pub fn is_finished(&self) -> bool {
        self.frame_pos >= self.length
    }

    /// Moves the playhead forward, never past the end of the sample.
    pub fn advance(&mut self, frames: usize) {
        self.frame_pos = (self.frame_pos + frames).min(self.length);
    }
}
