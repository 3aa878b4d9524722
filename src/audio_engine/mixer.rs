//! Real-time drum kit mixer.
//!
//! This module provides the [`RtMixer`] struct which turns trigger events into
//! [`Voice`](crate::audio_engine::voice::Voice) instances and mixes them into a fixed
//! set of output buses.
//!
//! The mixer owns a [`VoiceBank`] assembled before playback (see
//! [`load_kit`](crate::audio_engine::kit::load_kit)) and a [`VoicePool`] allocated at
//! construction. Nothing in here allocates, blocks or fails once playback has started.

use crate::audio_engine::constants::MAX_VOICES;
use crate::audio_engine::voice::Voice;
use crate::audio_engine::voice_bank::VoiceBank;
use crate::audio_engine::voice_pool::VoicePool;
use crate::messages::TriggerEvent;
use cpal::Sample;

/// Adds `source * gain` into output bus `bus`, if that bus exists and is bound.
fn mix_into_bus(outputs: &mut [Option<&mut [f32]>], bus: usize, source: &[f32], gain: f32) {
    let Some(Some(buffer)) = outputs.get_mut(bus) else {
        return;
    };

    for (out, sample) in buffer.iter_mut().zip(source) {
        *out += sample * gain;
    }
}

/// Real-time mixer that handles trigger dispatch and voice mixdown.
pub struct RtMixer {
    /// Key to round-robin group mapping.
    bank: VoiceBank,

    /// Active voices, oldest first.
    voices: VoicePool,
}

impl RtMixer {
    /// Creates a mixer over `bank` with the default voice limit.
    pub fn new(bank: VoiceBank) -> Self {
        Self::with_capacity(bank, MAX_VOICES)
    }

    /// Creates a mixer over `bank` that keeps at most `max_voices` voices.
    pub fn with_capacity(bank: VoiceBank, max_voices: usize) -> Self {
        Self {
            bank,
            voices: VoicePool::new(max_voices),
        }
    }

    /// Starts a voice for `key`.
    ///
    /// # Parameters
    ///
    /// - `key`: Trigger key
    /// - `velocity`: Normalized velocity, clamped to 1.0
    ///
    /// Unknown keys, empty groups and non-positive velocities are silently
    /// ignored. Otherwise the group's choke group is cleared out of the pool
    /// before the new voice is appended. Returns `true` if a voice was started.
    pub fn dispatch(&mut self, key: u8, velocity: f32) -> bool {
        self.handle_event(&TriggerEvent::new(key, velocity))
    }

    /// Dispatches a single trigger event. See [`RtMixer::dispatch`].
    pub fn handle_event(&mut self, event: &TriggerEvent) -> bool {
        let Some(velocity) = event.normalized_velocity() else {
            return false;
        };

        let Some(group) = self.bank.group_mut(event.key) else {
            return false;
        };

        let output = group.output();
        let choke_group = group.choke_group();
        let Some(sample) = group.select_next() else {
            return false;
        };
        let sample = sample.clone();

        self.voices.resolve_choke(choke_group);
        self.voices
            .insert(Voice::new(event.key, sample, output, velocity, choke_group));
        true
    }

    /// Clears the bound outputs and mixes every active voice into them.
    ///
    /// # Parameters
    ///
    /// - `outputs`: One slot per bus; `None` marks an unbound bus, which is never written
    /// - `frames`: Block length in frames
    ///
    /// Each voice plays at most `frames` frames; a voice that reaches the end of
    /// its sample is removed. Stereo samples write their right channel into the
    /// bus after their assigned one. Mixing is a plain sum with no clipping.
    pub fn mix(&mut self, outputs: &mut [Option<&mut [f32]>], frames: usize) {
        for buffer in outputs.iter_mut().flatten() {
            let len = frames.min(buffer.len());
            buffer[..len].fill(Sample::EQUILIBRIUM);
        }

        for voice in self.voices.iter_mut() {
            let consumed = frames.min(voice.remaining());
            let start = voice.frame_pos;
            let end = start + consumed;

            mix_into_bus(
                outputs,
                voice.output,
                &voice.sample.left()[start..end],
                voice.velocity,
            );

            if let Some(right) = voice.sample.right() {
                mix_into_bus(outputs, voice.output + 1, &right[start..end], voice.velocity);
            }

            voice.advance(consumed);
        }

        self.voices.remove_finished();
    }

    /// Renders one block: dispatches `events` in order, then mixes.
    pub fn render_block(
        &mut self,
        events: &[TriggerEvent],
        outputs: &mut [Option<&mut [f32]>],
        frames: usize,
    ) {
        for event in events {
            self.handle_event(event);
        }

        self.mix(outputs, frames);
    }

    /// Stops all active voices.
    pub fn stop_all(&mut self) {
        self.voices.clear();
    }

    /// Number of voices currently sounding.
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn voices(&self) -> &VoicePool {
        &self.voices
    }

    pub fn bank(&self) -> &VoiceBank {
        &self.bank
    }
}
