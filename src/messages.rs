//! Message definitions for communication between host threads and the audio thread.
//!
//! This module defines the enums that serve as the wire format for messages passed through the
//! ring buffers between control code and the real-time audio callback.

use crate::audio_engine::constants::{MIDI_VELOCITY_MAX, VELOCITY_MAX};

const NOTE_ON: u8 = 0x90;
const STATUS_MASK: u8 = 0xF0;
const DATA_MASK: u8 = 0x7F;

/// A note onset addressed to a trigger key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerEvent {
    /// Trigger key (MIDI note number).
    pub key: u8,

    /// Normalized velocity. Values above 1.0 are clamped at dispatch; zero or
    /// non-finite values are ignored.
    pub velocity: f32,

    /// Frame offset of the onset inside its block. Onsets are applied at block
    /// granularity, so this is carried but not used for scheduling.
    pub frame_offset: u32,
}

impl TriggerEvent {
    pub fn new(key: u8, velocity: f32) -> Self {
        Self {
            key,
            velocity,
            frame_offset: 0,
        }
    }

    /// Builds an event from a raw 0-127 MIDI velocity.
    pub fn from_raw_velocity(key: u8, velocity: u8) -> Self {
        Self::new(key, f32::from(velocity) / f32::from(MIDI_VELOCITY_MAX))
    }

    /// Parses a raw MIDI message.
    ///
    /// Only note-on (any channel) with a positive velocity produces an event.
    /// Note-off, zero-velocity note-on and every other message yield `None`.
    pub fn from_midi(bytes: &[u8], frame_offset: u32) -> Option<Self> {
        let [status, note, velocity, ..] = *bytes else {
            return None;
        };

        if status & STATUS_MASK != NOTE_ON {
            return None;
        }

        let velocity = velocity & DATA_MASK;
        if velocity == 0 {
            return None;
        }

        let mut event = Self::from_raw_velocity(note & DATA_MASK, velocity);
        event.frame_offset = frame_offset;
        Some(event)
    }

    /// Velocity clamped to `0.0..=1.0`, or `None` if the event should not sound.
    pub fn normalized_velocity(&self) -> Option<f32> {
        if !self.velocity.is_finite() || self.velocity <= 0.0 {
            return None;
        }

        Some(self.velocity.min(VELOCITY_MAX))
    }
}

/// Message that is emitted from the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioMessage {
    /// Response to a Ping message.
    Pong(),

    /// Indicates every voice was stopped.
    Stopped(),
}

/// Message that is emitted from the control side.
#[derive(Debug, Clone)]
pub enum ControlMessage {
    /// Used for testing message passing functionality.
    Ping(),

    /// Trigger a kit piece.
    ///
    /// # Parameters
    /// * `0` - Trigger key and velocity
    Trigger(TriggerEvent),

    /// Stop all currently active voices.
    StopAll(),
}
