//! Audio Engine Module
//!
//! This module provides the real-time drum kit voice engine.
//! It is organized into sub-modules, each with a specific responsibility:
//!
//! - [`audio_stream`]: CPAL audio stream management and real-time callback
//! - [`constants`]: Configuration constants and limits
//! - [`errors`]: Audio-specific error types
//! - [`sample_buffer`]: Immutable decoded sample data
//! - [`voice`]: A single playing sample
//! - [`voice_pool`]: Bounded FIFO collection of playing voices with choke removal
//! - [`voice_bank`]: Trigger key to round-robin group mapping
//! - [`mixer`]: Trigger dispatch and bus mixdown
//! - [`sample_loader`]: Audio file loading and decoding
//! - [`kit`]: Kit assignment table and bank construction
//!
//! The main [`DrumKitEngine`] struct orchestrates these components to provide
//! a high-level playback interface.

use crate::audio_engine::audio_stream::{AudioStreamHandle, create_audio_stream, start_stream};
use crate::audio_engine::kit::{DEFAULT_KIT, KitPiece, load_kit};
use crate::audio_engine::voice_bank::VoiceBank;
use crate::messages::{AudioMessage, ControlMessage, TriggerEvent};
use std::path::Path;

pub mod audio_stream;
pub mod channels;
pub mod constants;
pub mod errors;
pub mod kit;
pub mod mixer;
pub mod sample_buffer;
pub mod sample_loader;
pub mod voice;
pub mod voice_bank;
pub mod voice_pool;

pub use errors::EngineError;

/// DrumKitEngine drives a voice bank from the default output device.
///
/// The bank is assembled while the engine is stopped. `run` hands a copy of it to
/// the audio thread, so the engine can be stopped and restarted with the same kit.
pub struct DrumKitEngine {
    bank: VoiceBank,
    stream_handle: Option<AudioStreamHandle>,
    is_playing: bool,
}

impl DrumKitEngine {
    /// Create a new DrumKitEngine with an empty kit.
    pub fn new() -> Self {
        Self::with_bank(VoiceBank::new())
    }

    /// Create a new DrumKitEngine around an already assembled bank.
    pub fn with_bank(bank: VoiceBank) -> Self {
        DrumKitEngine {
            bank,
            stream_handle: None,
            is_playing: false,
        }
    }

    /// Load the default kit from a bundle directory.
    ///
    /// Returns the number of trigger keys that received at least one sample.
    pub fn load_kit(&mut self, bundle_path: &Path) -> Result<usize, EngineError> {
        self.load_kit_with(bundle_path, DEFAULT_KIT)
    }

    /// Load a custom kit table from a bundle directory.
    pub fn load_kit_with(
        &mut self,
        bundle_path: &Path,
        pieces: &[KitPiece],
    ) -> Result<usize, EngineError> {
        if self.stream_handle.is_some() {
            return Err(EngineError::AlreadyRunning);
        }

        self.bank = load_kit(bundle_path, pieces)?;
        Ok(self.bank.len())
    }

    pub fn bank(&self) -> &VoiceBank {
        &self.bank
    }

    /// Initialize and run the audio engine.
    pub fn run(&mut self) -> Result<(), EngineError> {
        if self.stream_handle.is_some() {
            return Err(EngineError::AlreadyRunning);
        }

        let handle = create_audio_stream(self.bank.clone())?;
        start_stream(&handle.stream)?;
        self.stream_handle = Some(handle);
        self.is_playing = true;
        Ok(())
    }

    /// Shut down the audio engine.
    pub fn shut_down(&mut self) {
        if self.stream_handle.take().is_some() {
            log::info!("Drum kit engine stopped");
        }
        self.is_playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Trigger a kit piece with a normalized velocity (0.0 to 1.0).
    pub fn trigger(&mut self, key: u8, velocity: f32) -> Result<(), EngineError> {
        self.send(
            ControlMessage::Trigger(TriggerEvent::new(key, velocity)),
            "Trigger",
        )
    }

    /// Forward a raw MIDI message.
    ///
    /// Returns `Ok(false)` if the message is not an actionable note-on.
    pub fn trigger_midi(&mut self, bytes: &[u8]) -> Result<bool, EngineError> {
        let Some(event) = TriggerEvent::from_midi(bytes, 0) else {
            return Ok(false);
        };

        self.send(ControlMessage::Trigger(event), "Trigger")?;
        Ok(true)
    }

    /// Stop playback of all active voices.
    pub fn stop_all(&mut self) -> Result<(), EngineError> {
        self.send(ControlMessage::StopAll(), "StopAll")
    }

    /// Send a ping message to the audio thread.
    pub fn ping(&mut self) -> Result<(), EngineError> {
        self.send(ControlMessage::Ping(), "Ping")
    }

    /// Receive a message from the audio thread.
    pub fn receive_msg(&mut self) -> Result<Option<AudioMessage>, EngineError> {
        let handle = self
            .stream_handle
            .as_ref()
            .ok_or(EngineError::NotRunning)?;

        let mut consumer_guard = handle
            .consumer
            .lock()
            .map_err(|_| EngineError::Lock("consumer"))?;

        match consumer_guard.pop() {
            Ok(msg) => Ok(Some(msg)),
            Err(_) => Ok(None),
        }
    }

    fn send(&self, message: ControlMessage, name: &'static str) -> Result<(), EngineError> {
        let handle = self
            .stream_handle
            .as_ref()
            .ok_or(EngineError::NotRunning)?;

        let mut producer_guard = handle
            .producer
            .lock()
            .map_err(|_| EngineError::Lock("producer"))?;

        producer_guard
            .push(message)
            .map_err(|_| EngineError::QueueFull(name))
    }
}

impl Default for DrumKitEngine {
    fn default() -> Self {
        Self::new()
    }
}
