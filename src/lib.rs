//! Round-robin drum kit sample player.
//!
//! Trigger events pick the next sample from a key's round-robin group, choke
//! groups cut off competing sounds, and a bounded voice pool is mixed into
//! twelve output buses per block.

pub mod audio_engine;
pub mod messages;

pub use audio_engine::DrumKitEngine;
pub use audio_engine::errors::{EngineError, KitError, SampleLoadError};
pub use audio_engine::kit::{DEFAULT_KIT, KitPiece, load_kit};
pub use audio_engine::mixer::RtMixer;
pub use audio_engine::sample_buffer::SampleBuffer;
pub use audio_engine::voice_bank::{RoundRobinGroup, VoiceBank};
pub use messages::{AudioMessage, ControlMessage, TriggerEvent};
