//! Audio engine configuration constants and limits.

/// Number of output buses the mixer renders into.
pub const NUM_OUTPUTS: usize = 12;

/// Maximum number of voices that can be active simultaneously.
pub const MAX_VOICES: usize = 64;

/// Number of addressable trigger keys (MIDI note numbers 0..128).
pub const NUM_KEYS: usize = 128;

/// Number of round-robin variations loaded per kit piece.
pub const ROUND_ROBIN_DEPTH: usize = 4;

/// Largest block the live stream renders in one mixer pass.
pub const MAX_BLOCK_FRAMES: usize = 512;

/// Capacity of each control/reply ring buffer.
pub const MESSAGE_QUEUE_SIZE: usize = 1024;

/// Choke-group id meaning "no choke group".
pub const NO_CHOKE: u32 = 0;

/// Largest raw MIDI velocity value.
pub const MIDI_VELOCITY_MAX: u8 = 127;

/// Maximum velocity gain.
pub const VELOCITY_MAX: f32 = 1.0;
