//! Audio-specific error types.

use thiserror::Error;

/// Errors that can occur while loading audio files.
#[derive(Debug, Error)]
pub enum SampleLoadError {
    /// Failed to open the audio file.
    #[error("failed to open file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode the audio file.
    #[error("failed to decode audio file: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    /// Audio file has no default track.
    #[error("audio file has no default track")]
    NoDefaultTrack,

    /// Audio file is missing sample rate information.
    #[error("audio file is missing a sample rate")]
    MissingSampleRate,

    /// Audio file is missing channel information.
    #[error("audio file is missing channel information")]
    MissingChannels,

    /// Audio file decoded to zero frames.
    #[error("audio file contains no frames")]
    EmptySample,

    /// Unsupported channel configuration.
    #[error("unsupported channel layout: file has {file_channels} channels")]
    UnsupportedChannels {
        /// Number of channels in the source file.
        file_channels: usize,
    },
}

/// Errors raised while assembling a voice bank.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KitError {
    /// The trigger key is outside the addressable range.
    #[error("trigger key {key} is out of range")]
    KeyOutOfRange { key: u8 },

    /// A sample with no frames was offered for a key.
    #[error("sample for key {key} has no frames")]
    EmptySample { key: u8 },

    /// A stereo sample whose channels differ in length.
    #[error("stereo sample for key {key} has mismatched channel lengths")]
    MismatchedChannels { key: u8 },

    /// The requested output bus does not exist.
    #[error("output bus {bus} for key {key} is out of range")]
    BusOutOfRange { key: u8, bus: usize },
}

/// Errors returned by the live engine facade.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `run` was called on an engine that already has a stream.
    #[error("audio engine already running")]
    AlreadyRunning,

    /// The operation needs a running stream.
    #[error("audio engine not initialized")]
    NotRunning,

    /// No default output device is available.
    #[error("no audio device found")]
    NoDevice,

    /// The device stream could not be built or started.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// The control ring buffer is full.
    #[error("failed to send {0} - buffer may be full")]
    QueueFull(&'static str),

    /// A lock guarding a ring buffer endpoint was poisoned.
    #[error("failed to acquire {0} lock")]
    Lock(&'static str),

    /// Kit construction failed.
    #[error(transparent)]
    Kit(#[from] KitError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kit_error_messages() {
        let err = KitError::BusOutOfRange { key: 42, bus: 12 };
        assert_eq!(err.to_string(), "output bus 12 for key 42 is out of range");

        let err = KitError::EmptySample { key: 36 };
        assert_eq!(err.to_string(), "sample for key 36 has no frames");
    }

    #[test]
    fn test_engine_error_wraps_kit_error() {
        let err: EngineError = KitError::MismatchedChannels { key: 49 }.into();
        assert!(matches!(err, EngineError::Kit(_)));
        assert_eq!(
            err.to_string(),
            "stereo sample for key 49 has mismatched channel lengths"
        );
    }

    #[test]
    fn test_queue_full_message() {
        let err = EngineError::QueueFull("Trigger");
        assert_eq!(err.to_string(), "failed to send Trigger - buffer may be full");
    }
}
