//! Audio Stream Module
//!
//! This module handles CPAL audio stream management including:
//! - Stream initialization and configuration
//! - Audio callback setup
//! - Real-time message processing
//! - Folding the mixer's output buses onto the device channels

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Sample, Stream, StreamConfig};
use env_logger::{Builder, Env};
use rtrb::{Consumer, Producer, RingBuffer};
use std::sync::{Arc, Mutex};

use crate::audio_engine::constants::{MAX_BLOCK_FRAMES, MESSAGE_QUEUE_SIZE, NUM_OUTPUTS};
use crate::audio_engine::errors::EngineError;
use crate::audio_engine::mixer::RtMixer;
use crate::audio_engine::voice_bank::VoiceBank;
use crate::messages::{AudioMessage, ControlMessage};

/// Handle to the audio stream with associated message channels
pub struct AudioStreamHandle {
    pub stream: Stream,
    pub producer: Arc<Mutex<Producer<ControlMessage>>>,
    pub consumer: Arc<Mutex<Consumer<AudioMessage>>>,
    pub output_channels: usize,
    pub output_sample_rate: u32,
}

/// Setup and configure the logger for audio operations
pub fn setup_logger() {
    // Users can override via `RUST_LOG`, e.g. `RUST_LOG=debug` to see every decoded file.
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init()
        .unwrap_or(()); // Ignore initialization errors
}

/// Audio-thread state: the mixer plus pre-allocated bus buffers.
///
/// Kept separate from the CPAL callback so rendering can be driven without a device.
pub struct StreamRenderer {
    mixer: RtMixer,
    buses: Vec<Vec<f32>>,
}

impl StreamRenderer {
    pub fn new(mixer: RtMixer) -> Self {
        Self {
            mixer,
            buses: vec![vec![0.0; MAX_BLOCK_FRAMES]; NUM_OUTPUTS],
        }
    }

    /// Applies one control message, returning the reply to send back, if any.
    pub fn handle_message(&mut self, message: ControlMessage) -> Option<AudioMessage> {
        match message {
            ControlMessage::Ping() => Some(AudioMessage::Pong()),
            ControlMessage::Trigger(event) => {
                self.mixer.handle_event(&event);
                None
            }
            ControlMessage::StopAll() => {
                self.mixer.stop_all();
                Some(AudioMessage::Stopped())
            }
        }
    }

    /// Renders interleaved device audio.
    ///
    /// The buffer is processed in chunks of at most `MAX_BLOCK_FRAMES`. Bus `b`
    /// is added to device channel `b % channels`, so a 12-channel device gets
    /// one bus per channel and smaller devices get a fold-down.
    pub fn process(&mut self, data: &mut [f32], channels: usize) {
        data.fill(Sample::EQUILIBRIUM);

        if channels == 0 {
            return;
        }

        let total_frames = data.len() / channels;
        let mut done = 0;
        while done < total_frames {
            let frames = (total_frames - done).min(MAX_BLOCK_FRAMES);

            {
                let mut buses = self.buses.iter_mut();
                let mut outputs: [Option<&mut [f32]>; NUM_OUTPUTS] =
                    std::array::from_fn(|_| buses.next().map(|bus| &mut bus[..frames]));
                self.mixer.mix(&mut outputs, frames);
            }

            for (bus_index, bus) in self.buses.iter().enumerate() {
                let channel = bus_index % channels;
                for (frame, sample) in bus[..frames].iter().enumerate() {
                    data[(done + frame) * channels + channel] += sample;
                }
            }

            done += frames;
        }
    }

    pub fn mixer(&self) -> &RtMixer {
        &self.mixer
    }
}

/// Create and configure the audio stream
///
/// This function:
/// 1. Sets up the default audio device
/// 2. Configures the stream with appropriate parameters
/// 3. Creates ring buffers for message passing
/// 4. Moves `bank` into a new mixer
/// 5. Builds and returns the audio stream
pub fn create_audio_stream(bank: VoiceBank) -> Result<AudioStreamHandle, EngineError> {
    setup_logger();

    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(EngineError::NoDevice)?;

    let config = device
        .default_output_config()
        .map_err(|e| EngineError::Stream(e.to_string()))?;
    let sample_rate = config.sample_rate();
    let channels = config.channels();

    log::info!(
        "Starting drum kit engine... ({} ch@{} Hz, {} keys)",
        channels,
        sample_rate,
        bank.len()
    );

    for (key, group) in bank.iter() {
        if group.samples().iter().any(|s| s.sample_rate != sample_rate) {
            log::warn!("Key {key} has samples not recorded at {sample_rate} Hz; playing unconverted");
        }
    }

    // Create ring buffer for incoming messages (control->audio)
    let (producer_in, mut consumer_in) = RingBuffer::new(MESSAGE_QUEUE_SIZE);

    // Create ring buffer for outgoing messages (audio->control)
    let (mut producer_out, consumer_out) = RingBuffer::new(MESSAGE_QUEUE_SIZE);

    let mut renderer = StreamRenderer::new(RtMixer::new(bank));
    let device_channels = channels as usize;

    // Create stream config
    let stream_config = StreamConfig {
        channels,
        sample_rate,
        buffer_size: BufferSize::Fixed(MAX_BLOCK_FRAMES as u32),
    };

    // Create audio stream with callback
    let stream = device
        .build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                // Process incoming messages in real-time
                while let Ok(message) = consumer_in.pop() {
                    if let Some(reply) = renderer.handle_message(message) {
                        let _ = producer_out.push(reply);
                    }
                }

                // Render audio
                renderer.process(data, device_channels);
            },
            |err| {
                log::error!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| EngineError::Stream(e.to_string()))?;

    Ok(AudioStreamHandle {
        stream,
        producer: Arc::new(Mutex::new(producer_in)),
        consumer: Arc::new(Mutex::new(consumer_out)),
        output_channels: device_channels,
        output_sample_rate: sample_rate,
    })
}

/// Start playing the audio stream
pub fn start_stream(stream: &Stream) -> Result<(), EngineError> {
    stream
        .play()
        .map_err(|e| EngineError::Stream(e.to_string()))
}
