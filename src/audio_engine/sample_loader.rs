//! Audio file loading and decoding functionality.
//!
//! This module provides functions for loading and decoding audio files into sample buffers
//! that can be registered in a [`VoiceBank`](crate::audio_engine::voice_bank::VoiceBank).

use std::fs::File;
use std::path::Path;
use symphonia::core::{
    audio::SampleBuffer as SymphoniaSampleBuffer, codecs::DecoderOptions,
    errors::Error as SymphoniaError, formats::FormatOptions, io::MediaSourceStream,
    meta::MetadataOptions, probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};

use crate::audio_engine::channels::split_channels;
use crate::audio_engine::errors::SampleLoadError;
use crate::audio_engine::sample_buffer::SampleBuffer;

/// Decodes an audio file into a sample buffer.
///
/// This function loads an audio file from disk, decodes it using the Symphonia library,
/// and lays it out as mono or stereo planar data. The source sample rate is recorded
/// but not converted.
///
/// # Parameters
///
/// - `path`: Path to the audio file to load
/// - `keep_stereo`: Keep the first two channels as a stereo pair instead of
///   averaging every channel into mono
///
/// # Returns
///
/// - `Ok(SampleBuffer)`: Successfully decoded audio buffer
/// - `Err(SampleLoadError)`: Error encountered during loading or decoding
///
/// # Errors
///
/// This function may return errors for various conditions:
/// - File not found or cannot be opened
/// - Audio format not recognized or corrupted
/// - Missing sample rate or channel information
/// - File decodes to zero frames
pub fn decode_audio_file_to_sample_buffer(
    path: &Path,
    keep_stereo: bool,
) -> Result<SampleBuffer, SampleLoadError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or(SampleLoadError::NoDefaultTrack)?;
    let track_id = track.id;
    let file_rate_hz = track
        .codec_params
        .sample_rate
        .ok_or(SampleLoadError::MissingSampleRate)?;
    let file_channels = track
        .codec_params
        .channels
        .ok_or(SampleLoadError::MissingChannels)?
        .count();

    let mut decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut decoded: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => return Err(SampleLoadError::Decode(err)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let audio_buf = decoder.decode(&packet)?;
        let spec = *audio_buf.spec();
        let duration = audio_buf.capacity() as u64;

        let mut sample_buf = SymphoniaSampleBuffer::<f32>::new(duration, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        decoded.extend_from_slice(sample_buf.samples());
    }

    let split = split_channels(decoded, file_channels, keep_stereo)?;
    if split.left.is_empty() {
        return Err(SampleLoadError::EmptySample);
    }

    log::debug!(
        "Decoded {} ({}, {} Hz, {} frames)",
        path.display(),
        if split.right.is_some() { "stereo" } else { "mono" },
        file_rate_hz,
        split.left.len()
    );

    Ok(match split.right {
        Some(right) => SampleBuffer::stereo(file_rate_hz, split.left, right),
        None => SampleBuffer::mono(file_rate_hz, split.left),
    })
}
