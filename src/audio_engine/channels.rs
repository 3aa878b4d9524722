use crate::audio_engine::errors::SampleLoadError;

/// Planar channel data ready to become a sample buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitChannels {
    pub left: Vec<f32>,
    pub right: Option<Vec<f32>>,
}

/// Splits interleaved audio into the mono or stereo layout the voice engine plays.
///
/// - Mono (1 channel): kept as is
/// - Two or more channels with `keep_stereo`: channels 0 and 1 become left and right,
///   any further channels are dropped
/// - Two or more channels without `keep_stereo`: all channels are averaged to mono
///
/// # Parameters
///
/// - `samples`: Interleaved audio samples
/// - `file_channels`: Number of channels in the source audio
/// - `keep_stereo`: Whether the kit piece is played in stereo
///
/// # Returns
///
/// - `Ok(SplitChannels)`: Planar channel data
/// - `Err(SampleLoadError)`: The source has no channels
pub fn split_channels(
    samples: Vec<f32>,
    file_channels: usize,
    keep_stereo: bool,
) -> Result<SplitChannels, SampleLoadError> {
    match file_channels {
        0 => Err(SampleLoadError::UnsupportedChannels { file_channels }),
        1 => Ok(SplitChannels {
            left: samples,
            right: None,
        }),
        // Stereo pair: first two channels of each frame
        _ if keep_stereo => {
            let frames = samples.len() / file_channels;
            let mut left = Vec::with_capacity(frames);
            let mut right = Vec::with_capacity(frames);
            for frame in samples.chunks_exact(file_channels) {
                left.push(frame[0]);
                right.push(frame[1]);
            }
            Ok(SplitChannels {
                left,
                right: Some(right),
            })
        }
        // Down-mix: average each frame
        _ => {
            let scale = 1.0 / file_channels as f32;
            let left = samples
                .chunks_exact(file_channels)
                .map(|frame| frame.iter().sum::<f32>() * scale)
                .collect();
            Ok(SplitChannels { left, right: None })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_mono_passthrough() {
        let input = vec![0.5, -0.3, 0.8];
        let output = split_channels(input.clone(), 1, true).unwrap();

        assert_eq!(output.left, input);
        assert!(output.right.is_none());
    }

    #[test]
    fn test_split_stereo_keeps_pair() {
        let input = vec![0.5, 0.3, -0.2, 0.4, 0.8, 0.6];
        let output = split_channels(input, 2, true).unwrap();

        assert_eq!(output.left, vec![0.5, -0.2, 0.8]);
        assert_eq!(output.right, Some(vec![0.3, 0.4, 0.6]));
    }

    #[test]
    fn test_split_stereo_to_mono() {
        let input = vec![0.5, 0.3, -0.2, 0.4, 0.8, 0.6];
        let output = split_channels(input, 2, false).unwrap();

        assert_eq!(output.left.len(), 3); // 3 frames × 1 channel
        assert!((output.left[0] - 0.4).abs() < 1e-6); // (0.5 + 0.3) / 2
        assert!((output.left[1] - 0.1).abs() < 1e-6); // (-0.2 + 0.4) / 2
        assert!((output.left[2] - 0.7).abs() < 1e-6); // (0.8 + 0.6) / 2
        assert!(output.right.is_none());
    }

    #[test]
    fn test_split_multichannel() {
        let input = vec![0.3, 0.6, 0.9, 0.1, 0.2, 0.3, 0.0, 0.0];
        let stereo = split_channels(input.clone(), 4, true).unwrap();
        assert_eq!(stereo.left, vec![0.3, 0.2]);
        assert_eq!(stereo.right, Some(vec![0.6, 0.3]));

        let mono = split_channels(input, 4, false).unwrap();
        assert!((mono.left[0] - 0.475).abs() < 1e-6);
        assert!((mono.left[1] - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_split_no_channels() {
        let result = split_channels(vec![0.1], 0, false);

        assert!(matches!(
            result,
            Err(SampleLoadError::UnsupportedChannels { file_channels: 0 })
        ));
    }
}
