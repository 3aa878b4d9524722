//! Kit assignment table and voice bank construction.
//!
//! A kit is a static list of [`KitPiece`] rows. Each row names a trigger key, the
//! file stem of its round-robin samples inside a bundle directory, the output bus,
//! whether the samples are played in stereo, and an optional choke group.

use std::path::{Path, PathBuf};

use crate::audio_engine::constants::{NO_CHOKE, ROUND_ROBIN_DEPTH};
use crate::audio_engine::errors::KitError;
use crate::audio_engine::sample_loader::decode_audio_file_to_sample_buffer;
use crate::audio_engine::voice_bank::VoiceBank;

/// Directory inside the bundle that holds the sample files.
pub const SAMPLES_DIR: &str = "samples";

/// One row of the kit assignment table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KitPiece {
    /// Trigger key (MIDI note number).
    pub key: u8,
    /// Human-readable name, used for logging.
    pub name: &'static str,
    /// File stem; round-robin files are `<stem>_v1_r<n>.wav`.
    pub stem: &'static str,
    /// Output bus. Stereo pieces also use `output + 1`.
    pub output: usize,
    pub stereo: bool,
    /// Choke group id (0 = none).
    pub choke_group: u32,
}

impl KitPiece {
    const fn mono(key: u8, name: &'static str, stem: &'static str, output: usize) -> Self {
        Self {
            key,
            name,
            stem,
            output,
            stereo: false,
            choke_group: NO_CHOKE,
        }
    }

    const fn stereo(key: u8, name: &'static str, stem: &'static str, output: usize) -> Self {
        Self {
            key,
            name,
            stem,
            output,
            stereo: true,
            choke_group: NO_CHOKE,
        }
    }

    const fn choked(self, choke_group: u32) -> Self {
        Self {
            choke_group,
            ..self
        }
    }

    /// Relative paths of this piece's round-robin files, in rotation order.
    pub fn sample_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        (1..=ROUND_ROBIN_DEPTH).map(move |round| {
            Path::new(SAMPLES_DIR).join(format!("{}_v1_r{round}.wav", self.stem))
        })
    }
}

/// Hi-hat pieces cut each other off.
pub const HIHAT_CHOKE_GROUP: u32 = 1;

/// Default acoustic kit: 12 buses, stereo overheads on 9/10.
pub const DEFAULT_KIT: &[KitPiece] = &[
    KitPiece::mono(36, "kick", "kick_hit", 0),
    KitPiece::mono(38, "snare center", "snare_center", 1),
    KitPiece::mono(40, "snare rimshot", "snare_rimshot", 1),
    KitPiece::mono(37, "snare sidestick", "snare_sidestick", 1),
    KitPiece::mono(42, "hihat closed", "hihat_downclosed", 2).choked(HIHAT_CHOKE_GROUP),
    KitPiece::mono(46, "hihat open", "hihat_downopen", 2).choked(HIHAT_CHOKE_GROUP),
    KitPiece::mono(44, "hihat pedal", "hihat_pedal", 2).choked(HIHAT_CHOKE_GROUP),
    KitPiece::mono(50, "rack tom 1", "racktom1_center", 3),
    KitPiece::mono(48, "rack tom 2", "racktom2_center", 4),
    KitPiece::mono(47, "rack tom 3", "racktom3_center", 5),
    KitPiece::mono(45, "floor tom 1", "floortom1_center", 6),
    KitPiece::mono(43, "floor tom 2", "floortom2_center", 7),
    KitPiece::mono(41, "floor tom 3", "floortom3_center", 8),
    KitPiece::stereo(49, "crash 1", "crash1_edge", 9),
    KitPiece::stereo(57, "crash 2", "crash2_edge", 9),
    KitPiece::stereo(51, "ride bow", "ride_bow", 9),
    KitPiece::stereo(53, "ride bell", "ride_bell", 9),
    KitPiece::stereo(52, "china", "china_edge", 9),
    KitPiece::stereo(55, "splash", "splash_edge", 9),
    KitPiece::mono(39, "clap", "clap_multi", 11),
];

/// Builds a voice bank by decoding every piece's round-robin files under `bundle_path`.
///
/// Files that cannot be decoded are logged and skipped; a piece keeps whatever
/// variations did load, and a piece with none is left unassigned.
///
/// # Errors
///
/// Returns a [`KitError`] if a table row is invalid (key or bus out of range).
pub fn load_kit(bundle_path: &Path, pieces: &[KitPiece]) -> Result<VoiceBank, KitError> {
    log::info!("Loading kit from {}", bundle_path.display());

    let mut bank = VoiceBank::new();
    for piece in pieces {
        for relative in piece.sample_paths() {
            let path = bundle_path.join(&relative);
            match decode_audio_file_to_sample_buffer(&path, piece.stereo) {
                Ok(sample) => bank.add_sample(piece.key, sample, piece.output)?,
                Err(err) => {
                    log::warn!("Skipping {}: {err}", path.display());
                }
            }
        }

        if piece.choke_group != NO_CHOKE {
            bank.set_choke_group(piece.key, piece.choke_group);
        }
    }

    log::info!("{} trigger keys loaded", bank.len());
    for (key, group) in bank.iter() {
        log::info!(
            "  key {key}: {} round-robin variations -> bus {} (choke {})",
            group.len(),
            group.output(),
            group.choke_group()
        );
    }

    Ok(bank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_engine::constants::NUM_OUTPUTS;
    use crate::audio_engine::sample_loader::tests::write_pcm16_wav;

    fn write_piece(bundle: &Path, piece: &KitPiece, rounds: usize) {
        std::fs::create_dir_all(bundle.join(SAMPLES_DIR)).unwrap();
        let channels = if piece.stereo { 2 } else { 1 };
        for (round, relative) in piece.sample_paths().take(rounds).enumerate() {
            let value = 1_000 * (round as i16 + 1);
            let samples = vec![value; 8 * channels as usize];
            write_pcm16_wav(&bundle.join(relative), channels, 44_100, &samples).unwrap();
        }
    }

    #[test]
    fn test_sample_paths() {
        let piece = KitPiece::mono(36, "kick", "kick_hit", 0);
        let paths: Vec<PathBuf> = piece.sample_paths().collect();

        assert_eq!(paths.len(), ROUND_ROBIN_DEPTH);
        assert_eq!(paths[0], Path::new("samples").join("kick_hit_v1_r1.wav"));
        assert_eq!(paths[3], Path::new("samples").join("kick_hit_v1_r4.wav"));
    }

    #[test]
    fn test_default_kit_is_consistent() {
        for piece in DEFAULT_KIT {
            assert!(piece.output < NUM_OUTPUTS, "{} bus out of range", piece.name);
            if piece.stereo {
                assert!(piece.output + 1 < NUM_OUTPUTS);
            }
        }

        let mut keys: Vec<u8> = DEFAULT_KIT.iter().map(|p| p.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), DEFAULT_KIT.len());

        let hihats: Vec<u8> = DEFAULT_KIT
            .iter()
            .filter(|p| p.choke_group == HIHAT_CHOKE_GROUP)
            .map(|p| p.key)
            .collect();
        assert_eq!(hihats, vec![42, 46, 44]);
    }

    #[test]
    fn test_load_kit_builds_groups() {
        let tmp = tempfile::tempdir().unwrap();
        let kick = KitPiece::mono(36, "kick", "kick_hit", 0);
        let crash = KitPiece::stereo(49, "crash", "crash1_edge", 9);
        let hat = KitPiece::mono(42, "hat", "hihat_downclosed", 2).choked(HIHAT_CHOKE_GROUP);
        write_piece(tmp.path(), &kick, ROUND_ROBIN_DEPTH);
        write_piece(tmp.path(), &crash, 2);
        write_piece(tmp.path(), &hat, 1);

        let bank = load_kit(tmp.path(), &[kick, crash, hat]).unwrap();

        let group = bank.group(36).unwrap();
        assert_eq!(group.len(), ROUND_ROBIN_DEPTH);
        assert_eq!(group.output(), 0);
        assert_eq!(group.choke_group(), NO_CHOKE);
        // Rotation order follows the file numbering.
        assert!(group.samples()[0].left()[0] < group.samples()[1].left()[0]);

        let group = bank.group(49).unwrap();
        assert_eq!(group.len(), 2);
        assert!(group.samples().iter().all(|s| s.is_stereo()));

        let group = bank.group(42).unwrap();
        assert_eq!(group.choke_group(), HIHAT_CHOKE_GROUP);
    }

    #[test]
    fn test_load_kit_skips_missing_pieces() {
        let tmp = tempfile::tempdir().unwrap();
        let bank = load_kit(tmp.path(), DEFAULT_KIT).unwrap();

        assert!(bank.is_empty());
    }

    #[test]
    fn test_load_kit_rejects_bad_bus() {
        let tmp = tempfile::tempdir().unwrap();
        let piece = KitPiece::mono(36, "kick", "kick_hit", NUM_OUTPUTS);
        write_piece(tmp.path(), &piece, 1);

        let result = load_kit(tmp.path(), &[piece]);
        assert_eq!(
            result.err(),
            Some(KitError::BusOutOfRange { key: 36, bus: NUM_OUTPUTS })
        );
    }
}
