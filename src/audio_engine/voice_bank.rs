//! Trigger-key to round-robin group mapping.
//!
//! The bank is assembled once before playback starts. After that the only state
//! that changes is the selection cursor inside each group.

use crate::audio_engine::constants::{NO_CHOKE, NUM_KEYS, NUM_OUTPUTS};
use crate::audio_engine::errors::KitError;
use crate::audio_engine::sample_buffer::SampleBuffer;

/// Interchangeable samples for one trigger key, played in rotation.
#[derive(Debug, Clone)]
pub struct RoundRobinGroup {
    samples: Vec<SampleBuffer>,
    cursor: usize,
    output: usize,
    choke_group: u32,
}

impl RoundRobinGroup {
    pub fn new(output: usize) -> Self {
        Self {
            samples: Vec::new(),
            cursor: 0,
            output,
            choke_group: NO_CHOKE,
        }
    }

    /// Returns the sample under the cursor and moves the cursor to the next one.
    ///
    /// Selection is purely sequential and does not depend on velocity. An empty
    /// group yields `None`.
    pub fn select_next(&mut self) -> Option<&SampleBuffer> {
        if self.samples.is_empty() {
            return None;
        }

        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.samples.len();
        self.samples.get(index)
    }

    pub fn samples(&self) -> &[SampleBuffer] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Index of the sample the next trigger will play.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn output(&self) -> usize {
        self.output
    }

    pub fn choke_group(&self) -> u32 {
        self.choke_group
    }
}

/// Maps trigger keys (MIDI notes) to round-robin groups.
#[derive(Debug, Clone)]
pub struct VoiceBank {
    groups: [Option<RoundRobinGroup>; NUM_KEYS],
}

impl VoiceBank {
    /// Creates a bank with no keys assigned.
    pub fn new() -> Self {
        Self {
            groups: std::array::from_fn(|_| None),
        }
    }

    /// Appends a sample to the group for `key`, creating the group if needed.
    ///
    /// The group's output bus is set to `output` on every call, so the last
    /// assignment for a key wins.
    ///
    /// # Errors
    ///
    /// Rejects keys outside `0..NUM_KEYS`, empty samples, stereo samples whose
    /// channels differ in length, and buses outside `0..NUM_OUTPUTS`. The bank
    /// is left unchanged.
    pub fn add_sample(
        &mut self,
        key: u8,
        sample: SampleBuffer,
        output: usize,
    ) -> Result<(), KitError> {
        let Some(slot) = self.groups.get_mut(usize::from(key)) else {
            return Err(KitError::KeyOutOfRange { key });
        };

        if output >= NUM_OUTPUTS {
            return Err(KitError::BusOutOfRange { key, bus: output });
        }

        if sample.frames() == 0 {
            return Err(KitError::EmptySample { key });
        }

        if !sample.is_well_formed() {
            return Err(KitError::MismatchedChannels { key });
        }

        let group = slot.get_or_insert_with(|| RoundRobinGroup::new(output));
        group.output = output;
        group.samples.push(sample);
        Ok(())
    }

    /// Assigns a choke group to an existing key.
    ///
    /// Returns `false` if the key has no group.
    pub fn set_choke_group(&mut self, key: u8, choke_group: u32) -> bool {
        match self.group_mut(key) {
            Some(group) => {
                group.choke_group = choke_group;
                true
            }
            None => false,
        }
    }

    pub fn group(&self, key: u8) -> Option<&RoundRobinGroup> {
        self.groups.get(usize::from(key)).and_then(Option::as_ref)
    }

    pub fn group_mut(&mut self, key: u8) -> Option<&mut RoundRobinGroup> {
        self.groups.get_mut(usize::from(key)).and_then(Option::as_mut)
    }

    /// Iterates assigned keys with their groups, in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &RoundRobinGroup)> {
        self.groups
            .iter()
            .enumerate()
            .filter_map(|(key, group)| group.as_ref().map(|g| (key as u8, g)))
    }

    /// Number of keys with a group.
    pub fn len(&self) -> usize {
        self.groups.iter().filter(|g| g.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VoiceBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(value: f32) -> SampleBuffer {
        SampleBuffer::mono(44_100, vec![value; 4])
    }

    #[test]
    fn test_round_robin_cycles_in_order() {
        let mut bank = VoiceBank::new();
        for value in [0.1, 0.2, 0.3, 0.4] {
            bank.add_sample(36, sample(value), 0).unwrap();
        }

        let group = bank.group_mut(36).unwrap();
        let picked: Vec<f32> = (0..5)
            .map(|_| group.select_next().unwrap().left()[0])
            .collect();

        assert_eq!(picked, vec![0.1, 0.2, 0.3, 0.4, 0.1]);
    }

    #[test]
    fn test_cursor_wraps() {
        let mut group = RoundRobinGroup::new(0);
        group.samples.push(sample(0.1));
        group.samples.push(sample(0.2));

        assert_eq!(group.cursor(), 0);
        group.select_next();
        assert_eq!(group.cursor(), 1);
        group.select_next();
        assert_eq!(group.cursor(), 0);
    }

    #[test]
    fn test_single_sample_group_repeats() {
        let mut group = RoundRobinGroup::new(0);
        group.samples.push(sample(0.7));

        for _ in 0..3 {
            assert_eq!(group.select_next().map(|s| s.left()[0]), Some(0.7));
        }
        assert_eq!(group.cursor(), 0);
    }

    #[test]
    fn test_empty_group_yields_none() {
        let mut group = RoundRobinGroup::new(3);
        assert!(group.select_next().is_none());
        assert_eq!(group.cursor(), 0);
    }

    #[test]
    fn test_add_sample_rejects_bad_input() {
        let mut bank = VoiceBank::new();

        assert_eq!(
            bank.add_sample(36, sample(0.1), NUM_OUTPUTS),
            Err(KitError::BusOutOfRange { key: 36, bus: NUM_OUTPUTS })
        );
        assert_eq!(
            bank.add_sample(36, SampleBuffer::mono(44_100, Vec::new()), 0),
            Err(KitError::EmptySample { key: 36 })
        );
        assert_eq!(
            bank.add_sample(49, SampleBuffer::stereo(44_100, vec![0.1; 4], vec![0.1; 3]), 9),
            Err(KitError::MismatchedChannels { key: 49 })
        );
        assert_eq!(
            bank.add_sample(200, sample(0.1), 0),
            Err(KitError::KeyOutOfRange { key: 200 })
        );
        assert!(bank.is_empty());
        assert!(bank.group(200).is_none());
    }

    #[test]
    fn test_last_output_assignment_wins() {
        let mut bank = VoiceBank::new();
        bank.add_sample(38, sample(0.1), 1).unwrap();
        bank.add_sample(38, sample(0.2), 4).unwrap();

        let group = bank.group(38).unwrap();
        assert_eq!(group.output(), 4);
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn test_choke_group_assignment() {
        let mut bank = VoiceBank::new();
        bank.add_sample(42, sample(0.1), 2).unwrap();

        assert!(bank.set_choke_group(42, 1));
        assert!(!bank.set_choke_group(46, 1));
        assert_eq!(bank.group(42).map(|g| g.choke_group()), Some(1));
        assert!(bank.group(46).is_none());
    }

    #[test]
    fn test_iter_and_len() {
        let mut bank = VoiceBank::new();
        bank.add_sample(50, sample(0.1), 3).unwrap();
        bank.add_sample(36, sample(0.1), 0).unwrap();

        let keys: Vec<u8> = bank.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![36, 50]);
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn test_cloned_bank_has_independent_cursors() {
        let mut bank = VoiceBank::new();
        bank.add_sample(36, sample(0.1), 0).unwrap();
        bank.add_sample(36, sample(0.2), 0).unwrap();

        let mut copy = bank.clone();
        copy.group_mut(36).unwrap().select_next();

        assert_eq!(bank.group(36).unwrap().cursor(), 0);
        assert_eq!(copy.group(36).unwrap().cursor(), 1);
    }
}
