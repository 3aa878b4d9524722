//! Bounded, insertion-ordered collection of playing voices.
//!
//! Storage is allocated once at construction. Insertion, choke removal and
//! end-of-sample cleanup all work in place, so none of them touch the heap on
//! the audio thread.

use crate::audio_engine::constants::NO_CHOKE;
use crate::audio_engine::voice::Voice;

pub struct VoicePool {
    /// Oldest voice first.
    voices: Vec<Voice>,
    capacity: usize,
}

impl VoicePool {
    /// Creates an empty pool that holds at most `capacity` voices.
    pub fn new(capacity: usize) -> Self {
        Self {
            voices: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a voice, evicting the oldest one if the pool is full.
    ///
    /// Eviction is strict FIFO by insertion order, regardless of how much of
    /// each voice is left to play. Returns the evicted voice, if any.
    pub fn insert(&mut self, voice: Voice) -> Option<Voice> {
        if self.capacity == 0 {
            return Some(voice);
        }

        let evicted = if self.voices.len() >= self.capacity {
            Some(self.voices.remove(0))
        } else {
            None
        };

        self.voices.push(voice);
        evicted
    }

    /// Removes every voice belonging to `choke_group`.
    ///
    /// Group 0 means "no choke group" and never removes anything. Returns the
    /// number of voices removed.
    pub fn resolve_choke(&mut self, choke_group: u32) -> usize {
        if choke_group == NO_CHOKE {
            return 0;
        }

        let before = self.voices.len();
        self.voices.retain(|voice| voice.choke_group != choke_group);
        before - self.voices.len()
    }

    /// Drops voices that have played to the end of their sample.
    pub fn remove_finished(&mut self) -> usize {
        let before = self.voices.len();
        self.voices.retain(|voice| !voice.is_finished());
        before - self.voices.len()
    }

    /// Stops every voice.
    pub fn clear(&mut self) {
        self.voices.clear();
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates voices from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Voice> {
        self.voices.iter_mut()
    }
}
