//! Voice occupancy table.
//!
//! The device assigns each playing track to a voice and, with reporting
//! enabled, announces every start and stop. [`VoiceTable`] mirrors that
//! reported state so the host can answer "is track N playing, and where?"
//! without a round trip. The driver never infers occupancy itself -- the
//! table changes only when a report says so.

use wavedeck_core::VoiceMode;

/// Fixed-size mapping from voice slot to the track currently occupying it.
#[derive(Debug)]
pub struct VoiceTable {
    /// One entry per voice; `None` means the voice is idle.
    slots: Vec<Option<u16>>,
}

impl VoiceTable {
    /// Create an empty table sized for the given voice mode.
    pub fn new(mode: VoiceMode) -> Self {
        VoiceTable {
            slots: vec![None; mode.voices()],
        }
    }

    /// Number of voice slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Apply a track report.
    ///
    /// A start unconditionally claims the slot: a new start always wins.
    /// A stop clears the slot only if the slot's current occupant is the
    /// reported track, so a stale or duplicated stop report cannot clobber
    /// a track that has since taken the same voice. Reports naming a voice
    /// outside the table are dropped -- the device should never send one,
    /// but a corrupted frame that survives framing might.
    pub fn apply_report(&mut self, track: u16, voice: u8, started: bool) {
        let Some(slot) = self.slots.get_mut(voice as usize) else {
            tracing::warn!(track, voice, "track report for out-of-range voice, ignoring");
            return;
        };
        if started {
            *slot = Some(track);
        } else if *slot == Some(track) {
            *slot = None;
        }
    }

    /// Find the voice a track is playing on.
    ///
    /// Linear scan returning the first match; the device guarantees a
    /// track occupies at most one voice.
    pub fn find(&self, track: u16) -> Option<usize> {
        self.slots.iter().position(|&slot| slot == Some(track))
    }

    /// Mark every voice idle.
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacities_follow_voice_mode() {
        assert_eq!(VoiceTable::new(VoiceMode::Stereo).capacity(), 18);
        assert_eq!(VoiceTable::new(VoiceMode::Mono).capacity(), 32);
    }

    #[test]
    fn empty_table_finds_nothing() {
        let table = VoiceTable::new(VoiceMode::Mono);
        for track in 1..=4096u16 {
            assert_eq!(table.find(track), None);
        }
    }

    #[test]
    fn start_then_stop() {
        let mut table = VoiceTable::new(VoiceMode::Stereo);
        table.apply_report(5, 2, true);
        assert_eq!(table.find(5), Some(2));
        table.apply_report(5, 2, false);
        assert_eq!(table.find(5), None);
    }

    #[test]
    fn stale_stop_does_not_clobber_new_occupant() {
        let mut table = VoiceTable::new(VoiceMode::Stereo);
        table.apply_report(5, 2, true);
        table.apply_report(7, 2, true); // voice 2 stolen by track 7
        table.apply_report(5, 2, false); // stale stop for the old occupant
        assert_eq!(table.find(5), None);
        assert_eq!(table.find(7), Some(2));
    }

    #[test]
    fn new_start_always_wins() {
        let mut table = VoiceTable::new(VoiceMode::Stereo);
        table.apply_report(5, 2, true);
        table.apply_report(9, 2, true);
        assert_eq!(table.find(9), Some(2));
        assert_eq!(table.find(5), None);
    }

    #[test]
    fn out_of_range_voice_ignored() {
        let mut table = VoiceTable::new(VoiceMode::Stereo);
        table.apply_report(5, 18, true); // capacity is 18, valid slots 0..=17
        table.apply_report(5, 255, true);
        assert_eq!(table.find(5), None);
    }

    #[test]
    fn start_on_second_voice_leaves_first_slot() {
        // No cross-slot reconciliation: if the device reports the same
        // track starting on a different voice without stopping the first,
        // both slots show the track and find() returns the lower index.
        let mut table = VoiceTable::new(VoiceMode::Stereo);
        table.apply_report(5, 2, true);
        table.apply_report(5, 4, true);
        assert_eq!(table.find(5), Some(2));
    }

    #[test]
    fn clear_empties_every_slot() {
        let mut table = VoiceTable::new(VoiceMode::Mono);
        table.apply_report(1, 0, true);
        table.apply_report(2, 31, true);
        table.clear();
        assert_eq!(table.find(1), None);
        assert_eq!(table.find(2), None);
    }
}
