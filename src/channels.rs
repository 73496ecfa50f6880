//! Per-channel memory of the currently selected (bank MSB, bank LSB, program)
//! triple, used to suppress redundant re-selection sequences.

/// Tracked state for all 16 MIDI channels. Scoped to a single file
/// conversion; a fresh tracker starts with every channel unset.
#[derive(Debug, Default)]
pub struct ChannelStates {
    parts: [Option<(u8, u8, u8)>; 16],
}

impl ChannelStates {
    pub fn new() -> ChannelStates {
        ChannelStates::default()
    }

    pub fn get(&self, channel: u8) -> Option<(u8, u8, u8)> {
        self.parts[channel as usize]
    }

    pub fn set(&mut self, channel: u8, triple: (u8, u8, u8)) {
        self.parts[channel as usize] = Some(triple);
    }

    /// Whether selecting `triple` on `channel` requires a re-tonement
    /// sequence. True when the channel has never been set or holds a
    /// different triple.
    pub fn needs_change(&self, channel: u8, triple: (u8, u8, u8)) -> bool {
        self.parts[channel as usize] != Some(triple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_channels_always_need_change() {
        let states = ChannelStates::new();
        for channel in 0..16 {
            assert_eq!(states.get(channel), None);
            assert!(states.needs_change(channel, (89, 64, 1)));
        }
    }

    #[test]
    fn matching_triple_is_suppressed() {
        let mut states = ChannelStates::new();
        states.set(3, (121, 0, 40));
        assert!(!states.needs_change(3, (121, 0, 40)));
        assert!(states.needs_change(3, (121, 0, 41)));
        assert!(states.needs_change(3, (89, 64, 40)));
        // Other channels are unaffected.
        assert!(states.needs_change(4, (121, 0, 40)));
    }
}
