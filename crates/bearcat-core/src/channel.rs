//! Radio state snapshots and stored channels.
//!
//! Neither type knows the limits of a particular scanner (channel count,
//! display width, frequency range). Those are checked against the model's
//! capability record before anything is written to the device.

use std::fmt;

use crate::helpers::format_freq_mhz;
use crate::tone::Tone;
use crate::types::{DelayTime, Modulation};

/// What the scanner is tuned to at a given moment.
///
/// Built fresh from every reception-status query; it is a snapshot and is
/// never written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioState {
    /// Stored channel number, or `None` while searching or tuned to a
    /// frequency that is not in memory.
    pub index: Option<u16>,
    /// Channel name as shown on the display. May be empty.
    pub name: String,
    /// Frequency in hertz, `0` when unset.
    pub frequency_hz: u64,
    pub modulation: Modulation,
    pub tone: Tone,
}

impl fmt::Display for RadioState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{index}: ")?,
            None => f.write_str("-: ")?,
        }
        write!(
            f,
            "\"{}\" {} {} {}",
            self.name,
            format_freq_mhz(self.frequency_hz),
            self.modulation,
            self.tone
        )
    }
}

/// A stored memory channel.
///
/// Equality is structural over every field, including `index`; it decides
/// whether a channel write is needed at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// Channel number, starting at 1.
    pub index: u16,
    pub name: String,
    pub frequency_hz: u64,
    pub modulation: Modulation,
    pub tone: Tone,
    pub delay: DelayTime,
    /// Excluded from scanning.
    pub lockout: bool,
    pub priority: bool,
}

impl Channel {
    /// A channel at `index` tuned to `frequency_hz`, with the scanner's
    /// factory defaults for everything else (locked out, 2 s delay).
    pub fn new(index: u16, frequency_hz: u64) -> Self {
        Channel {
            index,
            name: String::new(),
            frequency_hz,
            modulation: Modulation::Auto,
            tone: Tone::None,
            delay: DelayTime::default(),
            lockout: true,
            priority: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_modulation(mut self, modulation: Modulation) -> Self {
        self.modulation = modulation;
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_delay(mut self, delay: DelayTime) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_lockout(mut self, lockout: bool) -> Self {
        self.lockout = lockout;
        self
    }

    pub fn with_priority(mut self, priority: bool) -> Self {
        self.priority = priority;
        self
    }

    /// Whether the channel holds anything worth deleting.
    pub fn is_programmed(&self) -> bool {
        !self.name.is_empty() || self.frequency_hz != 0
    }

    /// The radio-state part of this channel.
    pub fn radio_state(&self) -> RadioState {
        RadioState {
            index: Some(self.index),
            name: self.name.clone(),
            frequency_hz: self.frequency_hz,
            modulation: self.modulation,
            tone: self.tone,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.radio_state(),
            self.delay,
            if self.lockout { "Locked" } else { "Unlocked" }
        )?;
        if self.priority {
            f.write_str(" Priority")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_channel_uses_factory_defaults() {
        let ch = Channel::new(7, 162_550_000);
        assert_eq!(ch.delay, DelayTime::Two);
        assert!(ch.lockout);
        assert!(!ch.priority);
        assert_eq!(ch.tone, Tone::None);
    }

    #[test]
    fn equality_includes_index() {
        let a = Channel::new(1, 146_520_000).with_name("Calling");
        let mut b = a.clone();
        assert_eq!(a, b);
        b.index = 2;
        assert_ne!(a, b);
    }

    #[test]
    fn is_programmed() {
        assert!(!Channel::new(1, 0).is_programmed());
        assert!(Channel::new(1, 0).with_name("X").is_programmed());
        assert!(Channel::new(1, 155_000_000).is_programmed());
    }

    #[test]
    fn radio_state_projection() {
        let ch = Channel::new(3, 121_500_000)
            .with_name("Guard")
            .with_modulation(Modulation::Am);
        let state = ch.radio_state();
        assert_eq!(state.index, Some(3));
        assert_eq!(state.name, "Guard");
        assert_eq!(state.modulation, Modulation::Am);
    }

    #[test]
    fn display_channel() {
        let ch = Channel::new(12, 146_520_000)
            .with_name("Simplex")
            .with_modulation(Modulation::Fm)
            .with_tone(Tone::Ctcss(1000))
            .with_lockout(false)
            .with_priority(true);
        assert_eq!(
            ch.to_string(),
            "12: \"Simplex\" 146.520000 MHz FM 100.0 2s Unlocked Priority"
        );
    }

    #[test]
    fn display_radio_state_off_channel() {
        let state = RadioState {
            index: None,
            name: String::new(),
            frequency_hz: 162_400_000,
            modulation: Modulation::Nfm,
            tone: Tone::None,
        };
        assert_eq!(state.to_string(), "-: \"\" 162.400000 MHz NFM NONE");
    }
}
