//! Scanner settings read and written in program mode.
//!
//! The enumerations carry their wire spelling; the structs group the
//! fields of one settings command. Fields that only some models transmit
//! are `Option`s: `None` on read means the model does not report the
//! value, and on write the value must be `None` exactly for those models.

use std::fmt;
use std::str::FromStr;

use bearcat_core::types::{DelayTime, ParseValueError};

/// Display backlight behaviour (`BLT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BacklightMode {
    AlwaysOn,
    AlwaysOff,
    /// Lit for a few seconds after a key press.
    Keypress,
    /// Lit while squelch is open.
    Squelch,
    KeypressSquelch,
}

impl BacklightMode {
    pub fn as_wire(&self) -> &'static str {
        match self {
            BacklightMode::AlwaysOn => "AO",
            BacklightMode::AlwaysOff => "AF",
            BacklightMode::Keypress => "KY",
            BacklightMode::Squelch => "SQ",
            BacklightMode::KeypressSquelch => "KS",
        }
    }
}

impl FromStr for BacklightMode {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AO" => Ok(BacklightMode::AlwaysOn),
            "AF" => Ok(BacklightMode::AlwaysOff),
            "KY" => Ok(BacklightMode::Keypress),
            "SQ" => Ok(BacklightMode::Squelch),
            "KS" => Ok(BacklightMode::KeypressSquelch),
            _ => Err(ParseValueError::new("backlight mode", s)),
        }
    }
}

/// Priority channel checking (`PRI`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityMode {
    Off,
    On,
    /// Monitor priority channels only.
    Plus,
    /// Do not disturb: check priority channels only between transmissions.
    Dnd,
}

impl PriorityMode {
    pub fn as_wire(&self) -> &'static str {
        match self {
            PriorityMode::Off => "0",
            PriorityMode::On => "1",
            PriorityMode::Plus => "2",
            PriorityMode::Dnd => "3",
        }
    }
}

impl FromStr for PriorityMode {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(PriorityMode::Off),
            "1" => Ok(PriorityMode::On),
            "2" => Ok(PriorityMode::Plus),
            "3" => Ok(PriorityMode::Dnd),
            _ => Err(ParseValueError::new("priority mode", s)),
        }
    }
}

/// Close Call near-field capture mode (`CLC`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseCallMode {
    Off,
    Priority,
    Dnd,
    /// Close Call only, no scanning. Not every model has it.
    Only,
}

impl CloseCallMode {
    pub fn as_wire(&self) -> &'static str {
        match self {
            CloseCallMode::Off => "0",
            CloseCallMode::Priority => "1",
            CloseCallMode::Dnd => "2",
            CloseCallMode::Only => "3",
        }
    }
}

impl FromStr for CloseCallMode {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(CloseCallMode::Off),
            "1" => Ok(CloseCallMode::Priority),
            "2" => Ok(CloseCallMode::Dnd),
            "3" => Ok(CloseCallMode::Only),
            _ => Err(ParseValueError::new("close call mode", s)),
        }
    }
}

/// Factory hardware test entered with `TST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestMode {
    Software,
    CloseCall,
    WeatherAlert,
    Keypad,
    Display,
}

impl TestMode {
    pub fn as_wire(&self) -> &'static str {
        match self {
            TestMode::Software => "1",
            TestMode::CloseCall => "2",
            TestMode::WeatherAlert => "3",
            TestMode::Keypad => "4",
            TestMode::Display => "5",
        }
    }
}

impl fmt::Display for TestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TestMode::Software => "software",
            TestMode::CloseCall => "close call",
            TestMode::WeatherAlert => "weather alert",
            TestMode::Keypad => "keypad",
            TestMode::Display => "display",
        };
        f.write_str(name)
    }
}

/// Keypad beep and lock (`KBP`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBeep {
    /// Key beep on or off. `None` on models without a beep setting.
    pub beep: Option<bool>,
    pub locked: bool,
}

/// Close Call settings (`CLC`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseCallSettings {
    pub mode: CloseCallMode,
    pub alert_beep: bool,
    pub alert_light: bool,
    /// 25-54, 108-137, 137-174, 225-320 and 320-512 MHz.
    pub bands: [bool; 5],
    /// Whether scanning stays unlocked during a hit. `None` on models
    /// that do not have the option.
    pub unlocked: Option<bool>,
}

/// Search and Close Call options (`SCO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub delay: DelayTime,
    /// CTCSS/DCS code search. Full-layout models only.
    pub code_search: Option<bool>,
    /// Search downwards. Compact-layout models only.
    pub direction_down: Option<bool>,
}

/// Custom search ranges enabled for searching (`CSG`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomSearchGroup {
    pub groups: [bool; 10],
    /// Compact-layout models carry the search delay here.
    pub delay: Option<DelayTime>,
    /// Compact-layout models carry the search direction here.
    pub direction_down: Option<bool>,
}

/// One of the ten custom search ranges (`CSP`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomSearchRange {
    /// Range number, 1-10.
    pub index: u8,
    pub lower_hz: u64,
    pub upper_hz: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backlight_wire_round_trip() {
        for mode in [
            BacklightMode::AlwaysOn,
            BacklightMode::AlwaysOff,
            BacklightMode::Keypress,
            BacklightMode::Squelch,
            BacklightMode::KeypressSquelch,
        ] {
            assert_eq!(mode.as_wire().parse::<BacklightMode>().unwrap(), mode);
        }
        assert!("XX".parse::<BacklightMode>().is_err());
    }

    #[test]
    fn numbered_modes() {
        assert_eq!("3".parse::<PriorityMode>().unwrap(), PriorityMode::Dnd);
        assert_eq!("3".parse::<CloseCallMode>().unwrap(), CloseCallMode::Only);
        assert!("4".parse::<PriorityMode>().is_err());
        assert_eq!(TestMode::Display.as_wire(), "5");
        assert_eq!(TestMode::WeatherAlert.to_string(), "weather alert");
    }
}
