//! Enumerations shared by every Uniden scanner model.
//!
//! Each type carries its on-the-wire spelling via `as_wire()` and parses
//! that spelling back with [`FromStr`]. Not every model accepts every
//! value; model descriptors in `bearcat-uniden` reject the ones a given
//! scanner does not support before any command is sent.

use std::fmt;
use std::str::FromStr;

/// Error returned when a wire value cannot be parsed into one of the
/// enumerations in this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseValueError {
    kind: &'static str,
    value: String,
}

impl ParseValueError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        ParseValueError {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParseValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for ParseValueError {}

impl From<ParseValueError> for crate::Error {
    fn from(e: ParseValueError) -> Self {
        crate::Error::UnexpectedResult(e.to_string())
    }
}

/// Demodulation applied to a channel or search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modulation {
    /// Let the scanner pick from its band plan.
    Auto,
    /// Amplitude modulation (airband, HF).
    Am,
    /// Wide FM.
    Fm,
    /// Narrow FM (land mobile, public safety).
    Nfm,
}

impl Modulation {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Modulation::Auto => "AUTO",
            Modulation::Am => "AM",
            Modulation::Fm => "FM",
            Modulation::Nfm => "NFM",
        }
    }
}

impl fmt::Display for Modulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for Modulation {
    type Err = ParseValueError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AUTO" => Ok(Modulation::Auto),
            "AM" => Ok(Modulation::Am),
            "FM" => Ok(Modulation::Fm),
            "NFM" => Ok(Modulation::Nfm),
            _ => Err(ParseValueError::new("modulation", s)),
        }
    }
}

/// Delay before the scanner resumes after a transmission ends.
///
/// Negative values are "resume after N seconds regardless of activity".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DelayTime {
    MinusTen,
    MinusFive,
    Zero,
    One,
    #[default]
    Two,
    Three,
    Four,
    Five,
}

impl DelayTime {
    /// All delays in ascending order.
    pub const ALL: [DelayTime; 8] = [
        DelayTime::MinusTen,
        DelayTime::MinusFive,
        DelayTime::Zero,
        DelayTime::One,
        DelayTime::Two,
        DelayTime::Three,
        DelayTime::Four,
        DelayTime::Five,
    ];

    /// Delay in seconds.
    pub fn seconds(&self) -> i8 {
        match self {
            DelayTime::MinusTen => -10,
            DelayTime::MinusFive => -5,
            DelayTime::Zero => 0,
            DelayTime::One => 1,
            DelayTime::Two => 2,
            DelayTime::Three => 3,
            DelayTime::Four => 4,
            DelayTime::Five => 5,
        }
    }

    /// Look up a delay by its value in seconds.
    pub fn from_seconds(seconds: i8) -> Option<Self> {
        DelayTime::ALL.into_iter().find(|d| d.seconds() == seconds)
    }

    /// Wire spelling for models that transmit the delay in seconds.
    pub fn as_wire(&self) -> &'static str {
        match self {
            DelayTime::MinusTen => "-10",
            DelayTime::MinusFive => "-5",
            DelayTime::Zero => "0",
            DelayTime::One => "1",
            DelayTime::Two => "2",
            DelayTime::Three => "3",
            DelayTime::Four => "4",
            DelayTime::Five => "5",
        }
    }
}

impl fmt::Display for DelayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds())
    }
}

impl FromStr for DelayTime {
    type Err = ParseValueError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim()
            .parse::<i8>()
            .ok()
            .and_then(DelayTime::from_seconds)
            .ok_or_else(|| ParseValueError::new("delay", s))
    }
}

/// Keypad action simulated by the `KEY` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Press,
    LongPress,
    Hold,
    Release,
}

impl KeyAction {
    pub fn as_wire(&self) -> &'static str {
        match self {
            KeyAction::Press => "P",
            KeyAction::LongPress => "L",
            KeyAction::Hold => "H",
            KeyAction::Release => "R",
        }
    }
}

/// Top-level operating mode, selected with the `JPM` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationMode {
    Scan,
    ServiceSearch,
    CustomSearch,
    CloseCall,
    Weather,
    ToneOut,
}

impl OperationMode {
    pub fn as_wire(&self) -> &'static str {
        match self {
            OperationMode::Scan => "SCN_MODE",
            OperationMode::ServiceSearch => "SVC_MODE",
            OperationMode::CustomSearch => "CTM_MODE",
            OperationMode::CloseCall => "CC_MODE",
            OperationMode::Weather => "WX_MODE",
            OperationMode::ToneOut => "FTO_MODE",
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for OperationMode {
    type Err = ParseValueError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SCN_MODE" => Ok(OperationMode::Scan),
            "SVC_MODE" => Ok(OperationMode::ServiceSearch),
            "CTM_MODE" => Ok(OperationMode::CustomSearch),
            "CC_MODE" => Ok(OperationMode::CloseCall),
            "WX_MODE" => Ok(OperationMode::Weather),
            "FTO_MODE" => Ok(OperationMode::ToneOut),
            _ => Err(ParseValueError::new("operation mode", s)),
        }
    }
}
