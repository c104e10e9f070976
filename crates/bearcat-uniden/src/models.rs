//! Uniden scanner model definitions.
//!
//! Each supported scanner is described by a [`ScannerModel`] capability
//! record: its limits (channel count, display width, frequency range,
//! baud rates, keypad), its extended-glyph table, and a handful of layout
//! descriptors for the commands whose fields differ between models. The
//! [`Scanner`](crate::scanner::Scanner) API branches on these descriptors
//! instead of having one type per model.
//!
//! Models are defined as factory functions (e.g. [`bc125at()`]) that
//! return a fully populated [`ScannerModel`]. The following models are
//! supported:
//!
//! | Model    | Channels | Display | Baud         | Channel layout |
//! |----------|----------|---------|--------------|----------------|
//! | BC125AT  | 500      | 16      | 4800-115200  | Full           |
//! | BC75XLT  | 300      | 14      | 57600        | Compact        |

use bearcat_core::error::{Error, Result};
use bearcat_core::types::{DelayTime, Modulation};
use bearcat_protocol::codec::{ByteMap, HANDHELD_GLYPHS};

use crate::settings::{CloseCallMode, TestMode};

/// Hz per frequency unit on the wire (`1541000` is 154.100 MHz).
pub const FREQUENCY_SCALE: u64 = 100;

/// How the `CIN` command lays out a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// Name, modulation and tone are stored per channel.
    Full,
    /// Only frequency, delay, lockout and priority are stored. The name,
    /// modulation and tone fields are left blank and the scanner picks the
    /// modulation from the frequency.
    Compact,
}

/// How a channel or search delay is transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayEncoding {
    /// Signed seconds, any [`DelayTime`].
    Seconds,
    /// `0` for no delay, `1` for two seconds.
    Binary,
}

/// How `GLG` reports the received frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceptionFrequency {
    /// Integer in units of [`FREQUENCY_SCALE`].
    Scaled,
    /// Decimal MHz, e.g. `154.1000`.
    DecimalMhz,
}

/// Field layout of the `KBP`, `CLC`, `SCO` and `CSG` settings commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsLayout {
    /// Key beep level, Close Call lockout, code search; `CSG` is flags only.
    Full,
    /// No beep level or Close Call lockout, search direction instead of
    /// code search; `CSG` also carries delay and direction.
    Compact,
}

/// Physical form of the scanner, which decides a few extra commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFactor {
    /// Battery powered: `POF` and `BAV`.
    Handheld,
    /// Vehicle or base mount: `DUD`.
    Mobile,
}

/// Static capability record for a Uniden scanner.
#[derive(Debug, Clone)]
pub struct ScannerModel {
    /// Model name as reported by `MDL` (e.g. "BC125AT").
    pub name: &'static str,
    /// Number of memory channels, numbered from 1.
    pub total_channels: u16,
    /// Characters per display line, which also bounds channel names.
    pub display_width: usize,
    pub min_frequency_hz: u64,
    pub max_frequency_hz: u64,
    /// Serial rates the scanner can be configured for.
    pub baud_rates: &'static [u32],
    pub default_baud_rate: u32,
    /// Keys accepted by the `KEY` command.
    pub keys: &'static [char],
    /// Substitution table for the scanner's extended display glyphs.
    pub byte_map: ByteMap,
    /// Full-scale value of the A/D readings (`WIN`).
    pub ad_scaling: u16,
    pub form_factor: FormFactor,
    pub channel_layout: ChannelLayout,
    pub delay_encoding: DelayEncoding,
    /// Whether `DCH` exists. Without it a channel is cleared by writing a
    /// blank, locked-out record.
    pub has_delete_channel: bool,
    /// Whether `JNT` exists. Without it a channel is selected from the
    /// keypad.
    pub has_jump_to_channel: bool,
    /// Whether the unofficial `PWR` signal meter exists.
    pub has_power_meter: bool,
    /// Whether the ten custom search ranges can be read and written
    /// (`CSP`).
    pub has_custom_search_ranges: bool,
    /// Whether the battery charge time is configurable (`BSV`).
    pub has_charge_time: bool,
    /// Fields after the screen in an `STS` response; the first two are
    /// squelch and mute.
    pub status_trailer_len: usize,
    pub reception_frequency: ReceptionFrequency,
    pub settings_layout: SettingsLayout,
    pub close_call_modes: &'static [CloseCallMode],
    pub test_modes: &'static [TestMode],
}

const HANDHELD_KEYS: &[char] = &[
    '<', '^', '>', //
    'H', '1', '2', '3', //
    'S', '4', '5', '6', //
    'R', '7', '8', '9', //
    'L', 'E', '0', '.', //
    'P', 'F',
];

/// Uniden BC125AT handheld.
///
/// 500 channels in 10 banks, 25-512 MHz, every baud rate from 4800 to
/// 115200 (115200 out of the box).
pub fn bc125at() -> ScannerModel {
    ScannerModel {
        name: "BC125AT",
        total_channels: 500,
        display_width: 16,
        min_frequency_hz: 25_000_000,
        max_frequency_hz: 512_000_000,
        baud_rates: &[4800, 9600, 19200, 38400, 57600, 115200],
        default_baud_rate: 115200,
        keys: HANDHELD_KEYS,
        byte_map: HANDHELD_GLYPHS,
        ad_scaling: 255,
        form_factor: FormFactor::Handheld,
        channel_layout: ChannelLayout::Full,
        delay_encoding: DelayEncoding::Seconds,
        has_delete_channel: true,
        has_jump_to_channel: true,
        has_power_meter: false,
        has_custom_search_ranges: true,
        has_charge_time: true,
        status_trailer_len: 9,
        reception_frequency: ReceptionFrequency::Scaled,
        settings_layout: SettingsLayout::Full,
        close_call_modes: &[
            CloseCallMode::Off,
            CloseCallMode::Priority,
            CloseCallMode::Dnd,
            CloseCallMode::Only,
        ],
        test_modes: &[
            TestMode::Software,
            TestMode::CloseCall,
            TestMode::WeatherAlert,
            TestMode::Keypad,
        ],
    }
}

/// Uniden BC75XLT handheld.
///
/// 300 channels, fixed at 57600 baud. Channels store no name, modulation
/// or tone.
pub fn bc75xlt() -> ScannerModel {
    ScannerModel {
        name: "BC75XLT",
        total_channels: 300,
        display_width: 14,
        min_frequency_hz: 25_000_000,
        max_frequency_hz: 512_000_000,
        baud_rates: &[57600],
        default_baud_rate: 57600,
        keys: HANDHELD_KEYS,
        byte_map: HANDHELD_GLYPHS,
        ad_scaling: 255,
        form_factor: FormFactor::Handheld,
        channel_layout: ChannelLayout::Compact,
        delay_encoding: DelayEncoding::Binary,
        has_delete_channel: false,
        has_jump_to_channel: false,
        has_power_meter: true,
        has_custom_search_ranges: false,
        has_charge_time: false,
        status_trailer_len: 2,
        reception_frequency: ReceptionFrequency::DecimalMhz,
        settings_layout: SettingsLayout::Compact,
        close_call_modes: &[
            CloseCallMode::Off,
            CloseCallMode::Priority,
            CloseCallMode::Dnd,
        ],
        test_modes: &[
            TestMode::Software,
            TestMode::CloseCall,
            TestMode::Keypad,
            TestMode::Display,
        ],
    }
}

/// Every supported model.
pub fn all_models() -> Vec<ScannerModel> {
    vec![bc125at(), bc75xlt()]
}

/// Look up a model by name, ignoring case (`"bc125at"` finds the BC125AT).
pub fn model_by_name(name: &str) -> Option<ScannerModel> {
    all_models()
        .into_iter()
        .find(|m| m.name.eq_ignore_ascii_case(name.trim()))
}

impl ScannerModel {
    pub fn supports_baud_rate(&self, baud: u32) -> bool {
        self.baud_rates.contains(&baud)
    }

    pub fn check_channel(&self, index: u16) -> Result<()> {
        if index == 0 || index > self.total_channels {
            return Err(Error::InvalidParameter(format!(
                "channel {index} out of range, expected 1 - {}",
                self.total_channels
            )));
        }
        Ok(())
    }

    pub fn check_frequency(&self, frequency_hz: u64) -> Result<()> {
        if frequency_hz < self.min_frequency_hz || frequency_hz > self.max_frequency_hz {
            return Err(Error::InvalidParameter(format!(
                "frequency {frequency_hz} Hz out of range, expected {} - {} MHz",
                self.min_frequency_hz / 1_000_000,
                self.max_frequency_hz / 1_000_000
            )));
        }
        if frequency_hz % FREQUENCY_SCALE != 0 {
            return Err(Error::InvalidParameter(format!(
                "frequency {frequency_hz} Hz is not a multiple of {FREQUENCY_SCALE} Hz"
            )));
        }
        Ok(())
    }

    /// Like [`check_frequency`](Self::check_frequency), but `0` (no
    /// frequency stored) is also accepted.
    pub fn check_channel_frequency(&self, frequency_hz: u64) -> Result<()> {
        if frequency_hz == 0 {
            return Ok(());
        }
        self.check_frequency(frequency_hz)
    }

    pub fn check_name(&self, name: &str) -> Result<()> {
        if name.chars().count() > self.display_width {
            return Err(Error::InvalidParameter(format!(
                "name {name:?} longer than {} characters",
                self.display_width
            )));
        }
        Ok(())
    }

    /// Normalize a key to its wire character, rejecting keys the scanner
    /// does not have.
    pub fn check_key(&self, key: char) -> Result<char> {
        let key = key.to_ascii_uppercase();
        if !self.keys.contains(&key) {
            return Err(Error::InvalidParameter(format!(
                "{} has no {key:?} key",
                self.name
            )));
        }
        Ok(key)
    }

    /// Wire spelling of `delay` for this model.
    pub fn encode_delay(&self, delay: DelayTime) -> Result<&'static str> {
        match (self.delay_encoding, delay) {
            (DelayEncoding::Seconds, d) => Ok(d.as_wire()),
            (DelayEncoding::Binary, DelayTime::Zero) => Ok("0"),
            (DelayEncoding::Binary, DelayTime::Two) => Ok("1"),
            (DelayEncoding::Binary, d) => Err(Error::InvalidParameter(format!(
                "{} only supports 0s and 2s delays, got {d}",
                self.name
            ))),
        }
    }

    pub fn decode_delay(&self, field: &str) -> Result<DelayTime> {
        match self.delay_encoding {
            DelayEncoding::Seconds => Ok(field.parse::<DelayTime>()?),
            DelayEncoding::Binary => match field {
                "0" => Ok(DelayTime::Zero),
                "1" => Ok(DelayTime::Two),
                other => Err(Error::UnexpectedResult(format!(
                    "unknown delay {other:?}"
                ))),
            },
        }
    }

    /// Modulation a compact-layout scanner uses for `frequency_hz`: AM
    /// below 28 MHz and in the 108-137 MHz airband, narrow FM elsewhere.
    pub fn band_modulation(frequency_hz: u64) -> Modulation {
        if frequency_hz < 28_000_000 || (108_000_000..137_000_000).contains(&frequency_hz) {
            Modulation::Am
        } else {
            Modulation::Nfm
        }
    }

    pub fn supports_close_call_mode(&self, mode: CloseCallMode) -> bool {
        self.close_call_modes.contains(&mode)
    }

    pub fn supports_test_mode(&self, mode: TestMode) -> bool {
        self.test_modes.contains(&mode)
    }
}
