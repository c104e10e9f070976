//! Uniden command field builders and response parsers.
//!
//! All functions are pure: builders turn typed values into the argument
//! fields of one command (the mnemonic is added by the caller), and
//! parsers turn the fields after the echoed mnemonic back into typed
//! values. Nothing here performs I/O, so every per-model layout can be
//! tested without a scanner.
//!
//! Builders validate their input against the [`ScannerModel`] and fail
//! with [`Error::InvalidParameter`]; parsers fail with
//! [`Error::UnexpectedResult`] when the scanner's reply does not fit.

use bearcat_core::channel::{Channel, RadioState};
use bearcat_core::error::{Error, Result};
use bearcat_core::helpers::{flag_str, parse_flag, parse_number};
use bearcat_core::screen::Screen;
use bearcat_core::tone::Tone;
use bearcat_core::types::{DelayTime, Modulation};
use bearcat_protocol::engine::{build_group, check_len, parse_group};

use crate::models::{ChannelLayout, FREQUENCY_SCALE, ReceptionFrequency, ScannerModel, SettingsLayout};
use crate::settings::{
    CloseCallMode, CloseCallSettings, CustomSearchGroup, CustomSearchRange, KeyBeep, SearchSettings,
};

/// Fields in a `CIN` response.
const CHANNEL_FIELDS: usize = 8;
/// Fields in a `GLG` response.
const RECEPTION_FIELDS: usize = 12;
/// Fields in an `MRD` response: location, 16 data bytes, trailer word.
const MEMORY_FIELDS: usize = 18;
/// Arguments of a `QSH` command, all blank except frequency and delay.
const QUICK_SEARCH_FIELDS: usize = 13;
const QUICK_SEARCH_DELAY_POSITION: usize = 5;
/// `KBP` beep level meaning "beep off".
const BEEP_OFF_LEVEL: &str = "99";
/// Full-scale value of the `PWR` signal reading.
const POWER_FULL_SCALE: f64 = 512.0;
/// Volts per `BAV` count.
const BATTERY_VOLTS_PER_COUNT: f64 = 6.4 / 1023.0;
/// Custom search ranges are numbered 1 to this.
pub const CUSTOM_SEARCH_RANGES: u8 = 10;

/// What the display shows, from `STS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub screen: Screen,
    pub squelched: bool,
    pub muted: bool,
}

/// What the scanner is receiving, from `GLG`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reception {
    pub state: RadioState,
    pub squelched: bool,
    pub muted: bool,
}

/// Sixteen bytes read with `MRD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryBlock {
    pub location: u32,
    pub data: [u8; 16],
    /// Trailing 32-bit word of unknown meaning.
    pub trailer: u32,
}

// ---------------------------------------------------------------
// Frequencies
// ---------------------------------------------------------------

/// Wire units for a frequency in hertz.
pub fn frequency_units(frequency_hz: u64) -> String {
    (frequency_hz / FREQUENCY_SCALE).to_string()
}

/// Hertz for a frequency in wire units.
pub fn parse_frequency_units(field: &str) -> Result<u64> {
    let units: u64 = parse_number(field)?;
    units
        .checked_mul(FREQUENCY_SCALE)
        .ok_or_else(|| Error::UnexpectedResult(format!("frequency out of range: {field:?}")))
}

/// Hertz for a decimal MHz field such as `154.1000`.
fn parse_frequency_mhz(field: &str) -> Result<u64> {
    let mhz: f64 = parse_number(field)?;
    if !mhz.is_finite() || mhz < 0.0 {
        return Err(Error::UnexpectedResult(format!("bad frequency {field:?}")));
    }
    Ok((mhz * 1_000_000.0).round() as u64)
}

/// `GLF` answer: the next globally locked-out frequency in hertz, or
/// `None` at the end of the list (reported as `-1`).
pub fn parse_lockout_frequency(field: &str) -> Result<Option<u64>> {
    let units: i64 = parse_number(field)?;
    if units < 0 {
        return Ok(None);
    }
    parse_frequency_units(field).map(Some)
}

// ---------------------------------------------------------------
// Status and reception
// ---------------------------------------------------------------

/// Parse an `STS` response: screen fields followed by the model's
/// trailer, whose first two fields are squelch and mute.
pub fn parse_status(fields: &[String], model: &ScannerModel) -> Result<Status> {
    let trailer = model.status_trailer_len;
    if fields.len() <= trailer {
        return Err(Error::UnexpectedResult(format!(
            "{} status values returned, expected more than {trailer}",
            fields.len()
        )));
    }

    let split = fields.len() - trailer;
    Ok(Status {
        screen: Screen::from_fields(&fields[..split])?,
        squelched: parse_flag(&fields[split])?,
        muted: parse_flag(&fields[split + 1])?,
    })
}

/// Parse a `GLG` response.
///
/// The scanner leaves every field blank when nothing is being received;
/// that parses as an empty state with squelch and mute off.
pub fn parse_reception(fields: &[String], model: &ScannerModel) -> Result<Reception> {
    check_len(fields, RECEPTION_FIELDS)?;

    let frequency_hz = match (fields[0].as_str(), model.reception_frequency) {
        ("", _) => 0,
        (f, ReceptionFrequency::Scaled) => parse_frequency_units(f)?,
        (f, ReceptionFrequency::DecimalMhz) => parse_frequency_mhz(f)?,
    };
    let modulation = match fields[1].as_str() {
        "" => Modulation::Auto,
        m => m.parse::<Modulation>()?,
    };

    let state = match model.channel_layout {
        ChannelLayout::Full => RadioState {
            index: parse_optional(&fields[10])?,
            name: fields[6].clone(),
            frequency_hz,
            modulation,
            tone: match fields[3].as_str() {
                "" => Tone::None,
                code => parse_tone_code(code)?,
            },
        },
        ChannelLayout::Compact => RadioState {
            index: None,
            name: String::new(),
            frequency_hz,
            modulation,
            tone: Tone::None,
        },
    };

    Ok(Reception {
        state,
        squelched: parse_optional_flag(&fields[7])?,
        muted: parse_optional_flag(&fields[8])?,
    })
}

fn parse_optional<T: std::str::FromStr>(field: &str) -> Result<Option<T>> {
    if field.is_empty() {
        Ok(None)
    } else {
        parse_number(field).map(Some)
    }
}

fn parse_optional_flag(field: &str) -> Result<bool> {
    if field.is_empty() {
        Ok(false)
    } else {
        parse_flag(field)
    }
}

fn parse_tone_code(field: &str) -> Result<Tone> {
    let code: u8 = parse_number(field)?;
    Tone::from_code(code).ok_or_else(|| Error::UnexpectedResult(format!("unknown tone code {code}")))
}

/// Parse a `WIN` response into (fraction of A/D full scale, frequency).
pub fn parse_window_voltage(fields: &[String], model: &ScannerModel) -> Result<(f64, u64)> {
    check_len(fields, 2)?;
    let level: u16 = parse_number(&fields[0])?;
    Ok((
        f64::from(level) / f64::from(model.ad_scaling),
        parse_frequency_units(&fields[1])?,
    ))
}

/// Parse a `PWR` response into (signal on a 0-1 scale, frequency).
pub fn parse_power(fields: &[String]) -> Result<(f64, u64)> {
    check_len(fields, 2)?;
    let level: u16 = parse_number(&fields[0])?;
    Ok((
        f64::from(level) / POWER_FULL_SCALE,
        parse_frequency_units(&fields[1])?,
    ))
}

/// Battery potential in volts for a `BAV` reading.
pub fn battery_volts(counts: u16) -> f64 {
    f64::from(counts) * BATTERY_VOLTS_PER_COUNT
}

// ---------------------------------------------------------------
// Channels
// ---------------------------------------------------------------

/// Build the `CIN` arguments that store `channel`.
///
/// Compact-layout models do not store a name, modulation or tone; those
/// fields are sent blank and the channel's values for them are ignored.
pub fn channel_fields(channel: &Channel, model: &ScannerModel) -> Result<Vec<String>> {
    model.check_channel(channel.index)?;
    model.check_channel_frequency(channel.frequency_hz)?;
    let delay = model.encode_delay(channel.delay)?;

    let (name, modulation, tone) = match model.channel_layout {
        ChannelLayout::Full => {
            model.check_name(&channel.name)?;
            let tone = channel.tone.code().ok_or_else(|| {
                Error::InvalidParameter(format!("tone {} has no wire code", channel.tone))
            })?;
            (
                channel.name.clone(),
                channel.modulation.as_wire().to_string(),
                tone.to_string(),
            )
        }
        ChannelLayout::Compact => (String::new(), String::new(), String::new()),
    };

    Ok(vec![
        channel.index.to_string(),
        name,
        frequency_units(channel.frequency_hz),
        modulation,
        tone,
        delay.to_string(),
        flag_str(channel.lockout).to_string(),
        flag_str(channel.priority).to_string(),
    ])
}

/// Parse a `CIN` response.
pub fn parse_channel(fields: &[String], model: &ScannerModel) -> Result<Channel> {
    check_len(fields, CHANNEL_FIELDS)?;

    let frequency_hz = parse_frequency_units(&fields[2])?;
    let (modulation, tone) = match model.channel_layout {
        ChannelLayout::Full => (fields[3].parse::<Modulation>()?, parse_tone_code(&fields[4])?),
        ChannelLayout::Compact => (ScannerModel::band_modulation(frequency_hz), Tone::None),
    };

    Ok(Channel {
        index: parse_number(&fields[0])?,
        name: fields[1].clone(),
        frequency_hz,
        modulation,
        tone,
        delay: model.decode_delay(&fields[5])?,
        lockout: parse_flag(&fields[6])?,
        priority: parse_flag(&fields[7])?,
    })
}

/// Whether the stored channel `current` already matches `desired`, for
/// the fields this model stores.
pub fn channel_matches(current: &Channel, desired: &Channel, model: &ScannerModel) -> bool {
    match model.channel_layout {
        ChannelLayout::Full => current == desired,
        ChannelLayout::Compact => {
            current.index == desired.index
                && current.frequency_hz == desired.frequency_hz
                && current.delay == desired.delay
                && current.lockout == desired.lockout
                && current.priority == desired.priority
        }
    }
}

/// The record a compact-layout model stores in place of a deleted channel.
pub fn blank_channel(index: u16) -> Channel {
    Channel::new(index, 0)
}

// ---------------------------------------------------------------
// Settings
// ---------------------------------------------------------------

/// Fill the field for a setting that only one layout carries.
fn layout_field(value: Option<bool>, carried: bool, what: &str, model: &ScannerModel) -> Result<String> {
    match (value, carried) {
        (Some(v), true) => Ok(flag_str(v).to_string()),
        (None, false) => Ok(String::new()),
        (None, true) => Err(Error::InvalidParameter(format!(
            "{what} is required on the {}",
            model.name
        ))),
        (Some(_), false) => Err(Error::Unsupported(format!(
            "the {} has no {what} setting",
            model.name
        ))),
    }
}

/// Parse a `KBP` response.
pub fn parse_key_beep(fields: &[String], model: &ScannerModel) -> Result<KeyBeep> {
    check_len(fields, 2)?;
    let beep = match model.settings_layout {
        SettingsLayout::Full => {
            let level: u8 = parse_number(&fields[0])?;
            Some(level == 0)
        }
        SettingsLayout::Compact => None,
    };
    Ok(KeyBeep {
        beep,
        locked: parse_flag(&fields[1])?,
    })
}

/// Build the `KBP` arguments. The beep is a level: `0` beeps, `99` is
/// silent.
pub fn key_beep_fields(settings: &KeyBeep, model: &ScannerModel) -> Result<Vec<String>> {
    let full = model.settings_layout == SettingsLayout::Full;
    let beep = match (settings.beep, full) {
        (Some(true), true) => "0".to_string(),
        (Some(false), true) => BEEP_OFF_LEVEL.to_string(),
        (beep, full) => layout_field(beep, full, "key beep", model)?,
    };
    Ok(vec![beep, flag_str(settings.locked).to_string()])
}

/// Parse a `CLC` response.
pub fn parse_close_call(fields: &[String], model: &ScannerModel) -> Result<CloseCallSettings> {
    check_len(fields, 5)?;
    let unlocked = match model.settings_layout {
        SettingsLayout::Full => Some(parse_flag(&fields[4])?),
        SettingsLayout::Compact => None,
    };
    Ok(CloseCallSettings {
        mode: fields[0].parse::<CloseCallMode>()?,
        alert_beep: parse_flag(&fields[1])?,
        alert_light: parse_flag(&fields[2])?,
        bands: parse_group(&fields[3])?,
        unlocked,
    })
}

/// Build the `CLC` arguments.
pub fn close_call_fields(settings: &CloseCallSettings, model: &ScannerModel) -> Result<Vec<String>> {
    if !model.supports_close_call_mode(settings.mode) {
        return Err(Error::Unsupported(format!(
            "the {} has no {:?} close call mode",
            model.name, settings.mode
        )));
    }
    let full = model.settings_layout == SettingsLayout::Full;
    Ok(vec![
        settings.mode.as_wire().to_string(),
        flag_str(settings.alert_beep).to_string(),
        flag_str(settings.alert_light).to_string(),
        build_group(&settings.bands),
        layout_field(settings.unlocked, full, "close call lockout", model)?,
    ])
}

/// Parse an `SCO` response. Full layout: delay, code search. Compact
/// layout: delay, blank, direction.
pub fn parse_search_settings(fields: &[String], model: &ScannerModel) -> Result<SearchSettings> {
    match model.settings_layout {
        SettingsLayout::Full => {
            check_len(fields, 2)?;
            Ok(SearchSettings {
                delay: model.decode_delay(&fields[0])?,
                code_search: Some(parse_flag(&fields[1])?),
                direction_down: None,
            })
        }
        SettingsLayout::Compact => {
            check_len(fields, 3)?;
            Ok(SearchSettings {
                delay: model.decode_delay(&fields[0])?,
                code_search: None,
                direction_down: Some(parse_flag(&fields[2])?),
            })
        }
    }
}

/// Build the `SCO` arguments.
pub fn search_settings_fields(settings: &SearchSettings, model: &ScannerModel) -> Result<Vec<String>> {
    let delay = model.encode_delay(settings.delay)?.to_string();
    match model.settings_layout {
        SettingsLayout::Full => {
            layout_field(settings.direction_down, false, "search direction", model)?;
            Ok(vec![
                delay,
                layout_field(settings.code_search, true, "code search", model)?,
            ])
        }
        SettingsLayout::Compact => Ok(vec![
            delay,
            layout_field(settings.code_search, false, "code search", model)?,
            layout_field(settings.direction_down, true, "search direction", model)?,
        ]),
    }
}

/// Parse a `CSG` response. Full layout: ten flags. Compact layout: flags,
/// delay, direction.
pub fn parse_custom_search_group(fields: &[String], model: &ScannerModel) -> Result<CustomSearchGroup> {
    match model.settings_layout {
        SettingsLayout::Full => {
            check_len(fields, 1)?;
            Ok(CustomSearchGroup {
                groups: parse_group(&fields[0])?,
                delay: None,
                direction_down: None,
            })
        }
        SettingsLayout::Compact => {
            check_len(fields, 3)?;
            Ok(CustomSearchGroup {
                groups: parse_group(&fields[0])?,
                delay: Some(model.decode_delay(&fields[1])?),
                direction_down: Some(parse_flag(&fields[2])?),
            })
        }
    }
}

/// Build the `CSG` arguments.
pub fn custom_search_group_fields(group: &CustomSearchGroup, model: &ScannerModel) -> Result<Vec<String>> {
    let mut fields = vec![build_group(&group.groups)];
    match model.settings_layout {
        SettingsLayout::Full => {
            if group.delay.is_some() || group.direction_down.is_some() {
                return Err(Error::Unsupported(format!(
                    "the {} has no custom search delay or direction",
                    model.name
                )));
            }
        }
        SettingsLayout::Compact => {
            let delay = group.delay.ok_or_else(|| {
                Error::InvalidParameter(format!("custom search delay is required on the {}", model.name))
            })?;
            fields.push(model.encode_delay(delay)?.to_string());
            fields.push(layout_field(group.direction_down, true, "search direction", model)?);
        }
    }
    Ok(fields)
}

/// Reject a custom search range number outside 1-10.
pub fn check_custom_search_index(index: u8) -> Result<()> {
    if !(1..=CUSTOM_SEARCH_RANGES).contains(&index) {
        return Err(Error::InvalidParameter(format!(
            "custom search range {index} out of range, expected 1 - {CUSTOM_SEARCH_RANGES}"
        )));
    }
    Ok(())
}

/// Build the `CSP` arguments: range number, lower and upper limit.
pub fn custom_search_range_fields(range: &CustomSearchRange, model: &ScannerModel) -> Result<Vec<String>> {
    check_custom_search_index(range.index)?;
    model.check_frequency(range.lower_hz)?;
    model.check_frequency(range.upper_hz)?;
    Ok(vec![
        range.index.to_string(),
        frequency_units(range.lower_hz),
        frequency_units(range.upper_hz),
    ])
}

/// Parse a `CSP` response.
pub fn parse_custom_search_range(fields: &[String]) -> Result<CustomSearchRange> {
    check_len(fields, 3)?;
    Ok(CustomSearchRange {
        index: parse_number(&fields[0])?,
        lower_hz: parse_frequency_units(&fields[1])?,
        upper_hz: parse_frequency_units(&fields[2])?,
    })
}

// ---------------------------------------------------------------
// Navigation and diagnostics
// ---------------------------------------------------------------

/// Build the `QSH` arguments: frequency, then blanks with the delay in
/// its slot.
pub fn quick_search_fields(frequency_hz: u64, delay: DelayTime, model: &ScannerModel) -> Result<Vec<String>> {
    model.check_frequency(frequency_hz)?;
    let mut fields = vec![String::new(); QUICK_SEARCH_FIELDS];
    fields[0] = frequency_units(frequency_hz);
    fields[QUICK_SEARCH_DELAY_POSITION] = model.encode_delay(delay)?.to_string();
    Ok(fields)
}

/// Parse an `ESN` response: serial number, product code, and a third
/// value of unknown meaning.
pub fn parse_serial_number(fields: &[String]) -> Result<(String, String, String)> {
    check_len(fields, 3)?;
    Ok((fields[0].clone(), fields[1].clone(), fields[2].clone()))
}

/// Parse an `MRD` response. All values are hexadecimal and the first must
/// echo the requested location.
pub fn parse_memory_block(fields: &[String], location: u32) -> Result<MemoryBlock> {
    check_len(fields, MEMORY_FIELDS)?;

    let echoed = parse_hex_u32(&fields[0])?;
    if echoed != location {
        return Err(Error::UnexpectedResult(format!(
            "memory read returned location {echoed:#x}, expected {location:#x}"
        )));
    }

    let mut data = [0u8; 16];
    for (byte, field) in data.iter_mut().zip(&fields[1..17]) {
        *byte = u8::from_str_radix(field.trim(), 16)
            .map_err(|_| Error::UnexpectedResult(format!("bad memory byte {field:?}")))?;
    }

    Ok(MemoryBlock {
        location,
        data,
        trailer: parse_hex_u32(&fields[17])?,
    })
}

fn parse_hex_u32(field: &str) -> Result<u32> {
    u32::from_str_radix(field.trim(), 16)
        .map_err(|_| Error::UnexpectedResult(format!("not a hex value: {field:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{bc75xlt, bc125at};

    fn fields(line: &str) -> Vec<String> {
        line.split(',').map(str::to_string).collect()
    }

    // ---------------------------------------------------------------
    // Status / reception
    // ---------------------------------------------------------------

    #[test]
    fn status_with_nine_field_trailer() {
        let f = fields("011, SCAN ,          ,Bank 1,*     ,CH 12,      ,1,0,0,0,0,0,0,0,0");
        let status = parse_status(&f, &bc125at()).unwrap();
        assert_eq!(status.screen.lines.len(), 3);
        assert!(!status.screen.lines[0].large);
        assert!(status.screen.lines[1].large);
        assert_eq!(status.screen.lines[1].text, "Bank 1");
        assert!(status.squelched);
        assert!(!status.muted);
    }

    #[test]
    fn status_with_two_field_trailer() {
        let f = fields("1,HOLD,    ,0,1");
        let status = parse_status(&f, &bc75xlt()).unwrap();
        assert_eq!(status.screen.plain_lines().collect::<Vec<_>>(), ["HOLD"]);
        assert!(!status.squelched);
        assert!(status.muted);
    }

    #[test]
    fn short_status_is_unexpected() {
        assert!(matches!(
            parse_status(&fields("0,0"), &bc125at()),
            Err(Error::UnexpectedResult(_))
        ));
    }

    #[test]
    fn reception_full_layout() {
        let f = fields("01546250,NFM,0,76,,,Fire Disp,0,1,,12,");
        let rx = parse_reception(&f, &bc125at()).unwrap();
        assert_eq!(rx.state.frequency_hz, 154_625_000);
        assert_eq!(rx.state.modulation, Modulation::Nfm);
        assert_eq!(rx.state.tone, Tone::Ctcss(1000));
        assert_eq!(rx.state.name, "Fire Disp");
        assert_eq!(rx.state.index, Some(12));
        assert!(!rx.squelched);
        assert!(rx.muted);
    }

    #[test]
    fn reception_not_on_a_channel() {
        let f = fields("01215000,AM,0,0,,,,1,0,,,");
        let rx = parse_reception(&f, &bc125at()).unwrap();
        assert_eq!(rx.state.index, None);
        assert_eq!(rx.state.frequency_hz, 121_500_000);
    }

    #[test]
    fn reception_idle_is_blank() {
        let rx = parse_reception(&fields(",,,,,,,,,,,"), &bc125at()).unwrap();
        assert_eq!(rx.state.frequency_hz, 0);
        assert_eq!(rx.state.modulation, Modulation::Auto);
        assert!(!rx.squelched);
    }

    #[test]
    fn reception_decimal_mhz() {
        let f = fields("162.5500,FM,,,,,,1,0,,,");
        let rx = parse_reception(&f, &bc75xlt()).unwrap();
        assert_eq!(rx.state.frequency_hz, 162_550_000);
        assert_eq!(rx.state.modulation, Modulation::Fm);
        assert_eq!(rx.state.index, None);
    }

    #[test]
    fn reception_wrong_length() {
        assert!(parse_reception(&fields("1,2,3"), &bc125at()).is_err());
    }

    #[test]
    fn window_and_power() {
        let (level, freq) = parse_window_voltage(&fields("255,01546250"), &bc125at()).unwrap();
        assert!((level - 1.0).abs() < f64::EPSILON);
        assert_eq!(freq, 154_625_000);

        let (power, freq) = parse_power(&fields("256,01625500")).unwrap();
        assert!((power - 0.5).abs() < f64::EPSILON);
        assert_eq!(freq, 162_550_000);

        assert!((battery_volts(1023) - 6.4).abs() < 1e-9);
    }

    #[test]
    fn lockout_list_end() {
        assert_eq!(parse_lockout_frequency("-1").unwrap(), None);
        assert_eq!(parse_lockout_frequency("01625500").unwrap(), Some(162_550_000));
    }

    // ---------------------------------------------------------------
    // Channels
    // ---------------------------------------------------------------

    fn sample_channel() -> Channel {
        Channel::new(12, 154_100_000)
            .with_name("Fire Dispatch")
            .with_modulation(Modulation::Nfm)
            .with_tone(Tone::Ctcss(1000))
            .with_lockout(false)
    }

    #[test]
    fn full_channel_fields() {
        let f = channel_fields(&sample_channel(), &bc125at()).unwrap();
        assert_eq!(f, fields("12,Fire Dispatch,1541000,NFM,76,2,0,0"));
    }

    #[test]
    fn full_channel_parses_back() {
        let model = bc125at();
        let f = channel_fields(&sample_channel(), &model).unwrap();
        assert_eq!(parse_channel(&f, &model).unwrap(), sample_channel());
    }

    #[test]
    fn compact_channel_blanks_unstored_fields() {
        let f = channel_fields(&sample_channel(), &bc75xlt()).unwrap();
        assert_eq!(f, fields("12,,1541000,,,1,0,0"));
    }

    #[test]
    fn compact_channel_parse_derives_modulation() {
        let ch = parse_channel(&fields("3,,1215000,,,0,1,1"), &bc75xlt()).unwrap();
        assert_eq!(ch.frequency_hz, 121_500_000);
        assert_eq!(ch.modulation, Modulation::Am);
        assert_eq!(ch.delay, DelayTime::Zero);
        assert!(ch.lockout && ch.priority);
    }

    #[test]
    fn channel_validation() {
        let model = bc125at();
        let long_name = sample_channel().with_name("Seventeen chars!!");
        assert!(matches!(
            channel_fields(&long_name, &model),
            Err(Error::InvalidParameter(_))
        ));
        assert!(channel_fields(&Channel::new(501, 0), &model).is_err());
        assert!(channel_fields(&Channel::new(1, 600_000_000), &model).is_err());
        assert!(channel_fields(&Channel::new(1, 0).with_tone(Tone::Ctcss(1234)), &model).is_err());
        assert!(channel_fields(&Channel::new(1, 0).with_delay(DelayTime::Five), &bc75xlt()).is_err());
    }

    #[test]
    fn compact_match_ignores_unstored_fields() {
        let model = bc75xlt();
        let stored = parse_channel(&fields("12,,1541000,,,1,0,0"), &model).unwrap();
        assert!(channel_matches(&stored, &sample_channel(), &model));
        assert!(!channel_matches(&stored, &sample_channel().with_priority(true), &model));
        assert!(!channel_matches(&stored, &sample_channel(), &bc125at()));
    }

    #[test]
    fn bad_channel_response() {
        let model = bc125at();
        assert!(parse_channel(&fields("1,,0,AUTO,0,2,1"), &model).is_err());
        assert!(parse_channel(&fields("1,,0,XM,0,2,1,0"), &model).is_err());
        assert!(parse_channel(&fields("1,,0,AUTO,300,2,1,0"), &model).is_err());
    }

    // ---------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------

    #[test]
    fn key_beep_layouts() {
        let full = bc125at();
        let kb = parse_key_beep(&fields("99,1"), &full).unwrap();
        assert_eq!(kb, KeyBeep { beep: Some(false), locked: true });
        assert_eq!(
            key_beep_fields(&KeyBeep { beep: Some(true), locked: false }, &full).unwrap(),
            ["0", "0"]
        );
        assert_eq!(
            key_beep_fields(&KeyBeep { beep: Some(false), locked: true }, &full).unwrap(),
            ["99", "1"]
        );

        let compact = bc75xlt();
        assert_eq!(parse_key_beep(&fields(",1"), &compact).unwrap().beep, None);
        assert_eq!(
            key_beep_fields(&KeyBeep { beep: None, locked: true }, &compact).unwrap(),
            ["", "1"]
        );
        assert!(matches!(
            key_beep_fields(&KeyBeep { beep: Some(true), locked: true }, &compact),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(
            key_beep_fields(&KeyBeep { beep: None, locked: true }, &full),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn close_call_layouts() {
        let settings = CloseCallSettings {
            mode: CloseCallMode::Priority,
            alert_beep: true,
            alert_light: false,
            bands: [true, true, false, false, true],
            unlocked: Some(true),
        };
        let full = bc125at();
        let f = close_call_fields(&settings, &full).unwrap();
        assert_eq!(f, ["1", "1", "0", "11001", "1"]);
        assert_eq!(parse_close_call(&f, &full).unwrap(), settings);

        let compact = bc75xlt();
        let compact_settings = CloseCallSettings { unlocked: None, ..settings };
        let f = close_call_fields(&compact_settings, &compact).unwrap();
        assert_eq!(f, ["1", "1", "0", "11001", ""]);
        assert_eq!(parse_close_call(&f, &compact).unwrap(), compact_settings);

        let only = CloseCallSettings { mode: CloseCallMode::Only, ..compact_settings };
        assert!(matches!(
            close_call_fields(&only, &compact),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn search_settings_layouts() {
        let full = bc125at();
        let s = parse_search_settings(&fields("-5,1"), &full).unwrap();
        assert_eq!(s.delay, DelayTime::MinusFive);
        assert_eq!(s.code_search, Some(true));
        assert_eq!(search_settings_fields(&s, &full).unwrap(), ["-5", "1"]);

        let compact = bc75xlt();
        let s = parse_search_settings(&fields("1,,1"), &compact).unwrap();
        assert_eq!(s.delay, DelayTime::Two);
        assert_eq!(s.direction_down, Some(true));
        assert_eq!(search_settings_fields(&s, &compact).unwrap(), ["1", "", "1"]);

        let mixed = SearchSettings {
            delay: DelayTime::Two,
            code_search: Some(true),
            direction_down: Some(false),
        };
        assert!(search_settings_fields(&mixed, &full).is_err());
        assert!(search_settings_fields(&mixed, &compact).is_err());
    }

    #[test]
    fn custom_search_group_layouts() {
        let full = bc125at();
        let g = parse_custom_search_group(&fields("0100000001"), &full).unwrap();
        assert!(g.groups[1] && g.groups[9] && !g.groups[0]);
        assert_eq!(custom_search_group_fields(&g, &full).unwrap(), ["0100000001"]);

        let compact = bc75xlt();
        let g = parse_custom_search_group(&fields("1111100000,0,1"), &compact).unwrap();
        assert_eq!(g.delay, Some(DelayTime::Zero));
        assert_eq!(g.direction_down, Some(true));
        assert_eq!(
            custom_search_group_fields(&g, &compact).unwrap(),
            ["1111100000", "0", "1"]
        );
        assert!(custom_search_group_fields(&g, &full).is_err());
    }

    #[test]
    fn custom_search_range_fields_in_wire_units() {
        let range = parse_custom_search_range(&fields("3,1440000,1480000")).unwrap();
        assert_eq!(
            range,
            CustomSearchRange {
                index: 3,
                lower_hz: 144_000_000,
                upper_hz: 148_000_000,
            }
        );
        assert_eq!(
            custom_search_range_fields(&range, &bc125at()).unwrap(),
            ["3", "1440000", "1480000"]
        );
        assert!(parse_custom_search_range(&fields("3,1440000")).is_err());
    }

    #[test]
    fn custom_search_range_limits_are_checked() {
        let model = bc125at();
        let range = |index, lower_hz, upper_hz| CustomSearchRange {
            index,
            lower_hz,
            upper_hz,
        };
        assert!(custom_search_range_fields(&range(0, 144_000_000, 148_000_000), &model).is_err());
        assert!(custom_search_range_fields(&range(11, 144_000_000, 148_000_000), &model).is_err());
        assert!(custom_search_range_fields(&range(10, 24_000_000, 148_000_000), &model).is_err());
        assert!(custom_search_range_fields(&range(10, 144_000_000, 600_000_000), &model).is_err());
        assert!(custom_search_range_fields(&range(10, 25_000_000, 512_000_000), &model).is_ok());
    }

    // ---------------------------------------------------------------
    // Navigation / diagnostics
    // ---------------------------------------------------------------

    #[test]
    fn quick_search_layout() {
        let f = quick_search_fields(162_550_000, DelayTime::Two, &bc125at()).unwrap();
        assert_eq!(f.len(), 13);
        assert_eq!(f[0], "1625500");
        assert_eq!(f[5], "2");
        assert!(f.iter().enumerate().all(|(i, v)| i == 0 || i == 5 || v.is_empty()));
        assert!(quick_search_fields(10_000_000, DelayTime::Two, &bc125at()).is_err());
    }

    #[test]
    fn memory_block() {
        let mut line = String::from("1F00");
        for b in 0..16 {
            line.push_str(&format!(",{b:02X}"));
        }
        line.push_str(",DEADBEEF");
        let block = parse_memory_block(&fields(&line), 0x1F00).unwrap();
        assert_eq!(block.data[15], 15);
        assert_eq!(block.trailer, 0xDEAD_BEEF);

        assert!(matches!(
            parse_memory_block(&fields(&line), 0x2000),
            Err(Error::UnexpectedResult(_))
        ));
    }

    #[test]
    fn serial_number() {
        let (esn, product, extra) = parse_serial_number(&fields("XXXXXXXXXXXXXX,000,1")).unwrap();
        assert_eq!(esn, "XXXXXXXXXXXXXX");
        assert_eq!(product, "000");
        assert_eq!(extra, "1");
    }
}
