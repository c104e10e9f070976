//! Scanner -- the typed API for a connected Uniden scanner.
//!
//! Every method builds its fields with [`commands`], runs them through the
//! shared [`CommandEngine`], and parses the reply back into typed values.
//! Per-model differences are read from the [`ScannerModel`] capability
//! record; nothing here is specific to one scanner.
//!
//! Methods documented as "program mode" enter program mode around the
//! command and leave it afterwards, unless the caller has entered it
//! explicitly with [`Scanner::enter_program_mode`]. Input is validated
//! before anything is sent, so a rejected argument never reaches the
//! scanner.

use std::time::Duration;

use tracing::debug;

use bearcat_core::channel::Channel;
use bearcat_core::error::{Error, Result};
use bearcat_core::helpers::{flag_str, parse_flag};
use bearcat_core::transport::Transport;
use bearcat_core::types::{DelayTime, KeyAction, OperationMode};
use bearcat_protocol::engine::{CommandEngine, check_ok};
use bearcat_protocol::relay::{self, RelayHandle};

use crate::commands::{self, MemoryBlock, Reception, Status};
use crate::models::{FormFactor, ScannerModel};
use crate::settings::{
    BacklightMode, CloseCallSettings, CustomSearchGroup, CustomSearchRange, KeyBeep, PriorityMode,
    SearchSettings, TestMode,
};

/// Highest volume and squelch level.
const MAX_LEVEL: u8 = 15;
/// Contrast runs from 1 to this.
const MAX_CONTRAST: u8 = 15;
/// Number of channel banks / service groups / custom search ranges.
const GROUP_COUNT: u8 = 10;
/// Battery charge time limits in hours (`BSV`).
const MIN_CHARGE_HOURS: u8 = 1;
const MAX_CHARGE_HOURS: u8 = 14;
/// Second argument of `TST`.
const TEST_MODE_KEY: &str = "UNIDEN_TEST_MODE";

/// A connected Uniden scanner.
///
/// Constructed via [`ScannerBuilder`](crate::builder::ScannerBuilder).
/// Cloning is cheap; clones share the connection, the execution lock and
/// the program-mode state.
#[derive(Clone)]
pub struct Scanner {
    engine: CommandEngine,
    model: ScannerModel,
}

impl Scanner {
    /// Create a `Scanner` from its constituent parts.
    ///
    /// This is called by [`ScannerBuilder`](crate::builder::ScannerBuilder);
    /// callers should use the builder API instead.
    pub(crate) fn new(
        transport: Box<dyn Transport>,
        model: ScannerModel,
        response_timeout: Duration,
    ) -> Self {
        let engine = CommandEngine::with_timeout(transport, model.byte_map, response_timeout);
        Scanner { engine, model }
    }

    pub fn model(&self) -> &ScannerModel {
        &self.model
    }

    /// The command engine, for commands this API does not cover.
    pub fn engine(&self) -> &CommandEngine {
        &self.engine
    }

    fn require(&self, supported: bool, what: &str) -> Result<()> {
        if supported {
            Ok(())
        } else {
            Err(Error::Unsupported(format!("{what} on the {}", self.model.name)))
        }
    }

    // -----------------------------------------------------------------
    // Program mode
    // -----------------------------------------------------------------

    /// Enter program mode (`PRG`). Scanning stops until it is exited, and
    /// program-mode methods stop bracketing themselves.
    pub async fn enter_program_mode(&self) -> Result<()> {
        self.engine.enter_program_mode().await
    }

    /// Exit program mode (`EPG`).
    pub async fn exit_program_mode(&self) -> Result<()> {
        self.engine.exit_program_mode().await
    }

    pub fn in_program_mode(&self) -> bool {
        self.engine.in_program_mode()
    }

    // -----------------------------------------------------------------
    // Identity and levels
    // -----------------------------------------------------------------

    /// Model name (`MDL`).
    pub async fn get_model(&self) -> Result<String> {
        self.engine.get_string("MDL").await
    }

    /// Firmware version (`VER`).
    pub async fn get_version(&self) -> Result<String> {
        self.engine.get_string("VER").await
    }

    /// Volume level, 0 - 15 (`VOL`).
    pub async fn get_volume(&self) -> Result<u8> {
        self.engine.get_number("VOL").await
    }

    pub async fn set_volume(&self, level: u8) -> Result<()> {
        check_level("volume", level, 0, MAX_LEVEL)?;
        debug!(level, "setting volume");
        self.engine.set_value("VOL", level).await
    }

    /// Squelch level, 0 - 15 (`SQL`).
    pub async fn get_squelch(&self) -> Result<u8> {
        self.engine.get_number("SQL").await
    }

    pub async fn set_squelch(&self, level: u8) -> Result<()> {
        check_level("squelch", level, 0, MAX_LEVEL)?;
        debug!(level, "setting squelch");
        self.engine.set_value("SQL", level).await
    }

    /// Display contrast, 1 - 15 (`CNT`). Program mode.
    pub async fn get_contrast(&self) -> Result<u8> {
        self.engine.get_program_mode_number("CNT").await
    }

    pub async fn set_contrast(&self, level: u8) -> Result<()> {
        check_level("contrast", level, 1, MAX_CONTRAST)?;
        debug!(level, "setting contrast");
        self.engine.set_program_mode_value("CNT", level).await
    }

    // -----------------------------------------------------------------
    // Live state
    // -----------------------------------------------------------------

    /// The display and squelch/mute state (`STS`).
    pub async fn get_status(&self) -> Result<Status> {
        let fields = self.engine.execute(&["STS"]).await?;
        commands::parse_status(&fields, &self.model)
    }

    /// What is being received right now (`GLG`).
    pub async fn get_reception_status(&self) -> Result<Reception> {
        let fields = self.engine.execute(&["GLG"]).await?;
        commands::parse_reception(&fields, &self.model)
    }

    /// Window voltage as a fraction of A/D full scale, and the frequency
    /// it was measured on (`WIN`).
    pub async fn get_window_voltage(&self) -> Result<(f64, u64)> {
        let fields = self.engine.execute(&["WIN"]).await?;
        commands::parse_window_voltage(&fields, &self.model)
    }

    /// Received signal on a 0 - 1 scale, and its frequency (`PWR`).
    pub async fn get_power(&self) -> Result<(f64, u64)> {
        self.require(self.model.has_power_meter, "no signal meter")?;
        let fields = self.engine.execute(&["PWR"]).await?;
        commands::parse_power(&fields)
    }

    /// Battery potential in volts (`BAV`). Handhelds only.
    pub async fn get_battery_voltage(&self) -> Result<f64> {
        self.require(self.model.form_factor == FormFactor::Handheld, "no battery")?;
        let counts: u16 = self.engine.get_number("BAV").await?;
        Ok(commands::battery_volts(counts))
    }

    // -----------------------------------------------------------------
    // Channels
    // -----------------------------------------------------------------

    /// Read a stored channel (`CIN`). Program mode.
    pub async fn get_channel_info(&self, index: u16) -> Result<Channel> {
        self.model.check_channel(index)?;
        let index = index.to_string();
        let fields = self
            .engine
            .execute_in_program_mode(&["CIN", index.as_str()])
            .await?;
        commands::parse_channel(&fields, &self.model)
    }

    /// Store a channel (`CIN`). Program mode.
    pub async fn set_channel_info(&self, channel: &Channel) -> Result<()> {
        let fields = commands::channel_fields(channel, &self.model)?;
        self.write_channel(channel, fields).await
    }

    async fn write_channel(&self, channel: &Channel, fields: Vec<String>) -> Result<()> {
        let mut command = vec!["CIN".to_string()];
        command.extend(fields);
        debug!(index = channel.index, freq_hz = channel.frequency_hz, "writing channel");
        check_ok(&self.engine.execute_in_program_mode(&command).await?)
    }

    /// Delete a stored channel (`DCH`). Program mode.
    pub async fn delete_channel(&self, index: u16) -> Result<()> {
        self.require(self.model.has_delete_channel, "no channel delete command")?;
        self.model.check_channel(index)?;
        debug!(index, "deleting channel");
        self.engine.set_program_mode_value("DCH", index).await
    }

    /// Write `channel` only if the stored one differs. Returns whether a
    /// write was made.
    pub async fn update_channel(&self, channel: &Channel) -> Result<bool> {
        let fields = commands::channel_fields(channel, &self.model)?;
        let current = self.get_channel_info(channel.index).await?;
        if commands::channel_matches(&current, channel, &self.model) {
            debug!(index = channel.index, "channel unchanged");
            return Ok(false);
        }
        self.write_channel(channel, fields).await?;
        Ok(true)
    }

    /// Remove a channel if it holds a name or frequency. Models without a
    /// delete command get a blank, locked-out record instead. Returns
    /// whether anything was changed.
    pub async fn clear_channel(&self, index: u16) -> Result<bool> {
        let current = self.get_channel_info(index).await?;
        if !current.is_programmed() {
            return Ok(false);
        }
        if self.model.has_delete_channel {
            self.delete_channel(index).await?;
        } else {
            self.set_channel_info(&commands::blank_channel(index)).await?;
        }
        Ok(true)
    }

    // -----------------------------------------------------------------
    // Settings (program mode)
    // -----------------------------------------------------------------

    /// Channel banks locked out of scanning (`SCG`); `true` means the
    /// bank is skipped.
    pub async fn get_scan_channel_group(&self) -> Result<[bool; 10]> {
        self.engine.get_program_mode_group("SCG").await
    }

    pub async fn set_scan_channel_group(&self, locked_out: &[bool; 10]) -> Result<()> {
        self.engine.set_program_mode_group("SCG", locked_out).await
    }

    /// Service search groups locked out of searching (`SSG`): police,
    /// fire/EMS, ham, marine, railroad, civil air, military air, CB,
    /// FRS/GMRS/MURS, racing.
    pub async fn get_service_search_group(&self) -> Result<[bool; 10]> {
        self.engine.get_program_mode_group("SSG").await
    }

    pub async fn set_service_search_group(&self, locked_out: &[bool; 10]) -> Result<()> {
        self.engine.set_program_mode_group("SSG", locked_out).await
    }

    /// Custom search ranges and, on compact models, search delay and
    /// direction (`CSG`).
    pub async fn get_custom_search_group(&self) -> Result<CustomSearchGroup> {
        let fields = self.engine.execute_in_program_mode(&["CSG"]).await?;
        commands::parse_custom_search_group(&fields, &self.model)
    }

    pub async fn set_custom_search_group(&self, group: &CustomSearchGroup) -> Result<()> {
        let mut fields = vec!["CSG".to_string()];
        fields.extend(commands::custom_search_group_fields(group, &self.model)?);
        check_ok(&self.engine.execute_in_program_mode(&fields).await?)
    }

    /// One of the ten custom search ranges (`CSP`), numbered 1-10.
    pub async fn get_custom_search_settings(&self, index: u8) -> Result<CustomSearchRange> {
        self.require(self.model.has_custom_search_ranges, "no custom search ranges")?;
        commands::check_custom_search_index(index)?;
        let fields = self
            .engine
            .execute_in_program_mode(&["CSP".to_string(), index.to_string()])
            .await?;
        commands::parse_custom_search_range(&fields)
    }

    pub async fn set_custom_search_settings(&self, range: &CustomSearchRange) -> Result<()> {
        self.require(self.model.has_custom_search_ranges, "no custom search ranges")?;
        let mut fields = vec!["CSP".to_string()];
        fields.extend(commands::custom_search_range_fields(range, &self.model)?);
        debug!(
            index = range.index,
            lower_hz = range.lower_hz,
            upper_hz = range.upper_hz,
            "setting custom search range"
        );
        check_ok(&self.engine.execute_in_program_mode(&fields).await?)
    }

    /// Close Call settings (`CLC`).
    pub async fn get_close_call(&self) -> Result<CloseCallSettings> {
        let fields = self.engine.execute_in_program_mode(&["CLC"]).await?;
        commands::parse_close_call(&fields, &self.model)
    }

    pub async fn set_close_call(&self, settings: &CloseCallSettings) -> Result<()> {
        let mut fields = vec!["CLC".to_string()];
        fields.extend(commands::close_call_fields(settings, &self.model)?);
        debug!(mode = ?settings.mode, "setting close call");
        check_ok(&self.engine.execute_in_program_mode(&fields).await?)
    }

    /// Search / Close Call options (`SCO`).
    pub async fn get_search_settings(&self) -> Result<SearchSettings> {
        let fields = self.engine.execute_in_program_mode(&["SCO"]).await?;
        commands::parse_search_settings(&fields, &self.model)
    }

    pub async fn set_search_settings(&self, settings: &SearchSettings) -> Result<()> {
        let mut fields = vec!["SCO".to_string()];
        fields.extend(commands::search_settings_fields(settings, &self.model)?);
        check_ok(&self.engine.execute_in_program_mode(&fields).await?)
    }

    /// Key beep and keypad lock (`KBP`).
    pub async fn get_key_beep(&self) -> Result<KeyBeep> {
        let fields = self.engine.execute_in_program_mode(&["KBP"]).await?;
        commands::parse_key_beep(&fields, &self.model)
    }

    pub async fn set_key_beep(&self, settings: &KeyBeep) -> Result<()> {
        let mut fields = vec!["KBP".to_string()];
        fields.extend(commands::key_beep_fields(settings, &self.model)?);
        check_ok(&self.engine.execute_in_program_mode(&fields).await?)
    }

    /// Backlight mode (`BLT`).
    pub async fn get_backlight(&self) -> Result<BacklightMode> {
        let value = self.engine.get_program_mode_string("BLT").await?;
        Ok(value.parse::<BacklightMode>()?)
    }

    pub async fn set_backlight(&self, mode: BacklightMode) -> Result<()> {
        self.engine.set_program_mode_value("BLT", mode.as_wire()).await
    }

    /// Priority mode (`PRI`).
    pub async fn get_priority_mode(&self) -> Result<PriorityMode> {
        let value = self.engine.get_program_mode_string("PRI").await?;
        Ok(value.parse::<PriorityMode>()?)
    }

    pub async fn set_priority_mode(&self, mode: PriorityMode) -> Result<()> {
        self.engine.set_program_mode_value("PRI", mode.as_wire()).await
    }

    /// Whether the Canadian (`true`) or US band plan is used (`BPL`).
    pub async fn get_band_plan(&self) -> Result<bool> {
        parse_flag(&self.engine.get_program_mode_string("BPL").await?)
    }

    pub async fn set_band_plan(&self, canada: bool) -> Result<()> {
        self.engine.set_program_mode_value("BPL", flag_str(canada)).await
    }

    /// Weather alert priority (`WXS`).
    pub async fn get_weather_priority(&self) -> Result<bool> {
        parse_flag(&self.engine.get_program_mode_string("WXS").await?)
    }

    pub async fn set_weather_priority(&self, on: bool) -> Result<()> {
        self.engine.set_program_mode_value("WXS", flag_str(on)).await
    }

    /// Battery charge time in hours (`BSV`).
    pub async fn get_charge_time(&self) -> Result<u8> {
        self.require(self.model.has_charge_time, "no charge timer")?;
        self.engine.get_program_mode_number("BSV").await
    }

    /// Set the battery charge time, 1-14 hours. The scanner only accepts
    /// this in program mode.
    pub async fn set_charge_time(&self, hours: u8) -> Result<()> {
        self.require(self.model.has_charge_time, "no charge timer")?;
        check_level("charge time", hours, MIN_CHARGE_HOURS, MAX_CHARGE_HOURS)?;
        self.engine.set_program_mode_value("BSV", hours).await
    }

    /// Whether the display is upside down (`DUD`). Mobiles only.
    pub async fn get_lcd_upside_down(&self) -> Result<bool> {
        self.require(self.model.form_factor == FormFactor::Mobile, "no display flip")?;
        parse_flag(&self.engine.get_program_mode_string("DUD").await?)
    }

    pub async fn set_lcd_upside_down(&self, upside_down: bool) -> Result<()> {
        self.require(self.model.form_factor == FormFactor::Mobile, "no display flip")?;
        self.engine
            .set_program_mode_value("DUD", flag_str(upside_down))
            .await
    }

    /// Factory reset (`CLR`). Erases every channel and setting.
    pub async fn clear_all_memory(&self) -> Result<()> {
        debug!("clearing all memory");
        check_ok(&self.engine.execute_in_program_mode(&["CLR"]).await?)
    }

    // -----------------------------------------------------------------
    // Lockouts
    // -----------------------------------------------------------------

    /// Next globally locked-out frequency (`GLF`). Call repeatedly to walk
    /// the list; `None` marks its end.
    pub async fn get_global_lockout_freq(&self) -> Result<Option<u64>> {
        commands::parse_lockout_frequency(&self.engine.get_string("GLF").await?)
    }

    /// Remove a frequency from the global lockout list (`ULF`).
    pub async fn unlock_global_lockout(&self, frequency_hz: u64) -> Result<()> {
        self.model.check_frequency(frequency_hz)?;
        self.engine
            .set_value("ULF", commands::frequency_units(frequency_hz))
            .await
    }

    /// Add a frequency to the global lockout list (`LOF`). Program mode.
    pub async fn lock_out_frequency(&self, frequency_hz: u64) -> Result<()> {
        self.model.check_frequency(frequency_hz)?;
        self.engine
            .set_program_mode_value("LOF", commands::frequency_units(frequency_hz))
            .await
    }

    // -----------------------------------------------------------------
    // Keys and navigation
    // -----------------------------------------------------------------

    async fn key_action(&self, key: char, action: KeyAction) -> Result<()> {
        let key = self.model.check_key(key)?.to_string();
        check_ok(
            &self
                .engine
                .execute(&["KEY", key.as_str(), action.as_wire()])
                .await?,
        )
    }

    pub async fn press_key(&self, key: char) -> Result<()> {
        self.key_action(key, KeyAction::Press).await
    }

    pub async fn long_press_key(&self, key: char) -> Result<()> {
        self.key_action(key, KeyAction::LongPress).await
    }

    pub async fn hold_key(&self, key: char) -> Result<()> {
        self.key_action(key, KeyAction::Hold).await
    }

    pub async fn release_key(&self, key: char) -> Result<()> {
        self.key_action(key, KeyAction::Release).await
    }

    /// Press each key of `keys` in turn. Every key is checked before the
    /// first one is pressed.
    pub async fn press_key_sequence(&self, keys: &str) -> Result<()> {
        let keys = keys
            .chars()
            .map(|k| self.model.check_key(k))
            .collect::<Result<Vec<_>>>()?;
        for key in keys {
            self.press_key(key).await?;
        }
        Ok(())
    }

    /// Tune to `frequency_hz` and hold there (`QSH`).
    pub async fn quick_search_hold(&self, frequency_hz: u64, delay: DelayTime) -> Result<()> {
        let mut fields = vec!["QSH".to_string()];
        fields.extend(commands::quick_search_fields(frequency_hz, delay, &self.model)?);
        debug!(freq_hz = frequency_hz, "quick search hold");
        check_ok(&self.engine.execute(&fields).await?)
    }

    /// Go to a stored channel and hold on it.
    ///
    /// Uses `JNT` where the scanner has it, otherwise leaves scan mode via
    /// a quick search and enters the channel number on the keypad.
    pub async fn jump_to_channel(&self, index: u16) -> Result<()> {
        self.model.check_channel(index)?;
        if self.model.has_jump_to_channel {
            let slot = (index - 1).to_string();
            return check_ok(&self.engine.execute(&["JNT", "", slot.as_str()]).await?);
        }

        self.quick_search_hold(self.model.min_frequency_hz, DelayTime::Two)
            .await?;
        self.press_key_sequence(&format!("{index}H")).await
    }

    /// Switch operating mode (`JPM`).
    pub async fn jump_mode(&self, mode: OperationMode) -> Result<()> {
        debug!(%mode, "jumping to mode");
        self.engine.set_value("JPM", mode).await
    }

    /// Scan only the given banks (1 - 10) and start scanning.
    pub async fn scan_groups(&self, banks: &[u8]) -> Result<()> {
        if let Some(bad) = banks.iter().find(|&&b| !(1..=GROUP_COUNT).contains(&b)) {
            return Err(Error::InvalidParameter(format!(
                "bank {bad} out of range, expected 1 - {GROUP_COUNT}"
            )));
        }
        let locked_out: [bool; 10] = std::array::from_fn(|i| !banks.contains(&(i as u8 + 1)));
        self.set_scan_channel_group(&locked_out).await?;
        self.jump_mode(OperationMode::Scan).await
    }

    // -----------------------------------------------------------------
    // Diagnostics
    // -----------------------------------------------------------------

    /// Electronic serial number, product code and a third undocumented
    /// value (`ESN`).
    pub async fn get_electronic_serial_number(&self) -> Result<(String, String, String)> {
        let fields = self.engine.execute(&["ESN"]).await?;
        commands::parse_serial_number(&fields)
    }

    /// Read 16 bytes at `location` (`MRD`). Undocumented; the meaning of
    /// the locations is unknown, so this is a raw read only.
    pub async fn memory_read(&self, location: u32) -> Result<MemoryBlock> {
        let arg = location.to_string();
        let fields = self.engine.execute(&["MRD", arg.as_str()]).await?;
        commands::parse_memory_block(&fields, location)
    }

    /// Start a factory hardware test (`TST`).
    ///
    /// Program mode must have been entered explicitly first. The scanner
    /// drops out of program mode into the test and does not answer
    /// normally, so a garbled reply is not an error.
    pub async fn enter_test_mode(&self, mode: TestMode) -> Result<()> {
        self.require(self.model.supports_test_mode(mode), &format!("no {mode} test"))?;
        if !self.engine.in_program_mode() {
            return Err(Error::InvalidParameter(
                "test mode requires program mode to be entered first".into(),
            ));
        }

        match self
            .engine
            .execute(&["TST", mode.as_wire(), TEST_MODE_KEY])
            .await
        {
            Ok(_) | Err(Error::UnexpectedResult(_)) => {}
            Err(e) => return Err(e),
        }
        debug!(%mode, "entered test mode");
        self.engine.clear_program_mode_flag();
        Ok(())
    }

    /// Power the scanner off (`POF`). Handhelds only.
    pub async fn power_off(&self) -> Result<()> {
        self.require(self.model.form_factor == FormFactor::Handheld, "no remote power off")?;
        self.engine.execute_action("POF").await
    }

    // -----------------------------------------------------------------
    // Relay
    // -----------------------------------------------------------------

    /// Share this scanner with other processes over TCP. Relayed commands
    /// and this `Scanner`'s own commands are serialized on one lock.
    pub async fn listen(&self, bind_address: &str, bind_port: u16) -> Result<RelayHandle> {
        relay::listen(self.engine.clone(), bind_address, bind_port).await
    }
}

fn check_level(what: &str, level: u8, min: u8, max: u8) -> Result<()> {
    if !(min..=max).contains(&level) {
        return Err(Error::InvalidParameter(format!(
            "{what} level {level} out of range, expected {min} - {max}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{bc75xlt, bc125at};
    use crate::settings::CloseCallMode;
    use bearcat_core::tone::Tone;
    use bearcat_core::types::Modulation;
    use bearcat_protocol::engine::DEFAULT_RESPONSE_TIMEOUT;
    use bearcat_test_harness::{MockTransport, SentLog};

    fn connect(model: ScannerModel, mock: MockTransport) -> (Scanner, SentLog) {
        let sent = mock.sent_log();
        (
            Scanner::new(Box::new(mock), model, DEFAULT_RESPONSE_TIMEOUT),
            sent,
        )
    }

    /// Queue a program-mode bracketed exchange.
    fn expect_bracketed(mock: &mut MockTransport, request: &[u8], response: &[u8]) {
        mock.expect(b"PRG\r", b"PRG,OK\r");
        mock.expect(request, response);
        mock.expect(b"EPG\r", b"EPG,OK\r");
    }

    // ---------------------------------------------------------------
    // Levels
    // ---------------------------------------------------------------

    #[tokio::test]
    async fn volume_round_trip() {
        let mut mock = MockTransport::new();
        mock.expect(b"VOL\r", b"VOL,5\r");
        mock.expect(b"VOL,12\r", b"VOL,OK\r");
        let (scanner, _) = connect(bc125at(), mock);

        assert_eq!(scanner.get_volume().await.unwrap(), 5);
        scanner.set_volume(12).await.unwrap();
    }

    #[tokio::test]
    async fn out_of_range_levels_are_rejected_before_io() {
        let (scanner, sent) = connect(bc125at(), MockTransport::new());

        assert!(matches!(scanner.set_volume(16).await, Err(Error::InvalidParameter(_))));
        assert!(matches!(scanner.set_squelch(20).await, Err(Error::InvalidParameter(_))));
        assert!(matches!(scanner.set_contrast(0).await, Err(Error::InvalidParameter(_))));
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn contrast_is_bracketed() {
        let mut mock = MockTransport::new();
        expect_bracketed(&mut mock, b"CNT,7\r", b"CNT,OK\r");
        let (scanner, sent) = connect(bc125at(), mock);

        scanner.set_contrast(7).await.unwrap();
        assert_eq!(sent.lines(), ["PRG\r", "CNT,7\r", "EPG\r"]);
        assert!(!scanner.in_program_mode());
    }

    #[tokio::test]
    async fn explicit_program_mode_is_kept() {
        let mut mock = MockTransport::new();
        mock.expect(b"PRG\r", b"PRG,OK\r");
        mock.expect(b"CNT\r", b"CNT,9\r");
        mock.expect(b"BLT\r", b"BLT,KY\r");
        mock.expect(b"EPG\r", b"EPG,OK\r");
        let (scanner, sent) = connect(bc125at(), mock);

        scanner.enter_program_mode().await.unwrap();
        assert_eq!(scanner.get_contrast().await.unwrap(), 9);
        assert_eq!(scanner.get_backlight().await.unwrap(), BacklightMode::Keypress);
        assert!(scanner.in_program_mode());
        scanner.exit_program_mode().await.unwrap();
        assert_eq!(sent.len(), 4);
    }

    // ---------------------------------------------------------------
    // Live state
    // ---------------------------------------------------------------

    #[tokio::test]
    async fn status_decodes_glyphs() {
        let mut mock = MockTransport::new();
        mock.expect(b"STS\r", b"STS,1,\x83\x86 SCAN,    *****,1,0\r");
        let (scanner, _) = connect(bc75xlt(), mock);

        let status = scanner.get_status().await.unwrap();
        assert_eq!(status.screen.lines[0].text, "Lock SCAN");
        assert!(status.screen.lines[0].large);
        assert_eq!(status.screen.lines[0].highlighted_runs(), [(4, 9)]);
        assert!(status.squelched);
        assert!(!status.muted);
    }

    #[tokio::test]
    async fn reception_status() {
        let mut mock = MockTransport::new();
        mock.expect(b"GLG\r", b"GLG,01625500,FM,0,0,,,NOAA WX,1,0,,42,\r");
        let (scanner, _) = connect(bc125at(), mock);

        let rx = scanner.get_reception_status().await.unwrap();
        assert_eq!(rx.state.frequency_hz, 162_550_000);
        assert_eq!(rx.state.name, "NOAA WX");
        assert_eq!(rx.state.index, Some(42));
        assert!(rx.squelched);
    }

    #[tokio::test]
    async fn model_gated_commands() {
        let (scanner, sent) = connect(bc125at(), MockTransport::new());

        assert!(matches!(scanner.get_power().await, Err(Error::Unsupported(_))));
        assert!(matches!(scanner.get_lcd_upside_down().await, Err(Error::Unsupported(_))));
        assert!(matches!(
            scanner.set_lcd_upside_down(true).await,
            Err(Error::Unsupported(_))
        ));
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn power_and_battery() {
        let mut mock = MockTransport::new();
        mock.expect(b"PWR\r", b"PWR,128,01546250\r");
        mock.expect(b"BAV\r", b"BAV,639\r");
        let (scanner, _) = connect(bc75xlt(), mock);

        let (level, freq) = scanner.get_power().await.unwrap();
        assert!((level - 0.25).abs() < f64::EPSILON);
        assert_eq!(freq, 154_625_000);
        let volts = scanner.get_battery_voltage().await.unwrap();
        assert!((volts - 3.999).abs() < 0.01);
    }

    // ---------------------------------------------------------------
    // Channels
    // ---------------------------------------------------------------

    fn dispatch() -> Channel {
        Channel::new(12, 154_100_000)
            .with_name("Fire Dispatch")
            .with_modulation(Modulation::Nfm)
            .with_tone(Tone::Ctcss(1000))
            .with_lockout(false)
    }

    #[tokio::test]
    async fn read_and_write_channel() {
        let mut mock = MockTransport::new();
        expect_bracketed(&mut mock, b"CIN,12\r", b"CIN,12,Fire Dispatch,1541000,NFM,76,2,0,0\r");
        expect_bracketed(&mut mock, b"CIN,12,Fire Dispatch,1541000,NFM,76,2,0,0\r", b"CIN,OK\r");
        let (scanner, _) = connect(bc125at(), mock);

        let channel = scanner.get_channel_info(12).await.unwrap();
        assert_eq!(channel, dispatch());
        scanner.set_channel_info(&channel).await.unwrap();
    }

    #[tokio::test]
    async fn update_channel_is_idempotent() {
        let mut mock = MockTransport::new();
        // First call: stored channel is empty, so it is written.
        expect_bracketed(&mut mock, b"CIN,12\r", b"CIN,12,,0,AUTO,0,2,1,0\r");
        expect_bracketed(&mut mock, b"CIN,12,Fire Dispatch,1541000,NFM,76,2,0,0\r", b"CIN,OK\r");
        // Second call: stored channel now matches.
        expect_bracketed(&mut mock, b"CIN,12\r", b"CIN,12,Fire Dispatch,1541000,NFM,76,2,0,0\r");
        let (scanner, sent) = connect(bc125at(), mock);

        assert!(scanner.update_channel(&dispatch()).await.unwrap());
        assert!(!scanner.update_channel(&dispatch()).await.unwrap());
        assert_eq!(sent.len(), 9);
    }

    #[tokio::test]
    async fn update_channel_rejects_sub_unit_frequency() {
        let (scanner, sent) = connect(bc125at(), MockTransport::new());

        let channel = Channel::new(5, 146_520_050).with_name("Test");
        let err = scanner.update_channel(&channel).await.unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn compact_update_ignores_name_and_tone() {
        let mut mock = MockTransport::new();
        expect_bracketed(&mut mock, b"CIN,12\r", b"CIN,12,,1541000,,,1,0,0\r");
        let (scanner, sent) = connect(bc75xlt(), mock);

        assert!(!scanner.update_channel(&dispatch()).await.unwrap());
        assert_eq!(sent.len(), 3);
    }

    #[tokio::test]
    async fn clear_channel_deletes_when_programmed() {
        let mut mock = MockTransport::new();
        expect_bracketed(&mut mock, b"CIN,3\r", b"CIN,3,Tower,1187000,AM,0,2,0,0\r");
        expect_bracketed(&mut mock, b"DCH,3\r", b"DCH,OK\r");
        let (scanner, _) = connect(bc125at(), mock);

        assert!(scanner.clear_channel(3).await.unwrap());
    }

    #[tokio::test]
    async fn clear_channel_skips_empty() {
        let mut mock = MockTransport::new();
        expect_bracketed(&mut mock, b"CIN,3\r", b"CIN,3,,0,AUTO,0,2,1,0\r");
        let (scanner, sent) = connect(bc125at(), mock);

        assert!(!scanner.clear_channel(3).await.unwrap());
        assert_eq!(sent.len(), 3);
    }

    #[tokio::test]
    async fn compact_clear_writes_blank_record() {
        let mut mock = MockTransport::new();
        expect_bracketed(&mut mock, b"CIN,3\r", b"CIN,3,,1541000,,,0,0,1\r");
        expect_bracketed(&mut mock, b"CIN,3,,0,,,1,1,0\r", b"CIN,OK\r");
        let (scanner, _) = connect(bc75xlt(), mock);

        assert!(scanner.clear_channel(3).await.unwrap());
        assert!(matches!(scanner.delete_channel(3).await, Err(Error::Unsupported(_))));
    }

    #[tokio::test]
    async fn channel_index_checked_before_io() {
        let (scanner, sent) = connect(bc75xlt(), MockTransport::new());

        assert!(matches!(
            scanner.get_channel_info(301).await,
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            scanner.set_channel_info(&Channel::new(0, 0)).await,
            Err(Error::InvalidParameter(_))
        ));
        assert!(sent.is_empty());
    }

    // ---------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------

    #[tokio::test]
    async fn close_call_settings() {
        let mut mock = MockTransport::new();
        expect_bracketed(&mut mock, b"CLC\r", b"CLC,2,1,1,10101,0\r");
        expect_bracketed(&mut mock, b"CLC,3,1,1,10101,0\r", b"CLC,OK\r");
        let (scanner, _) = connect(bc125at(), mock);

        let mut settings = scanner.get_close_call().await.unwrap();
        assert_eq!(settings.mode, CloseCallMode::Dnd);
        assert_eq!(settings.bands, [true, false, true, false, true]);
        settings.mode = CloseCallMode::Only;
        scanner.set_close_call(&settings).await.unwrap();
    }

    #[tokio::test]
    async fn custom_search_range_round_trip() {
        let mut mock = MockTransport::new();
        expect_bracketed(&mut mock, b"CSP,2\r", b"CSP,2,1080000,1370000\r");
        expect_bracketed(&mut mock, b"CSP,2,1440000,1480000\r", b"CSP,OK\r");
        let (scanner, _) = connect(bc125at(), mock);

        let mut range = scanner.get_custom_search_settings(2).await.unwrap();
        assert_eq!(range.lower_hz, 108_000_000);
        assert_eq!(range.upper_hz, 137_000_000);
        range.lower_hz = 144_000_000;
        range.upper_hz = 148_000_000;
        scanner.set_custom_search_settings(&range).await.unwrap();
        assert!(!scanner.in_program_mode());
    }

    #[tokio::test]
    async fn custom_search_range_is_validated_first() {
        let (scanner, sent) = connect(bc125at(), MockTransport::new());

        assert!(matches!(
            scanner.get_custom_search_settings(11).await,
            Err(Error::InvalidParameter(_))
        ));
        let range = CustomSearchRange {
            index: 1,
            lower_hz: 144_000_000,
            upper_hz: 600_000_000,
        };
        assert!(matches!(
            scanner.set_custom_search_settings(&range).await,
            Err(Error::InvalidParameter(_))
        ));
        assert!(sent.is_empty());

        let (compact, sent) = connect(bc75xlt(), MockTransport::new());
        assert!(matches!(
            compact.get_custom_search_settings(1).await,
            Err(Error::Unsupported(_))
        ));
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn charge_time() {
        let mut mock = MockTransport::new();
        expect_bracketed(&mut mock, b"BSV\r", b"BSV,14\r");
        expect_bracketed(&mut mock, b"BSV,9\r", b"BSV,OK\r");
        let (scanner, sent) = connect(bc125at(), mock);

        assert_eq!(scanner.get_charge_time().await.unwrap(), 14);
        scanner.set_charge_time(9).await.unwrap();
        assert_eq!(sent.len(), 6);

        for hours in [0, 15] {
            assert!(matches!(
                scanner.set_charge_time(hours).await,
                Err(Error::InvalidParameter(_))
            ));
        }
        assert_eq!(sent.len(), 6);
    }

    #[tokio::test]
    async fn key_beep_compact_layout() {
        let mut mock = MockTransport::new();
        expect_bracketed(&mut mock, b"KBP,,1\r", b"KBP,OK\r");
        let (scanner, _) = connect(bc75xlt(), mock);

        scanner
            .set_key_beep(&KeyBeep { beep: None, locked: true })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn scan_groups_enables_listed_banks() {
        let mut mock = MockTransport::new();
        expect_bracketed(&mut mock, b"SCG,0111111110\r", b"SCG,OK\r");
        mock.expect(b"JPM,SCN_MODE\r", b"JPM,OK\r");
        let (scanner, _) = connect(bc125at(), mock);

        scanner.scan_groups(&[1, 10]).await.unwrap();
        assert!(matches!(
            scanner.scan_groups(&[11]).await,
            Err(Error::InvalidParameter(_))
        ));
    }

    #[tokio::test]
    async fn bad_group_reply_is_unexpected() {
        let mut mock = MockTransport::new();
        expect_bracketed(&mut mock, b"SSG\r", b"SSG,01\r");
        let (scanner, _) = connect(bc125at(), mock);

        assert!(matches!(
            scanner.get_service_search_group().await,
            Err(Error::UnexpectedResult(_))
        ));
        assert!(!scanner.in_program_mode());
    }

    #[tokio::test]
    async fn lockout_list() {
        let mut mock = MockTransport::new();
        mock.expect(b"GLF\r", b"GLF,01625500\r");
        mock.expect(b"GLF\r", b"GLF,-1\r");
        expect_bracketed(&mut mock, b"LOF,1625500\r", b"LOF,OK\r");
        let (scanner, _) = connect(bc125at(), mock);

        assert_eq!(scanner.get_global_lockout_freq().await.unwrap(), Some(162_550_000));
        assert_eq!(scanner.get_global_lockout_freq().await.unwrap(), None);
        scanner.lock_out_frequency(162_550_000).await.unwrap();
        assert!(scanner.unlock_global_lockout(600_000_000).await.is_err());
    }

    // ---------------------------------------------------------------
    // Keys / navigation
    // ---------------------------------------------------------------

    #[tokio::test]
    async fn key_sequence_is_validated_first() {
        let (scanner, sent) = connect(bc125at(), MockTransport::new());

        assert!(matches!(
            scanner.press_key_sequence("12Z").await,
            Err(Error::InvalidParameter(_))
        ));
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn key_actions() {
        let mut mock = MockTransport::new();
        mock.expect(b"KEY,H,P\r", b"KEY,OK\r");
        mock.expect(b"KEY,S,L\r", b"KEY,OK\r");
        mock.expect(b"KEY,F,H\r", b"KEY,OK\r");
        mock.expect(b"KEY,F,R\r", b"KEY,OK\r");
        let (scanner, _) = connect(bc125at(), mock);

        scanner.press_key('h').await.unwrap();
        scanner.long_press_key('S').await.unwrap();
        scanner.hold_key('F').await.unwrap();
        scanner.release_key('f').await.unwrap();
    }

    #[tokio::test]
    async fn jump_to_channel_variants() {
        let mut mock = MockTransport::new();
        mock.expect(b"JNT,,11\r", b"JNT,OK\r");
        let (scanner, _) = connect(bc125at(), mock);
        scanner.jump_to_channel(12).await.unwrap();

        let mut mock = MockTransport::new();
        mock.expect(b"QSH,250000,,,,,1,,,,,,,\r", b"QSH,OK\r");
        mock.expect(b"KEY,4,P\r", b"KEY,OK\r");
        mock.expect(b"KEY,2,P\r", b"KEY,OK\r");
        mock.expect(b"KEY,H,P\r", b"KEY,OK\r");
        let (scanner, sent) = connect(bc75xlt(), mock);
        scanner.jump_to_channel(42).await.unwrap();
        assert_eq!(sent.len(), 4);
    }

    // ---------------------------------------------------------------
    // Diagnostics
    // ---------------------------------------------------------------

    #[tokio::test]
    async fn memory_read_checks_echo() {
        let mut mock = MockTransport::new();
        mock.expect(
            b"MRD,16\r",
            b"MRD,10,00,11,22,33,44,55,66,77,88,99,AA,BB,CC,DD,EE,FF,00000001\r",
        );
        let (scanner, _) = connect(bc125at(), mock);

        let block = scanner.memory_read(16).await.unwrap();
        assert_eq!(block.data[10], 0xAA);
        assert_eq!(block.trailer, 1);
    }

    #[tokio::test]
    async fn test_mode_requires_explicit_program_mode() {
        let (scanner, sent) = connect(bc125at(), MockTransport::new());

        assert!(matches!(
            scanner.enter_test_mode(TestMode::Keypad).await,
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            scanner.enter_test_mode(TestMode::Display).await,
            Err(Error::Unsupported(_))
        ));
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn test_mode_clears_program_mode() {
        let mut mock = MockTransport::new();
        mock.expect(b"PRG\r", b"PRG,OK\r");
        mock.expect(b"TST,4,UNIDEN_TEST_MODE\r", b"\r");
        let (scanner, _) = connect(bc125at(), mock);

        scanner.enter_program_mode().await.unwrap();
        scanner.enter_test_mode(TestMode::Keypad).await.unwrap();
        assert!(!scanner.in_program_mode());
    }

    #[tokio::test]
    async fn unknown_command_surfaces_as_not_found() {
        let mut mock = MockTransport::new();
        mock.expect(b"ESN\r", b"ERR\r");
        let (scanner, _) = connect(bc125at(), mock);

        assert!(matches!(
            scanner.get_electronic_serial_number().await,
            Err(Error::CommandNotFound(_))
        ));
    }
}
