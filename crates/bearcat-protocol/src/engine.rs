//! The command engine: the only path from a caller to the transport.
//!
//! [`CommandEngine`] owns the transport behind a `tokio::sync::Mutex`. The
//! lock is held for exactly one write-then-read round trip, whether the
//! command comes from the typed API ([`CommandEngine::execute`]) or from a
//! relay client ([`CommandEngine::execute_raw`]), so frames from different
//! callers never interleave on the wire.
//!
//! The engine also tracks whether the scanner is in program mode.
//! Configuration commands go through
//! [`execute_in_program_mode`](CommandEngine::execute_in_program_mode),
//! which enters and leaves program mode around the command only when the
//! caller had not already entered it.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bearcat_core::error::{Error, Result};
use bearcat_core::transport::Transport;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::codec::{self, ByteMap, LINE_TERMINATORS};

/// Default time to wait for a response line.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_millis(100);

/// Mnemonic that enters program mode.
pub const ENTER_PROGRAM_MODE: &str = "PRG";
/// Mnemonic that leaves program mode.
pub const EXIT_PROGRAM_MODE: &str = "EPG";

/// Reply to an unknown mnemonic.
const NOT_FOUND: &str = "ERR";
/// Reply to a known mnemonic that was rejected.
const NOT_GOOD: &str = "NG";
/// Reply to a successful action or setter.
const OK: &str = "OK";

struct Shared {
    transport: Mutex<Box<dyn Transport>>,
    in_program_mode: AtomicBool,
    byte_map: ByteMap,
    response_timeout: Duration,
}

/// Serializes commands against one scanner and classifies its replies.
///
/// Cloning is cheap and every clone shares the same transport, lock and
/// program-mode state.
#[derive(Clone)]
pub struct CommandEngine {
    inner: Arc<Shared>,
}

impl CommandEngine {
    /// Wrap `transport`, decoding extended bytes with `byte_map`.
    pub fn new(transport: Box<dyn Transport>, byte_map: ByteMap) -> Self {
        Self::with_timeout(transport, byte_map, DEFAULT_RESPONSE_TIMEOUT)
    }

    /// Like [`new`](CommandEngine::new), waiting up to `response_timeout`
    /// for each response line.
    pub fn with_timeout(
        transport: Box<dyn Transport>,
        byte_map: ByteMap,
        response_timeout: Duration,
    ) -> Self {
        CommandEngine {
            inner: Arc::new(Shared {
                transport: Mutex::new(transport),
                in_program_mode: AtomicBool::new(false),
                byte_map,
                response_timeout,
            }),
        }
    }

    pub fn response_timeout(&self) -> Duration {
        self.inner.response_timeout
    }

    pub fn byte_map(&self) -> &ByteMap {
        &self.inner.byte_map
    }

    // -----------------------------------------------------------------
    // Round trips
    // -----------------------------------------------------------------

    /// Write `command` exactly as given and return the raw response line.
    ///
    /// Holds the execution lock for the full round trip. A scanner that
    /// stays silent yields whatever arrived before the timeout, possibly
    /// nothing; only transport failures are errors here.
    pub async fn execute_raw(&self, command: &[u8]) -> Result<Vec<u8>> {
        let mut transport = self.inner.transport.lock().await;
        transport.send(command).await?;
        transport
            .read_until(LINE_TERMINATORS, self.inner.response_timeout)
            .await
    }

    /// Send a command and return the response fields after the echoed
    /// mnemonic.
    ///
    /// Fails with [`Error::CommandNotFound`] when the scanner answers `ERR`,
    /// [`Error::UnexpectedResult`] when it does not echo the mnemonic or
    /// returns nothing after it, and [`Error::CommandInvalid`] on `NG`.
    pub async fn execute<S: AsRef<str> + Sync>(&self, fields: &[S]) -> Result<Vec<String>> {
        let frame = codec::encode_command(fields)?;
        let mnemonic = fields[0].as_ref().to_ascii_uppercase();

        debug!(command = %String::from_utf8_lossy(&frame).trim_end(), "sent");
        let raw = self.execute_raw(&frame).await?;
        let text = codec::decode_response(&raw, &self.inner.byte_map);
        debug!(response = %text, "received");

        classify_response(&mnemonic, &text)
    }

    /// Run an action that takes no arguments and answers `OK`.
    pub async fn execute_action(&self, mnemonic: &str) -> Result<()> {
        check_ok(&self.execute(&[mnemonic]).await?)
    }

    /// Send `mnemonic` and return its single value.
    pub async fn get_string(&self, mnemonic: &str) -> Result<String> {
        single_value(self.execute(&[mnemonic]).await?)
    }

    /// Send `mnemonic` and parse its single value as a number.
    pub async fn get_number<T: FromStr>(&self, mnemonic: &str) -> Result<T> {
        parse_value(&self.get_string(mnemonic).await?)
    }

    /// Send `mnemonic,value` and expect `OK`.
    pub async fn set_value(&self, mnemonic: &str, value: impl Display) -> Result<()> {
        let value = value.to_string();
        check_ok(&self.execute(&[mnemonic, value.as_str()]).await?)
    }

    // -----------------------------------------------------------------
    // Program mode
    // -----------------------------------------------------------------

    /// Whether the scanner is believed to be in program mode.
    pub fn in_program_mode(&self) -> bool {
        self.inner.in_program_mode.load(Ordering::SeqCst)
    }

    /// Enter program mode. Scanning stops until it is exited.
    pub async fn enter_program_mode(&self) -> Result<()> {
        self.execute_action(ENTER_PROGRAM_MODE).await?;
        self.inner.in_program_mode.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Exit program mode and resume normal operation.
    pub async fn exit_program_mode(&self) -> Result<()> {
        self.execute_action(EXIT_PROGRAM_MODE).await?;
        self.inner.in_program_mode.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Forget program mode without telling the scanner, for commands that
    /// leave it on their own.
    pub fn clear_program_mode_flag(&self) {
        self.inner.in_program_mode.store(false, Ordering::SeqCst);
    }

    /// Execute a command that requires program mode.
    ///
    /// If the scanner is not already in program mode, it is entered before
    /// the command and exited afterwards, also when the command fails. A
    /// program mode entered by the caller is left untouched.
    pub async fn execute_in_program_mode<S: AsRef<str> + Sync>(
        &self,
        fields: &[S],
    ) -> Result<Vec<String>> {
        let already_in_program_mode = self.in_program_mode();
        if !already_in_program_mode {
            self.enter_program_mode().await?;
        }

        let result = self.execute(fields).await;

        if !already_in_program_mode {
            match (self.exit_program_mode().await, &result) {
                (Err(e), Ok(_)) => return Err(e),
                (Err(e), Err(_)) => warn!(error = %e, "failed to leave program mode"),
                (Ok(()), _) => {}
            }
        }

        result
    }

    /// Program-mode variant of [`get_string`](CommandEngine::get_string).
    pub async fn get_program_mode_string(&self, mnemonic: &str) -> Result<String> {
        single_value(self.execute_in_program_mode(&[mnemonic]).await?)
    }

    /// Program-mode variant of [`get_number`](CommandEngine::get_number).
    pub async fn get_program_mode_number<T: FromStr>(&self, mnemonic: &str) -> Result<T> {
        parse_value(&self.get_program_mode_string(mnemonic).await?)
    }

    /// Read a fixed-width string of `0`/`1` group flags.
    pub async fn get_program_mode_group<const N: usize>(&self, mnemonic: &str) -> Result<[bool; N]> {
        parse_group(&self.get_program_mode_string(mnemonic).await?)
    }

    /// Program-mode variant of [`set_value`](CommandEngine::set_value).
    pub async fn set_program_mode_value(&self, mnemonic: &str, value: impl Display) -> Result<()> {
        let value = value.to_string();
        check_ok(
            &self
                .execute_in_program_mode(&[mnemonic, value.as_str()])
                .await?,
        )
    }

    /// Write a fixed-width string of `0`/`1` group flags.
    pub async fn set_program_mode_group<const N: usize>(
        &self,
        mnemonic: &str,
        states: &[bool; N],
    ) -> Result<()> {
        self.set_program_mode_value(mnemonic, build_group(states))
            .await
    }
}

// ---------------------------------------------------------------------
// Response classification
// ---------------------------------------------------------------------

/// Classify a decoded response to `mnemonic`.
///
/// The checks run in a fixed order: `ERR`, echo mismatch, missing value,
/// `NG`. On success the fields after the echoed mnemonic are returned.
pub fn classify_response(mnemonic: &str, text: &str) -> Result<Vec<String>> {
    let mut fields = codec::split_fields(text);

    if fields[0] == NOT_FOUND {
        return Err(Error::CommandNotFound(mnemonic.to_string()));
    }
    if fields[0] != mnemonic {
        return Err(Error::UnexpectedResult(if text.is_empty() {
            format!("no response to {mnemonic}")
        } else {
            format!("response {:?} does not echo {mnemonic}", fields[0])
        }));
    }
    if fields.len() == 1 {
        return Err(Error::UnexpectedResult(format!(
            "no value returned for {mnemonic}"
        )));
    }
    if fields[1] == NOT_GOOD {
        return Err(Error::CommandInvalid(format!(
            "{mnemonic} rejected: wrong mode or bad argument"
        )));
    }

    fields.remove(0);
    Ok(fields)
}

/// Fail unless `response` holds exactly `expected` fields.
pub fn check_len(response: &[String], expected: usize) -> Result<()> {
    if response.len() != expected {
        return Err(Error::UnexpectedResult(format!(
            "{} values returned, expected {}",
            response.len(),
            expected
        )));
    }
    Ok(())
}

/// Fail unless `response` is exactly `OK`.
pub fn check_ok(response: &[String]) -> Result<()> {
    check_len(response, 1)?;
    if response[0] != OK {
        return Err(Error::UnexpectedResult(format!(
            "not OK response, {:?}",
            response[0]
        )));
    }
    Ok(())
}

fn single_value(mut response: Vec<String>) -> Result<String> {
    check_len(&response, 1)?;
    Ok(response.remove(0))
}

fn parse_value<T: FromStr>(value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::UnexpectedResult(format!("not a number: {value:?}")))
}

// ---------------------------------------------------------------------
// Group flags
// ---------------------------------------------------------------------

/// Parse `N` group flags from a string such as `"0100000000"`.
pub fn parse_group<const N: usize>(value: &str) -> Result<[bool; N]> {
    if value.len() != N {
        return Err(Error::UnexpectedResult(format!(
            "{} group flags returned, expected {N}",
            value.len()
        )));
    }

    let mut flags = [false; N];
    for (flag, c) in flags.iter_mut().zip(value.chars()) {
        *flag = match c {
            '0' => false,
            '1' => true,
            other => {
                return Err(Error::UnexpectedResult(format!(
                    "bad group flag {other:?} in {value:?}"
                )));
            }
        };
    }
    Ok(flags)
}

/// Build the wire string for `N` group flags.
pub fn build_group<const N: usize>(states: &[bool; N]) -> String {
    states.iter().map(|&s| if s { '1' } else { '0' }).collect()
}
