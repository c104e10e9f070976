//! Transport trait for scanner communication.
//!
//! The [`Transport`] trait abstracts over the physical link to a scanner:
//! a USB/serial port, or a TCP connection to a relay that owns the port.
//! The command engine in `bearcat-protocol` only ever talks to a
//! `Transport`, which lets the same engine drive real hardware, a remote
//! relay, or the `MockTransport` from `bearcat-test-harness`.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

use crate::error::{Error, Result};

/// TCP port a relay listens on unless told otherwise.
pub const DEFAULT_RELAY_PORT: u16 = 65125;

/// Asynchronous byte-level transport to a scanner.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send raw bytes to the scanner.
    ///
    /// Implementations should not return until all bytes have been handed
    /// to the underlying port or socket.
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive bytes from the scanner into the provided buffer.
    ///
    /// Returns the number of bytes read. Waits up to `timeout` for data and
    /// returns [`Error::Timeout`] if nothing arrives in time.
    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Close the transport connection.
    ///
    /// After calling `close()`, subsequent `send()` and `receive()` calls
    /// should return [`Error::NotConnected`].
    async fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently connected.
    fn is_connected(&self) -> bool;

    /// Read until one of `terminators` has been received or `timeout` elapses.
    ///
    /// The returned bytes include the terminator. When the deadline passes
    /// first, whatever has arrived so far is returned (possibly nothing);
    /// a quiet line is not an error at this layer.
    async fn read_until(&mut self, terminators: &[u8], timeout: Duration) -> Result<Vec<u8>> {
        let deadline = Instant::now() + timeout;
        let mut line = Vec::new();
        let mut buf = [0u8; 256];

        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }

            match self.receive(&mut buf, deadline - now).await {
                Ok(0) => break,
                Ok(n) => {
                    let chunk = &buf[..n];
                    if let Some(pos) = chunk.iter().position(|b| terminators.contains(b)) {
                        line.extend_from_slice(&chunk[..=pos]);
                        if pos + 1 < n {
                            tracing::debug!(
                                dropped = n - pos - 1,
                                "discarding bytes received after line terminator"
                            );
                        }
                        break;
                    }
                    line.extend_from_slice(chunk);
                }
                Err(Error::Timeout) => break,
                Err(e) => return Err(e),
            }
        }

        Ok(line)
    }
}
