//! Mock transport for deterministic testing of the command engine.
//!
//! [`MockTransport`] implements the [`Transport`] trait either from an
//! ordered queue of request/response pairs or from a responder closure
//! that plays the scanner. Everything written is recorded in a
//! [`SentLog`] that stays readable after the mock has been boxed and
//! handed to an engine.
//!
//! # Example
//!
//! ```
//! use bearcat_test_harness::MockTransport;
//!
//! let mut mock = MockTransport::new();
//! // When the engine sends this request, return this response.
//! mock.expect(b"VOL\r", b"VOL,5\r");
//! let sent = mock.sent_log();
//! assert!(sent.is_empty());
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bearcat_core::error::{Error, Result};
use bearcat_core::transport::Transport;

type Responder = Box<dyn FnMut(&[u8]) -> Vec<u8> + Send + Sync>;

/// A pre-loaded request/response pair for the mock transport.
#[derive(Debug, Clone)]
struct Expectation {
    /// The exact bytes we expect to be sent.
    request: Vec<u8>,
    /// The bytes to return when the matching request is received.
    response: Vec<u8>,
}

/// Shared record of every `send()` made through a [`MockTransport`].
#[derive(Debug, Clone, Default)]
pub struct SentLog(Arc<Mutex<Vec<Vec<u8>>>>);

impl SentLog {
    fn push(&self, data: &[u8]) {
        if let Ok(mut log) = self.0.lock() {
            log.push(data.to_vec());
        }
    }

    /// All frames sent so far, oldest first.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.0.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Sent frames as lossy UTF-8 strings, for readable assertions.
    pub fn lines(&self) -> Vec<String> {
        self.frames()
            .iter()
            .map(|f| String::from_utf8_lossy(f).into_owned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.lock().map(|log| log.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A mock [`Transport`] for testing protocol engines without hardware.
///
/// In scripted mode, expectations are consumed in order: `send()` must
/// match the next request exactly, and the paired response is handed out
/// by the following `receive()` calls. In responder mode every request is
/// answered by the closure instead.
///
/// A half-duplex scanner cannot take a new command before it has answered
/// the last one, so a `send()` while a response is still unread fails
/// with [`Error::Transport`]. That makes interleaved frames visible in
/// tests.
pub struct MockTransport {
    /// Ordered queue of expected request/response pairs.
    expectations: VecDeque<Expectation>,
    /// Answers every request when set, instead of `expectations`.
    responder: Option<Responder>,
    /// The response data pending for the next `receive()` call.
    pending_response: Option<Vec<u8>>,
    /// Cursor into the pending response (how many bytes have been read so far).
    response_cursor: usize,
    /// Delay applied before each `receive()` returns data.
    latency: Duration,
    /// Whether the transport is "connected".
    connected: bool,
    /// Log of all bytes sent through this transport.
    sent_log: SentLog,
}

impl MockTransport {
    /// Create a new mock transport in the connected state.
    pub fn new() -> Self {
        MockTransport {
            expectations: VecDeque::new(),
            responder: None,
            pending_response: None,
            response_cursor: 0,
            latency: Duration::ZERO,
            connected: true,
            sent_log: SentLog::default(),
        }
    }

    /// Create a mock whose every request is answered by `responder`.
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: FnMut(&[u8]) -> Vec<u8> + Send + Sync + 'static,
    {
        let mut mock = Self::new();
        mock.responder = Some(Box::new(responder));
        mock
    }

    /// Add an expected request/response pair.
    ///
    /// When `send()` is called with data matching `request`, the subsequent
    /// `receive()` call will return `response`. An empty response behaves
    /// like a scanner that never answers.
    pub fn expect(&mut self, request: &[u8], response: &[u8]) {
        self.expectations.push_back(Expectation {
            request: request.to_vec(),
            response: response.to_vec(),
        });
    }

    /// Delay every `receive()` by `latency`, to widen race windows in
    /// concurrency tests.
    pub fn set_latency(&mut self, latency: Duration) {
        self.latency = latency;
    }

    /// Handle to the log of sent frames.
    pub fn sent_log(&self) -> SentLog {
        self.sent_log.clone()
    }

    /// Return the number of expectations that have not yet been consumed.
    pub fn remaining_expectations(&self) -> usize {
        self.expectations.len()
    }

    /// Set the connected state of the mock transport.
    ///
    /// When set to `false`, subsequent `send()` and `receive()` calls will
    /// return [`Error::NotConnected`].
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    fn next_response(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        if let Some(responder) = self.responder.as_mut() {
            return Ok(responder(data));
        }

        let expectation = self
            .expectations
            .pop_front()
            .ok_or_else(|| Error::Transport("no more expectations in mock transport".into()))?;
        if data != expectation.request.as_slice() {
            return Err(Error::Transport(format!(
                "unexpected send data: expected {:?}, got {:?}",
                String::from_utf8_lossy(&expectation.request),
                String::from_utf8_lossy(data)
            )));
        }
        Ok(expectation.response)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        self.sent_log.push(data);

        if let Some(pending) = &self.pending_response {
            if self.response_cursor < pending.len() {
                return Err(Error::Transport(format!(
                    "interleaved send: {:?} written before the previous response was read",
                    String::from_utf8_lossy(data)
                )));
            }
        }

        let response = self.next_response(data)?;
        self.pending_response = Some(response);
        self.response_cursor = 0;
        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if let Some(ref response) = self.pending_response {
            let remaining = &response[self.response_cursor..];
            if remaining.is_empty() {
                self.pending_response = None;
                self.response_cursor = 0;
                return Err(Error::Timeout);
            }
            let n = remaining.len().min(buf.len());
            buf[..n].copy_from_slice(&remaining[..n]);
            self.response_cursor += n;
            if self.response_cursor >= response.len() {
                // All response bytes consumed; clear for next exchange.
                self.pending_response = None;
                self.response_cursor = 0;
            }
            Ok(n)
        } else {
            Err(Error::Timeout)
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.connected = false;
        self.pending_response = None;
        self.response_cursor = 0;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
