//! Mock TCP server for testing the relay client transport.
//!
//! [`MockTcpServer`] stands in for a relay: a loopback listener pre-loaded
//! with scripted responses.
//!
//! # Example
//!
//! ```
//! use bearcat_test_harness::MockTcpServer;
//!
//! # async fn example() -> bearcat_core::Result<()> {
//! let mut server = MockTcpServer::new().await?;
//!
//! // When the client sends "MDL\r", respond with "MDL,BC125AT\r"
//! server.expect(b"MDL\r", b"MDL,BC125AT\r");
//! server.start();
//!
//! // Connect a TcpTransport to server.addr() ...
//! server.wait().await.map_err(bearcat_core::Error::Transport)?;
//! # Ok(())
//! # }
//! ```

use bearcat_core::error::{Error, Result};
use std::collections::VecDeque;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A pre-loaded request/response pair for the mock TCP server.
#[derive(Debug, Clone)]
struct TcpExpectation {
    request: Vec<u8>,
    response: Vec<u8>,
}

/// A mock TCP server for testing network transports.
///
/// The listener is bound to a random loopback port by
/// [`new`](MockTcpServer::new), so clients may connect as soon as it
/// returns. Once [`start`](MockTcpServer::start) is called, it accepts a
/// single connection and processes expectations in order.
pub struct MockTcpServer {
    addr: String,
    listener: Option<TcpListener>,
    expectations: VecDeque<TcpExpectation>,
    server_handle: Option<JoinHandle<std::result::Result<(), String>>>,
}

impl MockTcpServer {
    /// Create a new mock TCP server listening on a random port.
    pub async fn new() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| Error::Transport(format!("failed to bind mock TCP server: {}", e)))?;
        let addr = listener.local_addr().map_err(Error::Io)?.to_string();

        Ok(Self {
            addr,
            listener: Some(listener),
            expectations: VecDeque::new(),
            server_handle: None,
        })
    }

    /// Add an expected request/response pair.
    pub fn expect(&mut self, request: &[u8], response: &[u8]) {
        self.expectations.push_back(TcpExpectation {
            request: request.to_vec(),
            response: response.to_vec(),
        });
    }

    /// The `host:port` the server is listening on.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Start serving the loaded expectations to the first client.
    ///
    /// Calling `start` a second time has no effect.
    pub fn start(&mut self) {
        let Some(listener) = self.listener.take() else {
            return;
        };
        let expectations: Vec<TcpExpectation> = self.expectations.drain(..).collect();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener
                .accept()
                .await
                .map_err(|e| format!("failed to accept connection: {}", e))?;

            for (i, expectation) in expectations.iter().enumerate() {
                let mut buf = vec![0u8; expectation.request.len()];
                let mut total_read = 0;

                while total_read < expectation.request.len() {
                    let n = stream
                        .read(&mut buf[total_read..])
                        .await
                        .map_err(|e| format!("expectation {}: read error: {}", i, e))?;
                    if n == 0 {
                        return Err(format!(
                            "expectation {}: client disconnected after {} bytes (expected {})",
                            i,
                            total_read,
                            expectation.request.len()
                        ));
                    }
                    total_read += n;
                }

                if buf != expectation.request {
                    return Err(format!(
                        "expectation {}: request mismatch: expected {:?}, got {:?}",
                        i,
                        String::from_utf8_lossy(&expectation.request),
                        String::from_utf8_lossy(&buf)
                    ));
                }

                stream
                    .write_all(&expectation.response)
                    .await
                    .map_err(|e| format!("expectation {}: write error: {}", i, e))?;
            }

            Ok(())
        });

        self.server_handle = Some(handle);
    }

    /// Wait for the server task to complete and return any errors.
    pub async fn wait(self) -> std::result::Result<(), String> {
        if let Some(handle) = self.server_handle {
            handle
                .await
                .map_err(|e| format!("server task panicked: {}", e))?
        } else {
            Ok(())
        }
    }
}
