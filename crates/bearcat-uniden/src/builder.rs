//! ScannerBuilder -- fluent builder for constructing [`Scanner`] instances.
//!
//! Separates configuration from construction so that callers can pick the
//! address, baud rate and response timeout before the transport is opened.
//!
//! # Example
//!
//! ```no_run
//! use bearcat_uniden::builder::ScannerBuilder;
//! use bearcat_uniden::models::bc125at;
//!
//! # async fn example() -> bearcat_core::Result<()> {
//! let scanner = ScannerBuilder::new(bc125at())
//!     .address("/dev/ttyACM0")
//!     .build()
//!     .await?;
//! println!("volume {}", scanner.get_volume().await?);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use tracing::info;

use bearcat_core::error::{Error, Result};
use bearcat_core::transport::Transport;
use bearcat_protocol::engine::DEFAULT_RESPONSE_TIMEOUT;
use bearcat_transport::Endpoint;

use crate::models::ScannerModel;
use crate::scanner::Scanner;

/// Response timeout used when the scanner sits behind a relay.
pub const RELAY_RESPONSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Fluent builder for [`Scanner`].
///
/// Defaults come from the [`ScannerModel`], so the simplest usage is:
///
/// ```ignore
/// let scanner = ScannerBuilder::new(bc75xlt())
///     .address("192.168.1.20")
///     .build()
///     .await?;
/// ```
pub struct ScannerBuilder {
    model: ScannerModel,
    address: Option<String>,
    baud_rate: Option<u32>,
    response_timeout: Option<Duration>,
}

impl ScannerBuilder {
    pub fn new(model: ScannerModel) -> Self {
        ScannerBuilder {
            model,
            address: None,
            baud_rate: None,
            response_timeout: None,
        }
    }

    /// Where the scanner is: a serial device path (`/dev/ttyACM0`,
    /// `COM3`), a relay `host:port`, or a bare IPv4 address for a relay
    /// on the default port.
    pub fn address(mut self, address: &str) -> Self {
        self.address = Some(address.to_string());
        self
    }

    /// Override the model's default baud rate. Ignored for relays.
    pub fn baud_rate(mut self, baud: u32) -> Self {
        self.baud_rate = Some(baud);
        self
    }

    /// How long to wait for each response line (default: 100 ms on a
    /// serial port, 1 s through a relay).
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = Some(timeout);
        self
    }

    fn checked_baud_rate(&self) -> Result<u32> {
        let baud = self.baud_rate.unwrap_or(self.model.default_baud_rate);
        if !self.model.supports_baud_rate(baud) {
            return Err(Error::InvalidParameter(format!(
                "{} does not support {baud} baud (supported: {:?})",
                self.model.name, self.model.baud_rates
            )));
        }
        Ok(baud)
    }

    /// Build a [`Scanner`] with a caller-provided transport.
    ///
    /// This is the entry point for tests (pass a `MockTransport` from
    /// `bearcat-test-harness`) and for callers that manage the transport
    /// themselves.
    pub async fn build_with_transport(self, transport: Box<dyn Transport>) -> Result<Scanner> {
        self.checked_baud_rate()?;
        let timeout = self.response_timeout.unwrap_or(DEFAULT_RESPONSE_TIMEOUT);
        Ok(Scanner::new(transport, self.model, timeout))
    }

    /// Open the transport named by [`address()`](Self::address) and build
    /// a [`Scanner`] on it.
    pub async fn build(self) -> Result<Scanner> {
        let address = self
            .address
            .as_deref()
            .ok_or_else(|| Error::InvalidParameter("address is required for build()".into()))?;
        let baud = self.checked_baud_rate()?;
        let endpoint = Endpoint::parse(address);

        let timeout = self.response_timeout.unwrap_or(if endpoint.is_relay() {
            RELAY_RESPONSE_TIMEOUT
        } else {
            DEFAULT_RESPONSE_TIMEOUT
        });

        let transport = endpoint.connect(baud).await?;
        info!(model = self.model.name, %endpoint, "connected");
        Ok(Scanner::new(transport, self.model, timeout))
    }
}
