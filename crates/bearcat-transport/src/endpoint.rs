//! Scanner address parsing and transport selection.
//!
//! One address string names either a local serial device or a relay:
//!
//! - `host:port` connects to a relay at that port
//! - a bare dotted-quad IPv4 address connects to a relay on
//!   [`DEFAULT_RELAY_PORT`]
//! - anything else is taken as a serial device path

use std::fmt;
use std::net::Ipv4Addr;

use bearcat_core::error::Result;
use bearcat_core::transport::{DEFAULT_RELAY_PORT, Transport};

use crate::serial::SerialTransport;
use crate::tcp::TcpTransport;

/// Where a scanner can be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Local serial device, e.g. `/dev/ttyACM0` or `COM3`.
    Serial { path: String },
    /// TCP relay that owns the serial port.
    Relay { host: String, port: u16 },
}

impl Endpoint {
    /// Classify an address string.
    pub fn parse(address: &str) -> Self {
        let address = address.trim();

        if address.parse::<Ipv4Addr>().is_ok() {
            return Endpoint::Relay {
                host: address.to_string(),
                port: DEFAULT_RELAY_PORT,
            };
        }

        if let Some((host, port)) = address.rsplit_once(':') {
            let looks_like_host = !host.is_empty() && !host.contains(['/', '\\']);
            if let (true, Ok(port)) = (looks_like_host, port.parse::<u16>()) {
                return Endpoint::Relay {
                    host: host.trim_matches(['[', ']']).to_string(),
                    port,
                };
            }
        }

        Endpoint::Serial {
            path: address.to_string(),
        }
    }

    pub fn is_relay(&self) -> bool {
        matches!(self, Endpoint::Relay { .. })
    }

    /// Open the transport for this endpoint. `baud_rate` is ignored for
    /// relays, whose far end already has the port open.
    pub async fn connect(&self, baud_rate: u32) -> Result<Box<dyn Transport>> {
        match self {
            Endpoint::Serial { path } => Ok(Box::new(SerialTransport::open(path, baud_rate).await?)),
            Endpoint::Relay { .. } => Ok(Box::new(TcpTransport::connect(&self.to_string()).await?)),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Serial { path } => f.write_str(path),
            Endpoint::Relay { host, port } if host.contains(':') => write!(f, "[{host}]:{port}"),
            Endpoint::Relay { host, port } => write!(f, "{host}:{port}"),
        }
    }
}
