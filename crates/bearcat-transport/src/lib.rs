//! Transport implementations for bearcat.
//!
//! This crate provides concrete implementations of the
//! [`Transport`](bearcat_core::Transport) trait from `bearcat-core`:
//!
//! - [`SerialTransport`]: the scanner's USB virtual COM port
//! - [`TcpTransport`]: a TCP connection to a relay sharing someone
//!   else's serial port
//!
//! [`Endpoint`] picks between them from a single address string.
//!
//! # Example
//!
//! ```no_run
//! use bearcat_core::transport::Transport;
//! use bearcat_transport::Endpoint;
//! use std::time::Duration;
//!
//! # async fn example() -> bearcat_core::Result<()> {
//! let mut transport = Endpoint::parse("/dev/ttyACM0").connect(115200).await?;
//!
//! transport.send(b"MDL\r").await?;
//! let line = transport.read_until(b"\r", Duration::from_millis(100)).await?;
//! # Ok(())
//! # }
//! ```

pub mod endpoint;
pub mod serial;
pub mod tcp;

pub use bearcat_core::transport::DEFAULT_RELAY_PORT;
pub use endpoint::Endpoint;
pub use serial::SerialTransport;
pub use tcp::TcpTransport;
