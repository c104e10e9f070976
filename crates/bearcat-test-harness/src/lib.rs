//! bearcat-test-harness: mock transports for testing bearcat.
//!
//! [`MockTransport`] drives the command engine deterministically without a
//! scanner attached, and [`MockTcpServer`] stands in for a relay when
//! testing the TCP transport.

pub mod mock_serial;
pub mod mock_tcp;

pub use mock_serial::{MockTransport, SentLog};
pub use mock_tcp::MockTcpServer;
