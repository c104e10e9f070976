//! # bearcat -- Remote Control for Uniden Bearcat Scanners
//!
//! `bearcat` is an asynchronous Rust library for the remote-control
//! protocol of Uniden Bearcat handheld scanners. It reads and programs
//! channels and settings, reports what the scanner is receiving, and can
//! share one scanner between several programs through a TCP relay.
//!
//! ## Quick Start
//!
//! Add `bearcat` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! bearcat = "0.1"
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! Connect to a scanner and read its volume:
//!
//! ```no_run
//! use bearcat::uniden::{ScannerBuilder, models::bc125at};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let scanner = ScannerBuilder::new(bc125at())
//!         .address("/dev/ttyACM0")
//!         .build()
//!         .await?;
//!
//!     println!("volume: {}", scanner.get_volume().await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized as a workspace of focused crates:
//!
//! | Crate                  | Purpose                                           |
//! |------------------------|---------------------------------------------------|
//! | `bearcat-core`         | Errors, the [`Transport`] trait, channel and display types |
//! | `bearcat-transport`    | Serial and relay TCP transports, address parsing  |
//! | `bearcat-protocol`     | Codec, command engine, relay server               |
//! | `bearcat-uniden`       | Model records, command builders, typed `Scanner`  |
//! | **`bearcat`**          | This facade crate -- re-exports everything        |
//!
//! ## Sharing a scanner
//!
//! Only one process can open a serial port. [`Scanner::listen`](uniden::Scanner::listen)
//! accepts TCP clients that send raw command lines; their commands share
//! the scanner's lock with the local API, so nothing interleaves. Any
//! other process connects by passing `host:port` (or a bare IPv4 address
//! for the default port, 65125) as its address.

pub use bearcat_core::*;

/// Codec, command engine and relay.
pub mod protocol {
    pub use bearcat_protocol::*;
}

/// Serial and TCP transports.
pub mod transport {
    pub use bearcat_transport::*;
}

/// Uniden scanner backend.
///
/// Provides [`Scanner`](uniden::Scanner) and
/// [`ScannerBuilder`](uniden::ScannerBuilder) plus the model records for
/// the BC125AT and BC75XLT.
pub mod uniden {
    pub use bearcat_uniden::*;
}

/// Returns every supported scanner model.
///
/// # Example
///
/// ```
/// for model in bearcat::supported_models() {
///     println!("{} ({} channels)", model.name, model.total_channels);
/// }
/// ```
pub fn supported_models() -> Vec<uniden::ScannerModel> {
    uniden::models::all_models()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_both_handhelds() {
        let names: Vec<_> = supported_models().iter().map(|m| m.name).collect();
        assert_eq!(names, ["BC125AT", "BC75XLT"]);
    }
}
