//! Uniden Bearcat scanner backend for bearcat.
//!
//! This crate turns the comma-separated Uniden remote-control protocol into
//! a typed API. It provides:
//!
//! - **Model definitions** ([`models`]) -- capability records for the
//!   supported scanners (BC125AT, BC75XLT): limits, keypad, glyph table and
//!   the layout variants each model uses on the wire.
//! - **Command builders** ([`commands`]) -- pure functions that build the
//!   argument fields of each command and parse the scanner's replies, one
//!   branch per layout variant.
//! - **Settings** ([`settings`]) -- typed program-mode settings (backlight,
//!   priority, Close Call, search options, key beep, test modes).
//! - **Scanner** ([`scanner`]) -- the typed API over a shared
//!   [`CommandEngine`](bearcat_protocol::CommandEngine), including program
//!   mode bracketing and the TCP relay.
//! - **Builder** ([`builder`]) -- fluent builder for constructing
//!   [`Scanner`] instances with model-derived defaults.
//!
//! # BC125AT vs BC75XLT
//!
//! Both speak the same protocol, but the BC75XLT:
//! - stores no channel name, modulation or tone (those `CIN` fields are blank)
//! - encodes delays as `0`/`1` (0 s / 2 s) instead of seconds
//! - has no `DCH` or `JNT`; channels are cleared by overwriting and selected
//!   from the keypad
//! - reports `GLG` frequencies in decimal MHz and ends `STS` with two fields
//!
//! # Example
//!
//! ```
//! use bearcat_uniden::commands::{channel_fields, parse_channel};
//! use bearcat_uniden::models::bc125at;
//! use bearcat_core::Channel;
//!
//! let model = bc125at();
//! let channel = Channel::new(1, 162_550_000).with_name("NOAA");
//! let fields = channel_fields(&channel, &model).unwrap();
//! assert_eq!(fields[2], "1625500");
//! assert_eq!(parse_channel(&fields, &model).unwrap(), channel);
//! ```

pub mod builder;
pub mod commands;
pub mod models;
pub mod scanner;
pub mod settings;

// Re-export the primary types for ergonomic `use bearcat_uniden::*`.
pub use builder::ScannerBuilder;
pub use models::ScannerModel;
pub use scanner::Scanner;
