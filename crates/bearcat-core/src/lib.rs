//! bearcat-core: error taxonomy, transport trait and device data model.
//!
//! This crate holds what every other bearcat crate agrees on: the error
//! type, the byte-level [`Transport`] abstraction, and the model-agnostic
//! entities a scanner reports (radio state, channels, the display, tones).
//! Applications can depend on these types without pulling in a driver.
//!
//! # Key types
//!
//! - [`Transport`] -- byte-level communication channel
//! - [`Channel`] / [`RadioState`] -- stored and live tuning state
//! - [`Tone`] -- CTCSS/DCS selection and its wire code
//! - [`Screen`] -- the scanner's display
//! - [`Error`] / [`Result`] -- error handling

pub mod channel;
pub mod error;
pub mod helpers;
pub mod screen;
pub mod tone;
pub mod transport;
pub mod types;

// Re-export key types at crate root for ergonomic `use bearcat_core::*`.
pub use channel::{Channel, RadioState};
pub use error::{Error, Result};
pub use helpers::{flag_str, format_freq_mhz, parse_flag, parse_number};
pub use screen::{Screen, ScreenLine};
pub use tone::Tone;
pub use transport::Transport;
pub use types::*;
