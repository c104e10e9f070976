//! Protocol layer for Uniden scanners.
//!
//! # Architecture
//!
//! - [`codec`] — command framing, extended-byte decoding, field splitting
//! - [`engine`] — the serialized command path, response classification,
//!   program-mode bracketing and group-flag helpers
//! - [`relay`] — TCP server sharing one engine with remote clients

pub mod codec;
pub mod engine;
pub mod relay;

pub use codec::{ByteMap, HANDHELD_GLYPHS, decode_response, encode_command, split_fields};
pub use engine::{CommandEngine, build_group, check_len, check_ok, classify_response, parse_group};
pub use relay::{RelayHandle, listen};
