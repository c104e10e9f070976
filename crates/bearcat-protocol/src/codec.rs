//! Command framing and response decoding for the Uniden text protocol.
//!
//! A command is a line of comma-separated ASCII fields terminated by a
//! carriage return (`VOL,5\r`). Responses use the same shape, but the
//! scanner also emits bytes above `0x7F` for display glyphs (battery,
//! signal bars, lock icons), which a [`ByteMap`] turns into readable text.

use bearcat_core::error::{Error, Result};

/// Terminates every command sent to the scanner.
pub const COMMAND_TERMINATOR: u8 = b'\r';

/// Bytes accepted as the end of a response line.
pub const LINE_TERMINATORS: &[u8] = b"\r\n";

/// Separates fields within a frame.
pub const FIELD_SEPARATOR: char = ',';

/// Substituted for an extended byte that has no table entry.
pub const UNMAPPED: char = char::REPLACEMENT_CHARACTER;

/// First byte value covered by a [`ByteMap`].
const EXTENDED_BASE: u8 = 0x80;

/// Substitution table for the extended bytes a scanner emits.
///
/// Entry `i` is the replacement text for byte `0x80 + i`. The table is a
/// per-model constant; bytes past its end are unmapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteMap {
    table: &'static [&'static str],
}

impl ByteMap {
    pub const fn new(table: &'static [&'static str]) -> Self {
        ByteMap { table }
    }

    /// A map with no entries: every extended byte is unmapped.
    pub const fn empty() -> Self {
        ByteMap { table: &[] }
    }

    /// Replacement text for `byte`, or `None` when it is unmapped. ASCII
    /// bytes are never looked up.
    pub fn lookup(&self, byte: u8) -> Option<&'static str> {
        byte.checked_sub(EXTENDED_BASE)
            .and_then(|i| self.table.get(usize::from(i)))
            .copied()
    }

    /// Number of extended bytes with an entry.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Extended glyphs shared by the BC125AT and BC75XLT handhelds,
/// covering `0x80..=0xDF`.
pub static HANDHELD_GLYPHS: ByteMap = ByteMap::new(&[
    // 0x80
    "█", "↑", "↓", "Lo", "Bat", "Lo", "ck", "C", "C", "C", "C", "🄵", "🄿", "H", "O", "L",
    // 0x90
    "D", "+", "🄲", "T", "L", "L", "/", "O", " ", "A", "M", " ", "F", "N", "F", " ",
    // 0xA0
    " ", "P", "RI", " ", " ", " ", "1", "2", "3", "📶", "4", "📶", "5", "📶", " ", " ",
    // 0xB0
    " ", "[", "█", "]", " ", "C", "C", "C", "C", " ", " ", " ", " ", " ", " ", " ",
    // 0xC0
    " ", " ", " ", " ", " ", "S", "R", "C:", " ", " ", " ", " ", " ", "B", "N", "K:",
    // 0xD0
    " ", " ", " ", " ", "S", "V", "C:", "D:", "P", "R", "I", " ", " ", " ", " ", " ",
]);

/// Frame a command.
///
/// The mnemonic and every argument are uppercased, except the channel name
/// of `CIN` (field 2), which the scanner stores exactly as given. Fields
/// must be ASCII and may not contain the separator or a line terminator;
/// violations fail with [`Error::InvalidParameter`] before anything is
/// sent.
pub fn encode_command<S: AsRef<str>>(fields: &[S]) -> Result<Vec<u8>> {
    let mnemonic = fields
        .first()
        .map(|f| f.as_ref().to_ascii_uppercase())
        .ok_or_else(|| Error::InvalidParameter("empty command".into()))?;
    if mnemonic.is_empty() {
        return Err(Error::InvalidParameter("empty command mnemonic".into()));
    }

    let mut frame = Vec::with_capacity(fields.iter().map(|f| f.as_ref().len() + 1).sum());
    for (i, field) in fields.iter().enumerate() {
        let field = field.as_ref();
        if let Some(bad) = field
            .chars()
            .find(|c| !c.is_ascii() || *c == FIELD_SEPARATOR || *c == '\r' || *c == '\n')
        {
            return Err(Error::InvalidParameter(format!(
                "{mnemonic} field {i} contains {bad:?}"
            )));
        }

        if i > 0 {
            frame.push(FIELD_SEPARATOR as u8);
        }
        if is_case_preserved(&mnemonic, i) {
            frame.extend_from_slice(field.as_bytes());
        } else {
            frame.extend(field.bytes().map(|b| b.to_ascii_uppercase()));
        }
    }
    frame.push(COMMAND_TERMINATOR);

    Ok(frame)
}

fn is_case_preserved(mnemonic: &str, position: usize) -> bool {
    mnemonic == "CIN" && position == 2
}

/// Decode a raw response into text.
///
/// Every byte below `0x80` passes through; every other byte is replaced
/// once by its table entry, scanning the original bytes left to right.
/// Leading and trailing line terminators are dropped, interior whitespace
/// is kept.
pub fn decode_response(bytes: &[u8], map: &ByteMap) -> String {
    let mut text = String::with_capacity(bytes.len());
    for &b in bytes {
        if b.is_ascii() {
            text.push(char::from(b));
        } else if let Some(glyph) = map.lookup(b) {
            text.push_str(glyph);
        } else {
            tracing::warn!(byte = b, "unmapped extended byte in response");
            text.push(UNMAPPED);
        }
    }

    text.trim_matches(|c| c == '\r' || c == '\n').to_string()
}

/// Split decoded response text into fields.
pub fn split_fields(text: &str) -> Vec<String> {
    text.split(FIELD_SEPARATOR).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_uppercases_and_terminates() {
        assert_eq!(encode_command(&["vol", "5"]).unwrap(), b"VOL,5\r");
        assert_eq!(encode_command(&["jpm", "scn_mode"]).unwrap(), b"JPM,SCN_MODE\r");
        assert_eq!(encode_command(&["MDL"]).unwrap(), b"MDL\r");
    }

    #[test]
    fn encode_preserves_channel_name_case() {
        let frame = encode_command(&["cin", "12", "Fire Dispatch", "15410", "nfm"]).unwrap();
        assert_eq!(frame, b"CIN,12,Fire Dispatch,15410,NFM\r");
    }

    #[test]
    fn encode_uppercases_position_two_of_other_commands() {
        assert_eq!(encode_command(&["key", "h", "p"]).unwrap(), b"KEY,H,P\r");
    }

    #[test]
    fn encode_keeps_empty_fields() {
        assert_eq!(encode_command(&["QSH", "", "x"]).unwrap(), b"QSH,,X\r");
    }

    #[test]
    fn encode_rejects_bad_fields() {
        assert!(matches!(
            encode_command(&["CIN", "1", "a,b"]),
            Err(Error::InvalidParameter(_))
        ));
        assert!(encode_command(&["VOL\r"]).is_err());
        assert!(encode_command(&["CIN", "1", "Café"]).is_err());
        let empty: [&str; 0] = [];
        assert!(encode_command(&empty).is_err());
        assert!(encode_command(&[""]).is_err());
    }

    #[test]
    fn table_covers_0x80_to_0xdf() {
        assert_eq!(HANDHELD_GLYPHS.len(), 0x60);
        assert_eq!(HANDHELD_GLYPHS.lookup(0x80), Some("█"));
        assert_eq!(HANDHELD_GLYPHS.lookup(0x84), Some("Bat"));
        assert_eq!(HANDHELD_GLYPHS.lookup(0xA2), Some("RI"));
        assert_eq!(HANDHELD_GLYPHS.lookup(0xCF), Some("K:"));
        assert_eq!(HANDHELD_GLYPHS.lookup(0xDF), Some(" "));
        assert_eq!(HANDHELD_GLYPHS.lookup(0xE0), None);
        assert_eq!(HANDHELD_GLYPHS.lookup(b'A'), None);
    }

    #[test]
    fn decode_passes_ascii_and_trims_terminators() {
        assert_eq!(decode_response(b"VOL,5\r", &HANDHELD_GLYPHS), "VOL,5");
        assert_eq!(decode_response(b"\nVOL,5\r\n", &HANDHELD_GLYPHS), "VOL,5");
        assert_eq!(decode_response(b"STS,0, SCAN  ,\r", &HANDHELD_GLYPHS), "STS,0, SCAN  ,");
    }

    #[test]
    fn decode_substitutes_each_byte_once() {
        // 0x83 0x86 spells "Lock"; the substituted "L" must not be looked up again.
        let bytes = [b'S', b'T', b'S', b',', 0x83, 0x86, 0x84];
        assert_eq!(decode_response(&bytes, &HANDHELD_GLYPHS), "STS,LockBat");
    }

    #[test]
    fn decode_marks_unmapped_bytes() {
        assert_eq!(decode_response(&[b'A', 0xF0, b'B'], &HANDHELD_GLYPHS), "A\u{FFFD}B");
        assert_eq!(decode_response(&[0x80], &ByteMap::empty()), "\u{FFFD}");
    }

    #[test]
    fn split_keeps_empty_fields() {
        assert_eq!(split_fields("GLG,,,,"), ["GLG", "", "", "", ""]);
        assert_eq!(split_fields("ERR"), ["ERR"]);
        assert_eq!(split_fields(""), [""]);
    }

    fn printable_or_mapped() -> impl Strategy<Value = u8> {
        prop_oneof![0x20u8..=0x7E, 0x80u8..=0xDF]
    }

    proptest! {
        #[test]
        fn decode_is_per_byte_substitution(bytes in proptest::collection::vec(printable_or_mapped(), 0..64)) {
            let expected: String = bytes
                .iter()
                .map(|&b| match HANDHELD_GLYPHS.lookup(b) {
                    Some(glyph) => glyph.to_string(),
                    None => char::from(b).to_string(),
                })
                .collect();
            prop_assert_eq!(decode_response(&bytes, &HANDHELD_GLYPHS), expected);
        }

        #[test]
        fn decoded_ascii_text_is_a_fixed_point(bytes in proptest::collection::vec(printable_or_mapped(), 0..64)) {
            let once = decode_response(&bytes, &HANDHELD_GLYPHS);
            if once.is_ascii() {
                prop_assert_eq!(decode_response(once.as_bytes(), &HANDHELD_GLYPHS), once);
            }
        }

        #[test]
        fn encoded_frame_splits_back_to_fields(fields in proptest::collection::vec("[A-Z0-9 ._-]{0,8}", 1..8)) {
            prop_assume!(!fields[0].is_empty());
            let frame = encode_command(&fields).unwrap();
            let text = decode_response(&frame, &HANDHELD_GLYPHS);
            prop_assert_eq!(split_fields(&text), fields);
        }
    }
}
