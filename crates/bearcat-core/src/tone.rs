//! Sub-audible tone selection and its compact wire code.
//!
//! Scanners transmit the tone of a channel as a single integer: a few
//! symbolic codes, `64..=113` for the 50 CTCSS frequencies, and
//! `128..=231` for the 104 DCS codes. [`Tone::code`] and
//! [`Tone::from_code`] are inverses over every valid value.

use std::fmt;
use std::str::FromStr;

use crate::types::ParseValueError;

/// First code of the CTCSS block.
pub const CTCSS_BASE_CODE: u8 = 64;
/// First code of the DCS block.
pub const DCS_BASE_CODE: u8 = 128;

/// CTCSS frequencies in tenths of a hertz, in code order.
pub const CTCSS_DECIHERTZ: [u16; 50] = [
    670, 693, 719, 744, 770, 797, 825, 854, 885, 915, 948, 974, 1000, 1035, 1072, 1109, 1148, 1188,
    1230, 1273, 1318, 1365, 1413, 1462, 1514, 1567, 1598, 1622, 1655, 1679, 1713, 1738, 1773, 1799,
    1835, 1862, 1899, 1928, 1966, 1995, 2035, 2065, 2107, 2181, 2257, 2291, 2336, 2418, 2503, 2541,
];

/// DCS codes (as their conventional octal digits read in decimal), in code order.
pub const DCS_CODES: [u16; 104] = [
    23, 25, 26, 31, 32, 36, 43, 47, 51, 53, 54, 65, 71, 72, 73, 74, 114, 115, 116, 122, 125, 131,
    132, 134, 143, 145, 152, 155, 156, 162, 165, 172, 174, 205, 212, 223, 225, 226, 243, 244, 245,
    246, 251, 252, 255, 261, 263, 265, 266, 271, 274, 306, 311, 315, 325, 331, 332, 343, 346, 351,
    356, 364, 365, 371, 411, 412, 413, 423, 431, 432, 445, 446, 452, 454, 455, 462, 464, 465, 466,
    503, 506, 516, 523, 526, 532, 546, 565, 606, 612, 624, 627, 631, 632, 654, 662, 664, 703, 712,
    723, 731, 732, 734, 743, 754,
];

const NONE_CODE: u8 = 0;
const SEARCH_CODE: u8 = 127;
const NO_TONE_CODE: u8 = 240;

/// Tone squelch setting of a channel.
///
/// Construct CTCSS and DCS values through [`Tone::ctcss`] and
/// [`Tone::dcs`] so that only frequencies and codes present in the table
/// are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    /// No tone squelch; the channel opens on any carrier. `ALL` on the
    /// scanner's own display is the same setting.
    #[default]
    None,
    /// Search for the tone in use.
    Search,
    /// Open only for carriers without a tone.
    NoTone,
    /// CTCSS tone, in tenths of a hertz (`670` is 67.0 Hz).
    Ctcss(u16),
    /// DCS code.
    Dcs(u16),
}

impl Tone {
    /// CTCSS tone at `decihertz` tenths of a hertz, if the scanner supports it.
    pub fn ctcss(decihertz: u16) -> Option<Self> {
        CTCSS_DECIHERTZ
            .contains(&decihertz)
            .then_some(Tone::Ctcss(decihertz))
    }

    /// DCS tone with the given code, if the scanner supports it.
    pub fn dcs(code: u16) -> Option<Self> {
        DCS_CODES.contains(&code).then_some(Tone::Dcs(code))
    }

    /// Wire code for this tone.
    ///
    /// Returns `None` for a `Ctcss` or `Dcs` value built by hand that is not
    /// in the table.
    pub fn code(&self) -> Option<u8> {
        match *self {
            Tone::None => Some(NONE_CODE),
            Tone::Search => Some(SEARCH_CODE),
            Tone::NoTone => Some(NO_TONE_CODE),
            Tone::Ctcss(dhz) => CTCSS_DECIHERTZ
                .iter()
                .position(|&t| t == dhz)
                .map(|i| CTCSS_BASE_CODE + i as u8),
            Tone::Dcs(dcs) => DCS_CODES
                .iter()
                .position(|&t| t == dcs)
                .map(|i| DCS_BASE_CODE + i as u8),
        }
    }

    /// Tone for a wire code, or `None` if the code is not assigned.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            NONE_CODE => Some(Tone::None),
            SEARCH_CODE => Some(Tone::Search),
            NO_TONE_CODE => Some(Tone::NoTone),
            c if c >= CTCSS_BASE_CODE && usize::from(c - CTCSS_BASE_CODE) < CTCSS_DECIHERTZ.len() => {
                Some(Tone::Ctcss(CTCSS_DECIHERTZ[usize::from(c - CTCSS_BASE_CODE)]))
            }
            c if c >= DCS_BASE_CODE && usize::from(c - DCS_BASE_CODE) < DCS_CODES.len() => {
                Some(Tone::Dcs(DCS_CODES[usize::from(c - DCS_BASE_CODE)]))
            }
            _ => None,
        }
    }

    /// Every assigned tone, in code order.
    pub fn all() -> impl Iterator<Item = Tone> {
        [Tone::None, Tone::Search, Tone::NoTone]
            .into_iter()
            .chain(CTCSS_DECIHERTZ.iter().map(|&d| Tone::Ctcss(d)))
            .chain(DCS_CODES.iter().map(|&d| Tone::Dcs(d)))
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::None => f.write_str("NONE"),
            Tone::Search => f.write_str("SEARCH"),
            Tone::NoTone => f.write_str("NO_TONE"),
            Tone::Ctcss(dhz) => write!(f, "{}.{}", dhz / 10, dhz % 10),
            Tone::Dcs(code) => write!(f, "D{code:03}"),
        }
    }
}

impl FromStr for Tone {
    type Err = ParseValueError;

    /// Accepts the symbolic names (`NONE`, `ALL`, `SEARCH`, `NO_TONE`), a
    /// CTCSS frequency with a decimal point (`"100.0"`), or a DCS code with
    /// or without a `D` prefix (`"D023"`, `"23"`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || ParseValueError::new("tone", s);
        let upper = s.trim().to_uppercase();

        match upper.as_str() {
            "NONE" | "ALL" => return Ok(Tone::None),
            "SEARCH" => return Ok(Tone::Search),
            "NO_TONE" => return Ok(Tone::NoTone),
            _ => {}
        }

        if let Some((whole, frac)) = upper.split_once('.') {
            let whole: u16 = whole.parse().map_err(|_| err())?;
            let frac: u16 = match frac.len() {
                0 => 0,
                1 => frac.parse().map_err(|_| err())?,
                _ => return Err(err()),
            };
            return whole
                .checked_mul(10)
                .and_then(|d| d.checked_add(frac))
                .and_then(Tone::ctcss)
                .ok_or_else(err);
        }

        let digits = upper.strip_prefix('D').unwrap_or(&upper);
        let code: u16 = digits.parse().map_err(|_| err())?;
        Tone::dcs(code).ok_or_else(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_table_is_a_bijection() {
        let mut seen = std::collections::HashSet::new();
        for tone in Tone::all() {
            let code = tone.code().unwrap();
            assert!(seen.insert(code), "duplicate code {code}");
            assert_eq!(Tone::from_code(code), Some(tone));
        }
        for code in 0..=u8::MAX {
            if let Some(tone) = Tone::from_code(code) {
                assert_eq!(tone.code(), Some(code));
            }
        }
        assert_eq!(seen.len(), 3 + 50 + 104);
    }

    #[test]
    fn symbolic_codes() {
        assert_eq!(Tone::None.code(), Some(0));
        assert_eq!(Tone::Search.code(), Some(127));
        assert_eq!(Tone::NoTone.code(), Some(240));
    }

    #[test]
    fn ctcss_block_boundaries() {
        assert_eq!(Tone::from_code(64), Some(Tone::Ctcss(670)));
        assert_eq!(Tone::from_code(76), Some(Tone::Ctcss(1000)));
        assert_eq!(Tone::from_code(113), Some(Tone::Ctcss(2541)));
        assert_eq!(Tone::from_code(114), None);
        assert_eq!(Tone::from_code(63), None);
    }

    #[test]
    fn dcs_block_boundaries() {
        assert_eq!(Tone::from_code(128), Some(Tone::Dcs(23)));
        assert_eq!(Tone::from_code(231), Some(Tone::Dcs(754)));
        assert_eq!(Tone::from_code(232), None);
        assert_eq!(Tone::from_code(126), None);
    }

    #[test]
    fn unlisted_values_have_no_code() {
        assert_eq!(Tone::Ctcss(1234).code(), None);
        assert_eq!(Tone::Dcs(24).code(), None);
        assert_eq!(Tone::ctcss(1234), None);
        assert_eq!(Tone::dcs(24), None);
    }

    #[test]
    fn parse_symbolic_names() {
        assert_eq!("NONE".parse::<Tone>().unwrap(), Tone::None);
        assert_eq!("all".parse::<Tone>().unwrap(), Tone::None);
        assert_eq!("SEARCH".parse::<Tone>().unwrap(), Tone::Search);
        assert_eq!("no_tone".parse::<Tone>().unwrap(), Tone::NoTone);
    }

    #[test]
    fn parse_ctcss_and_dcs() {
        assert_eq!("67.0".parse::<Tone>().unwrap(), Tone::Ctcss(670));
        assert_eq!("254.1".parse::<Tone>().unwrap(), Tone::Ctcss(2541));
        assert_eq!("100.".parse::<Tone>().unwrap(), Tone::Ctcss(1000));
        assert_eq!("D023".parse::<Tone>().unwrap(), Tone::Dcs(23));
        assert_eq!("754".parse::<Tone>().unwrap(), Tone::Dcs(754));
        assert!("67.05".parse::<Tone>().is_err());
        assert!("68.0".parse::<Tone>().is_err());
        assert!("D999".parse::<Tone>().is_err());
        assert!("".parse::<Tone>().is_err());
    }

    #[test]
    fn display_parses_back() {
        for tone in Tone::all() {
            assert_eq!(tone.to_string().parse::<Tone>().unwrap(), tone);
        }
        assert_eq!(Tone::Ctcss(719).to_string(), "71.9");
        assert_eq!(Tone::Dcs(23).to_string(), "D023");
    }
}
