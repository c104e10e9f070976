//! Formatting and conversion helpers shared by the scanner drivers and tools.

use crate::error::{Error, Result};

/// Format a frequency in hertz as a human-readable MHz string.
///
/// Returns a string like `"162.550000 MHz"` with six decimal places.
///
/// # Example
///
/// ```
/// use bearcat_core::format_freq_mhz;
///
/// assert_eq!(format_freq_mhz(162_550_000), "162.550000 MHz");
/// assert_eq!(format_freq_mhz(121_500_000), "121.500000 MHz");
/// ```
pub fn format_freq_mhz(freq_hz: u64) -> String {
    let mhz = freq_hz as f64 / 1_000_000.0;
    format!("{mhz:.6} MHz")
}

/// Parse a `0`/`1` response field.
pub fn parse_flag(field: &str) -> Result<bool> {
    match field {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(Error::UnexpectedResult(format!(
            "expected 0 or 1, got {other:?}"
        ))),
    }
}

/// Wire spelling of a boolean field.
pub fn flag_str(flag: bool) -> &'static str {
    if flag { "1" } else { "0" }
}

/// Parse an integer response field, mapping failures to
/// [`Error::UnexpectedResult`].
pub fn parse_number<T: std::str::FromStr>(field: &str) -> Result<T> {
    field
        .trim()
        .parse()
        .map_err(|_| Error::UnexpectedResult(format!("not a number: {field:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_freq_mhz_vhf_uhf() {
        assert_eq!(format_freq_mhz(144_174_000), "144.174000 MHz");
        assert_eq!(format_freq_mhz(462_562_500), "462.562500 MHz");
    }

    #[test]
    fn format_freq_mhz_zero() {
        assert_eq!(format_freq_mhz(0), "0.000000 MHz");
    }

    #[test]
    fn flags() {
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(parse_flag("").is_err());
        assert!(parse_flag("2").is_err());
        assert_eq!(flag_str(true), "1");
        assert_eq!(flag_str(false), "0");
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number::<u8>("15").unwrap(), 15);
        assert_eq!(parse_number::<i64>("-100").unwrap(), -100);
        assert!(matches!(
            parse_number::<u8>("X"),
            Err(Error::UnexpectedResult(_))
        ));
    }
}
