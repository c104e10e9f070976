//! Emulation of the scanner's display, as reported by the status command.

use std::fmt;

use crate::error::{Error, Result};

/// Formatting marker for a highlighted (inverted) character.
pub const HIGHLIGHT_MARKER: char = '*';

const UNDERLINE_ON: &str = "\x1b[4m";
const UNDERLINE_OFF: &str = "\x1b[0m";

/// One line of the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLine {
    pub text: String,
    /// One marker per character of `text`; [`HIGHLIGHT_MARKER`] marks a
    /// highlighted character.
    pub formatting: String,
    /// Drawn in the double-height font.
    pub large: bool,
}

impl ScreenLine {
    /// Character ranges (start, end exclusive) that are highlighted.
    pub fn highlighted_runs(&self) -> Vec<(usize, usize)> {
        let mut runs = Vec::new();
        let mut start = None;
        for (i, c) in self.formatting.chars().enumerate() {
            match (c == HIGHLIGHT_MARKER, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    runs.push((s, i));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push((s, self.formatting.chars().count()));
        }
        runs
    }
}

impl fmt::Display for ScreenLine {
    /// Renders highlighted runs as ANSI underline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut marks = self.formatting.chars();
        let mut underline = false;
        for c in self.text.chars() {
            let highlighted = marks.next() == Some(HIGHLIGHT_MARKER);
            if highlighted != underline {
                f.write_str(if highlighted { UNDERLINE_ON } else { UNDERLINE_OFF })?;
                underline = highlighted;
            }
            write!(f, "{c}")?;
        }
        if underline {
            f.write_str(UNDERLINE_OFF)?;
        }
        Ok(())
    }
}

/// The full display, top line first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Screen {
    pub lines: Vec<ScreenLine>,
}

impl Screen {
    /// Build a screen from the leading fields of a status response.
    ///
    /// The first field holds one `0`/`1` flag per line (the large-font
    /// flag), so its length is the line count. It is followed by a
    /// `(text, formatting)` pair for every line. Extra trailing fields are
    /// an error; callers strip the status trailer first.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        let (flags, rest) = fields
            .split_first()
            .ok_or_else(|| Error::UnexpectedResult("empty screen".into()))?;
        let flags = flags.as_ref();

        if rest.len() != flags.len() * 2 {
            return Err(Error::UnexpectedResult(format!(
                "{} screen fields for {} lines, expected {}",
                rest.len(),
                flags.len(),
                flags.len() * 2
            )));
        }

        let lines = flags
            .chars()
            .zip(rest.chunks_exact(2))
            .map(|(flag, pair)| {
                let large = match flag {
                    '0' => false,
                    '1' => true,
                    other => {
                        return Err(Error::UnexpectedResult(format!(
                            "bad large-font flag {other:?}"
                        )));
                    }
                };
                Ok(ScreenLine {
                    text: pair[0].as_ref().to_string(),
                    formatting: pair[1].as_ref().to_string(),
                    large,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Screen { lines })
    }

    /// Line text without any formatting.
    pub fn plain_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.text.as_str())
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, formatting: &str) -> ScreenLine {
        ScreenLine {
            text: text.into(),
            formatting: formatting.into(),
            large: false,
        }
    }

    #[test]
    fn from_fields_pairs_lines() {
        let screen = Screen::from_fields(&["010", "SCAN", "    ", "146.520", "*******", "", ""]).unwrap();
        assert_eq!(screen.lines.len(), 3);
        assert!(!screen.lines[0].large);
        assert!(screen.lines[1].large);
        assert_eq!(screen.lines[1].text, "146.520");
        assert_eq!(screen.lines[1].formatting, "*******");
        assert_eq!(screen.plain_lines().collect::<Vec<_>>(), ["SCAN", "146.520", ""]);
    }

    #[test]
    fn from_fields_rejects_wrong_count() {
        let err = Screen::from_fields(&["00", "A", "", "B"]).unwrap_err();
        assert!(matches!(err, Error::UnexpectedResult(_)));
    }

    #[test]
    fn from_fields_rejects_empty() {
        let empty: [&str; 0] = [];
        assert!(Screen::from_fields(&empty).is_err());
    }

    #[test]
    fn from_fields_rejects_bad_flag() {
        assert!(Screen::from_fields(&["x", "A", " "]).is_err());
    }

    #[test]
    fn highlighted_runs() {
        assert_eq!(line("ABCDEF", "**  **").highlighted_runs(), [(0, 2), (4, 6)]);
        assert!(line("ABC", "   ").highlighted_runs().is_empty());
    }

    #[test]
    fn display_underlines_runs() {
        assert_eq!(line("ABCD", " ** ").to_string(), "A\x1b[4mBC\x1b[0mD");
        assert_eq!(line("ABCD", "  **").to_string(), "AB\x1b[4mCD\x1b[0m");
        assert_eq!(line("ABCD", "    ").to_string(), "ABCD");
    }

    #[test]
    fn display_joins_lines() {
        let screen = Screen {
            lines: vec![line("ONE", "   "), line("TWO", "   ")],
        };
        assert_eq!(screen.to_string(), "ONE\nTWO");
    }
}
