use anyhow::{ensure, Result};
use clap::builder::PossibleValue;
use enum_dispatch::enum_dispatch;
use std::{fmt::Display, str::FromStr};

/// A subcommand of the tool.
#[enum_dispatch]
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self) -> Result<()>;
}

/// An enum that can be given on the command line by the name it displays as.
pub trait ValueEnum: Display + FromStr {
    fn variants<'a>() -> &'a [Self];

    fn possible_values() -> Vec<PossibleValue> {
        Self::variants()
            .iter()
            .map(|variant| PossibleValue::new(variant.to_string()))
            .collect()
    }
}

/// Parses the gap symbol for rendered alignments: a single printable ASCII character that is
/// not a letter, since letters are sequence symbols.
pub fn parse_gap_char(value: &str) -> Result<u8> {
    let bytes = value.as_bytes();
    ensure!(
        bytes.len() == 1 && bytes[0].is_ascii_graphic(),
        "expected a single printable ASCII character, found '{value}'"
    );
    ensure!(
        !bytes[0].is_ascii_alphabetic(),
        "the gap character must not be a letter, found '{value}'"
    );
    Ok(bytes[0])
}

#[cfg(test)]
mod tests {
    use super::parse_gap_char;

    #[test]
    fn test_parse_gap_char() {
        assert_eq!(parse_gap_char("-").unwrap(), b'-');
        assert_eq!(parse_gap_char(".").unwrap(), b'.');
        assert_eq!(parse_gap_char("_").unwrap(), b'_');
        assert_eq!(parse_gap_char("0").unwrap(), b'0');
        assert!(parse_gap_char("").is_err());
        assert!(parse_gap_char("--").is_err());
        assert!(parse_gap_char(" ").is_err());
        assert!(parse_gap_char("é").is_err());
    }

    #[test]
    fn test_letters_are_not_gap_chars() {
        for value in ["A", "n", "Z"] {
            let err = parse_gap_char(value).unwrap_err();
            assert!(err.to_string().contains("must not be a letter"));
        }
    }
}
