//! Channel - Text input and output shared by every piston
//!
//! ## Input
//!
//! A consumable character sequence. Exhaustion is not an error: both grab
//! operations yield 0 when nothing is left, so a literal `0` digit and an
//! empty input look the same to a program.
//!
//! ## Output
//!
//! An append-only text buffer plus the last value written.

use super::register::MAX_INTEGER;
use std::fmt;

/// An item written to the output buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputItem {
    /// Appended as its decimal form
    Number(i64),
    /// Appended verbatim
    Text(String),
}

impl OutputItem {
    /// Numeric value recorded as `last_output`.
    ///
    /// Text whose second character is `x` is read as a hexadecimal literal
    /// reduced `mod MAX_INTEGER`; any other text yields the code point of its first character.
    pub fn value(&self) -> i64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(text) => {
                let mut chars = text.chars();
                let first = chars.next();
                if chars.next() == Some('x') {
                    parse_hex_prefix(text)
                } else {
                    first.map(|c| c as i64).unwrap_or(0)
                }
            }
        }
    }
}

impl fmt::Display for OutputItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for OutputItem {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<u32> for OutputItem {
    fn from(n: u32) -> Self {
        Self::Number(n as i64)
    }
}

impl From<&str> for OutputItem {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for OutputItem {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<char> for OutputItem {
    fn from(c: char) -> Self {
        Self::Text(c.to_string())
    }
}

/// Lenient hex parse: optional `0x` prefix, then as many hex digits as
/// present. No digits parses as 0. The result is reduced `mod MAX_INTEGER`
/// like number input, so it is never negative.
fn parse_hex_prefix(text: &str) -> i64 {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    digits
        .chars()
        .map_while(|c| c.to_digit(16))
        .fold(0i64, |acc, d| (acc * 16 + d as i64) % MAX_INTEGER as i64)
}

/// Input/output channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    input: String,
    output: String,
    last_output: i64,
}

impl Channel {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: String::new(),
            last_output: 0,
        }
    }

    /// Remaining unread input
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn last_output(&self) -> i64 {
        self.last_output
    }

    /// Consume the leading run of decimal digits and return it
    /// `mod MAX_INTEGER`. An empty run returns 0 and consumes nothing.
    pub fn grab_input_number(&mut self) -> u32 {
        let len = self
            .input
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.input.len());
        let value = self.input[..len]
            .bytes()
            .fold(0u64, |acc, b| (acc * 10 + (b - b'0') as u64) % MAX_INTEGER as u64);
        self.input.replace_range(..len, "");
        value as u32
    }

    /// Consume one character and return its code point, 0 if exhausted
    pub fn grab_input_char(&mut self) -> u32 {
        match self.input.chars().next() {
            Some(c) => {
                self.input.replace_range(..c.len_utf8(), "");
                c as u32
            }
            None => 0,
        }
    }

    /// Append an item to the output and record its value as `last_output`
    pub fn write_output(&mut self, item: impl Into<OutputItem>) {
        let item = item.into();
        self.last_output = item.value();
        match item {
            OutputItem::Number(n) => self.output.push_str(&n.to_string()),
            OutputItem::Text(text) => self.output.push_str(&text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grab_number_stops_at_non_digit() {
        let mut ch = Channel::new("123abc");
        assert_eq!(ch.grab_input_number(), 123);
        assert_eq!(ch.input(), "abc");
    }

    #[test]
    fn test_grab_number_empty() {
        let mut ch = Channel::new("");
        assert_eq!(ch.grab_input_number(), 0);
        assert_eq!(ch.input(), "");

        let mut ch = Channel::new("x1");
        assert_eq!(ch.grab_input_number(), 0);
        assert_eq!(ch.input(), "x1");
    }

    #[test]
    fn test_grab_number_wraps() {
        let mut ch = Channel::new("999999999999");
        assert_eq!(ch.grab_input_number(), (999_999_999_999u64 % MAX_INTEGER as u64) as u32);
        assert_eq!(ch.grab_input_number(), 0);
        assert!(ch.input().is_empty());
    }

    #[test]
    fn test_grab_number_long_run_wraps() {
        let digits = "12345678901234567890123456789";
        let mut ch = Channel::new(digits);
        let expected = digits
            .bytes()
            .fold(0u128, |acc, b| (acc * 10 + (b - b'0') as u128) % MAX_INTEGER as u128);
        assert_eq!(ch.grab_input_number() as u128, expected);
    }

    #[test]
    fn test_grab_char() {
        let mut ch = Channel::new("hé");
        assert_eq!(ch.grab_input_char(), 'h' as u32);
        assert_eq!(ch.input(), "é");
        assert_eq!(ch.grab_input_char(), 'é' as u32);
        assert_eq!(ch.grab_input_char(), 0);
        assert_eq!(ch.grab_input_char(), 0);
    }

    #[test]
    fn test_write_number() {
        let mut ch = Channel::new("");
        ch.write_output(65i64);
        assert_eq!(ch.last_output(), 65);
        assert_eq!(ch.output(), "65");
    }

    #[test]
    fn test_write_hex_token() {
        let mut ch = Channel::new("");
        ch.write_output("0x1A");
        assert_eq!(ch.last_output(), 26);
        assert_eq!(ch.output(), "0x1A");
    }

    #[test]
    fn test_write_char_token() {
        let mut ch = Channel::new("");
        ch.write_output("Z");
        assert_eq!(ch.last_output(), 'Z' as i64);
        assert_eq!(ch.output(), "Z");

        ch.write_output("Hi");
        assert_eq!(ch.last_output(), 'H' as i64);
        assert_eq!(ch.output(), "ZHi");
    }

    #[test]
    fn test_hex_token_lenient() {
        assert_eq!(OutputItem::from("0xfg").value(), 15);
        assert_eq!(OutputItem::from("Zx").value(), 0);
        assert_eq!(OutputItem::from("").value(), 0);
    }

    #[test]
    fn test_long_hex_token_stays_in_range() {
        let mut ch = Channel::new("");
        ch.write_output("0xFFFFFFFFFFFFFFFFFF");
        assert_eq!(ch.last_output(), (MAX_INTEGER - 1) as i64);
        assert_eq!(ch.output(), "0xFFFFFFFFFFFFFFFFFF");

        assert_eq!(OutputItem::from("0x100000").value(), 0);
        assert_eq!(OutputItem::from("0x100001").value(), 1);
    }
}
