//! # Numeric Keypad
//!
//! Key presses and the two buffers they edit.
//!
//! ```text
//! ┌───┬───┬───┐
//! │ 7 │ 8 │ 9 │      Building phase  ──► NumericEntry  (quantity entry)
//! ├───┼───┼───┤      Discount phase  ──► DiscountInput (percentage)
//! │ 4 │ 5 │ 6 │
//! ├───┼───┼───┤      Qty    : quantity mode, buffer cleared
//! │ 1 │ 2 │ 3 │      Enter  : commit (handled by the ticket reducer)
//! ├───┼───┼───┤      ⌫      : drop last character
//! │ 0 │ . │Qty│      C      : clear buffer
//! └───┴───┴───┘
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::parse_quantity_entry;

/// Most characters the discount input accepts before only a point fits.
pub const DISCOUNT_INPUT_MAX_LEN: usize = 5;

// =============================================================================
// Keys
// =============================================================================

/// A keypad key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Digit(u8),
    Point,
    Qty,
    Enter,
    Backspace,
    Clear,
}

impl Key {
    /// Character appended to a buffer, for digit and point keys.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Key::Digit(d) if *d <= 9 => char::from_digit(u32::from(*d), 10),
            Key::Point => Some('.'),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Digit(d) => write!(f, "{}", d),
            Key::Point => f.write_str("."),
            Key::Qty => f.write_str("qty"),
            Key::Enter => f.write_str("enter"),
            Key::Backspace => f.write_str("backspace"),
            Key::Clear => f.write_str("clear"),
        }
    }
}

/// Error returned when a token does not name a key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key '{0}'")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        match token.as_str() {
            "." | "point" => Ok(Key::Point),
            "qty" | "*" => Ok(Key::Qty),
            "enter" | "ok" => Ok(Key::Enter),
            "backspace" | "back" | "bs" => Ok(Key::Backspace),
            "clear" | "c" => Ok(Key::Clear),
            _ => {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() => {
                        Ok(Key::Digit(c as u8 - b'0'))
                    }
                    _ => Err(UnknownKey(s.trim().to_string())),
                }
            }
        }
    }
}

// =============================================================================
// Quantity Entry
// =============================================================================

/// The main numeric entry buffer used while building a ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericEntry {
    buffer: String,
    quantity_mode: bool,
}

impl NumericEntry {
    pub fn new() -> Self {
        NumericEntry::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_quantity_mode(&self) -> bool {
        self.quantity_mode
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Enters quantity mode and clears the buffer.
    pub fn enter_quantity_mode(&mut self) {
        self.quantity_mode = true;
        self.buffer.clear();
    }

    pub fn push(&mut self, ch: char) {
        self.buffer.push(ch);
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Quantity typed so far, if it is a positive integer.
    pub fn quantity(&self) -> Option<u32> {
        parse_quantity_entry(&self.buffer)
    }

    /// Empties the buffer and leaves quantity mode.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.quantity_mode = false;
    }
}

// =============================================================================
// Discount Input
// =============================================================================

/// The percentage being typed in the discount dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscountInput(String);

impl DiscountInput {
    pub fn new() -> Self {
        DiscountInput::default()
    }

    /// Pre-filled input (the current discount when reopening the dialog).
    pub fn prefilled(text: impl Into<String>) -> Self {
        DiscountInput(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appends a character. Past five characters only a point is accepted,
    /// and there is never more than one point.
    pub fn push(&mut self, ch: char) {
        if ch == '.' {
            if !self.0.contains('.') {
                self.0.push(ch);
            }
            return;
        }
        if self.0.chars().count() < DISCOUNT_INPUT_MAX_LEN {
            self.0.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        self.0.pop();
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        assert_eq!("7".parse::<Key>(), Ok(Key::Digit(7)));
        assert_eq!(".".parse::<Key>(), Ok(Key::Point));
        assert_eq!("QTY".parse::<Key>(), Ok(Key::Qty));
        assert_eq!("enter".parse::<Key>(), Ok(Key::Enter));
        assert_eq!("back".parse::<Key>(), Ok(Key::Backspace));
        assert_eq!("c".parse::<Key>(), Ok(Key::Clear));
        assert!("12".parse::<Key>().is_err());
        assert!("x".parse::<Key>().is_err());
    }

    #[test]
    fn test_key_chars() {
        assert_eq!(Key::Digit(3).as_char(), Some('3'));
        assert_eq!(Key::Point.as_char(), Some('.'));
        assert_eq!(Key::Enter.as_char(), None);
        assert_eq!(Key::Digit(12).as_char(), None);
    }

    #[test]
    fn test_numeric_entry() {
        let mut entry = NumericEntry::new();
        entry.push('1');
        entry.push('2');
        assert_eq!(entry.quantity(), Some(12));

        entry.enter_quantity_mode();
        assert!(entry.is_quantity_mode());
        assert!(entry.is_empty());

        entry.push('4');
        entry.push('5');
        entry.backspace();
        assert_eq!(entry.buffer(), "4");

        entry.reset();
        assert!(!entry.is_quantity_mode());
        assert_eq!(entry.quantity(), None);
    }

    #[test]
    fn test_discount_input_caps_length() {
        let mut input = DiscountInput::new();
        for ch in "123456".chars() {
            input.push(ch);
        }
        assert_eq!(input.as_str(), "12345");

        // A point is still accepted once
        input.push('.');
        input.push('.');
        assert_eq!(input.as_str(), "12345.");
    }

    #[test]
    fn test_discount_input_single_point() {
        let mut input = DiscountInput::new();
        input.push('1');
        input.push('.');
        input.push('5');
        input.push('.');
        assert_eq!(input.as_str(), "1.5");

        input.backspace();
        input.clear();
        assert_eq!(input.as_str(), "");
    }
}
