//! DTMF symbol table.
//!
//! Each of the 16 keys of the 4x4 DTMF keypad is the sum of one low-group
//! (row) and one high-group (column) frequency.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Low-group (row) frequencies in Hz.
pub const LOW_GROUP_HZ: [f64; 4] = [697.0, 770.0, 852.0, 941.0];

/// High-group (column) frequencies in Hz.
pub const HIGH_GROUP_HZ: [f64; 4] = [1209.0, 1336.0, 1477.0, 1633.0];

/// A DTMF keypad symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToneKey {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "*")]
    Star,
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "#")]
    Pound,
    #[serde(rename = "D")]
    D,
}

impl ToneKey {
    /// All keys in keypad order, row by row.
    pub const ALL: [ToneKey; 16] = [
        ToneKey::One,
        ToneKey::Two,
        ToneKey::Three,
        ToneKey::A,
        ToneKey::Four,
        ToneKey::Five,
        ToneKey::Six,
        ToneKey::B,
        ToneKey::Seven,
        ToneKey::Eight,
        ToneKey::Nine,
        ToneKey::C,
        ToneKey::Star,
        ToneKey::Zero,
        ToneKey::Pound,
        ToneKey::D,
    ];

    /// Returns the keypad character of this key.
    pub fn symbol(&self) -> char {
        match self {
            ToneKey::One => '1',
            ToneKey::Two => '2',
            ToneKey::Three => '3',
            ToneKey::A => 'A',
            ToneKey::Four => '4',
            ToneKey::Five => '5',
            ToneKey::Six => '6',
            ToneKey::B => 'B',
            ToneKey::Seven => '7',
            ToneKey::Eight => '8',
            ToneKey::Nine => '9',
            ToneKey::C => 'C',
            ToneKey::Star => '*',
            ToneKey::Zero => '0',
            ToneKey::Pound => '#',
            ToneKey::D => 'D',
        }
    }

    /// Parses a keypad character. Letters are accepted in either case.
    pub fn from_symbol(c: char) -> Option<Self> {
        ToneKey::ALL
            .iter()
            .copied()
            .find(|key| key.symbol() == c.to_ascii_uppercase())
    }

    /// Returns the (low group, high group) frequency pair in Hz.
    pub fn frequencies(&self) -> (f64, f64) {
        let index = ToneKey::ALL
            .iter()
            .position(|key| key == self)
            .unwrap_or_default();
        (LOW_GROUP_HZ[index / 4], HIGH_GROUP_HZ[index % 4])
    }

    /// Parses every symbol of a dial string, skipping separators.
    ///
    /// Spaces, dashes, dots and parentheses are ignored. Returns the first
    /// character that is neither a separator nor a keypad symbol as the error.
    pub fn parse_sequence(dial: &str) -> std::result::Result<Vec<ToneKey>, char> {
        dial.chars()
            .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
            .map(|c| ToneKey::from_symbol(c).ok_or(c))
            .collect()
    }
}

impl fmt::Display for ToneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for ToneKey {
    type Err = InvalidToneKey;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => ToneKey::from_symbol(c).ok_or_else(|| InvalidToneKey(s.to_string())),
            _ => Err(InvalidToneKey(s.to_string())),
        }
    }
}

/// Error returned when a string is not a single keypad symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidToneKey(pub String);

impl fmt::Display for InvalidToneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid toneKey {:?}", self.0)
    }
}

impl std::error::Error for InvalidToneKey {}
