//! Hex tokens: the `0x1AU` unit an array literal is made of.

use std::fmt;
use std::str::FromStr;

use crate::error::HookError;

const UPPER_DIGITS: &[u8; 16] = b"0123456789ABCDEF";
const LOWER_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Output case of rendered tokens. `Upper` is canonical (`0x1AU`), `Lower`
/// renders `0x1au`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Case {
    #[default]
    Upper,
    Lower,
}

impl Case {
    #[inline]
    pub fn marker(self) -> u8 {
        match self {
            Case::Upper => b'U',
            Case::Lower => b'u',
        }
    }

    #[inline]
    fn digits(self) -> &'static [u8; 16] {
        match self {
            Case::Upper => UPPER_DIGITS,
            Case::Lower => LOWER_DIGITS,
        }
    }
}

impl FromStr for Case {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "upper" | "uppercase" => Ok(Case::Upper),
            "lower" | "lowercase" => Ok(Case::Lower),
            _ => Err(HookError::UnknownChoice {
                what: "case",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Case::Upper => f.write_str("upper"),
            Case::Lower => f.write_str("lower"),
        }
    }
}

/// Which token spellings the parser accepts.
///
/// `Upper` only takes `A-F` digits with a `U` marker and `Lower` only `a-f`
/// digits with a `u` marker, so neither reads the other's output. `Any` takes
/// digits of either case and either marker.
///
/// Older headers spell tokens with lowercase digits and an uppercase marker
/// (`0x1aU`). `Lower` rejects those; read them with `Any`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Grammar {
    Upper,
    Lower,
    #[default]
    Any,
}

impl Grammar {
    #[inline]
    fn accepts_digit(self, b: u8) -> bool {
        match self {
            Grammar::Upper => matches!(b, b'0'..=b'9' | b'A'..=b'F'),
            Grammar::Lower => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
            Grammar::Any => b.is_ascii_hexdigit(),
        }
    }

    #[inline]
    fn accepts_marker(self, b: u8) -> bool {
        match self {
            Grammar::Upper => b == b'U',
            Grammar::Lower => b == b'u',
            Grammar::Any => b == b'U' || b == b'u',
        }
    }
}

impl From<Case> for Grammar {
    fn from(case: Case) -> Self {
        match case {
            Case::Upper => Grammar::Upper,
            Case::Lower => Grammar::Lower,
        }
    }
}

impl FromStr for Grammar {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "upper" | "uppercase" => Ok(Grammar::Upper),
            "lower" | "lowercase" => Ok(Grammar::Lower),
            "any" => Ok(Grammar::Any),
            _ => Err(HookError::UnknownChoice {
                what: "grammar",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grammar::Upper => f.write_str("upper"),
            Grammar::Lower => f.write_str("lower"),
            Grammar::Any => f.write_str("any"),
        }
    }
}

/// One byte as it appears in an array literal.
///
/// Equality compares the spelling as well as the value: `0x1AU` and `0x1au`
/// are different tokens. Use [`HexToken::value`] to compare bytes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexToken {
    digits: [u8; 2],
    marker: u8,
}

impl HexToken {
    /// Length of a token in bytes: `0x` + two digits + marker.
    pub const LEN: usize = 5;

    pub fn new(value: u8, case: Case) -> Self {
        let digits = case.digits();
        Self {
            digits: [digits[(value >> 4) as usize], digits[(value & 0x0f) as usize]],
            marker: case.marker(),
        }
    }

    /// Parse a single token, which must span all of `text`.
    pub fn parse(text: &str, grammar: Grammar) -> Option<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != Self::LEN || !bytes.starts_with(b"0x") {
            return None;
        }
        let (hi, lo, marker) = (bytes[2], bytes[3], bytes[4]);
        if !grammar.accepts_digit(hi) || !grammar.accepts_digit(lo) || !grammar.accepts_marker(marker) {
            return None;
        }
        Some(Self {
            digits: [hi, lo],
            marker,
        })
    }

    pub fn value(&self) -> u8 {
        (nibble(self.digits[0]) << 4) | nibble(self.digits[1])
    }

    pub fn marker(&self) -> char {
        self.marker as char
    }
}

// only called on digits that passed `Grammar::accepts_digit`
#[inline]
fn nibble(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

impl fmt::Display for HexToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{}{}{}",
            self.digits[0] as char, self.digits[1] as char, self.marker as char
        )
    }
}
