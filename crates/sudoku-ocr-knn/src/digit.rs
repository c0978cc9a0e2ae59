use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("digit label must be in 1..=9, got {0}")]
pub struct DigitError(pub u8);

/// Classification label: a Sudoku digit in `1..=9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    pub const MIN: Digit = Digit(1);
    pub const MAX: Digit = Digit(9);

    pub fn new(value: u8) -> Result<Self, DigitError> {
        if (1..=9).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DigitError(value))
        }
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// All labels in ascending order.
    pub fn all() -> impl Iterator<Item = Digit> + Clone {
        (1..=9u8).map(Digit)
    }
}

impl TryFrom<u8> for Digit {
    type Error = DigitError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Digit::new(value)
    }
}

impl From<Digit> for u8 {
    fn from(d: Digit) -> Self {
        d.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
