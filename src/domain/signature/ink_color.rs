//! Ink color processing parameter

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidInkColorError;

/// All selectable ink colors
pub const ALL_INK_COLORS: &[InkColor] = &[InkColor::Black, InkColor::Blue];

/// Ink color the digitization service recolors the signature strokes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InkColor {
    #[default]
    Black,
    Blue,
}

impl InkColor {
    /// Wire value sent in the `color` form field
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Blue => "blue",
        }
    }

    /// Display label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Black => "Noir",
            Self::Blue => "Azure",
        }
    }
}

impl FromStr for InkColor {
    type Err = InvalidInkColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "black" => Ok(Self::Black),
            "blue" => Ok(Self::Blue),
            _ => Err(InvalidInkColorError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for InkColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
