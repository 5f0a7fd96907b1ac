//! Camera facing mode value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidFacingModeError;

/// Which physical camera a stream is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FacingMode {
    /// Front camera, pointing at the user
    User,
    /// Rear camera, pointing away from the user
    #[default]
    Environment,
}

impl FacingMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Environment => "environment",
        }
    }

    /// The opposite facing mode
    pub const fn flipped(&self) -> Self {
        match self {
            Self::User => Self::Environment,
            Self::Environment => Self::User,
        }
    }
}

impl FromStr for FacingMode {
    type Err = InvalidFacingModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" | "front" => Ok(Self::User),
            "environment" | "rear" | "back" => Ok(Self::Environment),
            _ => Err(InvalidFacingModeError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
