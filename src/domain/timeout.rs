//! Request timeout value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::error::TimeoutError;

/// Default digitization request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Shortest accepted timeout in seconds
pub const MIN_TIMEOUT_SECS: u64 = 1;

/// Longest accepted timeout in seconds (10 minutes)
pub const MAX_TIMEOUT_SECS: u64 = 600;

/// How long a digitization request may take, in whole seconds within
/// `MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS`.
///
/// Written as `45s`, `2m`, `1m30s` or a bare number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTimeout {
    secs: u64,
}

impl RequestTimeout {
    pub fn from_secs(secs: u64) -> Result<Self, TimeoutError> {
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&secs) {
            return Err(TimeoutError::OutOfRange(Self { secs }.to_string()));
        }
        Ok(Self { secs })
    }

    pub const fn as_secs(&self) -> u64 {
        self.secs
    }

    pub const fn as_std(&self) -> Duration {
        Duration::from_secs(self.secs)
    }
}

impl Default for RequestTimeout {
    fn default() -> Self {
        Self {
            secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Digits only, no sign or spaces
fn number(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl FromStr for RequestTimeout {
    type Err = TimeoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        let invalid = || TimeoutError::Format(s.to_string());

        if let Some(secs) = number(&input) {
            return Self::from_secs(secs);
        }

        let seconds_part = |part: &str| -> Result<u64, TimeoutError> {
            part.strip_suffix('s').and_then(number).ok_or_else(invalid)
        };
        let (minutes, seconds) = match input.split_once('m') {
            Some((minutes, "")) => (number(minutes).ok_or_else(invalid)?, 0),
            Some((minutes, rest)) => (number(minutes).ok_or_else(invalid)?, seconds_part(rest)?),
            None => (0, seconds_part(&input)?),
        };

        let total = minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or_else(|| TimeoutError::OutOfRange(s.trim().to_string()))?;
        Self::from_secs(total)
    }
}

impl fmt::Display for RequestTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.secs / 60, self.secs % 60) {
            (0, seconds) => write!(f, "{}s", seconds),
            (minutes, 0) => write!(f, "{}m", minutes),
            (minutes, seconds) => write!(f, "{}m{}s", minutes, seconds),
        }
    }
}
