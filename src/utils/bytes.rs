//! Byte size conversions
//!
//! [`ByteSize`] holds a non-negative number of bytes and exposes it in the
//! usual binary multiples (1 KB = 1024 bytes), rounded to one decimal.

use crate::error::UtilsError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const UNITS: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct ByteSize(f64);

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl ByteSize {
    pub fn new(bytes: f64) -> Result<Self, UtilsError> {
        if bytes.is_nan() || bytes < 0.0 {
            return Err(UtilsError::Validation {
                message: format!("Byte count must be a non-negative number, got {}", bytes),
            });
        }
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: u64) -> Self {
        Self(bytes as f64)
    }

    /// Exact byte count, unrounded
    pub fn as_f64(&self) -> f64 {
        self.0
    }

    fn scaled(&self, power: i32) -> f64 {
        round1(self.0 / 1024f64.powi(power))
    }

    pub fn bytes(&self) -> f64 {
        round1(self.0)
    }

    pub fn bits(&self) -> f64 {
        round1(self.0 * 8.0)
    }

    pub fn kbytes(&self) -> f64 {
        self.scaled(1)
    }

    pub fn kbits(&self) -> f64 {
        self.kbytes() * 8.0
    }

    pub fn mbytes(&self) -> f64 {
        self.scaled(2)
    }

    pub fn mbits(&self) -> f64 {
        self.mbytes() * 8.0
    }

    pub fn gbytes(&self) -> f64 {
        self.scaled(3)
    }

    pub fn gbits(&self) -> f64 {
        self.gbytes() * 8.0
    }

    pub fn tbytes(&self) -> f64 {
        self.scaled(4)
    }

    pub fn tbits(&self) -> f64 {
        self.tbytes() * 8.0
    }

    /// Largest unit that keeps the value at or above 1, e.g. `"4.1 MB"`.
    pub fn human(&self) -> String {
        let mut power = 0;
        while power + 1 < UNITS.len() && self.0 >= 1024f64.powi(power as i32 + 1) {
            power += 1;
        }
        format!("{:.1} {}", self.scaled(power as i32), UNITS[power])
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.human())
    }
}

impl FromStr for ByteSize {
    type Err = UtilsError;

    /// Accepts a plain byte count or a number followed by a unit:
    /// `"1024"`, `"64 KB"`, `"50GB"`, `"1.5 TiB"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = |reason: &str| UtilsError::Parse {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let split = input
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(input.len());
        let (number, unit) = input.split_at(split);

        let value: f64 = number
            .parse()
            .map_err(|_| invalid("expected a number optionally followed by a unit"))?;

        let unit = unit.trim().to_ascii_uppercase();
        let unit = unit
            .strip_suffix("IB")
            .or_else(|| unit.strip_suffix('B'))
            .unwrap_or(unit.as_str());
        let power = match unit {
            "" => 0,
            "K" => 1,
            "M" => 2,
            "G" => 3,
            "T" => 4,
            "P" => 5,
            "E" => 6,
            _ => return Err(invalid("unknown unit")),
        };

        ByteSize::new(value * 1024f64.powi(power))
    }
}
