//! Time/date to binary digit matrix conversion
//!
//! Each decimal digit of `HH MM` (or `DD MM` for dates) becomes one 4-bit
//! column, most significant bit first. All functions are pure and can be
//! called from any thread.

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::Serialize;

use crate::error::ConvertError;

/// Number of bits needed to encode a decimal digit
pub const BITS_PER_DIGIT: usize = 4;

/// Number of digit columns in a matrix
pub const COLUMNS: usize = 4;

/// One decimal digit as four binary digits (each 0 or 1), MSB first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DigitColumn([u8; BITS_PER_DIGIT]);

impl DigitColumn {
    pub fn bits(&self) -> [u8; BITS_PER_DIGIT] {
        self.0
    }

    /// Decimal value obtained by reading the bits big-endian
    pub fn value(&self) -> u8 {
        self.0.iter().fold(0u8, |acc, &bit| (acc << 1) | bit)
    }

    /// Encode a digit already known to be in 0-9
    fn from_digit(digit: u8) -> Self {
        debug_assert!(digit <= 9, "digit {digit} out of range");
        let mut bits = [0u8; BITS_PER_DIGIT];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = (digit >> (BITS_PER_DIGIT - 1 - i)) & 1;
        }
        Self(bits)
    }
}

/// Four digit columns of a two-field quantity (hours + minutes, or day + month)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DigitMatrix([DigitColumn; COLUMNS]);

impl DigitMatrix {
    /// Build from two two-digit fields: `[major/10, major%10, minor/10, minor%10]`
    fn from_fields(major: u32, minor: u32) -> Self {
        let digits = [major / 10, major % 10, minor / 10, minor % 10];
        Self(digits.map(|d| DigitColumn::from_digit(d as u8)))
    }

    pub fn columns(&self) -> &[DigitColumn; COLUMNS] {
        &self.0
    }

    /// The four decimal digits the matrix encodes
    pub fn digits(&self) -> [u8; COLUMNS] {
        self.0.map(|c| c.value())
    }

    /// First two digits read as one number (hour or day)
    pub fn major(&self) -> u32 {
        let d = self.digits();
        u32::from(d[0]) * 10 + u32::from(d[1])
    }

    /// Last two digits read as one number (minute or month)
    pub fn minor(&self) -> u32 {
        let d = self.digits();
        u32::from(d[2]) * 10 + u32::from(d[3])
    }
}

/// Encode a single decimal digit as a 4-bit column.
///
/// Digits above 9 are rejected rather than truncated to their low bits.
pub fn digit_to_binary(digit: u32) -> Result<DigitColumn, ConvertError> {
    if digit > 9 {
        return Err(ConvertError::InvalidDigit(digit));
    }
    Ok(DigitColumn::from_digit(digit as u8))
}

/// Zone-local calendar fields of one instant.
///
/// Both matrices and the accessibility label are derived from the same
/// reading, so they always describe the same moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockReading {
    pub hour: u32,
    pub minute: u32,
    pub day: u32,
    pub month: u32,
}

impl ClockReading {
    pub fn at<Tz: TimeZone, Z: TimeZone>(instant: &DateTime<Tz>, zone: &Z) -> Self {
        let local = instant.with_timezone(zone);
        Self {
            hour: local.hour(),
            minute: local.minute(),
            day: local.day(),
            month: local.month(),
        }
    }

    pub fn time_matrix(&self) -> DigitMatrix {
        DigitMatrix::from_fields(self.hour, self.minute)
    }

    pub fn date_matrix(&self) -> DigitMatrix {
        DigitMatrix::from_fields(self.day, self.month)
    }
}

/// `[H1, H2, M1, M2]` of the zone-local time
pub fn time_to_digit_matrix<Tz: TimeZone, Z: TimeZone>(instant: &DateTime<Tz>, zone: &Z) -> DigitMatrix {
    ClockReading::at(instant, zone).time_matrix()
}

/// `[D1, D2, Mo1, Mo2]` of the zone-local date
pub fn date_to_digit_matrix<Tz: TimeZone, Z: TimeZone>(instant: &DateTime<Tz>, zone: &Z) -> DigitMatrix {
    ClockReading::at(instant, zone).date_matrix()
}
