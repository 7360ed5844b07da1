//! Serializable RGBA color
//!
//! Channels are stored as normalized floats so a platform color can be
//! rebuilt without loss. Hex strings are accepted for CLI input.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbaColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl RgbaColor {
    pub const BLACK: Self = Self::opaque(0.0, 0.0, 0.0);
    pub const BLUE: Self = Self::opaque(0.0, 0.478, 1.0);
    pub const CYAN: Self = Self::opaque(0.196, 0.678, 0.902);
    pub const YELLOW: Self = Self::opaque(1.0, 0.8, 0.0);
    pub const ORANGE: Self = Self::opaque(1.0, 0.584, 0.0);

    pub const fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self { red, green, blue, alpha }
    }

    pub const fn opaque(red: f64, green: f64, blue: f64) -> Self {
        Self::new(red, green, blue, 1.0)
    }

    /// Parse `RRGGBB` or `RRGGBBAA`, with or without a leading `#`.
    /// 6-digit input is fully opaque.
    pub fn parse_hex(input: &str) -> Option<Self> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| -> Option<f64> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .ok()
                .map(|v| f64::from(v) / 255.0)
        };
        match hex.len() {
            6 => Some(Self::opaque(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// `#RRGGBBAA`, channels rounded to 8 bits
    pub fn to_hex_string(&self) -> String {
        let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            byte(self.red),
            byte(self.green),
            byte(self.blue),
            byte(self.alpha)
        )
    }

    /// Clamp every channel into [0, 1]; returns true if anything changed
    pub fn clamp_channels(&mut self) -> bool {
        let before = *self;
        for c in [&mut self.red, &mut self.green, &mut self.blue, &mut self.alpha] {
            *c = if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) };
        }
        before != *self
    }
}
