use std::{fmt, str::FromStr};

use image::Rgb;
use thiserror::Error;

const SATURATION: f64 = 0.75;
const VALUE: f64 = 1.0;

/// Avatar background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for Rgb<u8> {
    fn from(color: Color) -> Self {
        Rgb([color.r, color.g, color.b])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("`{0}` is not a color, expected #rrggbb")]
pub struct ColorParseError(String);

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);

        let mut rgb = [0u8; 3];
        hex::decode_to_slice(digits, &mut rgb).map_err(|_| ColorParseError(s.to_string()))?;

        Ok(Color::new(rgb[0], rgb[1], rgb[2]))
    }
}

/// Derive a color from `text` that never changes between runs.
///
/// The CRC-32 of the text picks the hue. Saturation and value are fixed.
pub fn pick_stable_random(text: &str) -> Color {
    let checksum = crc32fast::hash(text.as_bytes());
    let hue = f64::from(checksum % 360) / 360.0;

    let (r, g, b) = hsv_to_rgb(hue, SATURATION, VALUE);

    // truncates, 63.75 becomes 63
    Color::new((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

/// `h`, `s` and `v` are all in `[0, 1]`.
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }

    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}
