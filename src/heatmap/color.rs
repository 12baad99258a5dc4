//! Heat-map colors - intensity to a gray → orange → red → dark red ramp
//!
//! Exact stop table (intensity clamped to `[0, 1]`, NaN treated as 0):
//!
//! | range            | from            | to              |
//! |------------------|-----------------|-----------------|
//! | `i == 0`         | `#e9ecef` flat  |                 |
//! | `0 < i < 0.3`    | (200, 200, 200) | (255, 150, 100) |
//! | `0.3 <= i < 0.7` | (255, 150, 100) | (255, 50, 20)   |
//! | `0.7 <= i <= 1`  | (255, 50, 20)   | (155, 0, 0)     |
//!
//! Within a band `t = clamp((i - lo) / (hi - lo), 0, 1)` and each channel is
//! `floor(from + (to - from) * t)` in `f64`.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS functional notation, `rgb(r, g, b)`
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Color for parts with no recorded load
pub const NO_ACTIVITY: Rgb = Rgb::new(0xe9, 0xec, 0xef);

/// Color at full intensity
pub const MAX_HEAT: Rgb = Rgb::new(155, 0, 0);

struct Band {
    lo: f64,
    hi: f64,
    from: Rgb,
    to: Rgb,
}

const BANDS: [Band; 3] = [
    Band { lo: 0.0, hi: 0.3, from: Rgb::new(200, 200, 200), to: Rgb::new(255, 150, 100) },
    Band { lo: 0.3, hi: 0.7, from: Rgb::new(255, 150, 100), to: Rgb::new(255, 50, 20) },
    Band { lo: 0.7, hi: 1.0, from: Rgb::new(255, 50, 20), to: MAX_HEAT },
];

fn lerp(from: u8, to: u8, t: f64) -> u8 {
    let from = from as f64;
    (from + (to as f64 - from) * t).floor() as u8
}

/// Map a normalized intensity onto the heat ramp
pub fn heat_color(intensity: f64) -> Rgb {
    let i = if intensity.is_nan() { 0.0 } else { intensity.clamp(0.0, 1.0) };
    if i == 0.0 {
        return NO_ACTIVITY;
    }

    let band = BANDS.iter().find(|b| i < b.hi).unwrap_or(&BANDS[2]);
    let t = ((i - band.lo) / (band.hi - band.lo)).clamp(0.0, 1.0);

    Rgb {
        r: lerp(band.from.r, band.to.r, t),
        g: lerp(band.from.g, band.to.g, t),
        b: lerp(band.from.b, band.to.b, t),
    }
}

/// Intensity → color strategy used by the renderer
pub trait ColorScale {
    fn color(&self, intensity: f64) -> Rgb;
}

/// The default ramp, see [`heat_color`]
#[derive(Debug, Clone, Copy, Default)]
pub struct HeatGradient;

impl ColorScale for HeatGradient {
    fn color(&self, intensity: f64) -> Rgb {
        heat_color(intensity)
    }
}
