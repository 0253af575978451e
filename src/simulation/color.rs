//! Maps an interior temperature onto a display color.

use crate::domain::{celsius_to_fahrenheit, GradientBounds};

const CHANNEL_MAX: f64 = 255.0;
/// Hex decrement per °F below the lower bound (darkens blue).
const BELOW_STEP: i64 = 4;
/// Hex decrement per °F above the top band (darkens red by 4 per degree).
const ABOVE_STEP: i64 = 0x04_0000;

/// Hex RGB color (`#rrggbb`) for an interior temperature.
///
/// The gradient range is split into four bands of `ceil(range / 4)` °F:
/// below the range is blue darkening towards black, band 0 adds green, band 1
/// fades blue out, band 2 adds red, band 3 fades green out, and at or above the
/// top is red darkening further with every degree past the top.
pub fn color_gradient(interior_c: f64, bounds: &GradientBounds) -> String {
    let t = (celsius_to_fahrenheit(interior_c) - bounds.lower_f).round_ties_even() as i64;
    let band = (((bounds.upper_f - bounds.lower_f) / 4.0).ceil() as i64).max(1);
    let top = band.saturating_mul(4);
    // position within the current band, 0.0..1.0
    let frac = t.rem_euclid(band) as f64 / band as f64;

    let (mut r, mut g, mut b) = (CHANNEL_MAX, CHANNEL_MAX, CHANNEL_MAX);

    if t >= top {
        g = 0.0;
        b = 0.0;
    } else if t >= band.saturating_mul(3) {
        g = (g * (1.0 - frac)).round_ties_even();
        b = 0.0;
    } else if t >= band.saturating_mul(2) {
        r = (r * frac).round_ties_even();
        b = 0.0;
    } else if t >= band {
        r = 0.0;
        b = (b * (1.0 - frac)).round_ties_even();
    } else if t >= 0 {
        r = 0.0;
        g = (g * ((frac * 100.0).round_ties_even() / 100.0)).trunc();
    } else {
        r = 0.0;
        g = 0.0;
    }

    let mut hex = ((r as i64) << 16) | ((g as i64) << 8) | b as i64;
    // saturating: far out-of-range temperatures clamp to black
    if t < 0 {
        hex = hex.saturating_sub(t.saturating_abs().saturating_mul(BELOW_STEP));
    } else if t > top {
        hex = hex.saturating_sub((t - top).saturating_mul(ABOVE_STEP));
    }

    format!("#{:06x}", hex.max(0))
}
