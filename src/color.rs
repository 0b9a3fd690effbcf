use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Colour scales for numeric values
// ---------------------------------------------------------------------------

/// Convert an HSL triple into an egui colour.
fn hsl(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Sequential scale, `t` in `[0, 1]`: purple → teal → yellow.
pub fn sequential(t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 } as f32;
    hsl(270.0 - 210.0 * t, 0.7, 0.3 + 0.35 * t)
}

/// Diverging scale for correlations, `r` in `[-1, 1]`: blue ← pale → red.
pub fn diverging(r: f64) -> Color32 {
    if !r.is_finite() {
        return Color32::GRAY;
    }
    let r = r.clamp(-1.0, 1.0) as f32;
    let hue = if r < 0.0 { 220.0 } else { 5.0 };
    hsl(hue, 0.75, 0.92 - 0.45 * r.abs())
}

/// Maps values of a numeric column onto [`sequential`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    min: f64,
    max: f64,
}

impl ColorScale {
    /// Scale spanning the finite values; `None` when there are none.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let finite = values.iter().copied().filter(|v| v.is_finite());
        let min = finite.clone().reduce(f64::min)?;
        let max = finite.reduce(f64::max)?;
        Some(ColorScale { min, max })
    }

    /// Position of `value` in `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            0.5
        } else {
            ((value - self.min) / range).clamp(0.0, 1.0)
        }
    }

    /// Index of the bucket `value` falls in, for `n` equal buckets.
    pub fn bucket(&self, value: f64, n: usize) -> usize {
        ((self.normalize(value) * n as f64) as usize).min(n.saturating_sub(1))
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        sequential(self.normalize(value))
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_spans_finite_values() {
        let scale = ColorScale::from_values(&[3.0, f64::NAN, -1.0, 7.0]).unwrap();
        assert_eq!(scale.range(), (-1.0, 7.0));
        assert_eq!(scale.normalize(3.0), 0.5);
        assert_eq!(scale.bucket(7.0, 4), 3);
        assert_eq!(scale.bucket(-1.0, 4), 0);
        assert!(ColorScale::from_values(&[f64::NAN]).is_none());
    }

    #[test]
    fn constant_values_map_to_the_middle() {
        let scale = ColorScale::from_values(&[2.0, 2.0]).unwrap();
        assert_eq!(scale.normalize(2.0), 0.5);
    }

    #[test]
    fn diverging_endpoints_differ_and_nan_is_gray() {
        assert_ne!(diverging(-1.0), diverging(1.0));
        assert_eq!(diverging(f64::NAN), Color32::GRAY);
    }
}
