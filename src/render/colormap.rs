//! Color scales for the precipitation mesh and colorbar.

use plotters::style::RGBColor;

/// Piecewise-linear colormap over evenly spaced stops.
#[derive(Debug, Clone, Copy)]
pub struct Colormap {
    stops: &'static [(u8, u8, u8)],
}

/// ColorBrewer brown to blue-green diverging scheme (11 classes).
pub const BRBG: Colormap = Colormap {
    stops: &[
        (0x54, 0x30, 0x05),
        (0x8c, 0x51, 0x0a),
        (0xbf, 0x81, 0x2d),
        (0xdf, 0xc2, 0x7d),
        (0xf6, 0xe8, 0xc3),
        (0xf5, 0xf5, 0xf5),
        (0xc7, 0xea, 0xe5),
        (0x80, 0xcd, 0xc1),
        (0x35, 0x97, 0x8f),
        (0x01, 0x66, 0x5e),
        (0x00, 0x3c, 0x30),
    ],
};

impl Colormap {
    /// Color at `t` in [0, 1]; values outside are clamped.
    pub fn sample(&self, t: f64) -> RGBColor {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let segments = (self.stops.len() - 1) as f64;
        let position = t * segments;
        let index = (position.floor() as usize).min(self.stops.len() - 2);
        let frac = position - index as f64;

        let (r0, g0, b0) = self.stops[index];
        let (r1, g1, b1) = self.stops[index + 1];

        RGBColor(lerp(r0, r1, frac), lerp(g0, g1, frac), lerp(b0, b1, frac))
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

/// A colormap stretched over a fixed data interval.
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    pub cmap: Colormap,
    pub vmin: f64,
    pub vmax: f64,
}

impl ColorScale {
    pub fn new(cmap: Colormap, vmin: f64, vmax: f64) -> Self {
        ColorScale { cmap, vmin, vmax }
    }

    /// Values below `vmin` or above `vmax` take the end colors.
    pub fn color(&self, value: f64) -> RGBColor {
        self.cmap.sample(self.normalize(value))
    }

    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.vmax - self.vmin;
        if span <= 0.0 {
            return 0.0;
        }
        (value - self.vmin) / span
    }

    /// Tick values from `vmin` to `vmax` inclusive.
    pub fn ticks(&self, step: f64) -> Vec<f64> {
        if step <= 0.0 {
            return vec![self.vmin, self.vmax];
        }
        let count = ((self.vmax - self.vmin) / step + 1e-9).floor() as usize;
        (0..=count).map(|i| self.vmin + i as f64 * step).collect()
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn should_hit_end_and_middle_stops() {
        assert_eq!(BRBG.sample(0.0), RGBColor(0x54, 0x30, 0x05));
        assert_eq!(BRBG.sample(0.5), RGBColor(0xf5, 0xf5, 0xf5));
        assert_eq!(BRBG.sample(1.0), RGBColor(0x00, 0x3c, 0x30));
    }

    #[test]
    fn should_interpolate_between_stops() {
        // Halfway between the first two stops.
        let c = BRBG.sample(0.05);
        assert_eq!(c, RGBColor(0x70, 0x41, 0x08));
    }

    #[test]
    fn should_clamp_out_of_range_values() {
        let scale = ColorScale::new(BRBG, 0.0, 2000.0);

        assert_eq!(scale.color(-10.0), scale.color(0.0));
        assert_eq!(scale.color(5000.0), scale.color(2000.0));
        assert_eq!(scale.color(1000.0), RGBColor(0xf5, 0xf5, 0xf5));
    }

    #[test]
    fn should_make_colorbar_ticks() {
        let scale = ColorScale::new(BRBG, 0.0, 2000.0);
        let ticks = scale.ticks(250.0);

        assert_eq!(ticks.len(), 9);
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks.last(), Some(&2000.0));
    }

    #[test]
    fn should_handle_degenerate_scale() {
        let scale = ColorScale::new(BRBG, 5.0, 5.0);
        assert_eq!(scale.normalize(100.0), 0.0);
    }
}
