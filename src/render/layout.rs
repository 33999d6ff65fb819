//! Pixel layout of the figure: title band, map axes and colorbar.

use crate::dataset::Extent;

/// Pixel rectangle, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Point at fractions of the width and height, measured from the
    /// bottom-left corner like axes coordinates.
    pub fn at_fraction(&self, fx: f64, fy: f64) -> (i32, i32) {
        (
            self.x + (fx * self.width as f64).round() as i32,
            self.bottom() - (fy * self.height as f64).round() as i32,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Baseline centre of the title.
    pub title_anchor: (i32, i32),
    pub map: Rect,
    pub colorbar: Rect,
}

const TITLE_BAND: f64 = 0.075;
const SIDE_MARGIN: f64 = 0.03;
/// Colorbar thickness as a fraction of canvas height.
const COLORBAR_THICKNESS: f64 = 0.045;
/// Gap between the axes and the colorbar, as a fraction of the axes height.
const COLORBAR_PAD: f64 = 0.03;
/// Room under the colorbar for tick labels and the axis label.
const COLORBAR_LABELS: f64 = 0.13;

impl Layout {
    /// Places equal-aspect map axes for `extent` and a full-width colorbar
    /// underneath.
    pub fn new(canvas: (u32, u32), extent: &Extent) -> Self {
        let (width, height) = (canvas.0 as f64, canvas.1 as f64);

        let title_band = (height * TITLE_BAND).round();
        let side = (width * SIDE_MARGIN).round();
        let bar = (height * COLORBAR_THICKNESS).round().max(1.0);
        let labels = (height * COLORBAR_LABELS).round();

        let avail_w = (width - 2.0 * side).max(1.0);
        let avail_h = ((height - title_band - bar - labels) / (1.0 + COLORBAR_PAD)).max(1.0);

        let aspect = if extent.aspect().is_finite() && extent.aspect() > 0.0 {
            extent.aspect()
        } else {
            1.0
        };
        let (map_w, map_h) = if avail_w / avail_h > aspect {
            (avail_h * aspect, avail_h)
        } else {
            (avail_w, avail_w / aspect)
        };
        let map_w = map_w.floor().max(1.0);
        let map_h = map_h.floor().max(1.0);

        let used_h = map_h * (1.0 + COLORBAR_PAD) + bar + labels;
        let top = title_band + ((height - title_band - used_h) / 2.0).max(0.0).floor();

        let map = Rect {
            x: ((width - map_w) / 2.0).floor() as i32,
            y: top as i32,
            width: map_w as u32,
            height: map_h as u32,
        };

        let colorbar = Rect {
            x: map.x,
            y: map.bottom() + (map_h * COLORBAR_PAD).round().max(1.0) as i32,
            width: map.width,
            height: bar as u32,
        };

        Layout {
            title_anchor: ((width / 2.0) as i32, (title_band * 0.8) as i32),
            map,
            colorbar,
        }
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn conus() -> Extent {
        Extent {
            lon_min: -124.77,
            lon_max: -67.06,
            lat_min: 25.07,
            lat_max: 49.4,
        }
    }

    #[test]
    fn should_keep_degrees_square() {
        let extent = conus();
        let layout = Layout::new((3000, 1800), &extent);

        let pixel_aspect = layout.map.width as f64 / layout.map.height as f64;
        assert!((pixel_aspect - extent.aspect()).abs() < 0.01);
    }

    #[test]
    fn should_fit_everything_on_canvas() {
        for extent in [
            conus(),
            Extent { lon_min: 0.0, lon_max: 1.0, lat_min: 0.0, lat_max: 10.0 },
            Extent { lon_min: -180.0, lon_max: 180.0, lat_min: -1.0, lat_max: 1.0 },
        ] {
            let layout = Layout::new((3000, 1800), &extent);

            assert!(layout.map.x >= 0 && layout.map.right() <= 3000);
            assert!(layout.map.y >= layout.title_anchor.1);
            assert!(layout.colorbar.y > layout.map.bottom());
            assert!(layout.colorbar.bottom() < 1800);
            assert_eq!(layout.colorbar.width, layout.map.width);
        }
    }

    #[test]
    fn should_place_points_in_axes_fraction() {
        let rect = Rect { x: 100, y: 200, width: 1000, height: 500 };

        assert_eq!(rect.at_fraction(0.0, 0.0), (100, 700));
        assert_eq!(rect.at_fraction(0.05, 0.08), (150, 660));
        assert_eq!(rect.at_fraction(1.0, 1.0), (1100, 200));
        assert_eq!((rect.right(), rect.bottom()), (1100, 700));
    }
}
