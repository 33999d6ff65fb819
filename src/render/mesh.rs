//! Pseudocolor mesh rasterization straight into the RGB canvas buffer.
//!
//! Cell boundaries sit halfway between neighbouring centres, and the outer
//! cells extend half a spacing beyond the first and last centres. Each
//! pixel of the map area is sampled at its centre.

use super::{colormap::ColorScale, layout::Rect};
use crate::{climatology::MaskedGrid, dataset::Extent};

/// Boundaries of the cells around `centres`, in the same order.
pub fn cell_edges(centres: &[f64]) -> Vec<f64> {
    match centres {
        [] => Vec::new(),
        [only] => vec![only - 0.5, only + 0.5],
        _ => {
            let n = centres.len();
            let mut edges = Vec::with_capacity(n + 1);
            edges.push(centres[0] - (centres[1] - centres[0]) / 2.0);
            edges.extend(centres.windows(2).map(|pair| (pair[0] + pair[1]) / 2.0));
            edges.push(centres[n - 1] + (centres[n - 1] - centres[n - 2]) / 2.0);
            edges
        }
    }
}

/// Cell lookup along one axis, ascending or descending.
#[derive(Debug, Clone)]
pub struct Axis {
    /// Edges in ascending order; negated when the coordinate descends.
    edges: Vec<f64>,
    sign: f64,
}

impl Axis {
    pub fn new(centres: &[f64]) -> Self {
        let edges = cell_edges(centres);
        let descending = edges.len() > 1 && edges[0] > edges[edges.len() - 1];
        let sign = if descending { -1.0 } else { 1.0 };

        Axis {
            edges: edges.into_iter().map(|e| e * sign).collect(),
            sign,
        }
    }

    /// Index of the cell containing `value`. The far edge belongs to the
    /// last cell.
    pub fn locate(&self, value: f64) -> Option<usize> {
        let v = value * self.sign;
        let idx = self.edges.partition_point(|&e| e <= v);

        if idx == 0 {
            None
        } else if idx == self.edges.len() {
            (self.edges.last() == Some(&v)).then(|| idx - 2)
        } else {
            Some(idx - 1)
        }
    }
}

/// Paints every valid cell of `grid` into the map rectangle of `buffer`.
/// Excluded cells leave the underlying pixels untouched.
#[allow(clippy::too_many_arguments)]
pub fn rasterize(
    buffer: &mut [u8],
    canvas_width: u32,
    rect: Rect,
    extent: &Extent,
    lat: &[f64],
    lon: &[f64],
    grid: &MaskedGrid,
    scale: &ColorScale,
) {
    let lon_axis = Axis::new(lon);
    let lat_axis = Axis::new(lat);

    let cols: Vec<Option<usize>> = (0..rect.width)
        .map(|px| {
            let f = (px as f64 + 0.5) / rect.width as f64;
            lon_axis.locate(extent.lon_min + f * extent.width())
        })
        .collect();
    let rows: Vec<Option<usize>> = (0..rect.height)
        .map(|py| {
            let f = (py as f64 + 0.5) / rect.height as f64;
            lat_axis.locate(extent.lat_max - f * extent.height())
        })
        .collect();

    let stride = canvas_width as usize * 3;
    for (py, row) in rows.iter().enumerate() {
        let Some(row) = *row else { continue };
        let y = rect.y + py as i32;
        if y < 0 {
            continue;
        }

        for (px, col) in cols.iter().enumerate() {
            let Some(col) = *col else { continue };
            let Some(value) = grid.get(row, col) else { continue };
            let x = rect.x + px as i32;
            if x < 0 || x as u32 >= canvas_width {
                continue;
            }

            let offset = y as usize * stride + x as usize * 3;
            if let Some(pixel) = buffer.get_mut(offset..offset + 3) {
                let color = scale.color(value);
                pixel.copy_from_slice(&[color.0, color.1, color.2]);
            }
        }
    }
}

// -- Tests -------------------------------------------------------------------
