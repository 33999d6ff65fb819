//! Rectangle clipping for overlay geometry, in degrees.
//!
//! Polylines use Liang-Barsky per segment and split where they leave the
//! box. Polygons use Sutherland-Hodgman, one box edge at a time.

use crate::dataset::Extent;

pub type Point = (f64, f64);

/// Clips a polyline to `extent`, returning the visible pieces.
pub fn clip_polyline(line: &[Point], extent: &Extent) -> Vec<Vec<Point>> {
    let mut pieces: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for segment in line.windows(2) {
        match clip_segment(segment[0], segment[1], extent) {
            Some((a, b)) => {
                if current.last() != Some(&a) {
                    if current.len() > 1 {
                        pieces.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(a);
                }
                current.push(b);
                // Leaving the box ends the piece.
                if b != segment[1] {
                    pieces.push(std::mem::take(&mut current));
                }
            }
            None => {
                if current.len() > 1 {
                    pieces.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
    }

    if current.len() > 1 {
        pieces.push(current);
    }
    pieces
}

/// Liang-Barsky: the part of segment p0-p1 inside `extent`, if any.
fn clip_segment(p0: Point, p1: Point, extent: &Extent) -> Option<(Point, Point)> {
    let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, p0.0 - extent.lon_min),
        (dx, extent.lon_max - p0.0),
        (-dy, p0.1 - extent.lat_min),
        (dy, extent.lat_max - p0.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| -> Point {
        if t == 0.0 {
            p0
        } else if t == 1.0 {
            p1
        } else {
            (p0.0 + t * dx, p0.1 + t * dy)
        }
    };
    Some((at(t0), at(t1)))
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    West,
    East,
    South,
    North,
}

impl Edge {
    fn is_inside(&self, p: Point, extent: &Extent) -> bool {
        match self {
            Edge::West => p.0 >= extent.lon_min,
            Edge::East => p.0 <= extent.lon_max,
            Edge::South => p.1 >= extent.lat_min,
            Edge::North => p.1 <= extent.lat_max,
        }
    }

    fn intersect(&self, p: Point, q: Point, extent: &Extent) -> Point {
        let (dx, dy) = (q.0 - p.0, q.1 - p.1);
        match self {
            Edge::West => (extent.lon_min, p.1 + (extent.lon_min - p.0) / dx * dy),
            Edge::East => (extent.lon_max, p.1 + (extent.lon_max - p.0) / dx * dy),
            Edge::South => (p.0 + (extent.lat_min - p.1) / dy * dx, extent.lat_min),
            Edge::North => (p.0 + (extent.lat_max - p.1) / dy * dx, extent.lat_max),
        }
    }
}

/// Sutherland-Hodgman: clips a closed ring to `extent`. Fewer than three
/// vertices back means nothing visible.
pub fn clip_polygon(ring: &[Point], extent: &Extent) -> Vec<Point> {
    let mut output = ring.to_vec();

    for edge in [Edge::West, Edge::East, Edge::South, Edge::North] {
        if output.is_empty() {
            break;
        }
        let input = std::mem::take(&mut output);
        let n = input.len();

        for i in 0..n {
            let current = input[i];
            let next = input[(i + 1) % n];

            match (edge.is_inside(current, extent), edge.is_inside(next, extent)) {
                (true, true) => output.push(next),
                (true, false) => output.push(edge.intersect(current, next, extent)),
                (false, true) => {
                    output.push(edge.intersect(current, next, extent));
                    output.push(next);
                }
                (false, false) => {}
            }
        }
    }

    if output.len() < 3 {
        output.clear();
    }
    output
}

// -- Tests -------------------------------------------------------------------
