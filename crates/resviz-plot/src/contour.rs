//! Filled contour (isoband) generation.
//!
//! Each grid cell between four nodes is split into two triangles and every
//! triangle is clipped against each band `[lower, upper]` under linear
//! interpolation. The result is a set of convex polygons per band in data
//! coordinates. Cells touching a non-finite node are dropped.

use crate::color::{Color, Colormap};

/// A point in data coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// All polygons whose values fall between two adjacent levels
#[derive(Debug, Clone, PartialEq)]
pub struct ContourBand {
    pub lower: f64,
    pub upper: f64,
    pub color: Color,
    pub polygons: Vec<Vec<Point>>,
}

/// Result of a filled-contour call
#[derive(Debug, Clone, PartialEq)]
pub struct FilledContour {
    pub levels: Vec<f64>,
    pub colormap: Colormap,
    pub bands: Vec<ContourBand>,
}

impl FilledContour {
    /// Total number of polygons over all bands.
    pub fn polygon_count(&self) -> usize {
        self.bands.iter().map(|b| b.polygons.len()).sum()
    }
}

/// `n` evenly spaced values from `lo` to `hi` inclusive.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { hi } else { lo + step * i as f64 })
                .collect()
        }
    }
}

/// Saturation levels: 11 levels nudged just past `[0, 1]` so that exact
/// boundary values are filled.
pub fn saturation_levels() -> Vec<f64> {
    linspace(0.0 - 1e-7, 1.0 + 1e-7, 11)
}

/// Correlation levels: 11 levels spanning `[-1, 1]`.
pub fn correlation_levels() -> Vec<f64> {
    linspace(-1.0, 1.0, 11)
}

/// Levels covering the finite range of `data` when none are given.
pub fn auto_levels(data: &[f64], n_bands: usize) -> Vec<f64> {
    let (min, max) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if !min.is_finite() {
        return vec![0.0, 1.0];
    }
    if max - min < f64::EPSILON {
        return vec![min - 1e-7, max + 1e-7];
    }
    linspace(min, max, n_bands.max(1) + 1)
}

/// A vertex carrying its interpolated value
#[derive(Debug, Clone, Copy)]
struct Node {
    x: f64,
    y: f64,
    v: f64,
}

/// Keep the part of `poly` on one side of `threshold` (Sutherland-Hodgman).
fn clip(poly: &[Node], threshold: f64, keep_above: bool) -> Vec<Node> {
    let inside = |n: &Node| {
        if keep_above {
            n.v >= threshold
        } else {
            n.v <= threshold
        }
    };

    let mut out = Vec::with_capacity(poly.len() + 2);
    for i in 0..poly.len() {
        let cur = poly[i];
        let next = poly[(i + 1) % poly.len()];
        let cur_in = inside(&cur);

        if cur_in {
            out.push(cur);
        }
        if cur_in != inside(&next) {
            let t = (threshold - cur.v) / (next.v - cur.v);
            out.push(Node {
                x: cur.x + t * (next.x - cur.x),
                y: cur.y + t * (next.y - cur.y),
                v: threshold,
            });
        }
    }
    out
}

/// Filled contours of a display-ordered grid.
///
/// # Arguments
/// * `values` - Grid values, row-major with `xs.len()` columns and `ys.len()` rows
/// * `xs` - Node x coordinates (one per column)
/// * `ys` - Node y coordinates (one per row)
/// * `levels` - Ascending band boundaries
/// * `colormap` - Band colors, evaluated at band midpoints
pub fn contourf(
    values: &[f64],
    xs: &[f64],
    ys: &[f64],
    levels: &[f64],
    colormap: &Colormap,
) -> FilledContour {
    let width = xs.len();
    let height = ys.len();
    let (vmin, vmax) = match (levels.first(), levels.last()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => (0.0, 1.0),
    };

    let mut bands: Vec<ContourBand> = levels
        .windows(2)
        .map(|w| ContourBand {
            lower: w[0],
            upper: w[1],
            color: colormap.eval_range(0.5 * (w[0] + w[1]), vmin, vmax),
            polygons: Vec::new(),
        })
        .collect();

    if width < 2 || height < 2 || values.len() != width * height {
        return FilledContour {
            levels: levels.to_vec(),
            colormap: colormap.clone(),
            bands,
        };
    }

    let node = |i: usize, j: usize| Node {
        x: xs[i],
        y: ys[j],
        v: values[j * width + i],
    };

    for j in 0..(height - 1) {
        for i in 0..(width - 1) {
            let n00 = node(i, j);
            let n10 = node(i + 1, j);
            let n11 = node(i + 1, j + 1);
            let n01 = node(i, j + 1);

            // Skip cells with NaN values
            if ![n00, n10, n11, n01].iter().all(|n| n.v.is_finite()) {
                continue;
            }

            for tri in [[n00, n10, n11], [n00, n11, n01]] {
                let tmin = tri.iter().map(|n| n.v).fold(f64::INFINITY, f64::min);
                let tmax = tri.iter().map(|n| n.v).fold(f64::NEG_INFINITY, f64::max);

                for band in bands.iter_mut() {
                    if tmax < band.lower || tmin > band.upper {
                        continue;
                    }
                    let poly = clip(&clip(&tri, band.lower, true), band.upper, false);
                    if poly.len() >= 3 {
                        band.polygons
                            .push(poly.iter().map(|n| Point::new(n.x, n.y)).collect());
                    }
                }
            }
        }
    }

    FilledContour {
        levels: levels.to_vec(),
        colormap: colormap.clone(),
        bands,
    }
}

/// Signed area of a polygon (shoelace).
pub fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        area += p.x * q.y - q.x * p.y;
    }
    0.5 * area
}
