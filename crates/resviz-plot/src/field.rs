//! Field renderer: flat simulator fields as filled-contour images.

use crate::color::Colormap;
use crate::contour::{auto_levels, contourf, saturation_levels};
use crate::figure::{ArtistId, Axes};
use crate::plotter::Plotter;
use resviz_common::{GridDescriptor, ResvizResult};
use tracing::debug;

/// Contour options for one field rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOptions {
    /// Band boundaries; derived from the data range when `None`
    pub levels: Option<Vec<f64>>,
    pub colormap: Colormap,
    pub title: Option<String>,
}

impl FieldOptions {
    pub fn new(levels: Vec<f64>, colormap: Colormap) -> Self {
        Self {
            levels: Some(levels),
            colormap,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            levels: None,
            colormap: Colormap::oil_water(),
            title: None,
        }
    }
}

/// Reorder a simulator field (`(Nx, Ny)` row-major) into display order:
/// `Ny` rows of `Nx` values, row 0 at the bottom.
pub fn display_grid(grid: &GridDescriptor, field: &[f64]) -> Vec<f64> {
    let (nx, ny) = grid.shape();
    let mut out = vec![f64::NAN; nx * ny];
    for ix in 0..nx {
        for iy in 0..ny {
            out[iy * nx + ix] = field[grid.sub_to_index(ix, iy)];
        }
    }
    out
}

/// Cell-center node coordinates for axis extents `(lx, ly)`.
pub fn cell_centers(grid: &GridDescriptor, extents: (f64, f64)) -> (Vec<f64>, Vec<f64>) {
    let (nx, ny) = grid.shape();
    let xs = (0..nx).map(|i| (i as f64 + 0.5) * extents.0 / nx as f64).collect();
    let ys = (0..ny).map(|j| (j as f64 + 0.5) * extents.1 / ny as f64).collect();
    (xs, ys)
}

impl Plotter {
    /// Contour-plot a flat field on `ax` and return the contour handle.
    ///
    /// The field must have `Nx * Ny` entries in simulator order. Axis
    /// limits are set to the extents of the active coordinate mode; the
    /// y label is only set on the first column and the x label only on
    /// the last row.
    pub fn field(&self, ax: &mut Axes, zz: &[f64], opts: &FieldOptions) -> ResvizResult<ArtistId> {
        let grid = self.grid();
        grid.check_field(zz, "field")?;

        let extents = self.extents();
        let values = display_grid(grid, zz);
        let (xs, ys) = cell_centers(grid, extents);
        let levels = match &opts.levels {
            Some(levels) => levels.clone(),
            None => auto_levels(&values, 10),
        };

        let (min, max) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        debug!(
            len = zz.len(),
            min = min,
            max = max,
            levels = levels.len(),
            "Rendering field"
        );

        let contour = contourf(&values, &xs, &ys, &levels, &opts.colormap);
        debug!(
            bands = contour.bands.len(),
            polygons = contour.polygon_count(),
            "Contoured field"
        );

        if let Some(title) = &opts.title {
            ax.set_title(title.clone());
        }
        let handle = ax.contourf(contour);

        ax.set_xlim(0.0, extents.0);
        ax.set_ylim(0.0, extents.1);
        if ax.is_first_col() {
            ax.set_ylabel("y");
        }
        if ax.is_last_row() {
            ax.set_xlabel("x");
        }
        Ok(handle)
    }

    /// Oil saturation map: renders `1 - ss` with the saturation levels
    /// and the configured colormap.
    pub fn oilfield(&self, ax: &mut Axes, ss: &[f64], title: Option<&str>) -> ResvizResult<ArtistId> {
        let oil: Vec<f64> = ss.iter().map(|s| 1.0 - s).collect();
        let mut opts = FieldOptions::new(saturation_levels(), self.config().saturation_colormap()?);
        opts.title = title.map(str::to_string);
        self.field(ax, &oil, &opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_grid_transposes() {
        let grid = GridDescriptor::new(3, 2, 3.0, 2.0);
        // field[ix * ny + iy] = 10 * ix + iy
        let field: Vec<f64> = (0..3)
            .flat_map(|ix| (0..2).map(move |iy| (10 * ix + iy) as f64))
            .collect();
        let out = display_grid(&grid, &field);
        assert_eq!(out, vec![0.0, 10.0, 20.0, 1.0, 11.0, 21.0]);
    }

    #[test]
    fn test_cell_centers() {
        let grid = GridDescriptor::new(4, 2, 2.0, 1.0);
        let (xs, ys) = cell_centers(&grid, (1.0, 1.0));
        assert_eq!(xs, vec![0.125, 0.375, 0.625, 0.875]);
        assert_eq!(ys, vec![0.25, 0.75]);
    }
}
