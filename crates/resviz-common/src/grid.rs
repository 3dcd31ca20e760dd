//! Grid descriptor for the 2-D reservoir simulation.

use crate::{ResvizError, ResvizResult};
use serde::{Deserialize, Serialize};

/// Immutable per-simulation grid constants.
///
/// Fields are stored in row-major `(nx, ny)` order: the x index varies
/// slowest, so cell `(ix, iy)` lives at flat index `ix * ny + iy`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridDescriptor {
    /// Number of cells in X direction
    pub nx: usize,
    /// Number of cells in Y direction
    pub ny: usize,
    /// Physical domain length in X
    pub lx: f64,
    /// Physical domain length in Y
    pub ly: f64,
}

impl GridDescriptor {
    /// Create a new grid descriptor.
    pub fn new(nx: usize, ny: usize, lx: f64, ly: f64) -> Self {
        Self { nx, ny, lx, ly }
    }

    /// Array shape in simulator order.
    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Total number of grid cells.
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    /// Check if grid is empty.
    pub fn is_empty(&self) -> bool {
        self.nx == 0 || self.ny == 0
    }

    /// Cell width.
    pub fn dx(&self) -> f64 {
        self.lx / self.nx as f64
    }

    /// Cell height.
    pub fn dy(&self) -> f64 {
        self.ly / self.ny as f64
    }

    /// Flat index of cell `(ix, iy)`.
    pub fn sub_to_index(&self, ix: usize, iy: usize) -> usize {
        ix * self.ny + iy
    }

    /// Cell subscripts of a flat index.
    pub fn index_to_sub(&self, index: usize) -> (usize, usize) {
        (index / self.ny, index % self.ny)
    }

    /// Physical center of cell `(ix, iy)`.
    pub fn cell_center(&self, ix: usize, iy: usize) -> (f64, f64) {
        ((ix as f64 + 0.5) * self.dx(), (iy as f64 + 0.5) * self.dy())
    }

    /// Map a physical coordinate to the subscripts of the cell containing it.
    ///
    /// Points on the far boundary belong to the last cell.
    pub fn xy_to_sub(&self, x: f64, y: f64) -> ResvizResult<(usize, usize)> {
        if !(0.0..=self.lx).contains(&x) || !(0.0..=self.ly).contains(&y) || self.is_empty() {
            return Err(ResvizError::PointOutsideGrid { x, y });
        }

        let ix = ((x / self.dx()).floor() as usize).min(self.nx - 1);
        let iy = ((y / self.dy()).floor() as usize).min(self.ny - 1);
        Ok((ix, iy))
    }

    /// Map a physical coordinate to the flat index of the cell containing it.
    pub fn xy_to_index(&self, x: f64, y: f64) -> ResvizResult<usize> {
        let (ix, iy) = self.xy_to_sub(x, y)?;
        Ok(self.sub_to_index(ix, iy))
    }

    /// Verify that a flat field has exactly one value per cell.
    pub fn check_field(&self, field: &[f64], what: &str) -> ResvizResult<()> {
        if field.len() != self.len() {
            return Err(ResvizError::shape_mismatch(what, self.len(), field.len()));
        }
        Ok(())
    }
}
