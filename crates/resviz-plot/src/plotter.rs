//! The plotting context threaded through every coordinate-dependent call.

use crate::config::PlotConfig;
use crate::figure::Figure;
use resviz_common::{CoordMode, GridDescriptor, ResvizResult};

/// Grid metadata plus plot configuration.
///
/// Field extents and well rescaling both read the coordinate mode from
/// here, so panels drawn through one `Plotter` always agree.
#[derive(Debug, Clone, PartialEq)]
pub struct Plotter {
    grid: GridDescriptor,
    config: PlotConfig,
}

impl Plotter {
    /// Create a plotter, validating the configuration.
    pub fn new(grid: GridDescriptor, config: PlotConfig) -> ResvizResult<Self> {
        config.validate()?;
        Ok(Self { grid, config })
    }

    /// Plotter with the default configuration.
    pub fn with_defaults(grid: GridDescriptor) -> Self {
        Self {
            grid,
            config: PlotConfig::default(),
        }
    }

    pub fn grid(&self) -> &GridDescriptor {
        &self.grid
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn coord_mode(&self) -> CoordMode {
        self.config.coord_mode
    }

    /// Copy of this plotter under another coordinate mode.
    pub fn with_coord_mode(&self, mode: CoordMode) -> Self {
        let mut next = self.clone();
        next.config.coord_mode = mode;
        next
    }

    /// Axis extents `(Lx, Ly)` in the active mode.
    pub fn extents(&self) -> (f64, f64) {
        self.config.coord_mode.extents(&self.grid)
    }

    /// Scale factors for absolute well coordinates in the active mode.
    pub fn well_scale(&self) -> (f64, f64) {
        self.config.coord_mode.well_scale(&self.grid)
    }

    /// Blank figure using the configured dpi and font size.
    pub fn figure(&self, nrows: usize, ncols: usize, figsize: Option<(f64, f64)>) -> Figure {
        let mut fig = Figure::new(
            nrows,
            ncols,
            figsize.unwrap_or_else(|| self.config.figsize()),
            self.config.dpi,
        );
        fig.font_size = self.config.font_size;
        fig
    }
}
