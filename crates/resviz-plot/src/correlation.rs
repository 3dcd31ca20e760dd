//! Correlation maps between one reference cell and every other cell.

use crate::color::{Color, Colormap};
use crate::contour::correlation_levels;
use crate::field::FieldOptions;
use crate::figure::{ArtistId, Axes, Line2D, LineStyle, Marker};
use crate::plotter::Plotter;
use resviz_common::stats::{correlation_field, reference_series};
use resviz_common::{Ensemble, ResvizResult};

impl Plotter {
    /// Render the correlation of reference series `b` against every
    /// column of `ensemble`, on fixed levels over `[-1, 1]`.
    ///
    /// A constant `b` yields an all-NaN field, which renders as an empty
    /// contour rather than failing.
    pub fn corr_field(
        &self,
        ax: &mut Axes,
        ensemble: &Ensemble,
        b: &[f64],
        title: Option<&str>,
    ) -> ResvizResult<ArtistId> {
        let corrs = correlation_field(ensemble, b)?;
        let mut opts = FieldOptions::new(correlation_levels(), Colormap::bwr());
        opts.title = title.map(str::to_string);
        self.field(ax, &corrs, &opts)
    }

    /// Correlation map against the cell containing physical point `xy`,
    /// with a star marking the reference location.
    pub fn corr_field_vs(
        &self,
        ax: &mut Axes,
        ensemble: &Ensemble,
        xy: (f64, f64),
        title: Option<&str>,
    ) -> ResvizResult<ArtistId> {
        let (_, b) = reference_series(ensemble, self.grid(), xy.0, xy.1)?;
        let handle = self.corr_field(ax, ensemble, &b, title)?;

        let (x, y) = self.coord_mode().scale_point(self.grid(), xy.0, xy.1);
        let mut star = Line2D::new(vec![x], vec![y], Color::BLACK);
        star.style = LineStyle::None;
        star.marker = Marker::Star;
        star.marker_size = 4.0;
        ax.plot(star);
        Ok(handle)
    }
}
