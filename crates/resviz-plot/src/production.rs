//! Production curves: oil fraction at each producer over time.

use crate::color::Color;
use crate::figure::{Anchor, ArtistId, Axes, Figure, HAlign, Line2D, LineStyle, Marker, Text, VAlign};
use crate::layout::n_row_col;
use crate::panels::Labeled;
use crate::plotter::Plotter;
use resviz_common::{ProductionSeries, ResvizError, ResvizResult};
use tracing::debug;

/// At most this many wells get their own panel.
pub const MAX_PRODUCTION_PANELS: usize = 24;

pub const PRODUCTION_YLIM: (f64, f64) = (-0.01, 1.01);

/// Time axis `1..=n_steps`.
pub fn time_axis(n_steps: usize) -> Vec<f64> {
    (1..=n_steps).map(|t| t as f64).collect()
}

fn padded_xlim(n_steps: usize) -> (f64, f64) {
    let span = (n_steps.max(2) - 1) as f64;
    (1.0 - 0.05 * span, n_steps.max(2) as f64 + 0.05 * span)
}

/// Plot `1 - production` for every producing well, one color per well.
///
/// Observations, when given, are drawn as star markers in the color of
/// the matching curve. Returns one handle per well curve, in well order.
pub fn production1(
    ax: &mut Axes,
    production: &ProductionSeries,
    obs: Option<&ProductionSeries>,
) -> ResvizResult<Vec<ArtistId>> {
    let tt = time_axis(production.n_steps());

    let mut handles = Vec::with_capacity(production.n_wells());
    for i in 0..production.n_wells() {
        let mut line = Line2D::new(tt.clone(), production.oil(i), Color::cycle(i));
        line.label = Some(i.to_string());
        handles.push(ax.plot(line));
    }

    if let Some(obs) = obs {
        if obs.n_steps() != production.n_steps() {
            return Err(ResvizError::shape_mismatch("observation steps", production.n_steps(), obs.n_steps()));
        }
        for i in 0..obs.n_wells() {
            let mut marks = Line2D::new(tt.clone(), obs.oil(i), Color::cycle(i));
            marks.style = LineStyle::None;
            marks.marker = Marker::Star;
            marks.marker_size = 6.0;
            ax.plot(marks);
        }
    }

    ax.legend_from_lines(Some("Prod.\nwell #."), 3, true);
    ax.set_ylabel("Oil saturation (rel. production)");
    ax.set_xlabel("Time index");
    let (lo, hi) = padded_xlim(production.n_steps());
    ax.set_xlim(lo, hi);
    ax.set_ylim(PRODUCTION_YLIM.0, PRODUCTION_YLIM.1);
    Ok(handles)
}

/// Line style keyed on the series label.
fn series_style(label: &str, x: Vec<f64>, y: Vec<f64>) -> Line2D {
    let mut line = Line2D::new(x, y, Color::BLACK);
    line.width = 0.5;
    line.marker_size = 4.0;
    match label {
        "Truth" => line.width = 2.0,
        "Noisy" => {
            line.style = LineStyle::None;
            line.marker = Marker::Star;
        }
        "Prior" => line.color = Color::cycle(0).with_alpha(0.2),
        "ES" => line.color = Color::cycle(1).with_alpha(0.2),
        _ => {}
    }
    line
}

impl Plotter {
    /// One panel per producing well comparing labelled production series.
    ///
    /// Each entry holds one series (e.g. the truth) or one per ensemble
    /// member; only the first member of an entry is named in the legend.
    pub fn productions(
        &self,
        series: &Labeled<Vec<ProductionSeries>>,
        n_prod: Option<usize>,
        figsize: Option<(f64, f64)>,
        title: &str,
    ) -> ResvizResult<Figure> {
        let reference = series
            .get("Truth")
            .or_else(|| series.iter().next().map(|(_, s)| s))
            .and_then(|members| members.first())
            .ok_or(ResvizError::EmptyLayout)?;
        let n_prod = n_prod
            .unwrap_or_else(|| reference.n_wells())
            .min(MAX_PRODUCTION_PANELS);

        for (label, members) in series.iter() {
            for member in members {
                if member.n_wells() < n_prod {
                    return Err(ResvizError::shape_mismatch(
                        format!("{} production wells", label),
                        n_prod,
                        member.n_wells(),
                    ));
                }
            }
        }

        let (nrows, ncols) = n_row_col(n_prod, self.config().aspect_ratio())?;
        let mut figure = self.figure(nrows, ncols, figsize);
        figure.set_suptitle(format!("Oil productions {}", title).trim_end().to_string());
        let total = figure.all_axes().len();
        for i in n_prod..total {
            figure.axes_mut(i)?.visible = false;
        }

        let n_steps = reference.n_steps();
        for i in 0..n_prod {
            let ax = figure.axes_mut(i)?;
            let tag = if i == 0 { format!("Well {}", i) } else { i.to_string() };
            let mut text = Text::new(1.0, 1.0, tag);
            text.anchor = Anchor::Axes;
            text.halign = HAlign::Right;
            text.valign = VAlign::Top;
            text.size = 12.0;
            ax.text(text);

            for (label, members) in series.iter() {
                for (j, member) in members.iter().enumerate() {
                    let mut line = series_style(label, time_axis(member.n_steps()), member.oil(i));
                    if j == 0 {
                        line.label = Some(label.to_string());
                    }
                    ax.plot(line);
                }
            }

            let (lo, hi) = padded_xlim(n_steps);
            ax.set_xlim(lo, hi);
            ax.set_ylim(PRODUCTION_YLIM.0, PRODUCTION_YLIM.1);
            if i + 1 == n_prod {
                ax.legend_from_lines(None, 1, true);
            }
        }

        debug!(wells = n_prod, entries = series.len(), "Drew production panels");
        Ok(figure)
    }
}
