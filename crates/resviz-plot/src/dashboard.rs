//! The 2×2 situational dashboard and its frame animator.
//!
//! Layout: initial oil saturation (top left), current oil saturation with
//! wells (top right), production curves (bottom left), bottom right
//! reserved and hidden.

use crate::color::Color;
use crate::figure::{ArtistId, Figure};
use crate::plotter::Plotter;
use crate::production::{production1, time_axis};
use crate::wells::WellOverlay;
use resviz_common::{ProductionSeries, ResvizError, ResvizResult, WellTable};
use std::time::Duration;
use tracing::{info, trace};

pub const INITIAL_AXES: usize = 0;
pub const FIELD_AXES: usize = 1;
pub const PRODUCTION_AXES: usize = 2;
pub const RESERVED_AXES: usize = 3;

pub const DASHBOARD_FIGSIZE: (f64, f64) = (12.0, 10.0);

/// Simulation output shown on the dashboard.
#[derive(Debug, Clone, Copy)]
pub struct DashboardInput<'a> {
    /// Water saturation per time step
    pub saturation: &'a [Vec<f64>],
    pub production: &'a ProductionSeries,
    pub injectors: &'a WellTable,
    pub producers: &'a WellTable,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardOptions {
    pub title: Option<String>,
    /// Build an [`Animation`] alongside the static figure
    pub animate: bool,
    /// Frame interval; the configured one when `None`
    pub interval: Option<Duration>,
}

/// Handles of the artists the animator replaces each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameState {
    /// Current saturation contour on the field axes
    pub field: ArtistId,
}

/// Frame-by-frame driver for a dashboard figure.
///
/// Frames must be applied in order by a single caller; each update takes
/// the previous [`FrameState`] and returns the next one.
#[derive(Debug, Clone)]
pub struct Animation<'a> {
    plotter: Plotter,
    saturation: &'a [Vec<f64>],
    production: &'a ProductionSeries,
    lines: Vec<ArtistId>,
    interval: Duration,
    state: FrameState,
}

impl<'a> Animation<'a> {
    pub fn n_frames(&self) -> usize {
        self.saturation.len()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// State after the most recent update.
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Redraw `fig` for time index `i_t`, starting from `state`.
    ///
    /// The contour named by `state` is removed (a missing contour is not
    /// an error) along with any other contour left on the field axes, so
    /// replaying a frame from an old state still leaves exactly one. The
    /// field at `i_t` is drawn in its place and, for
    /// `i_t >= 1`, every production curve is cut to its first `i_t - 1`
    /// samples.
    pub fn step(&self, fig: &mut Figure, state: FrameState, i_t: usize) -> ResvizResult<FrameState> {
        let frame = self
            .saturation
            .get(i_t)
            .ok_or(ResvizError::FrameOutOfRange { frame: i_t, len: self.saturation.len() })?;

        let ax = fig.axes_mut(FIELD_AXES)?;
        match ax.remove(state.field) {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                trace!(handle = %state.field, "Previous field contour already removed");
            }
            Err(e) => return Err(e),
        }
        // A stale state can leave the live contour behind
        for leftover in ax.contour_ids() {
            ax.remove(leftover)?;
            trace!(handle = %leftover, "Removed leftover field contour");
        }
        let field = self.plotter.oilfield(ax, frame, None)?;

        if i_t >= 1 {
            let tt = time_axis(self.production.n_steps());
            let n = (i_t - 1).min(tt.len());
            let ax = fig.axes_mut(PRODUCTION_AXES)?;
            for (well, &handle) in self.lines.iter().enumerate() {
                let oil = self.production.oil(well);
                let line = ax
                    .line_mut(handle)
                    .ok_or_else(|| ResvizError::ArtistNotFound(handle.to_string()))?;
                line.set_data(tt[..n].to_vec(), oil[..n].to_vec());
            }
        }

        trace!(frame = i_t, handle = %field, "Updated dashboard frame");
        Ok(FrameState { field })
    }

    /// Apply frame `i_t` and remember the resulting state.
    pub fn update(&mut self, fig: &mut Figure, i_t: usize) -> ResvizResult<FrameState> {
        self.state = self.step(fig, self.state, i_t)?;
        Ok(self.state)
    }

    /// Apply every frame in order, handing each rendered PNG to `sink`.
    ///
    /// Returns the number of frames rendered.
    pub fn render_frames<F>(&mut self, fig: &mut Figure, mut sink: F) -> ResvizResult<usize>
    where
        F: FnMut(usize, Vec<u8>) -> ResvizResult<()>,
    {
        let n = self.n_frames();
        for i_t in 0..n {
            self.update(fig, i_t)?;
            sink(i_t, fig.to_png()?)?;
        }
        Ok(n)
    }
}

/// A composed dashboard.
#[derive(Debug, Clone)]
pub struct Dashboard<'a> {
    pub figure: Figure,
    /// Contour of the initial field; the colorbar is keyed to it
    pub initial_field: ArtistId,
    pub production_lines: Vec<ArtistId>,
    /// Present when animation was requested
    pub animation: Option<Animation<'a>>,
}

impl Plotter {
    /// Compose the dashboard. The top-right panel starts at the last
    /// time step.
    pub fn dashboard<'a>(&self, input: DashboardInput<'a>, opts: &DashboardOptions) -> ResvizResult<Dashboard<'a>> {
        let (first, last) = match (input.saturation.first(), input.saturation.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ResvizError::FrameOutOfRange { frame: 0, len: 0 }),
        };

        let mut figure = self.figure(2, 2, Some(DASHBOARD_FIGSIZE));

        let ax = figure.axes_mut(INITIAL_AXES)?;
        ax.set_title("Oil saturation (Initial)");
        let initial_field = self.oilfield(ax, first, None)?;
        ax.set_ylabel(format!("y ({})", self.coord_mode()));

        let ax = figure.axes_mut(FIELD_AXES)?;
        ax.set_title("Oil saturation");
        let field = self.oilfield(ax, last, None)?;
        self.well_scatter(ax, input.injectors, &WellOverlay::injectors())?;
        let producer_colors = (0..input.producers.len()).map(Color::cycle).collect();
        self.well_scatter(ax, input.producers, &WellOverlay::producers().with_colors(producer_colors))?;

        let ax = figure.axes_mut(PRODUCTION_AXES)?;
        ax.set_title("Saturation (production)");
        let production_lines = production1(ax, input.production, None)?;
        ax.legend_from_lines(Some("Well num."), 3, true);

        figure.axes_mut(RESERVED_AXES)?.visible = false;
        figure.colorbar(initial_field, None)?;
        if let Some(title) = &opts.title {
            figure.set_suptitle(title.clone());
        }

        let animation = opts.animate.then(|| Animation {
            plotter: self.clone(),
            saturation: input.saturation,
            production: input.production,
            lines: production_lines.clone(),
            interval: opts.interval.unwrap_or_else(|| self.config().frame_interval()),
            state: FrameState { field },
        });

        info!(
            frames = input.saturation.len(),
            wells = input.producers.len(),
            animate = opts.animate,
            "Built dashboard"
        );

        Ok(Dashboard {
            figure,
            initial_field,
            production_lines,
            animation,
        })
    }
}
