//! Rendering for reservoir simulation output.
//!
//! Implements:
//! - Saturation and correlation maps (filled contours)
//! - Injector/producer overlays
//! - Production curves
//! - Multi-panel grids and the animated dashboard
//!
//! Figures are kept as a retained artist model and rasterized with
//! tiny-skia; see [`Figure::render`] and [`Figure::to_png`].

pub mod color;
pub mod config;
pub mod contour;
pub mod correlation;
pub mod dashboard;
pub mod field;
pub mod figure;
pub mod glyphs;
pub mod layout;
pub mod panels;
pub mod plotter;
pub mod png;
pub mod production;
pub mod raster;
pub mod wells;

pub use color::{Color, Colormap};
pub use config::PlotConfig;
pub use dashboard::{Animation, Dashboard, DashboardInput, DashboardOptions, FrameState};
pub use field::FieldOptions;
pub use figure::{ArtistId, Axes, Figure};
pub use layout::n_row_col;
pub use panels::{Labeled, PanelGrid, SubplotOptions};
pub use plotter::Plotter;
pub use production::production1;
pub use wells::{WellKind, WellOverlay};
