//! Retained figure model: a figure owns a grid of axes, each axes owns an
//! ordered list of artists addressed by [`ArtistId`] handles.
//!
//! Nothing here draws pixels; see [`crate::raster`] for that.

use crate::color::{Color, Colormap};
use crate::contour::FilledContour;
use resviz_common::{ResvizError, ResvizResult};
use std::fmt;

/// Handle of a drawn artist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtistId {
    /// Flat index of the owning axes within its figure
    pub axes: usize,
    pub serial: u64,
}

impl fmt::Display for ArtistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "axes{}/artist{}", self.axes, self.serial)
    }
}

/// Z-order defaults, lowest drawn first.
pub mod zorder {
    pub const CONTOUR: f32 = 1.0;
    pub const WELLS: f32 = 1.5;
    pub const LINES: f32 = 2.0;
    pub const TEXT: f32 = 3.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    None,
    TriangleDown,
    TriangleUp,
    Star,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    None,
}

/// Coordinate system of a text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Data coordinates
    Data,
    /// Axes fraction, `(0, 0)` lower-left to `(1, 1)` upper-right
    Axes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Marker collection
#[derive(Debug, Clone, PartialEq)]
pub struct Scatter {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub marker: Marker,
    /// Marker area in points squared
    pub size: f32,
    /// One face color per point, or a single broadcast color
    pub colors: Vec<Color>,
    pub edge_color: Color,
    /// Whether markers are clipped to the axes rectangle
    pub clip: bool,
}

impl Scatter {
    pub fn color_of(&self, i: usize) -> Color {
        match self.colors.len() {
            0 => Color::BLACK,
            1 => self.colors[0],
            _ => self.colors[i % self.colors.len()],
        }
    }
}

/// Polyline with optional per-point markers
#[derive(Debug, Clone, PartialEq)]
pub struct Line2D {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: Color,
    /// Line width in points
    pub width: f32,
    pub style: LineStyle,
    pub marker: Marker,
    /// Marker diameter in points
    pub marker_size: f32,
    pub label: Option<String>,
}

impl Line2D {
    pub fn new(x: Vec<f64>, y: Vec<f64>, color: Color) -> Self {
        Self {
            x,
            y,
            color,
            width: 1.5,
            style: LineStyle::Solid,
            marker: Marker::None,
            marker_size: 6.0,
            label: None,
        }
    }

    /// Replace the plotted data.
    pub fn set_data(&mut self, x: Vec<f64>, y: Vec<f64>) {
        self.x = x;
        self.y = y;
    }

    pub fn len(&self) -> usize {
        self.x.len().min(self.y.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: Color,
    /// Font size in points
    pub size: f32,
    pub anchor: Anchor,
    pub halign: HAlign,
    pub valign: VAlign,
}

impl Text {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            color: Color::BLACK,
            size: 10.0,
            anchor: Anchor::Data,
            halign: HAlign::Left,
            valign: VAlign::Bottom,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArtistKind {
    Contour(FilledContour),
    Scatter(Scatter),
    Line(Line2D),
    Text(Text),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    pub id: ArtistId,
    pub z_order: f32,
    pub kind: ArtistKind,
}

/// Legend drawn next to (or inside) an axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: Option<String>,
    pub entries: Vec<(String, Color)>,
    pub columns: usize,
    /// Placed outside the upper-right corner instead of inside upper-left
    pub outside: bool,
}

/// One panel of a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    index: usize,
    row: usize,
    col: usize,
    nrows: usize,
    ncols: usize,
    pub visible: bool,
    pub xlim: (f64, f64),
    pub ylim: (f64, f64),
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub legend: Option<Legend>,
    artists: Vec<Artist>,
    next_serial: u64,
}

impl Axes {
    fn new(index: usize, nrows: usize, ncols: usize) -> Self {
        Self {
            index,
            row: index / ncols,
            col: index % ncols,
            nrows,
            ncols,
            visible: true,
            xlim: (0.0, 1.0),
            ylim: (0.0, 1.0),
            title: None,
            xlabel: None,
            ylabel: None,
            legend: None,
            artists: Vec::new(),
            next_serial: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn is_first_col(&self) -> bool {
        self.col == 0
    }

    pub fn is_last_row(&self) -> bool {
        self.row + 1 == self.nrows
    }

    pub fn grid_shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn set_xlim(&mut self, lo: f64, hi: f64) {
        self.xlim = (lo, hi);
    }

    pub fn set_ylim(&mut self, lo: f64, hi: f64) {
        self.ylim = (lo, hi);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_xlabel(&mut self, label: impl Into<String>) {
        self.xlabel = Some(label.into());
    }

    pub fn set_ylabel(&mut self, label: impl Into<String>) {
        self.ylabel = Some(label.into());
    }

    /// Add an artist and return its handle.
    pub fn add(&mut self, kind: ArtistKind, z_order: f32) -> ArtistId {
        let id = ArtistId {
            axes: self.index,
            serial: self.next_serial,
        };
        self.next_serial += 1;
        self.artists.push(Artist { id, z_order, kind });
        id
    }

    pub fn contourf(&mut self, contour: FilledContour) -> ArtistId {
        self.add(ArtistKind::Contour(contour), zorder::CONTOUR)
    }

    pub fn scatter(&mut self, scatter: Scatter, z_order: f32) -> ArtistId {
        self.add(ArtistKind::Scatter(scatter), z_order)
    }

    pub fn plot(&mut self, line: Line2D) -> ArtistId {
        self.add(ArtistKind::Line(line), zorder::LINES)
    }

    pub fn text(&mut self, text: Text) -> ArtistId {
        self.add(ArtistKind::Text(text), zorder::TEXT)
    }

    /// Remove an artist, failing with `ArtistNotFound` if it is already gone.
    pub fn remove(&mut self, id: ArtistId) -> ResvizResult<Artist> {
        let pos = self
            .artists
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| ResvizError::ArtistNotFound(id.to_string()))?;
        Ok(self.artists.remove(pos))
    }

    pub fn get(&self, id: ArtistId) -> Option<&Artist> {
        self.artists.iter().find(|a| a.id == id)
    }

    pub fn line(&self, id: ArtistId) -> Option<&Line2D> {
        match self.get(id).map(|a| &a.kind) {
            Some(ArtistKind::Line(line)) => Some(line),
            _ => None,
        }
    }

    pub fn line_mut(&mut self, id: ArtistId) -> Option<&mut Line2D> {
        match self.artists.iter_mut().find(|a| a.id == id).map(|a| &mut a.kind) {
            Some(ArtistKind::Line(line)) => Some(line),
            _ => None,
        }
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    /// Artists in drawing order (ascending z, then insertion order).
    pub fn artists_by_z(&self) -> Vec<&Artist> {
        let mut sorted: Vec<&Artist> = self.artists.iter().collect();
        sorted.sort_by(|a, b| a.z_order.partial_cmp(&b.z_order).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }

    /// Number of filled-contour artists currently attached.
    pub fn contour_count(&self) -> usize {
        self.artists
            .iter()
            .filter(|a| matches!(a.kind, ArtistKind::Contour(_)))
            .count()
    }

    /// Handles of every filled-contour artist, in insertion order.
    pub fn contour_ids(&self) -> Vec<ArtistId> {
        self.artists
            .iter()
            .filter(|a| matches!(a.kind, ArtistKind::Contour(_)))
            .map(|a| a.id)
            .collect()
    }

    /// Legend built from every labelled line.
    pub fn legend_from_lines(&mut self, title: Option<&str>, columns: usize, outside: bool) {
        let entries = self
            .artists
            .iter()
            .filter_map(|a| match &a.kind {
                ArtistKind::Line(line) => line
                    .label
                    .as_ref()
                    .map(|label| (label.clone(), line.color.with_alpha(1.0))),
                _ => None,
            })
            .collect();
        self.legend = Some(Legend {
            title: title.map(str::to_string),
            entries,
            columns: columns.max(1),
            outside,
        });
    }
}

/// Colorbar keyed to one filled-contour artist.
#[derive(Debug, Clone, PartialEq)]
pub struct Colorbar {
    pub source: ArtistId,
    pub levels: Vec<f64>,
    pub colormap: Colormap,
    pub ticks: Option<Vec<f64>>,
}

/// A figure: a grid of axes plus figure-level decorations.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Size in inches
    pub figsize: (f64, f64),
    pub dpi: u32,
    /// Base font size in points
    pub font_size: f32,
    /// Vertical gap between rows as a fraction of the axes height
    pub hspace: f64,
    /// Horizontal gap between columns as a fraction of the axes width
    pub wspace: f64,
    pub suptitle: Option<String>,
    pub colorbar: Option<Colorbar>,
    nrows: usize,
    ncols: usize,
    axes: Vec<Axes>,
}

impl Figure {
    pub fn new(nrows: usize, ncols: usize, figsize: (f64, f64), dpi: u32) -> Self {
        let nrows = nrows.max(1);
        let ncols = ncols.max(1);
        Self {
            figsize,
            dpi,
            font_size: 10.0,
            hspace: 0.2,
            wspace: 0.2,
            suptitle: None,
            colorbar: None,
            nrows,
            ncols,
            axes: (0..nrows * ncols).map(|i| Axes::new(i, nrows, ncols)).collect(),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Pixel dimensions when rasterized.
    pub fn pixel_size(&self) -> (u32, u32) {
        let w = (self.figsize.0 * self.dpi as f64).round().max(1.0) as u32;
        let h = (self.figsize.1 * self.dpi as f64).round().max(1.0) as u32;
        (w, h)
    }

    pub fn axes(&self, index: usize) -> ResvizResult<&Axes> {
        let len = self.axes.len();
        self.axes
            .get(index)
            .ok_or(ResvizError::AxesOutOfRange { index, len })
    }

    pub fn axes_mut(&mut self, index: usize) -> ResvizResult<&mut Axes> {
        let len = self.axes.len();
        self.axes
            .get_mut(index)
            .ok_or(ResvizError::AxesOutOfRange { index, len })
    }

    /// All axes in row-major order.
    pub fn all_axes(&self) -> &[Axes] {
        &self.axes
    }

    pub fn visible_axes(&self) -> impl Iterator<Item = &Axes> {
        self.axes.iter().filter(|a| a.visible)
    }

    pub fn set_suptitle(&mut self, title: impl Into<String>) {
        self.suptitle = Some(title.into());
    }

    /// Attach the figure colorbar to a filled-contour handle.
    pub fn colorbar(&mut self, source: ArtistId, ticks: Option<Vec<f64>>) -> ResvizResult<()> {
        let axes = self.axes(source.axes)?;
        let artist = axes
            .get(source)
            .ok_or_else(|| ResvizError::ArtistNotFound(source.to_string()))?;
        let ArtistKind::Contour(contour) = &artist.kind else {
            return Err(ResvizError::ArtistNotFound(format!("{} is not a contour", source)));
        };
        self.colorbar = Some(Colorbar {
            source,
            levels: contour.levels.clone(),
            colormap: contour.colormap.clone(),
            ticks,
        });
        Ok(())
    }

    /// Rasterize to RGBA pixels.
    pub fn render(&self) -> ResvizResult<Vec<u8>> {
        crate::raster::render_figure(self)
    }

    /// Rasterize and encode as PNG.
    pub fn to_png(&self) -> ResvizResult<Vec<u8>> {
        let pixels = self.render()?;
        let (w, h) = self.pixel_size();
        crate::png::create_png_auto(&pixels, w as usize, h as usize)
    }
}
