//! Injector and producer markers on top of a field.

use crate::color::Color;
use crate::figure::{zorder, ArtistId, Axes, HAlign, Marker, Scatter, Text, VAlign};
use crate::plotter::Plotter;
use resviz_common::{ResvizError, ResvizResult, WellTable};

/// Marker area in points squared.
const WELL_MARKER_AREA: f32 = 256.0;

/// Producer labels sit this much lower than their marker.
const PRODUCER_LABEL_NUDGE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKind {
    Injector,
    Producer,
}

impl WellKind {
    fn marker(self) -> Marker {
        match self {
            Self::Injector => Marker::TriangleDown,
            Self::Producer => Marker::TriangleUp,
        }
    }

    fn face(self) -> Color {
        match self {
            Self::Injector => Color::WHITE,
            Self::Producer => Color::BLACK,
        }
    }

    fn label_color(self) -> Color {
        match self {
            Self::Injector => Color::BLACK,
            Self::Producer => Color::WHITE,
        }
    }
}

/// How a well table is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct WellOverlay {
    pub kind: WellKind,
    /// Draw the well index on each marker
    pub labels: bool,
    /// Face color override: one per well, or a single color for all
    pub colors: Option<Vec<Color>>,
}

impl WellOverlay {
    pub fn injectors() -> Self {
        Self {
            kind: WellKind::Injector,
            labels: true,
            colors: None,
        }
    }

    pub fn producers() -> Self {
        Self {
            kind: WellKind::Producer,
            labels: true,
            colors: None,
        }
    }

    pub fn with_colors(mut self, colors: Vec<Color>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn without_labels(mut self) -> Self {
        self.labels = false;
        self
    }
}

impl Plotter {
    /// Draw a well table given in absolute coordinates.
    ///
    /// Positions are rescaled into the active coordinate mode on a copy;
    /// `wells` itself is left untouched. Markers are not clipped to the
    /// axes so wells on the domain boundary stay whole.
    pub fn well_scatter(&self, ax: &mut Axes, wells: &WellTable, overlay: &WellOverlay) -> ResvizResult<ArtistId> {
        let scaled = wells.scaled(self.coord_mode(), self.grid());

        let colors = match &overlay.colors {
            Some(colors) if colors.len() == 1 || colors.len() == scaled.len() => colors.clone(),
            Some(colors) => {
                return Err(ResvizError::shape_mismatch("well colors", scaled.len(), colors.len()));
            }
            None => vec![overlay.kind.face()],
        };

        let handle = ax.scatter(
            Scatter {
                x: scaled.iter().map(|w| w.x).collect(),
                y: scaled.iter().map(|w| w.y).collect(),
                marker: overlay.kind.marker(),
                size: WELL_MARKER_AREA,
                colors,
                edge_color: Color::BLACK,
                clip: false,
            },
            zorder::WELLS,
        );

        if overlay.labels {
            let nudge = match overlay.kind {
                WellKind::Injector => 0.0,
                WellKind::Producer => PRODUCER_LABEL_NUDGE,
            };
            for (i, well) in scaled.iter().enumerate() {
                let mut text = Text::new(well.x, well.y - nudge, i.to_string());
                text.color = overlay.kind.label_color();
                text.size = self.config().font_size * 0.7;
                text.halign = HAlign::Center;
                text.valign = VAlign::Center;
                ax.text(text);
            }
        }
        Ok(handle)
    }
}
