//! Multi-panel figures: one subplot per labelled item.

use crate::color::Color;
use crate::figure::{Anchor, ArtistId, Axes, Figure, HAlign, Text, VAlign};
use crate::layout::{n_row_col, two_column};
use crate::plotter::Plotter;
use resviz_common::{FieldData, ResvizError, ResvizResult};
use tracing::info;

/// Colorbar ticks of the correlation panel grid.
pub const CORRELATION_TICKS: [f64; 5] = [-1.0, -0.4, 0.0, 0.4, 1.0];

/// Ordered `(label, item)` pairs.
///
/// Plain sequences are labelled by their position (`"0"`, `"1"`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Labeled<T> {
    items: Vec<(String, T)>,
}

impl<T> Default for Labeled<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Labeled<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(items: Vec<(String, T)>) -> Self {
        Self { items }
    }

    /// Label each item by its index.
    pub fn from_sequence(items: Vec<T>) -> Self {
        Self {
            items: items.into_iter().enumerate().map(|(i, t)| (i.to_string(), t)).collect(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, item: T) {
        self.items.push((label.into(), item));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.items.iter().map(|(label, item)| (label.as_str(), item))
    }

    pub fn get(&self, label: &str) -> Option<&T> {
        self.items.iter().find(|(l, _)| l == label).map(|(_, item)| item)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|(label, _)| label.as_str())
    }
}

impl<S: Into<String>, T> FromIterator<(S, T)> for Labeled<T> {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(|(l, t)| (l.into(), t)).collect(),
        }
    }
}

/// Options for [`Plotter::subplots`].
#[derive(Debug, Clone, PartialEq)]
pub struct SubplotOptions {
    pub figsize: Option<(f64, f64)>,
    pub title: Option<String>,
    /// Panel label color; the configured one when `None`
    pub ax_text_color: Option<Color>,
    /// Attach a colorbar keyed to the first panel
    pub colorbar: bool,
}

impl Default for SubplotOptions {
    fn default() -> Self {
        Self {
            figsize: None,
            title: None,
            ax_text_color: None,
            colorbar: true,
        }
    }
}

impl SubplotOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// A composed figure and the handle returned for each drawn panel.
#[derive(Debug, Clone)]
pub struct PanelGrid {
    pub figure: Figure,
    pub handles: Vec<ArtistId>,
}

impl PanelGrid {
    /// Number of panels that were drawn.
    pub fn drawn(&self) -> usize {
        self.handles.len()
    }
}

fn hide_from(fig: &mut Figure, first_hidden: usize) -> ResvizResult<()> {
    let total = fig.all_axes().len();
    for i in first_hidden..total {
        fig.axes_mut(i)?.visible = false;
    }
    Ok(())
}

impl Plotter {
    /// Lay out one panel per item (up to the configured cap), label each
    /// panel in its top-left corner and draw it with `draw`.
    ///
    /// Items past the cap are dropped and unused trailing axes hidden.
    pub fn subplots<T, F>(&self, items: &Labeled<T>, opts: &SubplotOptions, mut draw: F) -> ResvizResult<PanelGrid>
    where
        F: FnMut(&Plotter, &mut Axes, &T) -> ResvizResult<ArtistId>,
    {
        let n = items.len().min(self.config().max_panels);
        let (nrows, ncols) = n_row_col(n, self.config().aspect_ratio())?;
        let mut figure = self.figure(nrows, ncols, opts.figsize);
        hide_from(&mut figure, n)?;

        let text_color = match opts.ax_text_color {
            Some(c) => c,
            None => self.config().panel_text_color()?,
        };

        let mut handles = Vec::with_capacity(n);
        for (i, (label, item)) in items.iter().take(n).enumerate() {
            let ax = figure.axes_mut(i)?;
            let mut text = Text::new(0.0, 1.0, label);
            text.anchor = Anchor::Axes;
            text.halign = HAlign::Left;
            text.valign = VAlign::Top;
            text.color = text_color;
            text.size = 12.0;
            ax.text(text);
            handles.push(draw(self, ax, item)?);
        }

        if opts.colorbar {
            if let Some(&first) = handles.first() {
                figure.colorbar(first, None)?;
            }
        }
        if let Some(title) = &opts.title {
            figure.set_suptitle(title.clone());
        }

        info!(
            panels = n,
            supplied = items.len(),
            nrows = nrows,
            ncols = ncols,
            "Composed panel grid"
        );
        Ok(PanelGrid { figure, handles })
    }

    /// Oil saturation maps, one per water-saturation field.
    pub fn oilfields(&self, fields: &Labeled<Vec<f64>>, opts: &SubplotOptions) -> ResvizResult<PanelGrid> {
        self.subplots(fields, opts, |p, ax, ss| p.oilfield(ax, ss, None))
    }

    /// Two-column grid of oil saturation maps; ensembles are reduced to
    /// their member mean.
    pub fn oilfield_means(&self, fields: &Labeled<FieldData>, title: &str) -> ResvizResult<PanelGrid> {
        let (nrows, ncols) = two_column(fields.len())?;
        let mut figure = self.figure(nrows, ncols, Some((8.0, 4.0 * nrows as f64)));
        figure.hspace = 0.3;
        figure.set_suptitle(format!("Oil saturation (mean fields) - {}", title));
        hide_from(&mut figure, fields.len())?;

        let mut handles = Vec::with_capacity(fields.len());
        for (i, (label, data)) in fields.iter().enumerate() {
            let mean = data.mean_field();
            handles.push(self.oilfield(figure.axes_mut(i)?, &mean, Some(label))?);
        }
        if let Some(&last) = handles.last() {
            figure.colorbar(last, None)?;
        }
        Ok(PanelGrid { figure, handles })
    }

    /// Two-column grid of correlation maps against the cell at `xy`.
    ///
    /// Entries that are single fields rather than ensembles are skipped.
    pub fn correlation_fields(
        &self,
        fields: &Labeled<FieldData>,
        xy: (f64, f64),
        title: &str,
    ) -> ResvizResult<PanelGrid> {
        let ensembles: Vec<_> = fields
            .iter()
            .filter_map(|(label, data)| data.as_ensemble().map(|e| (label, e)))
            .collect();
        if ensembles.is_empty() {
            return Err(ResvizError::EmptyLayout);
        }

        let (nrows, ncols) = two_column(ensembles.len())?;
        let mut figure = self.figure(nrows, ncols, Some((8.0, 4.0 * nrows as f64)));
        figure.hspace = 0.3;
        if !title.is_empty() {
            figure.set_suptitle(title);
        }
        hide_from(&mut figure, ensembles.len())?;

        let mut handles = Vec::with_capacity(ensembles.len());
        for (i, (label, ensemble)) in ensembles.into_iter().enumerate() {
            handles.push(self.corr_field_vs(figure.axes_mut(i)?, ensemble, xy, Some(label))?);
        }
        if let Some(&last) = handles.last() {
            figure.colorbar(last, Some(CORRELATION_TICKS.to_vec()))?;
        }
        Ok(PanelGrid { figure, handles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sequence_labels() {
        let l = Labeled::from_sequence(vec![1, 2, 3]);
        assert_eq!(l.labels().collect::<Vec<_>>(), vec!["0", "1", "2"]);
    }

    #[test]
    fn test_collect_pairs() {
        let l: Labeled<i32> = vec![("Prior", 1), ("ES", 2)].into_iter().collect();
        assert_eq!(l.get("ES"), Some(&2));
        assert_eq!(l.len(), 2);
    }
}
