//! Rasterization of a [`Figure`] with tiny-skia.
//!
//! Axes are placed on a subplot grid with fixed figure margins. Artists
//! inside an axes are drawn in z-order; contours, lines and clipped
//! scatters are masked to the axes rectangle.

use crate::color::Color;
use crate::figure::{
    Anchor, ArtistKind, Axes, Colorbar, Figure, HAlign, Legend, Line2D, LineStyle, Marker,
    Scatter, Text, VAlign,
};
use crate::contour::FilledContour;
use crate::glyphs::{draw_text, text_height, text_width, TextStyle};
use resviz_common::{ResvizError, ResvizResult};
use tiny_skia::{
    FillRule, LineCap, LineJoin, Mask, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};
use tracing::debug;

// Subplot margins as figure fractions
const LEFT: f64 = 0.125;
const RIGHT: f64 = 0.9;
const RIGHT_WITH_COLORBAR: f64 = 0.8;
const BOTTOM: f64 = 0.11;
const TOP: f64 = 0.88;
const COLORBAR_LEFT: f64 = 0.83;
const COLORBAR_WIDTH: f64 = 0.025;

const FRAME_WIDTH_PT: f32 = 0.8;
const TICK_LEN_PT: f32 = 3.5;

/// Pixel rectangle of one axes, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxesRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Maps data coordinates of one axes to pixels.
#[derive(Debug, Clone, Copy)]
struct DataTransform {
    rect: AxesRect,
    xlim: (f64, f64),
    ylim: (f64, f64),
}

impl DataTransform {
    fn new(rect: AxesRect, axes: &Axes) -> Self {
        Self {
            rect,
            xlim: axes.xlim,
            ylim: axes.ylim,
        }
    }

    fn apply(&self, x: f64, y: f64) -> (f32, f32) {
        let fx = normalise(x, self.xlim);
        let fy = normalise(y, self.ylim);
        (
            self.rect.x + (fx as f32) * self.rect.w,
            self.rect.y + (1.0 - fy as f32) * self.rect.h,
        )
    }

    fn axes_fraction(&self, fx: f64, fy: f64) -> (f32, f32) {
        (
            self.rect.x + fx as f32 * self.rect.w,
            self.rect.y + (1.0 - fy as f32) * self.rect.h,
        )
    }
}

fn normalise(v: f64, lim: (f64, f64)) -> f64 {
    let span = lim.1 - lim.0;
    if span.abs() < f64::EPSILON {
        0.5
    } else {
        (v - lim.0) / span
    }
}

/// Pixel rectangle of axes `(row, col)` in a figure.
pub fn axes_rect(fig: &Figure, row: usize, col: usize) -> AxesRect {
    let (w_px, h_px) = fig.pixel_size();
    let (nrows, ncols) = fig.shape();
    let right = if fig.colorbar.is_some() { RIGHT_WITH_COLORBAR } else { RIGHT };

    let cell_w = (right - LEFT) / (ncols as f64 + (ncols as f64 - 1.0) * fig.wspace);
    let cell_h = (TOP - BOTTOM) / (nrows as f64 + (nrows as f64 - 1.0) * fig.hspace);
    let x0 = LEFT + col as f64 * cell_w * (1.0 + fig.wspace);
    let y0 = (1.0 - TOP) + row as f64 * cell_h * (1.0 + fig.hspace);

    AxesRect {
        x: (x0 * w_px as f64) as f32,
        y: (y0 * h_px as f64) as f32,
        w: (cell_w * w_px as f64) as f32,
        h: (cell_h * h_px as f64) as f32,
    }
}

/// Render a figure to demultiplied RGBA bytes.
pub fn render_figure(fig: &Figure) -> ResvizResult<Vec<u8>> {
    let (w, h) = fig.pixel_size();
    let mut pixmap = Pixmap::new(w, h)
        .ok_or_else(|| ResvizError::encode(format!("cannot allocate {}x{} canvas", w, h)))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let scale = Scale::new(fig);
    let mut drawn = 0usize;
    for axes in fig.visible_axes() {
        let (row, col) = axes.position();
        let rect = axes_rect(fig, row, col);
        draw_axes(&mut pixmap, axes, rect, &scale);
        drawn += 1;
    }

    if let Some(cb) = &fig.colorbar {
        draw_colorbar(&mut pixmap, cb, &scale);
    }

    if let Some(title) = &fig.suptitle {
        let style = TextStyle::new(scale.pt(fig.font_size * 1.2), Color::BLACK)
            .aligned(HAlign::Center, VAlign::Top);
        draw_text(&mut pixmap, w as f32 / 2.0, h as f32 * 0.02, title, &style, None);
    }

    debug!(width = w, height = h, axes = drawn, "Rendered figure");

    Ok(pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect())
}

/// Unit conversions for one figure.
struct Scale {
    px_per_pt: f32,
    font: f32,
    width: u32,
    height: u32,
}

impl Scale {
    fn new(fig: &Figure) -> Self {
        let (width, height) = fig.pixel_size();
        Self {
            px_per_pt: fig.dpi as f32 / 72.0,
            font: fig.font_size,
            width,
            height,
        }
    }

    fn pt(&self, points: f32) -> f32 {
        points * self.px_per_pt
    }
}

fn paint_for(color: Color, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = anti_alias;
    paint
}

fn stroke_of(width: f32) -> Stroke {
    Stroke {
        width: width.max(0.5),
        line_cap: LineCap::Butt,
        line_join: LineJoin::Round,
        ..Stroke::default()
    }
}

fn rect_path(rect: AxesRect) -> Option<Path> {
    Rect::from_xywh(rect.x, rect.y, rect.w, rect.h).map(PathBuilder::from_rect)
}

fn clip_mask(pixmap: &Pixmap, rect: AxesRect) -> Option<Mask> {
    let mut mask = Mask::new(pixmap.width(), pixmap.height())?;
    let path = rect_path(rect)?;
    mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
    Some(mask)
}

fn draw_axes(pixmap: &mut Pixmap, axes: &Axes, rect: AxesRect, scale: &Scale) {
    let tf = DataTransform::new(rect, axes);
    let mask = clip_mask(pixmap, rect);

    for artist in axes.artists_by_z() {
        match &artist.kind {
            ArtistKind::Contour(contour) => draw_contour(pixmap, contour, &tf, mask.as_ref()),
            ArtistKind::Scatter(scatter) => {
                let clip = if scatter.clip { mask.as_ref() } else { None };
                draw_scatter(pixmap, scatter, &tf, scale, clip);
            }
            ArtistKind::Line(line) => draw_line(pixmap, line, &tf, scale, mask.as_ref()),
            ArtistKind::Text(text) => draw_text_artist(pixmap, text, &tf, scale),
        }
    }

    draw_frame(pixmap, axes, rect, scale);
    if let Some(legend) = &axes.legend {
        draw_legend(pixmap, legend, rect, scale);
    }
}

fn draw_contour(pixmap: &mut Pixmap, contour: &FilledContour, tf: &DataTransform, mask: Option<&Mask>) {
    for band in &contour.bands {
        let mut pb = PathBuilder::new();
        for poly in &band.polygons {
            for (i, p) in poly.iter().enumerate() {
                let (px, py) = tf.apply(p.x, p.y);
                if i == 0 {
                    pb.move_to(px, py);
                } else {
                    pb.line_to(px, py);
                }
            }
            pb.close();
        }
        if let Some(path) = pb.finish() {
            // Anti-aliasing leaves seams between adjacent polygons
            let paint = paint_for(band.color, false);
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), mask);
        }
    }
}

fn marker_path(marker: Marker, cx: f32, cy: f32, r: f32) -> Option<Path> {
    let polygon = |pts: &[(f32, f32)]| {
        let mut pb = PathBuilder::new();
        for (i, (x, y)) in pts.iter().enumerate() {
            if i == 0 {
                pb.move_to(cx + x, cy + y);
            } else {
                pb.line_to(cx + x, cy + y);
            }
        }
        pb.close();
        pb.finish()
    };
    let half_base = r * 0.866;
    match marker {
        Marker::None => None,
        Marker::Circle => PathBuilder::from_circle(cx, cy, r),
        Marker::TriangleDown => polygon(&[(0.0, r), (-half_base, -r / 2.0), (half_base, -r / 2.0)]),
        Marker::TriangleUp => polygon(&[(0.0, -r), (half_base, r / 2.0), (-half_base, r / 2.0)]),
        Marker::Star => {
            let pts: Vec<(f32, f32)> = (0..10)
                .map(|k| {
                    let radius = if k % 2 == 0 { r } else { r * 0.38 };
                    let theta = std::f32::consts::PI * (k as f32) / 5.0;
                    (radius * theta.sin(), -radius * theta.cos())
                })
                .collect();
            polygon(&pts)
        }
    }
}

fn draw_scatter(pixmap: &mut Pixmap, scatter: &Scatter, tf: &DataTransform, scale: &Scale, mask: Option<&Mask>) {
    let radius = scale.pt(scatter.size.max(0.0).sqrt()) / 2.0;
    let edge = paint_for(scatter.edge_color, true);
    let edge_stroke = stroke_of(scale.pt(0.5));
    for (i, (&x, &y)) in scatter.x.iter().zip(&scatter.y).enumerate() {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        let (px, py) = tf.apply(x, y);
        if let Some(path) = marker_path(scatter.marker, px, py, radius) {
            let face = paint_for(scatter.color_of(i), true);
            pixmap.fill_path(&path, &face, FillRule::Winding, Transform::identity(), mask);
            pixmap.stroke_path(&path, &edge, &edge_stroke, Transform::identity(), mask);
        }
    }
}

fn draw_line(pixmap: &mut Pixmap, line: &Line2D, tf: &DataTransform, scale: &Scale, mask: Option<&Mask>) {
    let paint = paint_for(line.color, true);
    let n = line.len();

    if line.style == LineStyle::Solid && n > 1 {
        let mut pb = PathBuilder::new();
        let mut pen_down = false;
        for i in 0..n {
            let (x, y) = (line.x[i], line.y[i]);
            if !(x.is_finite() && y.is_finite()) {
                pen_down = false;
                continue;
            }
            let (px, py) = tf.apply(x, y);
            if pen_down {
                pb.line_to(px, py);
            } else {
                pb.move_to(px, py);
                pen_down = true;
            }
        }
        if let Some(path) = pb.finish() {
            let stroke = stroke_of(scale.pt(line.width));
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), mask);
        }
    }

    if line.marker != Marker::None {
        let radius = scale.pt(line.marker_size) / 2.0;
        for i in 0..n {
            let (x, y) = (line.x[i], line.y[i]);
            if !(x.is_finite() && y.is_finite()) {
                continue;
            }
            let (px, py) = tf.apply(x, y);
            if let Some(path) = marker_path(line.marker, px, py, radius) {
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), mask);
            }
        }
    }
}

fn draw_text_artist(pixmap: &mut Pixmap, text: &Text, tf: &DataTransform, scale: &Scale) {
    let (px, py) = match text.anchor {
        Anchor::Data => tf.apply(text.x, text.y),
        Anchor::Axes => tf.axes_fraction(text.x, text.y),
    };
    let style = TextStyle::new(scale.pt(text.size), text.color).aligned(text.halign, text.valign);
    draw_text(pixmap, px, py, &text.text, &style, None);
}

/// Roughly five round-numbered ticks covering `[lo, hi]`.
pub fn nice_ticks(lo: f64, hi: f64) -> Vec<f64> {
    if !(lo.is_finite() && hi.is_finite()) {
        return Vec::new();
    }
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let range = hi - lo;
    if range <= 0.0 {
        return vec![lo];
    }
    let raw = range / 5.0;
    let mag = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * mag)
        .find(|s| *s >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * mag);
    let eps = step * 1e-9;
    let mut ticks = Vec::new();
    let mut k = (lo / step - 1e-9).ceil();
    while k * step <= hi + eps {
        ticks.push(k * step);
        k += 1.0;
    }
    ticks
}

/// Short tick label: up to three decimals, trailing zeros trimmed.
pub fn format_tick(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn draw_frame(pixmap: &mut Pixmap, axes: &Axes, rect: AxesRect, scale: &Scale) {
    let black = paint_for(Color::BLACK, true);
    if let Some(path) = rect_path(rect) {
        pixmap.stroke_path(&path, &black, &stroke_of(scale.pt(FRAME_WIDTH_PT)), Transform::identity(), None);
    }

    let tick_len = scale.pt(TICK_LEN_PT);
    let tick_font = scale.pt(scale.font * 0.8);
    let tick_stroke = stroke_of(scale.pt(FRAME_WIDTH_PT));
    let tf = DataTransform::new(rect, axes);
    let bottom = rect.y + rect.h;

    let mut pb = PathBuilder::new();
    for t in nice_ticks(axes.xlim.0, axes.xlim.1) {
        let (px, _) = tf.apply(t, axes.ylim.0);
        pb.move_to(px, bottom);
        pb.line_to(px, bottom + tick_len);
        let style = TextStyle::new(tick_font, Color::BLACK).aligned(HAlign::Center, VAlign::Top);
        draw_text(pixmap, px, bottom + tick_len * 1.5, &format_tick(t), &style, None);
    }
    let mut widest = 0.0f32;
    for t in nice_ticks(axes.ylim.0, axes.ylim.1) {
        let (_, py) = tf.apply(axes.xlim.0, t);
        pb.move_to(rect.x, py);
        pb.line_to(rect.x - tick_len, py);
        let label = format_tick(t);
        widest = widest.max(text_width(&label, tick_font));
        let style = TextStyle::new(tick_font, Color::BLACK).aligned(HAlign::Right, VAlign::Center);
        draw_text(pixmap, rect.x - tick_len * 1.5, py, &label, &style, None);
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &black, &tick_stroke, Transform::identity(), None);
    }

    let label_font = scale.pt(scale.font * 0.9);
    if let Some(xlabel) = &axes.xlabel {
        let style = TextStyle::new(label_font, Color::BLACK).aligned(HAlign::Center, VAlign::Top);
        let y = bottom + tick_len * 2.0 + tick_font * 1.6;
        draw_text(pixmap, rect.x + rect.w / 2.0, y, xlabel, &style, None);
    }
    if let Some(ylabel) = &axes.ylabel {
        let style = TextStyle::new(label_font, Color::BLACK)
            .aligned(HAlign::Center, VAlign::Bottom)
            .rotated(std::f32::consts::FRAC_PI_2);
        let x = rect.x - tick_len * 2.0 - widest - tick_font * 0.6;
        draw_text(pixmap, x, rect.y + rect.h / 2.0, ylabel, &style, None);
    }
    if let Some(title) = &axes.title {
        let style = TextStyle::new(scale.pt(scale.font), Color::BLACK).aligned(HAlign::Center, VAlign::Bottom);
        draw_text(pixmap, rect.x + rect.w / 2.0, rect.y - scale.pt(6.0), title, &style, None);
    }
}

fn draw_legend(pixmap: &mut Pixmap, legend: &Legend, rect: AxesRect, scale: &Scale) {
    if legend.entries.is_empty() {
        return;
    }
    let font = scale.pt(scale.font * 0.8);
    let pad = font * 0.5;
    let swatch = font * 2.0;
    let row_h = font * 1.6;
    let columns = legend.columns.min(legend.entries.len()).max(1);
    let rows = legend.entries.len().div_ceil(columns);

    let label_w = legend
        .entries
        .iter()
        .map(|(label, _)| text_width(label, font))
        .fold(0.0, f32::max);
    let col_w = swatch + pad + label_w + pad;
    let title_h = legend
        .title
        .as_ref()
        .map(|t| text_height(t, font) + pad)
        .unwrap_or(0.0);
    let box_w = (columns as f32 * col_w + pad)
        .max(legend.title.as_ref().map(|t| text_width(t, font) + 2.0 * pad).unwrap_or(0.0));
    let box_h = title_h + rows as f32 * row_h + pad;

    let (bx, by) = if legend.outside {
        (rect.x + rect.w + scale.pt(4.0), rect.y)
    } else {
        (rect.x + pad, rect.y + pad)
    };

    if let Some(r) = Rect::from_xywh(bx, by, box_w, box_h) {
        let path = PathBuilder::from_rect(r);
        let bg = paint_for(Color::WHITE.with_alpha(0.8), true);
        pixmap.fill_path(&path, &bg, FillRule::Winding, Transform::identity(), None);
        let edge = paint_for(Color::new(204, 204, 204, 255), true);
        pixmap.stroke_path(&path, &edge, &stroke_of(scale.pt(0.8)), Transform::identity(), None);
    }

    if let Some(title) = &legend.title {
        let style = TextStyle::new(font, Color::BLACK).aligned(HAlign::Center, VAlign::Top);
        draw_text(pixmap, bx + box_w / 2.0, by + pad, title, &style, None);
    }

    let stroke = stroke_of(scale.pt(1.5));
    for (i, (label, color)) in legend.entries.iter().enumerate() {
        let (r, c) = (i / columns, i % columns);
        let x = bx + pad + c as f32 * col_w;
        let y = by + pad + title_h + r as f32 * row_h + row_h / 2.0;
        let mut pb = PathBuilder::new();
        pb.move_to(x, y);
        pb.line_to(x + swatch, y);
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint_for(*color, true), &stroke, Transform::identity(), None);
        }
        let style = TextStyle::new(font, Color::BLACK).aligned(HAlign::Left, VAlign::Center);
        draw_text(pixmap, x + swatch + pad, y, label, &style, None);
    }
}

fn draw_colorbar(pixmap: &mut Pixmap, cb: &Colorbar, scale: &Scale) {
    let levels = &cb.levels;
    if levels.len() < 2 {
        return;
    }
    let (w, h) = (scale.width as f64, scale.height as f64);
    let rect = AxesRect {
        x: (COLORBAR_LEFT * w) as f32,
        y: ((1.0 - TOP) * h) as f32,
        w: (COLORBAR_WIDTH * w) as f32,
        h: ((TOP - BOTTOM) * h) as f32,
    };
    let (vmin, vmax) = (levels[0], levels[levels.len() - 1]);
    let to_py = |v: f64| rect.y + (1.0 - normalise(v, (vmin, vmax)) as f32) * rect.h;

    for pair in levels.windows(2) {
        let mid = 0.5 * (pair[0] + pair[1]);
        let color = cb.colormap.eval_range(mid, vmin, vmax);
        let (top, bottom) = (to_py(pair[1]), to_py(pair[0]));
        if let Some(r) = Rect::from_xywh(rect.x, top, rect.w, (bottom - top).max(1.0)) {
            let path = PathBuilder::from_rect(r);
            pixmap.fill_path(&path, &paint_for(color, false), FillRule::Winding, Transform::identity(), None);
        }
    }

    let black = paint_for(Color::BLACK, true);
    if let Some(path) = rect_path(rect) {
        pixmap.stroke_path(&path, &black, &stroke_of(scale.pt(FRAME_WIDTH_PT)), Transform::identity(), None);
    }

    let ticks = cb.ticks.clone().unwrap_or_else(|| nice_ticks(vmin, vmax));
    let tick_len = scale.pt(TICK_LEN_PT);
    let font = scale.pt(scale.font * 0.8);
    let right = rect.x + rect.w;
    let mut pb = PathBuilder::new();
    for t in ticks.iter().filter(|t| **t >= vmin - 1e-9 && **t <= vmax + 1e-9) {
        let py = to_py(*t);
        pb.move_to(right, py);
        pb.line_to(right + tick_len, py);
        let style = TextStyle::new(font, Color::BLACK).aligned(HAlign::Left, VAlign::Center);
        draw_text(pixmap, right + tick_len * 1.5, py, &format_tick(*t), &style, None);
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &black, &stroke_of(scale.pt(FRAME_WIDTH_PT)), Transform::identity(), None);
    }
}
