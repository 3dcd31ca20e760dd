//! Stroke font for figure text.
//!
//! Each glyph is a set of polylines on a cell spanning `[-1, 1]` in both
//! directions, y pointing down. Lowercase letters reuse the uppercase
//! shapes at reduced height. Characters without a glyph are skipped.

use crate::color::Color;
use crate::figure::{HAlign, VAlign};
use tiny_skia::{
    FillRule, LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

type Glyph = &'static [&'static [(f32, f32)]];

const LOOP: &[(f32, f32)] = &[(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0)];
const BOX: Glyph = &[LOOP];
const FIVE: Glyph = &[&[(1.0, -1.0), (-1.0, -1.0), (-1.0, 0.0), (1.0, 0.0), (1.0, 1.0), (-1.0, 1.0)]];

fn glyph(ch: char) -> Option<Glyph> {
    let g: Glyph = match ch.to_ascii_uppercase() {
        '0' | 'O' => BOX,
        '1' => &[&[(-0.4, -0.6), (0.0, -1.0), (0.0, 1.0)]],
        '2' => &[&[(-1.0, -1.0), (1.0, -1.0), (1.0, 0.0), (-1.0, 0.0), (-1.0, 1.0), (1.0, 1.0)]],
        '3' => &[
            &[(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)],
            &[(-1.0, 0.0), (1.0, 0.0)],
        ],
        '4' => &[&[(-1.0, -1.0), (-1.0, 0.0), (1.0, 0.0)], &[(1.0, -1.0), (1.0, 1.0)]],
        '5' | 'S' => FIVE,
        '6' => &[&[(1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0), (1.0, 0.0), (-1.0, 0.0)]],
        '7' => &[&[(-1.0, -1.0), (1.0, -1.0), (0.0, 1.0)]],
        '8' => &[LOOP, &[(-1.0, 0.0), (1.0, 0.0)]],
        '9' => &[&[(1.0, 0.0), (-1.0, 0.0), (-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]],
        '-' => &[&[(-0.6, 0.0), (0.6, 0.0)]],
        '.' => &[&[(0.0, 0.85), (0.0, 1.0)]],
        ',' => &[&[(0.0, 0.7), (-0.3, 1.2)]],
        ':' => &[&[(0.0, -0.4), (0.0, -0.3)], &[(0.0, 0.4), (0.0, 0.5)]],
        '(' => &[&[(0.4, -1.0), (-0.3, -0.4), (-0.3, 0.4), (0.4, 1.0)]],
        ')' => &[&[(-0.4, -1.0), (0.3, -0.4), (0.3, 0.4), (-0.4, 1.0)]],
        '#' => &[
            &[(-0.4, -1.0), (-0.4, 1.0)],
            &[(0.4, -1.0), (0.4, 1.0)],
            &[(-1.0, -0.35), (1.0, -0.35)],
            &[(-1.0, 0.35), (1.0, 0.35)],
        ],
        '/' => &[&[(1.0, -1.0), (-1.0, 1.0)]],
        '+' => &[&[(-0.7, 0.0), (0.7, 0.0)], &[(0.0, -0.7), (0.0, 0.7)]],
        '=' => &[&[(-0.7, -0.3), (0.7, -0.3)], &[(-0.7, 0.3), (0.7, 0.3)]],
        '_' => &[&[(-1.0, 1.0), (1.0, 1.0)]],
        'A' => &[&[(-1.0, 1.0), (0.0, -1.0), (1.0, 1.0)], &[(-0.5, 0.1), (0.5, 0.1)]],
        'B' => &[
            &[(-1.0, 1.0), (-1.0, -1.0), (0.6, -1.0), (1.0, -0.6), (0.6, 0.0), (-1.0, 0.0)],
            &[(0.6, 0.0), (1.0, 0.5), (0.6, 1.0), (-1.0, 1.0)],
        ],
        'C' => &[&[(1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)]],
        'D' => &[&[
            (-1.0, -1.0),
            (0.4, -1.0),
            (1.0, -0.4),
            (1.0, 0.4),
            (0.4, 1.0),
            (-1.0, 1.0),
            (-1.0, -1.0),
        ]],
        'E' => &[&[(1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)], &[(-1.0, 0.0), (0.6, 0.0)]],
        'F' => &[&[(1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0)], &[(-1.0, 0.0), (0.6, 0.0)]],
        'G' => &[&[(1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.2, 0.0)]],
        'H' => &[&[(-1.0, -1.0), (-1.0, 1.0)], &[(1.0, -1.0), (1.0, 1.0)], &[(-1.0, 0.0), (1.0, 0.0)]],
        'I' => &[&[(0.0, -1.0), (0.0, 1.0)], &[(-0.5, -1.0), (0.5, -1.0)], &[(-0.5, 1.0), (0.5, 1.0)]],
        'J' => &[&[(1.0, -1.0), (1.0, 1.0), (-1.0, 1.0), (-1.0, 0.4)]],
        'K' => &[&[(-1.0, -1.0), (-1.0, 1.0)], &[(1.0, -1.0), (-1.0, 0.0), (1.0, 1.0)]],
        'L' => &[&[(-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)]],
        'M' => &[&[(-1.0, 1.0), (-1.0, -1.0), (0.0, 0.0), (1.0, -1.0), (1.0, 1.0)]],
        'N' => &[&[(-1.0, 1.0), (-1.0, -1.0), (1.0, 1.0), (1.0, -1.0)]],
        'P' => &[&[(-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0), (1.0, 0.0), (-1.0, 0.0)]],
        'Q' => &[LOOP, &[(0.2, 0.4), (1.1, 1.2)]],
        'R' => &[&[(-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0), (1.0, 0.0), (-1.0, 0.0), (1.0, 1.0)]],
        'T' => &[&[(-1.0, -1.0), (1.0, -1.0)], &[(0.0, -1.0), (0.0, 1.0)]],
        'U' => &[&[(-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0), (1.0, -1.0)]],
        'V' => &[&[(-1.0, -1.0), (0.0, 1.0), (1.0, -1.0)]],
        'W' => &[&[(-1.0, -1.0), (-0.5, 1.0), (0.0, 0.0), (0.5, 1.0), (1.0, -1.0)]],
        'X' => &[&[(-1.0, -1.0), (1.0, 1.0)], &[(1.0, -1.0), (-1.0, 1.0)]],
        'Y' => &[&[(-1.0, -1.0), (0.0, 0.0), (1.0, -1.0)], &[(0.0, 0.0), (0.0, 1.0)]],
        'Z' => &[&[(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)]],
        _ => return None,
    };
    Some(g)
}

/// Whether `ch` has a glyph.
pub fn has_glyph(ch: char) -> bool {
    ch == ' ' || glyph(ch).is_some()
}

/// How a text block is placed relative to its anchor pixel.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    pub color: Color,
    pub halign: HAlign,
    pub valign: VAlign,
    /// Rotation in radians, counter-clockwise on screen
    pub angle: f32,
    pub background: Option<Color>,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            color,
            halign: HAlign::Left,
            valign: VAlign::Bottom,
            angle: 0.0,
            background: None,
        }
    }

    pub fn aligned(mut self, halign: HAlign, valign: VAlign) -> Self {
        self.halign = halign;
        self.valign = valign;
        self
    }

    pub fn rotated(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }
}

fn char_metrics(size: f32) -> (f32, f32, f32) {
    let char_width = size * 0.6;
    let char_height = size;
    let char_spacing = size * 0.25;
    (char_width, char_height, char_spacing)
}

fn line_height(size: f32) -> f32 {
    size * 1.5
}

/// Pixel width of the widest line of `text`.
pub fn text_width(text: &str, size: f32) -> f32 {
    let (w, _, s) = char_metrics(size);
    text.lines()
        .map(|line| {
            let n = line.chars().count() as f32;
            if n == 0.0 {
                0.0
            } else {
                n * (w + s) - s
            }
        })
        .fold(0.0, f32::max)
}

/// Pixel height of `text` including line gaps.
pub fn text_height(text: &str, size: f32) -> f32 {
    let n = text.lines().count().max(1) as f32;
    size + (n - 1.0) * line_height(size)
}

/// Draw a (possibly multi-line) text block anchored at `(x, y)`.
pub fn draw_text(
    pixmap: &mut Pixmap,
    x: f32,
    y: f32,
    text: &str,
    style: &TextStyle,
    mask: Option<&Mask>,
) {
    if text.is_empty() || style.size <= 0.0 {
        return;
    }
    let (char_width, char_height, char_spacing) = char_metrics(style.size);
    let block_w = text_width(text, style.size);
    let block_h = text_height(text, style.size);

    // Block origin (top-left) relative to the anchor, before rotation
    let ox = match style.halign {
        HAlign::Left => 0.0,
        HAlign::Center => -block_w / 2.0,
        HAlign::Right => -block_w,
    };
    let oy = match style.valign {
        VAlign::Top => 0.0,
        VAlign::Center => -block_h / 2.0,
        VAlign::Bottom => -block_h,
    };

    let cos_a = style.angle.cos();
    let sin_a = style.angle.sin();
    // Screen y points down, so a counter-clockwise angle flips the sine
    let rotate = |px: f32, py: f32| -> (f32, f32) {
        (px * cos_a + py * sin_a + x, -px * sin_a + py * cos_a + y)
    };

    if let Some(bg) = style.background {
        let pad = style.size * 0.2;
        let corners = [
            (ox - pad, oy - pad),
            (ox + block_w + pad, oy - pad),
            (ox + block_w + pad, oy + block_h + pad),
            (ox - pad, oy + block_h + pad),
        ];
        let mut pb = PathBuilder::new();
        for (i, (cx, cy)) in corners.iter().enumerate() {
            let (rx, ry) = rotate(*cx, *cy);
            if i == 0 {
                pb.move_to(rx, ry);
            } else {
                pb.line_to(rx, ry);
            }
        }
        pb.close();
        if let Some(path) = pb.finish() {
            let mut bg_paint = Paint::default();
            bg_paint.set_color_rgba8(bg.r, bg.g, bg.b, bg.a);
            bg_paint.anti_alias = true;
            pixmap.fill_path(&path, &bg_paint, FillRule::Winding, Transform::identity(), mask);
        }
    }

    let mut paint = Paint::default();
    let c = style.color;
    paint.set_color_rgba8(c.r, c.g, c.b, c.a);
    paint.anti_alias = true;

    let mut stroke = Stroke::default();
    stroke.width = (char_width * 0.15).max(1.0);
    stroke.line_cap = LineCap::Round;
    stroke.line_join = LineJoin::Round;

    for (li, line) in text.lines().enumerate() {
        let line_w = text_width(line, style.size);
        let shift = match style.halign {
            HAlign::Left => 0.0,
            HAlign::Center => (block_w - line_w) / 2.0,
            HAlign::Right => block_w - line_w,
        };
        let cy = oy + li as f32 * line_height(style.size) + char_height / 2.0;
        for (i, ch) in line.chars().enumerate() {
            let cx = ox + shift + i as f32 * (char_width + char_spacing) + char_width / 2.0;
            draw_character(pixmap, cx, cy, ch, char_width, char_height, &rotate, &paint, &stroke, mask);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_character(
    pixmap: &mut Pixmap,
    cx: f32,
    cy: f32,
    ch: char,
    width: f32,
    height: f32,
    rotate: &dyn Fn(f32, f32) -> (f32, f32),
    paint: &Paint,
    stroke: &Stroke,
    mask: Option<&Mask>,
) {
    let Some(segments) = glyph(ch) else {
        return;
    };
    let half_w = width / 2.0;
    let (half_h, y_off) = if ch.is_ascii_lowercase() {
        (height * 0.35, height * 0.15)
    } else {
        (height / 2.0, 0.0)
    };

    let mut pb = PathBuilder::new();
    for polyline in segments.iter() {
        for (i, (gx, gy)) in polyline.iter().enumerate() {
            let (px, py) = rotate(cx + gx * half_w, cy + y_off + gy * half_h);
            if i == 0 {
                pb.move_to(px, py);
            } else {
                pb.line_to(px, py);
            }
        }
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, paint, stroke, Transform::identity(), mask);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width_multiline() {
        let one = text_width("well", 10.0);
        let two = text_width("well\n#.", 10.0);
        assert!((one - two).abs() < 1e-6);
        assert!(text_height("a\nb", 10.0) > text_height("a", 10.0));
    }

    #[test]
    fn test_known_glyphs() {
        for ch in "Oil saturation (Initial) -0.4 #.".chars() {
            assert!(has_glyph(ch), "missing glyph {:?}", ch);
        }
        assert!(!has_glyph('~'));
    }

    #[test]
    fn test_draw_marks_pixels() {
        let mut pixmap = Pixmap::new(60, 30).unwrap();
        let style = TextStyle::new(14.0, Color::BLACK).aligned(HAlign::Center, VAlign::Center);
        draw_text(&mut pixmap, 30.0, 15.0, "12", &style, None);
        assert!(pixmap.data().chunks(4).any(|px| px[3] > 0));
    }
}
