//! Colors and colormaps for field rendering.

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Matplotlib's default line cycle (`C0`..`C9`).
const TAB10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Same color with opacity scaled to `alpha` in `[0, 1]`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Color of the `i`-th entry of the line cycle.
    pub fn cycle(i: usize) -> Self {
        Self::parse(TAB10[i % TAB10.len()]).unwrap_or(Self::BLACK)
    }

    /// Parse `#rrggbb`, a single-letter code, a basic name or `C0`..`C9`.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        if spec.starts_with('#') {
            let (r, g, b) = hex_to_rgb(spec)?;
            return Some(Self::new(r, g, b, 255));
        }
        if let Some(n) = spec.strip_prefix('C') {
            if let Ok(i) = n.parse::<usize>() {
                return Some(Self::cycle(i));
            }
        }
        let rgb = match spec.to_lowercase().as_str() {
            "w" | "white" => (255, 255, 255),
            "k" | "black" => (0, 0, 0),
            "r" | "red" => (255, 0, 0),
            "g" | "green" => (0, 128, 0),
            "b" | "blue" => (0, 0, 255),
            "c" | "cyan" => (0, 191, 191),
            "m" | "magenta" => (191, 0, 191),
            "y" | "yellow" => (191, 191, 0),
            _ => return None,
        };
        Some(Self::new(rgb.0, rgb.1, rgb.2, 255))
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)).round() as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)).round() as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)).round() as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)).round() as u8,
    )
}

/// Piecewise-linear colormap over `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    stops: Vec<(f64, Color)>,
}

impl Colormap {
    /// Build from `(position, color)` stops; positions are sorted.
    pub fn linear_segmented(mut stops: Vec<(f64, Color)>) -> Self {
        stops.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        Self { stops }
    }

    /// Evenly spaced stops.
    pub fn from_colors(colors: &[Color]) -> Self {
        let n = colors.len().saturating_sub(1).max(1) as f64;
        Self::linear_segmented(
            colors
                .iter()
                .enumerate()
                .map(|(i, c)| (i as f64 / n, *c))
                .collect(),
        )
    }

    /// Teal-to-salmon map used for oil saturation.
    pub fn oil_water() -> Self {
        Self::linear_segmented(vec![
            (0.0, Color::new(0x1d, 0x9e, 0x97, 255)),
            (0.3, Color::new(0xb2, 0xe0, 0xdc, 255)),
            (1.0, Color::new(0xf4, 0x89, 0x74, 255)),
        ])
    }

    /// Diverging blue-white-red map used for correlations.
    pub fn bwr() -> Self {
        Self::from_colors(&[
            Color::new(0, 0, 255, 255),
            Color::WHITE,
            Color::new(255, 0, 0, 255),
        ])
    }

    pub fn stops(&self) -> &[(f64, Color)] {
        &self.stops
    }

    /// Color at normalised position `t` (clamped to `[0, 1]`).
    pub fn eval(&self, t: f64) -> Color {
        let Some(&(first_pos, first)) = self.stops.first() else {
            return Color::transparent();
        };
        if t.is_nan() {
            return Color::transparent();
        }
        let t = t.clamp(0.0, 1.0);
        if t <= first_pos {
            return first;
        }

        for pair in self.stops.windows(2) {
            let (lo, c_lo) = pair[0];
            let (hi, c_hi) = pair[1];
            if t <= hi {
                let span = hi - lo;
                let frac = if span.abs() < f64::EPSILON { 1.0 } else { (t - lo) / span };
                return interpolate_color(c_lo, c_hi, frac as f32);
            }
        }

        self.stops[self.stops.len() - 1].1
    }

    /// Color for `value` normalised over `[vmin, vmax]`.
    pub fn eval_range(&self, value: f64, vmin: f64, vmax: f64) -> Color {
        let range = vmax - vmin;
        let t = if range.abs() < f64::EPSILON { 0.5 } else { (value - vmin) / range };
        self.eval(t)
    }
}
