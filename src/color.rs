use std::collections::HashMap;

use palette::{LinSrgb, Mix, Srgb};

use crate::error::ColorScaleError;

// ---------------------------------------------------------------------------
// Logarithmic normalization
// ---------------------------------------------------------------------------

/// Maps `[vmin, vmax]` onto `[0, 1]` in log10 space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNorm {
    pub vmin: f64,
    pub vmax: f64,
}

impl LogNorm {
    /// Both bounds must be strictly positive; a log scale has no room for
    /// zero or negative values.
    pub fn new(vmin: f64, vmax: f64) -> Result<Self, ColorScaleError> {
        if !(vmin > 0.0) {
            return Err(ColorScaleError::NonPositive(vmin));
        }
        Ok(Self { vmin, vmax })
    }

    /// Position of `value` on the scale, clipped to `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f64 {
        let (lo, hi) = (self.vmin.log10(), self.vmax.log10());
        if hi <= lo || !(value > 0.0) {
            return 0.0;
        }
        ((value.log10() - lo) / (hi - lo)).clamp(0.0, 1.0)
    }

    /// Inverse of [`normalize`](Self::normalize) for `t` in `[0, 1]`.
    pub fn value_at(&self, t: f64) -> f64 {
        let (lo, hi) = (self.vmin.log10(), self.vmax.log10());
        10f64.powf(lo + t * (hi - lo))
    }

    /// Whole decades inside the range as `(value, position)` pairs.
    pub fn decade_ticks(&self) -> Vec<(f64, f64)> {
        // log10 of an exact power of ten can land a hair off the integer
        let lo = (self.vmin.log10() - 1e-9).ceil() as i32;
        let hi = (self.vmax.log10() + 1e-9).floor() as i32;
        (lo..=hi)
            .map(|k| {
                let v = 10f64.powi(k);
                (v, self.normalize(v))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Cividis colormap
// ---------------------------------------------------------------------------

/// Anchor colours of the cividis map, evenly spaced on `[0, 1]`.
const CIVIDIS: [(u8, u8, u8); 9] = [
    (0, 34, 78),
    (18, 53, 112),
    (59, 73, 108),
    (87, 92, 109),
    (124, 123, 120),
    (157, 151, 117),
    (190, 175, 111),
    (224, 203, 94),
    (254, 232, 56),
];

/// Sample the cividis map at `t` (clamped to `[0, 1]`), blending in linear RGB.
pub fn cividis(t: f64) -> Srgb<u8> {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (CIVIDIS.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(CIVIDIS.len() - 2);
    let frac = (scaled - i as f64) as f32;

    let linear = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    };
    let mixed = linear(CIVIDIS[i]).mix(linear(CIVIDIS[i + 1]), frac);
    Srgb::<f32>::from_linear(mixed).into_format::<u8>()
}

/// Darcy number → colour, log-normalized over the observed range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DarcyColorScale {
    pub norm: LogNorm,
}

impl DarcyColorScale {
    /// Build the scale from the observed Darcy range (`None` when there are
    /// no rows).
    pub fn from_range(range: Option<(f64, f64)>) -> Result<Self, ColorScaleError> {
        let (vmin, vmax) = range.ok_or(ColorScaleError::Empty)?;
        Ok(Self {
            norm: LogNorm::new(vmin, vmax)?,
        })
    }

    pub fn color_for(&self, da: f64) -> Srgb<u8> {
        cividis(self.norm.normalize(da))
    }
}

// ---------------------------------------------------------------------------
// Author markers
// ---------------------------------------------------------------------------

/// Scatter marker shapes, in palette order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Marker {
    #[default]
    Circle,
    Asterisk,
    Diamond,
    Up,
    Down,
    Plus,
    Cross,
    Square,
    Left,
    Right,
}

impl Marker {
    pub const PALETTE: [Marker; 10] = [
        Marker::Circle,
        Marker::Asterisk,
        Marker::Diamond,
        Marker::Up,
        Marker::Down,
        Marker::Plus,
        Marker::Cross,
        Marker::Square,
        Marker::Left,
        Marker::Right,
    ];

    /// Single-character glyph for text legends.
    pub fn glyph(self) -> &'static str {
        match self {
            Marker::Circle => "●",
            Marker::Asterisk => "✱",
            Marker::Diamond => "◆",
            Marker::Up => "▲",
            Marker::Down => "▼",
            Marker::Plus => "✚",
            Marker::Cross => "✖",
            Marker::Square => "■",
            Marker::Left => "◀",
            Marker::Right => "▶",
        }
    }
}

/// Assigns each author a marker by first-seen order, cycling through
/// [`Marker::PALETTE`].
#[derive(Debug, Clone, Default)]
pub struct MarkerMap {
    mapping: HashMap<String, Marker>,
    default_marker: Marker,
}

impl MarkerMap {
    pub fn from_authors<'a>(authors: impl IntoIterator<Item = &'a str>) -> Self {
        let mut mapping = HashMap::new();
        for author in authors {
            let next = Marker::PALETTE[mapping.len() % Marker::PALETTE.len()];
            mapping.entry(author.to_string()).or_insert(next);
        }
        MarkerMap {
            mapping,
            default_marker: Marker::default(),
        }
    }

    /// Look up the marker for an author; unknown authors get a circle.
    pub fn marker_for(&self, author: &str) -> Marker {
        self.mapping
            .get(author)
            .copied()
            .unwrap_or(self.default_marker)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}
