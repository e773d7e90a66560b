use std::f64::consts::{FRAC_PI_4, PI};
use std::path::Path;

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::element::DashedPathElement;
use plotters::prelude::*;

use crate::color::{cividis, Marker};
use crate::config::PlotConfig;
use crate::figure::Figure;

const COLORBAR_STEPS: usize = 64;
const COLORBAR_WIDTH: u32 = 130;
const MARGIN: u32 = 15;
const X_LABEL_AREA: u32 = 45;
const Y_LABEL_AREA: u32 = 65;
const GRID_ALPHA: f64 = 0.2;

/// Marker geometry in SVG pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MarkerStyle {
    radius: f64,
    /// Whole pixels; 0 disables the outline.
    edge: u32,
}

impl MarkerStyle {
    fn from_config(config: &PlotConfig) -> Self {
        let edge = if config.edge_width > 0.0 {
            // plotters strokes in whole pixels, so thin edges become 1px
            config.edge_width.round().max(1.0) as u32
        } else {
            0
        };
        Self {
            radius: f64::from(config.marker_radius.max(1.0)),
            edge,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write the figure as an SVG file: log-log scatter, author legend and a
/// Darcy colorbar on the right. Size and marker style come from `config`.
pub fn export_svg(figure: &Figure, path: &Path, config: &PlotConfig) -> Result<()> {
    let [w, h] = config.svg_size;
    let root = SVGBackend::new(path, (w, h)).into_drawing_area();
    draw_figure(&root, figure, MarkerStyle::from_config(config))?;
    root.present()
        .with_context(|| format!("writing SVG to {}", path.display()))?;
    log::info!("Exported figure to {}", path.display());
    Ok(())
}

fn draw_figure<DB>(root: &DrawingArea<DB, Shift>, figure: &Figure, style: MarkerStyle) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (width, _) = root.dim_in_pixel();
    let (plot_area, bar_area) = root.split_horizontally(width.saturating_sub(COLORBAR_WIDTH) as i32);

    draw_scatter(&plot_area, figure, style)?;
    draw_colorbar(&bar_area, figure)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Scatter chart
// ---------------------------------------------------------------------------

fn draw_scatter<DB>(area: &DrawingArea<DB, Shift>, figure: &Figure, style: MarkerStyle) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let area = area.titled(&figure.title, ("sans-serif", 20))?;
    let (w, h) = area.dim_in_pixel();
    let pixels = (
        w.saturating_sub(2 * MARGIN + Y_LABEL_AREA).max(1),
        h.saturating_sub(2 * MARGIN + X_LABEL_AREA).max(1),
    );

    let (x_dec, y_dec) = figure
        .log_bounds()
        .map(|(x, y)| (padded_decades(x), padded_decades(y)))
        .unwrap_or(([0.0, 1.0], [-1.0, 0.0]));
    let (x_dec, y_dec) = equal_aspect(x_dec, y_dec, pixels);
    let [xmin, xmax] = x_dec.map(|v| 10f64.powf(v));
    let [ymin, ymax] = y_dec.map(|v| 10f64.powf(v));

    let mut chart = ChartBuilder::on(&area)
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d((xmin..xmax).log_scale(), (ymin..ymax).log_scale())?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Ra_D / Pr_p")
        .y_desc("Nu / (Ra_D / Ra_c)")
        .x_label_formatter(&|v| format!("{v:.0e}"))
        .y_label_formatter(&|v| format!("{v:.0e}"))
        .draw()?;

    // Dashed major and minor grid.
    let grid = BLACK.mix(GRID_ALPHA).stroke_width(1);
    chart.draw_series(grid_lines(x_dec).into_iter().map(|x| {
        DashedPathElement::new(vec![(x, ymin), (x, ymax)], 4, 3, grid)
    }))?;
    chart.draw_series(grid_lines(y_dec).into_iter().map(|y| {
        DashedPathElement::new(vec![(xmin, y), (xmax, y)], 4, 3, grid)
    }))?;

    let edge = BLACK.stroke_width(style.edge);

    for series in &figure.series {
        let fill = rgb(series.color).filled();
        let outline = marker_path(series.marker, style.radius);
        let mut closed = outline.clone();
        closed.extend(outline.first().copied());

        let visible = series
            .points
            .iter()
            .filter(|[x, y]| *x > 0.0 && *y > 0.0 && x.is_finite() && y.is_finite());

        chart.draw_series(
            visible
                .clone()
                .map(|&[x, y]| EmptyElement::at((x, y)) + Polygon::new(outline.clone(), fill)),
        )?;
        if style.edge > 0 {
            chart.draw_series(
                visible.map(|&[x, y]| EmptyElement::at((x, y)) + PathElement::new(closed.clone(), edge)),
            )?;
        }
    }

    for entry in figure.legend_entries() {
        let fill = rgb(entry.color).filled();
        let outline = marker_path(entry.marker, style.radius);
        chart
            .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
            .label(entry.label)
            .legend(move |(x, y)| {
                Polygon::new(
                    outline.iter().map(|&(dx, dy)| (x + dx, y + dy)).collect::<Vec<_>>(),
                    fill,
                )
            });
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.3))
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    Ok(())
}

/// Expand `[lo, hi]` outwards to whole decades, returned as log10 exponents.
fn padded_decades([lo, hi]: [f64; 2]) -> [f64; 2] {
    let lo = lo.log10().floor();
    let hi = hi.log10().ceil();
    if hi > lo {
        [lo, hi]
    } else {
        [lo, lo + 1.0]
    }
}

/// Widen the axis with more pixels per decade, about its centre, until both
/// axes use the same decade length on a `width x height` plotting area.
fn equal_aspect(x: [f64; 2], y: [f64; 2], (width, height): (u32, u32)) -> ([f64; 2], [f64; 2]) {
    let widen = |[lo, hi]: [f64; 2], span: f64| {
        let mid = (lo + hi) / 2.0;
        [mid - span / 2.0, mid + span / 2.0]
    };
    let (w, h) = (f64::from(width), f64::from(height));
    let per_decade = (w / (x[1] - x[0])).min(h / (y[1] - y[0]));
    (widen(x, w / per_decade), widen(y, h / per_decade))
}

/// Data values of the major and minor grid lines inside a log10 range.
fn grid_lines([lo, hi]: [f64; 2]) -> Vec<f64> {
    (lo.floor() as i32..=hi.ceil() as i32)
        .flat_map(|k| (1..10).map(move |j| k as f64 + f64::from(j).log10()))
        .filter(|v| (lo..=hi).contains(v))
        .map(|v| 10f64.powf(v))
        .collect()
}

// ---------------------------------------------------------------------------
// Colorbar
// ---------------------------------------------------------------------------

fn draw_colorbar<DB>(area: &DrawingArea<DB, Shift>, figure: &Figure) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let norm = figure.color_scale.norm;
    let (lo, hi) = if norm.vmax > norm.vmin {
        (norm.vmin, norm.vmax)
    } else {
        (norm.vmin / 10.0, norm.vmin * 10.0)
    };

    let mut chart = ChartBuilder::on(area)
        .margin_top(50)
        .margin_bottom(60)
        .margin_right(10)
        .right_y_label_area_size(70)
        .build_cartesian_2d(0.0..1.0, (lo..hi).log_scale())?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_x_axis()
        .y_desc("Da (log scale)")
        .y_label_formatter(&|v| format!("{v:.0e}"))
        .draw()?;

    chart.draw_series((0..COLORBAR_STEPS).map(|i| {
        let t0 = i as f64 / COLORBAR_STEPS as f64;
        let t1 = (i + 1) as f64 / COLORBAR_STEPS as f64;
        let (v0, v1) = (lo * (hi / lo).powf(t0), lo * (hi / lo).powf(t1));
        let color = cividis(norm.normalize(lo * (hi / lo).powf((t0 + t1) / 2.0)));
        Rectangle::new([(0.0, v0), (1.0, v1)], rgb(color).filled())
    }))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Marker outlines in pixel offsets (y grows downwards)
// ---------------------------------------------------------------------------

fn marker_path(marker: Marker, r: f64) -> Vec<(i32, i32)> {
    let pts: Vec<(f64, f64)> = match marker {
        Marker::Circle => (0..16)
            .map(|i| {
                let a = i as f64 * PI / 8.0;
                (r * a.cos(), r * a.sin())
            })
            .collect(),
        Marker::Square => {
            let s = r * 0.85;
            vec![(-s, -s), (s, -s), (s, s), (-s, s)]
        }
        Marker::Diamond => vec![(0.0, -r), (r, 0.0), (0.0, r), (-r, 0.0)],
        Marker::Up => triangle(r, -PI / 2.0),
        Marker::Down => triangle(r, PI / 2.0),
        Marker::Left => triangle(r, PI),
        Marker::Right => triangle(r, 0.0),
        Marker::Plus => plus(r),
        Marker::Cross => plus(r).into_iter().map(|p| rotate(p, FRAC_PI_4)).collect(),
        Marker::Asterisk => (0..10)
            .map(|i| {
                let radius = if i % 2 == 0 { r * 1.2 } else { r * 0.5 };
                let a = -PI / 2.0 + i as f64 * PI / 5.0;
                (radius * a.cos(), radius * a.sin())
            })
            .collect(),
    };
    pts.into_iter()
        .map(|(x, y)| (x.round() as i32, y.round() as i32))
        .collect()
}

/// Equilateral triangle with its tip at angle `tip`.
fn triangle(r: f64, tip: f64) -> Vec<(f64, f64)> {
    (0..3)
        .map(|i| {
            let a = tip + i as f64 * 2.0 * PI / 3.0;
            (r * a.cos(), r * a.sin())
        })
        .collect()
}

fn plus(r: f64) -> Vec<(f64, f64)> {
    let w = r / 3.0;
    vec![
        (-w, -r),
        (w, -r),
        (w, -w),
        (r, -w),
        (r, w),
        (w, w),
        (w, r),
        (-w, r),
        (-w, w),
        (-r, w),
        (-r, -w),
        (-w, -w),
    ]
}

fn rotate((x, y): (f64, f64), a: f64) -> (f64, f64) {
    (x * a.cos() - y * a.sin(), x * a.sin() + y * a.cos())
}

fn rgb(c: palette::Srgb<u8>) -> RGBColor {
    RGBColor(c.red, c.green, c.blue)
}
