use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{
    ColorConflictHandling, GridInput, GridMark, Legend, MarkerShape, Plot, PlotPoint, Points,
};

use crate::color::Marker;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Log-log scatter (central panel)
// ---------------------------------------------------------------------------

/// Render the normalized scatter in the central panel.
///
/// egui_plot has no log axes, so points are plotted at `(log10 x, log10 y)`
/// and the grid/labels are laid out in decades.
pub fn scatter_plot(ui: &mut Ui, state: &AppState) {
    let figure = match &state.figure {
        Some(fig) => fig,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a metadata file to plot experiments  (File → Open metadata…)");
            });
            return;
        }
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&figure.title);
    });

    let radius = state.config.marker_radius;
    let edge = state.config.edge_width;

    Plot::new("hrl_scatter")
        // both passes of a series share its name; the colored one is drawn last
        .legend(Legend::default().color_conflict_handling(ColorConflictHandling::PickLast))
        .x_axis_label("Ra_D / Pr_p")
        .y_axis_label("Nu / (Ra_D / Ra_c)")
        .data_aspect(1.0)
        .x_grid_spacer(log_axis_spacer)
        .y_grid_spacer(log_axis_spacer)
        .x_axis_formatter(log_axis_formatter)
        .y_axis_formatter(log_axis_formatter)
        .label_formatter(|name, value: &PlotPoint| {
            let (x, y) = (10f64.powf(value.x), 10f64.powf(value.y));
            if name.is_empty() {
                format!("x = {x:.3e}\ny = {y:.3}")
            } else {
                format!("{name}\nx = {x:.3e}\ny = {y:.3}")
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &figure.series {
                if !state.is_visible(&series.author) {
                    continue;
                }
                let points = log_points(&series.points);
                if points.is_empty() {
                    continue;
                }
                let shape = marker_shape(series.marker);

                for pass in marker_passes(to_color32(series.color), radius, edge) {
                    plot_ui.points(
                        Points::new(points.clone())
                            .name(&series.author)
                            .shape(shape)
                            .color(pass.color)
                            .filled(true)
                            .radius(pass.radius),
                    );
                }
            }
        });
}

/// Project positive, finite points into log10 space; the rest cannot be
/// shown on log axes and are dropped.
pub fn log_points(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    points
        .iter()
        .filter(|[x, y]| *x > 0.0 && *y > 0.0)
        .map(|[x, y]| [x.log10(), y.log10()])
        .filter(|[x, y]| x.is_finite() && y.is_finite())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPass {
    pub color: Color32,
    pub radius: f32,
}

/// Draw order for one marker: a black marker `edge` points larger, then the
/// series color on top.
///
/// egui_plot strokes its outline in the marker color and draws `*`, `+` and
/// `x` as bare line segments, so the edge is a larger underlay rather than an
/// outline pass over the fill.
pub fn marker_passes(color: Color32, radius: f32, edge: f32) -> Vec<MarkerPass> {
    let mut passes = Vec::with_capacity(2);
    if edge > 0.0 {
        passes.push(MarkerPass {
            color: Color32::BLACK,
            radius: radius + edge,
        });
    }
    passes.push(MarkerPass { color, radius });
    passes
}

pub fn to_color32(c: palette::Srgb<u8>) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

pub fn marker_shape(marker: Marker) -> MarkerShape {
    match marker {
        Marker::Circle => MarkerShape::Circle,
        Marker::Asterisk => MarkerShape::Asterisk,
        Marker::Diamond => MarkerShape::Diamond,
        Marker::Up => MarkerShape::Up,
        Marker::Down => MarkerShape::Down,
        Marker::Plus => MarkerShape::Plus,
        Marker::Cross => MarkerShape::Cross,
        Marker::Square => MarkerShape::Square,
        Marker::Left => MarkerShape::Left,
        Marker::Right => MarkerShape::Right,
    }
}

// ---------------------------------------------------------------------------
// Decade grid
// ---------------------------------------------------------------------------

/// Decades beyond which minor ticks are left out.
const MINOR_TICK_DECADES: i64 = 12;
/// Upper bound on major ticks per axis when zoomed far out.
const MAX_MAJOR_TICKS: i64 = 40;

#[allow(clippy::needless_pass_by_value)]
fn log_axis_spacer(input: GridInput) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    let (lo, hi) = (min.floor() as i64, max.ceil() as i64);
    let decades = hi.saturating_sub(lo);
    let stride = (decades / MAX_MAJOR_TICKS + 1) as usize;
    let minors = if decades <= MINOR_TICK_DECADES { 1..10 } else { 1..2 };

    let mut marks = vec![];
    for i in (lo..=hi).step_by(stride) {
        marks.extend(
            minors
                .clone()
                .map(|j| {
                    let value = i as f64 + (j as f64).log10();
                    let step_size = if j == 1 { stride as f64 } else { 0.1 };
                    GridMark { value, step_size }
                })
                .filter(|gm| (min..=max).contains(&gm.value)),
        );
    }
    marks
}

/// Label whole decades as `10^k`; minor ticks stay blank.
fn log_axis_formatter(gm: GridMark, _bounds: &RangeInclusive<f64>) -> String {
    let k = gm.value.round();
    if (gm.value - k).abs() > 1e-9 {
        return String::new();
    }
    format!("10{}", superscript(k as i32))
}

fn superscript(n: i32) -> String {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    let mut out = String::new();
    if n < 0 {
        out.push('⁻');
    }
    for d in n.unsigned_abs().to_string().chars() {
        out.push(DIGITS[d as usize - '0' as usize]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_points_masks_non_positive() {
        let pts = log_points(&[[100.0, 0.1], [0.0, 1.0], [10.0, -1.0], [1000.0, 1.0]]);
        assert_eq!(pts.len(), 2);
        assert!((pts[0][0] - 2.0).abs() < 1e-12);
        assert!((pts[0][1] + 1.0).abs() < 1e-12);
        assert!((pts[1][0] - 3.0).abs() < 1e-12);
        assert_eq!(pts[1][1], 0.0);
    }

    #[test]
    fn decade_labels() {
        let bounds = 0.0..=1.0;
        let major = GridMark { value: -3.0, step_size: 1.0 };
        let minor = GridMark { value: 2f64.log10(), step_size: 0.1 };
        assert_eq!(log_axis_formatter(major, &bounds), "10⁻³");
        assert_eq!(log_axis_formatter(minor, &bounds), "");
        assert_eq!(superscript(12), "¹²");
    }

    #[test]
    fn edge_is_drawn_under_the_series_color() {
        let color = Color32::from_rgb(0, 120, 200);
        let passes = marker_passes(color, 3.0, 0.5);
        assert_eq!(
            passes,
            vec![
                MarkerPass {
                    color: Color32::BLACK,
                    radius: 3.5
                },
                MarkerPass { color, radius: 3.0 },
            ]
        );

        // line-only shapes are drawn the same way, so the color stays on top
        let last = marker_passes(color, 3.0, 0.2).last().copied();
        assert_eq!(last.map(|p| p.color), Some(color));

        assert_eq!(marker_passes(color, 3.0, 0.0), vec![MarkerPass { color, radius: 3.0 }]);
    }

    #[test]
    fn spacer_is_bounded_when_zoomed_out() {
        let input = GridInput {
            bounds: (-1e6, 1e6),
            base_step_size: 1.0,
        };
        let marks = log_axis_spacer(input);
        assert!(marks.len() <= (MAX_MAJOR_TICKS + 2) as usize, "{}", marks.len());
        assert!(marks.iter().all(|m| m.step_size >= 1.0));

        let near = log_axis_spacer(GridInput {
            bounds: (0.0, 1.0),
            base_step_size: 0.01,
        });
        assert_eq!(near.len(), 10);
    }

    #[test]
    fn every_marker_maps_to_a_distinct_shape() {
        let shapes: Vec<MarkerShape> = Marker::PALETTE.into_iter().map(marker_shape).collect();
        for (i, a) in shapes.iter().enumerate() {
            for b in &shapes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
