use eframe::egui::{self, Align2, Color32, FontId, Rect, RichText, ScrollArea, Sense, Ui, Vec2};
use egui_extras::{Column, TableBuilder};

use super::plot::to_color32;
use crate::color::cividis;
use crate::figure::Figure;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Right side panel – colorbar, authors, skipped files
// ---------------------------------------------------------------------------

enum AuthorAction {
    ShowAll,
    HideAll,
    Toggle(String),
}

/// Render the side panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(figure) = &state.figure else {
        ui.label("No metadata loaded.");
        return;
    };

    // Clicks are collected while the figure is borrowed and applied after.
    let mut actions = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Da (log scale)");
            colorbar(ui, figure);
            ui.separator();

            // ---- Author legend with visibility toggles ----
            ui.horizontal(|ui: &mut Ui| {
                ui.strong("Authors");
                if ui.small_button("All").clicked() {
                    actions.push(AuthorAction::ShowAll);
                }
                if ui.small_button("None").clicked() {
                    actions.push(AuthorAction::HideAll);
                }
            });

            for entry in figure.legend_entries() {
                let n_series = figure
                    .series
                    .iter()
                    .filter(|s| s.author == entry.label)
                    .count();
                let text = RichText::new(format!(
                    "{} {}  ({n_series})",
                    entry.marker.glyph(),
                    entry.label
                ))
                .color(to_color32(entry.color));

                let mut checked = state.is_visible(&entry.label);
                if ui.checkbox(&mut checked, text).changed() {
                    actions.push(AuthorAction::Toggle(entry.label));
                }
            }
            ui.separator();

            // ---- Skipped experiment files (collapsible) ----
            let header_text = format!("Skipped files  ({})", figure.skipped.len());
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("skipped")
                .default_open(false)
                .show(ui, |ui: &mut Ui| skipped_table(ui, figure));
        });

    for action in actions {
        match action {
            AuthorAction::ShowAll => state.show_all(),
            AuthorAction::HideAll => state.hide_all(),
            AuthorAction::Toggle(author) => state.toggle_author(&author),
        }
    }
}

/// Vertical cividis gradient with decade tick labels, high values on top.
fn colorbar(ui: &mut Ui, figure: &Figure) {
    const STEPS: usize = 64;
    let norm = figure.color_scale.norm;

    let (response, painter) = ui.allocate_painter(Vec2::new(120.0, 220.0), Sense::hover());
    let bar = Rect::from_min_size(
        response.rect.min + Vec2::new(4.0, 8.0),
        Vec2::new(22.0, response.rect.height() - 16.0),
    );

    let slice = bar.height() / STEPS as f32;
    for i in 0..STEPS {
        let t = (i as f64 + 0.5) / STEPS as f64;
        let top = bar.bottom() - (i + 1) as f32 * slice;
        let rect = Rect::from_min_size(egui::pos2(bar.left(), top), Vec2::new(bar.width(), slice + 0.5));
        painter.rect_filled(rect, 0.0, to_color32(cividis(t)));
    }

    let text_color = ui.visuals().text_color();
    for (value, t) in norm.decade_ticks() {
        let y = bar.bottom() - t as f32 * bar.height();
        painter.line_segment(
            [egui::pos2(bar.right(), y), egui::pos2(bar.right() + 4.0, y)],
            (1.0, text_color),
        );
        painter.text(
            egui::pos2(bar.right() + 8.0, y),
            Align2::LEFT_CENTER,
            format!("{value:.0e}"),
            FontId::proportional(11.0),
            text_color,
        );
    }
}

fn skipped_table(ui: &mut Ui, figure: &Figure) {
    if figure.skipped.is_empty() {
        ui.label("None");
        return;
    }
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto())
        .column(Column::remainder())
        .header(18.0, |mut header| {
            header.col(|ui| {
                ui.strong("File");
            });
            header.col(|ui| {
                ui.strong("Reason");
            });
        })
        .body(|mut body| {
            for skipped in &figure.skipped {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        let name = skipped
                            .path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_else(|| skipped.path.display().to_string());
                        ui.label(name)
                            .on_hover_text(skipped.path.display().to_string());
                    });
                    row.col(|ui| {
                        ui.label(&skipped.reason);
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open metadata…").clicked() {
                open_metadata_dialog(state);
                ui.close_menu();
            }
            if ui.button("Choose data directory…").clicked() {
                choose_data_dir_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(state.figure.is_some(), egui::Button::new("Export SVG…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        if ui.button("Reload").clicked() {
            state.reload();
        }

        ui.separator();

        if let Some(fig) = &state.figure {
            ui.label(format!(
                "{} of {} experiments plotted, {} points, {} skipped",
                fig.series.len(),
                fig.rows_total,
                fig.point_count(),
                fig.skipped.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().warn_fg_color
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_metadata_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open experiment metadata")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening metadata {}", path.display());
        state.set_metadata_file(path);
    }
}

pub fn choose_data_dir_dialog(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Choose experiment data directory")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(path) = dir {
        log::info!("Using data directory {}", path.display());
        state.set_data_dir(path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export figure")
        .add_filter("SVG", &["svg"])
        .set_file_name("historic_hrl.svg")
        .save_file();

    if let Some(path) = file {
        state.export(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{DarcyColorScale, MarkerMap};
    use crate::config::PlotConfig;
    use crate::figure::ScatterSeries;

    fn state_with_figure() -> AppState {
        let color_scale = DarcyColorScale::from_range(Some((1e-4, 1e-2))).unwrap();
        let markers = MarkerMap::from_authors(["Elder", "Katto"]);
        let series = ["Elder", "Katto"]
            .into_iter()
            .map(|author| ScatterSeries {
                author: author.to_string(),
                key: author.to_lowercase(),
                darcy: 1e-3,
                color: color_scale.color_for(1e-3),
                marker: markers.marker_for(author),
                points: vec![[10.0, 0.5]],
            })
            .collect();
        let figure = Figure {
            title: "Panel test".to_string(),
            series,
            skipped: Vec::new(),
            color_scale,
            markers,
            rows_total: 2,
        };
        AppState::new(PlotConfig::default(), Some(figure))
    }

    #[test]
    fn side_panel_renders_without_changing_state() {
        let mut state = state_with_figure();
        state.toggle_author("Katto");

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| side_panel(ui, &mut state));
        });

        assert!(state.figure.is_some());
        assert!(state.is_visible("Elder"));
        assert!(!state.is_visible("Katto"));
    }
}
