use anyhow::Context;
use eframe::egui;

use hrl_plot::app::HrlPlotApp;
use hrl_plot::config::PlotConfig;
use hrl_plot::export::export_svg;
use hrl_plot::figure::load_figure;
use hrl_plot::state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    let config = PlotConfig::load()?;
    let figure = load_figure(&config)?;

    if let Some(path) = &config.svg_export {
        export_svg(&figure, path, &config)?;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 760.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let state = AppState::new(config, Some(figure));
    eframe::run_native(
        "Historic HRL Experiments",
        options,
        Box::new(|_cc| Ok(Box::new(HrlPlotApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running viewer")
}
