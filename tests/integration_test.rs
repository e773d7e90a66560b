use std::path::{Path, PathBuf};

use hrl_plot::color::Marker;
use hrl_plot::config::PlotConfig;
use hrl_plot::data::loader::load_metadata;
use hrl_plot::export::export_svg;
use hrl_plot::figure::{build_figure, load_figure};

// Test constants
const TEST_DATA_DIR: &str = "./tests/test_data";

fn fixture_config() -> PlotConfig {
    let root = Path::new(TEST_DATA_DIR);
    PlotConfig {
        metadata_file: root.join("HRL_historic_experiments.csv"),
        data_dir: root.join("Data_sets"),
        ..PlotConfig::default()
    }
}

#[test]
fn test_data_directory_exists() {
    let config = fixture_config();
    assert!(
        config.metadata_file.is_file(),
        "Metadata fixture not found: {}",
        config.metadata_file.display()
    );
    assert!(config.data_dir.is_dir(), "Data_sets fixture not found");
}

#[test]
fn test_metadata_cleaning() {
    let meta = load_metadata(&fixture_config().metadata_file).expect("metadata should load");

    // lapwood_1 (Pr_p = nan) and comb_1 (empty Da) are dropped
    assert_eq!(meta.len(), 6);
    assert_eq!(meta.dropped, 2);
    assert!(meta.rows.iter().all(|r| r.key != "lapwood_1" && r.key != "comb_1"));

    assert_eq!(meta.rows[0].pr_p, 1000.0);
    assert_eq!(meta.rows[2].pr_p, 2500.0);
    assert_eq!(meta.authors(), vec!["Elder", "Katto", "Buretta"]);
    assert_eq!(meta.darcy_range(), Some((1e-5, 1e-2)));
}

#[test]
fn test_full_pipeline() {
    let fig = load_figure(&fixture_config()).expect("figure should build");

    assert_eq!(fig.rows_total, 6);
    // katto_missing and buretta_bad are skipped, buretta_hot has only outliers
    assert_eq!(fig.series.len(), 3);
    assert_eq!(fig.skipped.len(), 2);

    let keys: Vec<&str> = fig.series.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["elder_1", "elder_2", "katto_1"]);

    let skipped: Vec<PathBuf> = fig.skipped.iter().map(|s| s.path.clone()).collect();
    assert!(skipped[0].ends_with("katto_missing.csv"));
    assert!(skipped[1].ends_with("buretta_bad.csv"));
    assert!(fig.skipped[1].reason.contains("Ra_D"));
}

#[test]
fn test_outlier_filter_on_fixture() {
    let fig = load_figure(&fixture_config()).unwrap();
    let elder_1 = &fig.series[0];

    // Nu / Pr_p = [0.5, 2.0, 1.0]; the middle point is dropped
    assert_eq!(elder_1.points, vec![[100.0, 0.5], [10000.0, 1.0]]);
}

#[test]
fn test_legend_deduplicates_authors() {
    let fig = load_figure(&fixture_config()).unwrap();

    let elder_series = fig.series.iter().filter(|s| s.author == "Elder").count();
    assert_eq!(elder_series, 2);

    let legend = fig.legend_entries();
    let labels: Vec<&str> = legend.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["Elder", "Katto"]);
    assert_eq!(legend[0].marker, Marker::Circle);
    assert_eq!(legend[1].marker, Marker::Asterisk);
}

#[test]
fn test_colors_follow_darcy() {
    let fig = load_figure(&fixture_config()).unwrap();
    // katto_1 sits at the bottom of the Darcy range
    assert_eq!(fig.series[2].color, hrl_plot::color::cividis(0.0));
    assert_ne!(fig.series[0].color, fig.series[1].color);
}

#[test]
fn test_error_handling() {
    let config = PlotConfig {
        metadata_file: PathBuf::from("non_existent_metadata.csv"),
        ..fixture_config()
    };
    let result = load_figure(&config);
    assert!(result.is_err(), "Should fail with non-existent metadata");

    // a missing data directory only skips rows
    let meta = load_metadata(&fixture_config().metadata_file).unwrap();
    let config = PlotConfig {
        data_dir: PathBuf::from("non_existent_directory"),
        ..fixture_config()
    };
    let fig = build_figure(&meta, &config).expect("per-row failures are not fatal");
    assert!(fig.series.is_empty());
    assert_eq!(fig.skipped.len(), meta.len());
}

#[test]
fn test_svg_export() {
    let fig = load_figure(&fixture_config()).unwrap();
    let out = std::env::temp_dir().join(format!("hrl-plot-it-{}.svg", std::process::id()));

    export_svg(&fig, &out, &fixture_config()).expect("export should succeed");
    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.contains("Historic HRL Experiments"));
    assert!(svg.contains("Katto"));
}
