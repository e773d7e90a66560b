use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use palette::Srgb;

use crate::color::{DarcyColorScale, Marker, MarkerMap};
use crate::config::PlotConfig;
use crate::data::filter::normalize;
use crate::data::loader::{experiment_path, load_experiment, load_metadata};
use crate::data::model::Metadata;
use crate::error::{ColorScaleError, ExperimentError};

// ---------------------------------------------------------------------------
// Figure model – everything a renderer needs, independent of the backend
// ---------------------------------------------------------------------------

/// One scatter series: the retained points of a single experiment.
#[derive(Debug, Clone)]
pub struct ScatterSeries {
    pub author: String,
    pub key: String,
    pub darcy: f64,
    pub color: Srgb<u8>,
    pub marker: Marker,
    /// `[Ra_D / Pr_p, Nu / Pr_p]`
    pub points: Vec<[f64; 2]>,
}

/// A metadata row whose experiment file could not be used.
#[derive(Debug, Clone)]
pub struct SkippedRow {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Srgb<u8>,
    pub marker: Marker,
}

#[derive(Debug, Clone)]
pub struct Figure {
    pub title: String,
    pub series: Vec<ScatterSeries>,
    pub skipped: Vec<SkippedRow>,
    pub color_scale: DarcyColorScale,
    pub markers: MarkerMap,
    /// Cleaned metadata rows considered for plotting.
    pub rows_total: usize,
}

impl Figure {
    /// One entry per distinct author, in the order they were first plotted.
    /// The swatch follows that author's first series.
    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        let mut seen = HashSet::new();
        self.series
            .iter()
            .filter(|s| seen.insert(s.author.as_str()))
            .map(|s| LegendEntry {
                label: s.author.clone(),
                color: s.color,
                marker: s.marker,
            })
            .collect()
    }

    /// Bounding box of all points as `([xmin, xmax], [ymin, ymax])`, positive
    /// values only. `None` when nothing can be drawn on log axes.
    pub fn log_bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut pts = self
            .series
            .iter()
            .flat_map(|s| s.points.iter())
            .filter(|[x, y]| *x > 0.0 && *y > 0.0 && x.is_finite() && y.is_finite());
        let &[x0, y0] = pts.next()?;
        Some(pts.fold(([x0, x0], [y0, y0]), |([xl, xh], [yl, yh]), &[x, y]| {
            ([xl.min(x), xh.max(x)], [yl.min(y), yh.max(y)])
        }))
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Walk the cleaned metadata and turn every usable experiment into a series.
///
/// A row whose file is missing or malformed is logged and skipped; a row
/// whose points are all outliers is omitted quietly. Only an unusable Darcy
/// range is an error.
pub fn build_figure(meta: &Metadata, config: &PlotConfig) -> Result<Figure, ColorScaleError> {
    let color_scale = DarcyColorScale::from_range(meta.darcy_range())?;
    let markers = MarkerMap::from_authors(meta.authors());

    let mut series = Vec::new();
    let mut skipped = Vec::new();

    for row in &meta.rows {
        let path = experiment_path(&config.data_dir, &row.key, &config.data_extension);

        let normalized = load_experiment(&path)
            .map(|data| normalize(&data, row.pr_p, config.max_normalized_nu));

        match normalized {
            Ok(s) if s.is_empty() => {
                log::debug!(
                    "{}: no points with Nu/Pr_p <= {}",
                    path.display(),
                    config.max_normalized_nu
                );
            }
            Ok(s) => series.push(ScatterSeries {
                author: row.name.clone(),
                key: row.key.clone(),
                darcy: row.da,
                color: color_scale.color_for(row.da),
                marker: markers.marker_for(&row.name),
                points: s.points,
            }),
            Err(e) => skipped.push(skip(path, e)),
        }
    }

    log::info!(
        "Plotted {} of {} experiments ({} skipped)",
        series.len(),
        meta.len(),
        skipped.len()
    );

    Ok(Figure {
        title: config.title.clone(),
        series,
        skipped,
        color_scale,
        markers,
        rows_total: meta.len(),
    })
}

fn skip(path: PathBuf, err: ExperimentError) -> SkippedRow {
    log::warn!("Skipping {}: {err}", path.display());
    SkippedRow {
        path,
        reason: err.to_string(),
    }
}

/// Load the metadata named in `config` and build the figure.
pub fn load_figure(config: &PlotConfig) -> Result<Figure> {
    let meta = load_metadata(&config.metadata_file)
        .with_context(|| format!("loading metadata {}", config.metadata_file.display()))?;
    build_figure(&meta, config).context("building Darcy color scale")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::MetadataRow;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hrl-plot-fig-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn row(name: &str, key: &str, pr_p: f64, da: f64) -> MetadataRow {
        MetadataRow {
            name: name.to_string(),
            key: key.to_string(),
            pr_p,
            da,
        }
    }

    #[test]
    fn missing_file_is_skipped_not_fatal() {
        let dir = scratch_dir("missing");
        std::fs::write(dir.join("a1.csv"), "Ra_D,Nu\n100,1\n1000,2\n").unwrap();
        std::fs::write(dir.join("b1.csv"), "Ra_D,Nu\n50,0.5\n").unwrap();

        let meta = Metadata {
            rows: vec![
                row("Elder", "a1", 2.0, 1e-3),
                row("Katto", "gone", 1.0, 1e-4),
                row("Elder", "b1", 1.0, 1e-2),
            ],
            dropped: 0,
        };
        let config = PlotConfig {
            data_dir: dir.clone(),
            ..PlotConfig::default()
        };

        let fig = build_figure(&meta, &config).unwrap();
        assert_eq!(fig.series.len(), 2);
        assert_eq!(fig.skipped.len(), 1);
        assert_eq!(fig.skipped[0].path, dir.join("gone.csv"));
        assert_eq!(fig.rows_total, 3);
        // y = [0.5, 1.0] for a1 with Pr_p = 2
        assert_eq!(fig.series[0].points, vec![[50.0, 0.5], [500.0, 1.0]]);
    }

    #[test]
    fn all_outlier_row_is_omitted_without_skip_entry() {
        let dir = scratch_dir("outliers");
        std::fs::write(dir.join("hot.csv"), "Ra_D,Nu\n100,9\n").unwrap();
        let meta = Metadata {
            rows: vec![row("Elder", "hot", 1.0, 1e-3)],
            dropped: 0,
        };
        let config = PlotConfig {
            data_dir: dir,
            ..PlotConfig::default()
        };

        let fig = build_figure(&meta, &config).unwrap();
        assert!(fig.series.is_empty());
        assert!(fig.skipped.is_empty());
        assert!(fig.log_bounds().is_none());
    }

    #[test]
    fn legend_has_one_entry_per_author() {
        let dir = scratch_dir("legend");
        for key in ["e1", "e2", "k1", "e3"] {
            std::fs::write(dir.join(format!("{key}.csv")), "Ra_D,Nu\n10,1\n").unwrap();
        }
        let meta = Metadata {
            rows: vec![
                row("Elder", "e1", 1.0, 1e-3),
                row("Elder", "e2", 1.0, 1e-4),
                row("Katto", "k1", 1.0, 1e-2),
                row("Elder", "e3", 1.0, 1e-5),
            ],
            dropped: 0,
        };
        let config = PlotConfig {
            data_dir: dir,
            ..PlotConfig::default()
        };

        let fig = build_figure(&meta, &config).unwrap();
        assert_eq!(fig.series.len(), 4);
        let labels: Vec<String> = fig.legend_entries().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Elder", "Katto"]);
    }

    #[test]
    fn non_positive_darcy_is_fatal() {
        let meta = Metadata {
            rows: vec![row("Elder", "e1", 1.0, 0.0), row("Elder", "e2", 1.0, 1e-3)],
            dropped: 0,
        };
        let err = build_figure(&meta, &PlotConfig::default()).unwrap_err();
        assert_eq!(err, ColorScaleError::NonPositive(0.0));
    }
}
