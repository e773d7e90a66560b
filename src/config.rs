use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::filter::DEFAULT_MAX_NORMALIZED_NU;
use crate::error::ConfigError;

pub const CONFIG_ENV: &str = "HRL_PLOT_CONFIG";
const LOCAL_CONFIG: &str = "hrl_plot.json";

/// Where to look for the configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(p) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(p);
    }
    PathBuf::from(LOCAL_CONFIG)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default = "default_metadata_file")]
    pub metadata_file: PathBuf,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Extension of the per-experiment files, without the dot.
    #[serde(default = "default_data_extension")]
    pub data_extension: String,
    /// Points with `Nu / Pr_p` above this are dropped.
    #[serde(default = "default_max_normalized_nu")]
    pub max_normalized_nu: f64,
    /// Marker radius in points (viewer) and pixels (SVG).
    #[serde(default = "default_marker_radius")]
    pub marker_radius: f32,
    /// Black marker edge; `0` draws none.
    #[serde(default = "default_edge_width")]
    pub edge_width: f32,
    #[serde(default = "default_title")]
    pub title: String,
    /// Write an SVG of the figure at startup.
    #[serde(default)]
    pub svg_export: Option<PathBuf>,
    #[serde(default = "default_svg_size")]
    pub svg_size: [u32; 2],
}

fn default_metadata_file() -> PathBuf {
    PathBuf::from("./HRL_historic_experiments.csv")
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./Data_sets")
}
fn default_data_extension() -> String {
    "csv".to_string()
}
fn default_max_normalized_nu() -> f64 {
    DEFAULT_MAX_NORMALIZED_NU
}
fn default_marker_radius() -> f32 {
    3.0
}
fn default_edge_width() -> f32 {
    0.2
}
fn default_title() -> String {
    "Historic HRL Experiments: Normalized by Pr_p".to_string()
}
fn default_svg_size() -> [u32; 2] {
    [1000, 700]
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            metadata_file: default_metadata_file(),
            data_dir: default_data_dir(),
            data_extension: default_data_extension(),
            max_normalized_nu: default_max_normalized_nu(),
            marker_radius: default_marker_radius(),
            edge_width: default_edge_width(),
            title: default_title(),
            svg_export: None,
            svg_size: default_svg_size(),
        }
    }
}

impl PlotConfig {
    /// Load from [`default_config_path`]; a missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: PlotConfig =
            serde_json::from_str(r#"{ "data_dir": "/srv/hrl", "max_normalized_nu": 2.0 }"#)
                .unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/hrl"));
        assert_eq!(cfg.max_normalized_nu, 2.0);
        assert_eq!(cfg.data_extension, "csv");
        assert_eq!(cfg.svg_export, None);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = PlotConfig::load_from(Path::new("/no/such/hrl_plot.json")).unwrap();
        assert_eq!(cfg, PlotConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("hrl-plot-bad-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let err = PlotConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
