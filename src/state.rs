use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::config::PlotConfig;
use crate::export::export_svg;
use crate::figure::{load_figure, Figure};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Paths and plot parameters.
    pub config: PlotConfig,

    /// The built figure (None until metadata loads successfully).
    pub figure: Option<Figure>,

    /// Authors whose series are currently hidden.
    pub hidden_authors: BTreeSet<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: PlotConfig, figure: Option<Figure>) -> Self {
        Self {
            config,
            figure,
            hidden_authors: BTreeSet::new(),
            status_message: None,
        }
    }

    /// Rebuild the figure from the current config. On failure the previous
    /// figure is kept and the error is shown.
    pub fn reload(&mut self) {
        match load_figure(&self.config) {
            Ok(figure) => {
                self.hidden_authors
                    .retain(|a| figure.series.iter().any(|s| &s.author == a));
                self.status_message = (!figure.skipped.is_empty())
                    .then(|| format!("{} experiment files skipped", figure.skipped.len()));
                self.figure = Some(figure);
            }
            Err(e) => {
                log::error!("Failed to load figure: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn set_metadata_file(&mut self, path: PathBuf) {
        self.config.metadata_file = path;
        self.reload();
    }

    pub fn set_data_dir(&mut self, path: PathBuf) {
        self.config.data_dir = path;
        self.reload();
    }

    pub fn is_visible(&self, author: &str) -> bool {
        !self.hidden_authors.contains(author)
    }

    /// Toggle a single author's series on or off.
    pub fn toggle_author(&mut self, author: &str) {
        if !self.hidden_authors.remove(author) {
            self.hidden_authors.insert(author.to_string());
        }
    }

    pub fn show_all(&mut self) {
        self.hidden_authors.clear();
    }

    pub fn hide_all(&mut self) {
        if let Some(fig) = &self.figure {
            self.hidden_authors = fig.series.iter().map(|s| s.author.clone()).collect();
        }
    }

    pub fn export(&mut self, path: PathBuf) {
        let Some(figure) = &self.figure else {
            self.status_message = Some("Nothing to export".to_string());
            return;
        };
        match export_svg(figure, &path, &self.config) {
            Ok(()) => self.status_message = Some(format!("Exported {}", path.display())),
            Err(e) => {
                log::error!("SVG export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_reload_keeps_status_and_no_figure() {
        let config = PlotConfig {
            metadata_file: PathBuf::from("/no/such/metadata.csv"),
            ..PlotConfig::default()
        };
        let mut state = AppState::new(config, None);
        state.reload();
        assert!(state.figure.is_none());
        let msg = state.status_message.unwrap();
        assert!(msg.starts_with("Error:"), "{msg}");
        assert!(msg.contains("/no/such/metadata.csv"), "{msg}");
    }

    #[test]
    fn author_toggles() {
        let mut state = AppState::new(PlotConfig::default(), None);
        assert!(state.is_visible("Elder"));
        state.toggle_author("Elder");
        assert!(!state.is_visible("Elder"));
        state.toggle_author("Elder");
        assert!(state.is_visible("Elder"));
        state.toggle_author("Katto");
        state.show_all();
        assert!(state.is_visible("Katto"));
    }

    #[test]
    fn export_without_figure_reports_status() {
        let mut state = AppState::new(PlotConfig::default(), None);
        state.export(std::env::temp_dir().join("unused.svg"));
        assert_eq!(state.status_message.as_deref(), Some("Nothing to export"));
    }
}
