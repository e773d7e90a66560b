use std::collections::HashSet;

// ---------------------------------------------------------------------------
// MetadataRow – one cleaned line of the metadata table
// ---------------------------------------------------------------------------

/// A metadata row that survived cleaning: both `Pr_p` and `Da` are present.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRow {
    /// Source author, used for the marker shape and the legend label.
    pub name: String,
    /// Experiment key; the data file is `<data_dir>/<key>.<ext>`.
    pub key: String,
    /// Particle Prandtl number, the normalization factor for both axes.
    pub pr_p: f64,
    /// Darcy number, the color dimension.
    pub da: f64,
}

// ---------------------------------------------------------------------------
// Metadata – the cleaned table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Metadata {
    /// Retained rows in file order.
    pub rows: Vec<MetadataRow>,
    /// Rows excluded because `Pr_p` or `Da` was missing.
    pub dropped: usize,
}

impl Metadata {
    /// Distinct author names in first-seen order.
    pub fn authors(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|r| r.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Observed `(min, max)` of the Darcy number, `None` for an empty table.
    pub fn darcy_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.rows.iter().map(|r| r.da);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ExperimentData – one per-experiment measurement file
// ---------------------------------------------------------------------------

/// Raw columns of an experiment file. Empty cells are `NaN`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperimentData {
    /// Rayleigh number.
    pub ra_d: Vec<f64>,
    /// Nusselt number – same length as `ra_d`.
    pub nu: Vec<f64>,
}

impl ExperimentData {
    pub fn len(&self) -> usize {
        self.ra_d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ra_d.is_empty()
    }
}

// ---------------------------------------------------------------------------
// NormalizedSeries – transient plotting input
// ---------------------------------------------------------------------------

/// `[Ra_D / Pr_p, Nu / Pr_p]` pairs that passed the outlier filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedSeries {
    pub points: Vec<[f64; 2]>,
}

impl NormalizedSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, da: f64) -> MetadataRow {
        MetadataRow {
            name: name.to_string(),
            key: format!("{name}_{da}"),
            pr_p: 1.0,
            da,
        }
    }

    #[test]
    fn authors_keep_first_seen_order() {
        let meta = Metadata {
            rows: vec![row("Lapwood", 1e-3), row("Elder", 1e-2), row("Lapwood", 1e-4)],
            dropped: 0,
        };
        assert_eq!(meta.authors(), vec!["Lapwood", "Elder"]);
    }

    #[test]
    fn darcy_range_spans_all_rows() {
        let meta = Metadata {
            rows: vec![row("A", 1e-3), row("B", 1e-6), row("C", 1e-2)],
            dropped: 1,
        };
        assert_eq!(meta.darcy_range(), Some((1e-6, 1e-2)));
        assert_eq!(Metadata::default().darcy_range(), None);
    }
}
