use super::model::{ExperimentData, NormalizedSeries};

/// Default upper bound on `Nu / Pr_p`; points above it are treated as outliers.
pub const DEFAULT_MAX_NORMALIZED_NU: f64 = 1.5;

/// Indices of `values` that satisfy `v <= threshold`.
///
/// `NaN` never compares true, so missing measurements are dropped here too.
pub fn retained_indices(values: &[f64], threshold: f64) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, &v)| v <= threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Scale both columns by `pr_p` and drop points whose `Nu / Pr_p` exceeds
/// `threshold`.
pub fn normalize(data: &ExperimentData, pr_p: f64, threshold: f64) -> NormalizedSeries {
    let y: Vec<f64> = data.nu.iter().map(|nu| nu / pr_p).collect();

    let points = retained_indices(&y, threshold)
        .into_iter()
        .filter_map(|i| Some([data.ra_d.get(i)? / pr_p, y[i]]))
        .collect();

    NormalizedSeries { points }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_keeps_values_at_or_below_threshold() {
        assert_eq!(retained_indices(&[0.5, 2.0, 1.0], 1.5), vec![0, 2]);
        assert_eq!(retained_indices(&[1.5, f64::NAN, 1.6], 1.5), vec![0]);
    }

    #[test]
    fn normalize_divides_both_axes() {
        let data = ExperimentData {
            ra_d: vec![100.0, 400.0, 900.0],
            nu: vec![1.0, 4.0, 2.0],
        };
        let series = normalize(&data, 2.0, DEFAULT_MAX_NORMALIZED_NU);
        // y = [0.5, 2.0, 1.0] -> middle point is an outlier
        assert_eq!(series.points, vec![[50.0, 0.5], [450.0, 1.0]]);
    }

    #[test]
    fn everything_filtered_gives_empty_series() {
        let data = ExperimentData {
            ra_d: vec![1.0, 2.0],
            nu: vec![10.0, 20.0],
        };
        assert!(normalize(&data, 1.0, DEFAULT_MAX_NORMALIZED_NU).is_empty());
    }
}
