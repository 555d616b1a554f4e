//! Column Statistics over Extracted Samples

/// Summary of one extracted column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnStatistics {
    /// Cells that yielded no value
    pub missing_count: usize,
    /// Mean of the valid samples, `None` when there are none
    pub mean: Option<f64>,
}

impl ColumnStatistics {
    /// Compute statistics, skipping "no value" samples.
    ///
    /// Missing samples contribute nothing to the aggregate: they are neither
    /// counted in the denominator nor treated as zero. The mean is updated
    /// incrementally so finite samples near `f64::MAX` cannot overflow it.
    pub fn compute(samples: &[Option<f64>]) -> Self {
        let mut valid = 0usize;
        let mut mean = 0.0;
        for value in samples.iter().flatten() {
            valid += 1;
            mean += (value - mean) / valid as f64;
        }

        Self {
            missing_count: samples.len() - valid,
            mean: (valid > 0 && mean.is_finite()).then_some(mean),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_ignores_missing() {
        let samples = vec![Some(10.0), None, Some(20.0), None];
        let stats = ColumnStatistics::compute(&samples);
        assert_eq!(stats.mean, Some(15.0));
        assert_eq!(stats.missing_count, 2);
    }

    #[test]
    fn test_mean_of_uneven_samples() {
        let samples: Vec<Option<f64>> = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
            .into_iter()
            .map(Some)
            .collect();
        let mean = ColumnStatistics::compute(&samples).mean.unwrap();
        assert!((mean - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_huge_finite_samples_do_not_overflow() {
        let huge = f64::MAX * 0.9;
        let stats = ColumnStatistics::compute(&[Some(huge), Some(huge)]);
        let mean = stats.mean.unwrap();
        assert!(mean.is_finite());
        assert!((mean / huge - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_missing_has_no_mean() {
        let stats = ColumnStatistics::compute(&[None, None]);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.missing_count, 2);
    }

    #[test]
    fn test_empty_samples() {
        let stats = ColumnStatistics::compute(&[]);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.missing_count, 0);
    }
}
