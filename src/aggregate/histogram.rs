//! # Histogram bins
//!
//! Bin edges for the improvement and timing distributions of a group, and counting with
//! the usual half-open convention: bin `i` holds `[e_i, e_{i+1})`, except the last bin which
//! is closed on both sides. Values outside `[e_0, e_n]` are not counted.
//!
//! Degenerate inputs never produce an empty or zero-width range:
//!
//! * improvements all equal to `0` fall back to `[-1, 1]`,
//! * timings with `max == min == 0` (or no timing at all) fall back to a unit-wide range.
use crate::telanneal_errors::TelAnnealError;

/// Bin counts and padding factors of the group histograms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramParams {
    /// Number of edges over `[-padding·M, padding·M]`, odd so that `0` is an edge.
    pub improvement_edges: usize,
    pub improvement_padding: f64,
    /// Number of edges over `[low·min, high·max]`.
    pub timing_edges: usize,
    pub timing_low_factor: f64,
    pub timing_high_factor: f64,
}

impl Default for HistogramParams {
    fn default() -> Self {
        HistogramParams {
            improvement_edges: 21,
            improvement_padding: 1.1,
            timing_edges: 30,
            timing_low_factor: 0.9,
            timing_high_factor: 1.1,
        }
    }
}

impl HistogramParams {
    /// Check the parameters.
    ///
    /// Return
    /// ----------
    /// * `Err(TelAnnealError::ConfigurationError)` if an edge count is below 2, the
    ///   improvement edge count is even, a factor is not strictly positive, or the timing
    ///   low factor exceeds the high factor.
    pub fn validate(self) -> Result<Self, TelAnnealError> {
        if self.improvement_edges < 2 || self.timing_edges < 2 {
            return Err(TelAnnealError::ConfigurationError(
                "histograms need at least 2 edges".into(),
            ));
        }
        if self.improvement_edges % 2 == 0 {
            return Err(TelAnnealError::ConfigurationError(format!(
                "improvement_edges must be odd, got {}",
                self.improvement_edges
            )));
        }
        let factors = [
            self.improvement_padding,
            self.timing_low_factor,
            self.timing_high_factor,
        ];
        if factors.iter().any(|f| f.is_nan() || *f <= 0.0) {
            return Err(TelAnnealError::ConfigurationError(
                "histogram factors must be > 0".into(),
            ));
        }
        if self.timing_low_factor > self.timing_high_factor {
            return Err(TelAnnealError::ConfigurationError(
                "timing_low_factor must not exceed timing_high_factor".into(),
            ));
        }
        Ok(self)
    }
}

/// Increasing bin edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Bins {
    edges: Vec<f64>,
}

impl Bins {
    /// `count` evenly spaced edges from `start` to `stop`, both included.
    pub fn linspace(start: f64, stop: f64, count: usize) -> Self {
        let edges = match count {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (count - 1) as f64;
                (0..count)
                    .map(|i| {
                        if i == count - 1 {
                            stop
                        } else {
                            start + step * i as f64
                        }
                    })
                    .collect()
            }
        };
        Bins { edges }
    }

    /// Symmetric range around `0` for improvements whose largest magnitude is `max_abs`.
    pub fn for_improvements(max_abs: f64, params: &HistogramParams) -> Self {
        let mut half_width = params.improvement_padding * max_abs;
        if !half_width.is_finite() || half_width <= 0.0 {
            half_width = 1.0;
        }
        Self::linspace(-half_width, half_width, params.improvement_edges)
    }

    /// Range covering every timing value, padded by the timing factors.
    pub fn for_timings(values: &[f64], params: &HistogramParams) -> Self {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !(min.is_finite() && max.is_finite()) {
            return Self::linspace(0.0, 1.0, params.timing_edges);
        }

        let low = params.timing_low_factor * min;
        let high = params.timing_high_factor * max;
        if high > low {
            Self::linspace(low, high, params.timing_edges)
        } else {
            Self::linspace(low, low + 1.0, params.timing_edges)
        }
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bins, one less than the number of edges.
    pub fn len(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(low, high)` bounds of the whole range.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.edges.first().copied().zip(self.edges.last().copied())
    }

    /// Count `values` per bin.
    pub fn count(&self, values: &[f64]) -> Vec<usize> {
        let mut counts = vec![0; self.len()];
        let Some((low, high)) = self.range() else {
            return counts;
        };
        if counts.is_empty() {
            return counts;
        }

        for &v in values {
            if !(low..=high).contains(&v) {
                continue;
            }
            let upper = self.edges.partition_point(|e| *e <= v);
            let bin = (upper - 1).min(counts.len() - 1);
            counts[bin] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod histogram_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace() {
        let bins = Bins::linspace(-1.0, 1.0, 5);
        assert_eq!(bins.edges(), &[-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(bins.len(), 4);
    }

    #[test]
    fn test_count_last_bin_closed() {
        let bins = Bins::linspace(0.0, 4.0, 5);
        let counts = bins.count(&[0.0, 0.5, 1.0, 3.99, 4.0, 4.01, -0.1, f64::NAN]);
        assert_eq!(counts, vec![2, 1, 0, 2]);
    }

    #[test]
    fn test_improvement_bins() {
        let params = HistogramParams::default();
        let bins = Bins::for_improvements(2.0, &params);
        assert_eq!(bins.edges().len(), 21);
        let (low, high) = bins.range().unwrap();
        assert_relative_eq!(low, -2.2);
        assert_relative_eq!(high, 2.2);
        assert_relative_eq!(bins.edges()[10], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_all_zero_improvement_falls_back() {
        let bins = Bins::for_improvements(0.0, &HistogramParams::default());
        assert!(!bins.is_empty());
        assert_eq!(bins.range(), Some((-1.0, 1.0)));
        assert_eq!(bins.count(&[0.0, 0.0]).iter().sum::<usize>(), 2);
    }

    #[test]
    fn test_timing_bins() {
        let params = HistogramParams::default();
        let bins = Bins::for_timings(&[10.0, 20.0, 40.0], &params);
        assert_eq!(bins.edges().len(), 30);
        let (low, high) = bins.range().unwrap();
        assert_relative_eq!(low, 9.0);
        assert_relative_eq!(high, 44.0);

        assert_eq!(Bins::for_timings(&[], &params).range(), Some((0.0, 1.0)));
        assert_eq!(Bins::for_timings(&[0.0], &params).range(), Some((0.0, 1.0)));
    }

    #[test]
    fn test_params_validation() {
        assert!(HistogramParams::default().validate().is_ok());
        let even = HistogramParams {
            improvement_edges: 20,
            ..Default::default()
        };
        assert!(matches!(
            even.validate(),
            Err(TelAnnealError::ConfigurationError(_))
        ));
        let inverted = HistogramParams {
            timing_low_factor: 2.0,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
    }
}
