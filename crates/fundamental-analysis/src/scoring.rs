//! Benchmark-band normalization and weighted composites.

use analysis_core::MetricsError;
use serde::{Deserialize, Serialize};

/// Output range of every normalized score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreScale {
    pub min: f64,
    pub mid: f64,
    pub max: f64,
}

impl Default for ScoreScale {
    fn default() -> Self {
        Self {
            min: 0.0,
            mid: 60.0,
            max: 100.0,
        }
    }
}

impl ScoreScale {
    pub fn validate(&self) -> Result<(), MetricsError> {
        let finite = self.min.is_finite() && self.mid.is_finite() && self.max.is_finite();
        if !finite || !(self.min < self.mid && self.mid < self.max) {
            return Err(MetricsError::configuration(format!(
                "score scale must satisfy min < mid < max, got {:?}",
                self
            )));
        }
        Ok(())
    }
}

/// `(floor, target, excellent)` anchors for one metric.
///
/// When `excellent` is above `floor` higher raw values score better. When it is
/// below, the band is descending and lower raw values score better (leverage,
/// volatility, data age).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkBand {
    pub floor: f64,
    pub target: f64,
    pub excellent: f64,
}

impl BenchmarkBand {
    pub const fn new(floor: f64, target: f64, excellent: f64) -> Self {
        Self {
            floor,
            target,
            excellent,
        }
    }

    pub fn is_descending(&self) -> bool {
        self.excellent < self.floor
    }

    pub fn validate(&self, id: &str) -> Result<(), MetricsError> {
        let finite = self.floor.is_finite() && self.target.is_finite() && self.excellent.is_finite();
        let ordered = (self.floor < self.target && self.target < self.excellent)
            || (self.floor > self.target && self.target > self.excellent);
        if !finite || !ordered {
            return Err(MetricsError::configuration(format!(
                "band for {} must have target strictly between floor and excellent, got {:?}",
                id, self
            )));
        }
        Ok(())
    }

    /// Piecewise-linear map of `value` onto `scale`.
    pub fn normalize(&self, value: f64, scale: &ScoreScale) -> f64 {
        // Mirror descending bands so both directions share one interpolation.
        let (v, floor, target, excellent) = if self.is_descending() {
            (-value, -self.floor, -self.target, -self.excellent)
        } else {
            (value, self.floor, self.target, self.excellent)
        };

        if v <= floor {
            scale.min
        } else if v >= excellent {
            scale.max
        } else if v <= target {
            scale.min + (v - floor) / (target - floor) * (scale.mid - scale.min)
        } else {
            scale.mid + (v - target) / (excellent - target) * (scale.max - scale.mid)
        }
    }
}

/// Weighted average of the known sub-scores.
///
/// Weights of unknown sub-scores are redistributed proportionally across the
/// known ones. Returns the composite (unknown when every sub-score is unknown)
/// and the share of total weight that was known.
pub fn weighted_composite(components: &[(Option<f64>, f64)]) -> (Option<f64>, f64) {
    let total_weight: f64 = components.iter().map(|(_, w)| w).sum();
    let (weighted_sum, known_weight) = components
        .iter()
        .filter_map(|(score, weight)| score.map(|s| (s * weight, *weight)))
        .fold((0.0, 0.0), |(sum, known), (ws, w)| (sum + ws, known + w));

    if known_weight <= 0.0 || total_weight <= 0.0 {
        return (None, 0.0);
    }
    (Some(weighted_sum / known_weight), known_weight / total_weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_current_ratio_band_hits_mid_point() {
        let band = BenchmarkBand::new(1.0, 1.5, 3.0);
        let scale = ScoreScale::default();
        assert_relative_eq!(band.normalize(1.5, &scale), 60.0, epsilon = 1e-9);
        assert_relative_eq!(band.normalize(1.0, &scale), 0.0, epsilon = 1e-9);
        assert_relative_eq!(band.normalize(0.2, &scale), 0.0, epsilon = 1e-9);
        assert_relative_eq!(band.normalize(3.0, &scale), 100.0, epsilon = 1e-9);
        assert_relative_eq!(band.normalize(9.0, &scale), 100.0, epsilon = 1e-9);
        assert_relative_eq!(band.normalize(1.25, &scale), 30.0, epsilon = 1e-9);
        assert_relative_eq!(band.normalize(2.25, &scale), 80.0, epsilon = 1e-9);
    }

    #[test]
    fn test_descending_band() {
        let band = BenchmarkBand::new(2.0, 1.0, 0.3);
        let scale = ScoreScale::default();
        assert!(band.is_descending());
        assert_relative_eq!(band.normalize(2.5, &scale), 0.0, epsilon = 1e-9);
        assert_relative_eq!(band.normalize(1.0, &scale), 60.0, epsilon = 1e-9);
        assert_relative_eq!(band.normalize(1.5, &scale), 30.0, epsilon = 1e-9);
        assert_relative_eq!(band.normalize(0.1, &scale), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_band_validation() {
        assert!(BenchmarkBand::new(1.0, 1.5, 3.0).validate("ok").is_ok());
        assert!(BenchmarkBand::new(2.0, 1.0, 0.3).validate("ok").is_ok());
        assert!(BenchmarkBand::new(1.0, 3.5, 3.0).validate("bad").is_err());
        assert!(BenchmarkBand::new(1.0, 1.0, 3.0).validate("bad").is_err());
        assert!(BenchmarkBand::new(f64::NAN, 1.0, 3.0).validate("bad").is_err());
    }

    #[test]
    fn test_scale_validation() {
        assert!(ScoreScale::default().validate().is_ok());
        let bad = ScoreScale {
            min: 0.0,
            mid: 100.0,
            max: 100.0,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_composite_redistributes_unknown_weight() {
        let (score, confidence) = weighted_composite(&[(Some(80.0), 0.5), (None, 0.3), (Some(40.0), 0.2)]);
        // Remaining weights 0.5 and 0.2 renormalized to 5/7 and 2/7
        assert_relative_eq!(score.unwrap(), 80.0 * 5.0 / 7.0 + 40.0 * 2.0 / 7.0, epsilon = 1e-9);
        assert_relative_eq!(confidence, 0.7, epsilon = 1e-9);
    }

    #[test]
    fn test_composite_all_unknown() {
        let (score, confidence) = weighted_composite(&[(None, 0.6), (None, 0.4)]);
        assert_eq!(score, None);
        assert_eq!(confidence, 0.0);
    }
}
