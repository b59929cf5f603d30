//! Period arithmetic shared by every calculator.
//!
//! Unknown is `None` and it is contagious: any primitive with an unknown
//! operand returns `None`, never a default of zero. Results that are not
//! finite (NaN, infinity) are also reported as unknown.

use statrs::statistics::Statistics;

/// Drop NaN and infinite values.
pub fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Compound growth rate over `periods`: `(current / past)^(1 / periods) - 1`.
///
/// Returns `None` when either value is unknown, `past` is zero, the two values
/// have different signs, or `periods` is zero. A sign flip has no meaningful
/// compounded magnitude, so it is unknown rather than a misleading number.
pub fn compound_growth_rate(current: Option<f64>, past: Option<f64>, periods: usize) -> Option<f64> {
    let (current, past) = (current?, past?);
    if periods == 0 || past == 0.0 {
        return None;
    }
    if current.signum() != past.signum() || current == 0.0 {
        return None;
    }
    finite(Some((current / past).powf(1.0 / periods as f64) - 1.0))
}

/// `numerator / denominator`, unknown on a zero or unknown denominator.
pub fn safe_ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let denominator = denominator?;
    if denominator == 0.0 {
        return None;
    }
    finite(Some(numerator? / denominator))
}

/// Fraction of adjacent pairs where the later value exceeds the earlier one.
///
/// `seq` is most-recent-first, so the pair `(seq[i], seq[i + 1])` compares a
/// period with the one before it. Pairs with an unknown side are skipped.
pub fn trend_consistency(seq: &[Option<f64>]) -> Option<f64> {
    let (rising, pairs) = seq
        .windows(2)
        .filter_map(|w| Some((w[0]?, w[1]?)))
        .fold((0usize, 0usize), |(rising, pairs), (later, earlier)| {
            (rising + usize::from(later > earlier), pairs + 1)
        });
    if pairs == 0 {
        return None;
    }
    Some(rising as f64 / pairs as f64)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailingStats {
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Number of known values used
    pub count: usize,
}

/// Mean and population standard deviation of up to `window` most recent known values.
pub fn trailing_stats(seq: &[Option<f64>], window: usize) -> Option<TrailingStats> {
    let values: Vec<f64> = seq.iter().flatten().copied().take(window).collect();
    if values.len() < 2 {
        return None;
    }
    let mean = values.iter().mean();
    let std_dev = values.iter().population_std_dev();
    if !mean.is_finite() || !std_dev.is_finite() {
        return None;
    }
    Some(TrailingStats {
        mean,
        std_dev,
        count: values.len(),
    })
}

/// Mean of the known values, unknown when there are none.
pub fn mean_known(seq: &[Option<f64>]) -> Option<f64> {
    let values: Vec<f64> = seq.iter().flatten().copied().collect();
    if values.is_empty() {
        return None;
    }
    finite(Some(values.iter().mean()))
}

/// Average of two values, both required.
pub fn average_pair(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    finite(Some((a? + b?) / 2.0))
}

/// `a - b`, both required.
pub fn difference(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    finite(Some(a? - b?))
}

/// Newest and oldest known values within the first `window` positions, with the
/// number of periods separating them. Requires two distinct known positions.
pub fn oldest_known_pair(seq: &[Option<f64>], window: usize) -> Option<(f64, f64, usize)> {
    let scoped = &seq[..seq.len().min(window)];
    let (newest_idx, newest) = scoped
        .iter()
        .enumerate()
        .find_map(|(i, v)| v.map(|v| (i, v)))?;
    let (oldest_idx, oldest) = scoped
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, v)| v.map(|v| (i, v)))?;
    if oldest_idx <= newest_idx {
        return None;
    }
    Some((newest, oldest, oldest_idx - newest_idx))
}

/// Known values needed before [`trend_shift`] reports a direction.
pub const TREND_MIN_PERIODS: usize = 3;

/// Mean of the two most recent known values minus the mean of the two oldest.
///
/// `seq` is most-recent-first. Positive means the series has risen. Needs at
/// least [`TREND_MIN_PERIODS`] known values so the two ends are not the same pair.
pub fn trend_shift(seq: &[Option<f64>]) -> Option<f64> {
    let known: Vec<f64> = seq.iter().flatten().copied().collect();
    if known.len() < TREND_MIN_PERIODS {
        return None;
    }
    let n = known.len();
    let recent = (known[0] + known[1]) / 2.0;
    let early = (known[n - 2] + known[n - 1]) / 2.0;
    finite(Some(recent - early))
}

/// Fraction of inputs that are known. No inputs means nothing is known.
pub fn presence(inputs: &[Option<f64>]) -> f64 {
    if inputs.is_empty() {
        return 0.0;
    }
    inputs.iter().filter(|v| v.is_some()).count() as f64 / inputs.len() as f64
}
