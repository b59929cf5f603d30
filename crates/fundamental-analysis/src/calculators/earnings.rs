use analysis_core::arithmetic::{
    compound_growth_rate, difference, mean_known, presence, trailing_stats, trend_consistency,
};
use analysis_core::{Field, MetricsError};

use super::{CalculatorInput, MetricCalculator, RawMetric, RawMetrics};
use crate::catalog::ids;

/// EPS momentum, consistency and surprise behaviour
pub struct EarningsCalculator;

impl MetricCalculator for EarningsCalculator {
    fn name(&self) -> &'static str {
        "earnings"
    }

    fn metric_ids(&self) -> &'static [&'static str] {
        &[
            ids::EPS_GROWTH_YOY,
            ids::EPS_TREND_CONSISTENCY,
            ids::AVERAGE_SURPRISE,
            ids::POSITIVE_SURPRISE_RATIO,
            ids::EPS_VOLATILITY,
        ]
    }

    fn compute(&self, input: &CalculatorInput<'_>) -> Result<RawMetrics, MetricsError> {
        let lookback = &input.config.lookback;
        let annual_eps = input.annual(Field::ReportedEps)?;
        let trailing = annual_eps.head(lookback.trailing_window);

        let mut metrics = RawMetrics::new();

        let (eps_now, eps_prior) = (annual_eps.at(0), annual_eps.at(1));
        let yoy_confidence = presence(&[eps_now, eps_prior]);
        let yoy = match compound_growth_rate(eps_now, eps_prior, 1) {
            Some(rate) => RawMetric::new(Some(rate), yoy_confidence),
            None if yoy_confidence >= 1.0 => RawMetric::invalid_domain(
                ids::EPS_GROWTH_YOY,
                "zero base or sign change in annual EPS",
                yoy_confidence,
            ),
            None => RawMetric::new(None, yoy_confidence),
        };
        metrics.insert(ids::EPS_GROWTH_YOY, yoy);

        metrics.insert(
            ids::EPS_TREND_CONSISTENCY,
            RawMetric::new(trend_consistency(&trailing), presence(&trailing))
                .or_reason("no adjacent pair of known annual EPS"),
        );

        let volatility = match trailing_stats(&trailing, lookback.trailing_window) {
            Some(stats) if stats.mean == 0.0 => RawMetric::invalid_domain(
                ids::EPS_VOLATILITY,
                "mean EPS is zero",
                presence(&trailing),
            ),
            Some(stats) => RawMetric::new(Some(stats.std_dev / stats.mean.abs()), presence(&trailing)),
            None => RawMetric::new(None, presence(&trailing))
                .or_reason("fewer than two known annual EPS values"),
        };
        metrics.insert(ids::EPS_VOLATILITY, volatility);

        // Surprises are recomputed from reported and estimated EPS so both
        // sides of every quarter are checked for presence.
        let reported = input.quarterly(Field::ReportedEps)?.head(lookback.surprise_quarters);
        let estimated = input.quarterly(Field::EstimatedEps)?.head(lookback.surprise_quarters);
        let surprises: Vec<Option<f64>> = reported
            .iter()
            .enumerate()
            .map(|(i, r)| difference(*r, estimated.get(i).copied().flatten()))
            .collect();
        let known: Vec<f64> = surprises.iter().flatten().copied().collect();
        let quarter_confidence = presence(&surprises);

        metrics.insert(
            ids::AVERAGE_SURPRISE,
            RawMetric::new(mean_known(&surprises), quarter_confidence)
                .or_reason("no quarter with both reported and estimated EPS"),
        );

        let positive_ratio = if known.is_empty() {
            None
        } else {
            Some(known.iter().filter(|s| **s > 0.0).count() as f64 / known.len() as f64)
        };
        metrics.insert(
            ids::POSITIVE_SURPRISE_RATIO,
            RawMetric::new(positive_ratio, quarter_confidence)
                .or_reason("no quarter with both reported and estimated EPS"),
        );

        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::NormalizedStatements;
    use super::*;
    use crate::config::EngineConfig;
    use analysis_core::{Period, StatementKind, TickerHistory};
    use approx::assert_relative_eq;

    fn run(history: &TickerHistory) -> RawMetrics {
        let statements = NormalizedStatements::from_history(history);
        let config = EngineConfig::default();
        let input = CalculatorInput {
            history,
            statements: &statements,
            config: &config,
            as_of: year_end(2024),
        };
        EarningsCalculator.compute(&input).unwrap()
    }

    fn quarterly_eps(rows: &[(Option<f64>, Option<f64>)]) -> Vec<Period> {
        let ends = [date(2024, 12, 31), date(2024, 9, 30), date(2024, 6, 30), date(2024, 3, 31)];
        rows.iter()
            .zip(ends)
            .map(|((reported, estimated), end)| {
                Period::new(end)
                    .with(Field::ReportedEps, *reported)
                    .with(Field::EstimatedEps, *estimated)
            })
            .collect()
    }

    #[test]
    fn test_average_surprise_skips_unknown_quarters() {
        let mut history = ticker();
        history.earnings.quarterly = Some(quarterly_eps(&[
            (Some(1.2), Some(1.0)),
            (None, Some(1.1)),
            (Some(0.9), Some(0.8)),
        ]));
        let metrics = run(&history);
        let surprise = &metrics[ids::AVERAGE_SURPRISE];
        assert_relative_eq!(surprise.value.unwrap(), 0.15, epsilon = 1e-9);
        assert_relative_eq!(surprise.confidence, 2.0 / 3.0, epsilon = 1e-12);
        assert_eq!(metrics[ids::POSITIVE_SURPRISE_RATIO].value, Some(1.0));
    }

    #[test]
    fn test_no_quarterly_history_is_unknown() {
        let metrics = run(&ticker());
        assert_eq!(metrics[ids::AVERAGE_SURPRISE].value, None);
        assert_eq!(metrics[ids::AVERAGE_SURPRISE].confidence, 0.0);
        assert_eq!(metrics[ids::POSITIVE_SURPRISE_RATIO].value, None);
    }

    #[test]
    fn test_annual_eps_metrics() {
        let mut history = ticker();
        history.earnings.annual = annual(
            StatementKind::Earnings,
            2024,
            &[
                &[(Field::ReportedEps, Some(2.2))],
                &[(Field::ReportedEps, Some(2.0))],
                &[(Field::ReportedEps, Some(2.1))],
                &[(Field::ReportedEps, Some(1.7))],
            ],
        );
        let metrics = run(&history);
        assert_relative_eq!(metrics[ids::EPS_GROWTH_YOY].value.unwrap(), 0.1, epsilon = 1e-9);
        assert_relative_eq!(metrics[ids::EPS_TREND_CONSISTENCY].value.unwrap(), 2.0 / 3.0, epsilon = 1e-12);

        let mean: f64 = 8.0 / 4.0;
        let var = [2.2f64, 2.0, 2.1, 1.7].iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 4.0;
        assert_relative_eq!(metrics[ids::EPS_VOLATILITY].value.unwrap(), var.sqrt() / mean, epsilon = 1e-9);
    }

    #[test]
    fn test_eps_turning_positive_has_unknown_yoy() {
        let mut history = ticker();
        history.earnings.annual = annual(
            StatementKind::Earnings,
            2024,
            &[&[(Field::ReportedEps, Some(0.5))], &[(Field::ReportedEps, Some(-0.2))]],
        );
        let metrics = run(&history);
        assert_eq!(metrics[ids::EPS_GROWTH_YOY].value, None);
        assert_eq!(metrics[ids::EPS_GROWTH_YOY].confidence, 1.0);
    }
}
