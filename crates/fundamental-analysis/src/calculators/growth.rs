use analysis_core::arithmetic::{compound_growth_rate, oldest_known_pair, presence};
use analysis_core::{Field, MetricsError, Series};

use super::{CalculatorInput, MetricCalculator, RawMetric, RawMetrics};
use crate::catalog::ids;

/// Compound annual growth of key statement lines
pub struct GrowthCalculator;

impl GrowthCalculator {
    fn cagr(id: &str, series: &Series, lookback: Option<usize>) -> RawMetric {
        let window = lookback.unwrap_or(series.len());
        let scoped = series.head(window);
        let confidence = presence(&scoped);

        match oldest_known_pair(&scoped, window) {
            Some((newest, oldest, periods)) => {
                match compound_growth_rate(Some(newest), Some(oldest), periods) {
                    Some(rate) => RawMetric::new(Some(rate), confidence),
                    None => RawMetric::invalid_domain(
                        id,
                        "zero base or sign change between oldest and newest period",
                        confidence,
                    ),
                }
            }
            None => RawMetric::new(None, confidence)
                .or_reason(format!("fewer than two known annual values in a window of {}", window)),
        }
    }

    /// Latest annual dividends against the year before. The common stock line
    /// fills in for periods without a total payout.
    fn dividend_growth(input: &CalculatorInput<'_>) -> Result<RawMetric, MetricsError> {
        let payout = input.annual(Field::DividendPayout)?;
        let common = input.annual(Field::DividendPayoutCommonStock)?;
        let dividends_at = |i: usize| payout.at(i).or_else(|| common.at(i)).map(f64::abs);

        let (latest, prior) = (dividends_at(0), dividends_at(1));
        let confidence = presence(&[latest, prior]);
        Ok(match compound_growth_rate(latest, prior, 1) {
            Some(rate) => RawMetric::new(Some(rate), confidence),
            None if confidence >= 1.0 => RawMetric::invalid_domain(
                ids::DIVIDEND_GROWTH,
                "no dividend paid in one of the two years",
                confidence,
            ),
            None => RawMetric::new(None, confidence),
        })
    }
}

impl MetricCalculator for GrowthCalculator {
    fn name(&self) -> &'static str {
        "growth"
    }

    fn metric_ids(&self) -> &'static [&'static str] {
        &[
            ids::REVENUE_CAGR,
            ids::TOTAL_ASSETS_CAGR,
            ids::INTANGIBLE_ASSETS_CAGR,
            ids::EPS_CAGR,
            ids::BOOK_VALUE_CAGR,
            ids::DIVIDEND_GROWTH,
        ]
    }

    fn compute(&self, input: &CalculatorInput<'_>) -> Result<RawMetrics, MetricsError> {
        let lookback = input.config.lookback.growth_periods;
        let sources = [
            (ids::REVENUE_CAGR, input.config.revenue_proxy),
            (ids::TOTAL_ASSETS_CAGR, Field::TotalAssets),
            (ids::INTANGIBLE_ASSETS_CAGR, Field::IntangibleAssets),
            (ids::EPS_CAGR, Field::ReportedEps),
            (ids::BOOK_VALUE_CAGR, Field::TotalShareholderEquity),
        ];

        // Sources span three statements; each metric stands on its own series
        let mut metrics = RawMetrics::new();
        for (id, field) in sources {
            let metric = input.annual(field).map(|series| Self::cagr(id, series, lookback));
            metrics.insert(id, RawMetric::from_result(metric));
        }
        metrics.insert(ids::DIVIDEND_GROWTH, RawMetric::from_result(Self::dividend_growth(input)));
        Ok(metrics)
    }
}
