use analysis_core::arithmetic::{presence, safe_ratio};
use analysis_core::{Field, MetricsError};

use super::{CalculatorInput, MetricCalculator, RawMetric, RawMetrics};
use crate::catalog::ids;

/// Book value and operating cash flow for each outstanding share
pub struct PerShareCalculator;

fn per_share(id: &str, amount: Option<f64>, shares: Option<f64>) -> RawMetric {
    match shares {
        Some(s) if s <= 0.0 => RawMetric::invalid_domain(
            id,
            "shares outstanding is not positive",
            presence(&[amount, shares]),
        ),
        _ => RawMetric::from_inputs(safe_ratio(amount, shares), &[amount, shares]),
    }
}

impl PerShareCalculator {
    fn book_value(input: &CalculatorInput<'_>) -> Result<RawMetric, MetricsError> {
        let equity = input.latest(Field::TotalShareholderEquity)?;
        let shares = input.latest(Field::CommonStockSharesOutstanding)?;
        Ok(per_share(ids::BOOK_VALUE_PER_SHARE, equity, shares))
    }

    /// Share count is taken from the balance sheet dated like the cash flow period.
    fn operating_cash_flow(input: &CalculatorInput<'_>) -> Result<RawMetric, MetricsError> {
        let ocf_series = input.series(Field::OperatingCashflow)?;
        let shares = input.series(Field::CommonStockSharesOutstanding)?;
        let aligned_shares = input
            .balance_position(ocf_series.latest_date(), input.config.ratio_period)
            .and_then(|p| shares.at(p));
        Ok(per_share(ids::CASH_FLOW_PER_SHARE, ocf_series.latest(), aligned_shares))
    }
}

impl MetricCalculator for PerShareCalculator {
    fn name(&self) -> &'static str {
        "per_share"
    }

    fn metric_ids(&self) -> &'static [&'static str] {
        &[ids::BOOK_VALUE_PER_SHARE, ids::CASH_FLOW_PER_SHARE]
    }

    fn compute(&self, input: &CalculatorInput<'_>) -> Result<RawMetrics, MetricsError> {
        let mut metrics = RawMetrics::new();
        metrics.insert(ids::BOOK_VALUE_PER_SHARE, RawMetric::from_result(Self::book_value(input)));
        metrics.insert(
            ids::CASH_FLOW_PER_SHARE,
            RawMetric::from_result(Self::operating_cash_flow(input)),
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
    use analysis_core::{StatementKind, TickerHistory};
    use approx::assert_relative_eq;

    fn history(shares: f64) -> TickerHistory {
        let mut history = ticker();
        history.balance_sheet.annual = annual(
            StatementKind::BalanceSheet,
            2024,
            &[
                &[
                    (Field::TotalShareholderEquity, Some(600.0)),
                    (Field::CommonStockSharesOutstanding, Some(shares)),
                ],
                &[
                    (Field::TotalShareholderEquity, Some(500.0)),
                    (Field::CommonStockSharesOutstanding, Some(80.0)),
                ],
            ],
        );
        history.cash_flow.annual = annual(
            StatementKind::CashFlow,
            2024,
            &[&[(Field::OperatingCashflow, Some(240.0))]],
        );
        history
    }

    fn run(history: &TickerHistory) -> RawMetrics {
        let statements = NormalizedStatements::from_history(history);
        let config = EngineConfig::default();
        let input = CalculatorInput {
            history,
            statements: &statements,
            config: &config,
            as_of: year_end(2024),
        };
        PerShareCalculator.compute(&input).unwrap()
    }

    #[test]
    fn test_per_share_values() {
        let metrics = run(&history(100.0));
        assert_relative_eq!(metrics[ids::BOOK_VALUE_PER_SHARE].value.unwrap(), 6.0, epsilon = 1e-12);
        assert_relative_eq!(metrics[ids::CASH_FLOW_PER_SHARE].value.unwrap(), 2.4, epsilon = 1e-12);
    }

    #[test]
    fn test_cash_flow_per_share_aligns_share_count_by_date() {
        let mut history = history(100.0);
        history.cash_flow.annual[0].fiscal_date_ending = Some(year_end(2023));
        let metrics = run(&history);
        assert_relative_eq!(metrics[ids::CASH_FLOW_PER_SHARE].value.unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_shares_is_invalid_domain() {
        let metrics = run(&history(0.0));
        let book = &metrics[ids::BOOK_VALUE_PER_SHARE];
        assert_eq!(book.value, None);
        assert_eq!(book.confidence, 1.0);
        assert!(book.reason.as_deref().unwrap().contains("shares outstanding"));
    }

    #[test]
    fn test_missing_share_count_is_unknown() {
        let mut history = history(100.0);
        history.balance_sheet.annual[0]
            .values
            .remove(&Field::CommonStockSharesOutstanding);
        let metrics = run(&history);
        assert_eq!(metrics[ids::BOOK_VALUE_PER_SHARE].value, None);
        assert_eq!(metrics[ids::BOOK_VALUE_PER_SHARE].confidence, 0.5);
        assert_eq!(metrics[ids::CASH_FLOW_PER_SHARE].value, None);
    }
}
