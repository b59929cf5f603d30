use analysis_core::arithmetic::{
    average_pair, finite, mean_known, presence, safe_ratio, trend_shift, TREND_MIN_PERIODS,
};
use analysis_core::{Field, MetricsError, PeriodKind};

use super::{CalculatorInput, MetricCalculator, RawMetric, RawMetrics};
use crate::catalog::ids;

/// Quarters summed for trailing-twelve-month figures
const TTM_QUARTERS: usize = 4;

/// Annual ROE a year must clear to count as consistent
const ROE_HURDLE: f64 = 0.15;

/// Returns on capital and margin proxies
pub struct ProfitabilityCalculator;

impl ProfitabilityCalculator {
    /// Net income over the average of a balance sheet line at the net income
    /// period and the period before it.
    fn return_on_average(
        input: &CalculatorInput<'_>,
        id: &str,
        denominator_field: Field,
    ) -> Result<RawMetric, MetricsError> {
        let period_kind = input.config.ratio_period;
        let net_income = input.series(Field::NetIncome)?;
        let stock = input.series(denominator_field)?;
        let position = input.balance_position(net_income.latest_date(), period_kind);

        let current = position.and_then(|p| stock.at(p));
        let prior = position.and_then(|p| stock.at(p + 1));
        let income = net_income.latest();
        let confidence = presence(&[income, current, prior]);

        let average = average_pair(current, prior);
        if let Some(avg) = average {
            if avg <= 0.0 {
                return Ok(RawMetric::invalid_domain(id, "average base is not positive", confidence));
            }
        }
        Ok(RawMetric::new(safe_ratio(income, average), confidence))
    }

    fn ocf_margin(input: &CalculatorInput<'_>) -> Result<RawMetric, MetricsError> {
        let income = input.latest(Field::NetIncome)?;
        let ocf = input.latest(Field::OperatingCashflow)?;
        Ok(match income {
            Some(ni) if ni <= 0.0 => RawMetric::invalid_domain(
                ids::OCF_MARGIN,
                "net income is not positive",
                presence(&[ocf, income]),
            ),
            _ => RawMetric::from_inputs(safe_ratio(ocf, income), &[ocf, income]),
        })
    }

    /// Net income / equity for each annual period in the trailing window,
    /// most recent first. Periods with non-positive equity are unknown.
    fn annual_roe(input: &CalculatorInput<'_>) -> Result<Vec<Option<f64>>, MetricsError> {
        let window = input.config.lookback.trailing_window;
        let net_income = input.annual(Field::NetIncome)?;
        let equity = input.annual(Field::TotalShareholderEquity)?;

        Ok(net_income
            .points
            .iter()
            .take(window)
            .map(|point| {
                let e = input
                    .balance_position(point.fiscal_date, PeriodKind::Annual)
                    .and_then(|p| equity.at(p));
                match e {
                    Some(e) if e <= 0.0 => None,
                    _ => safe_ratio(point.value, e),
                }
            })
            .collect())
    }

    fn average_roe(ratios: &[Option<f64>], window: usize) -> RawMetric {
        RawMetric::new(mean_known(ratios), presence(ratios))
            .or_reason(format!("no period in the last {} with both net income and positive equity", window))
    }

    fn roe_consistency(ratios: &[Option<f64>]) -> RawMetric {
        let known: Vec<f64> = ratios.iter().flatten().copied().collect();
        let share = (!known.is_empty())
            .then(|| known.iter().filter(|r| **r > ROE_HURDLE).count() as f64 / known.len() as f64);
        RawMetric::new(share, presence(ratios)).or_reason("no annual period with a known ROE")
    }

    fn roe_trend(ratios: &[Option<f64>]) -> RawMetric {
        RawMetric::new(trend_shift(ratios), presence(ratios)).or_reason(format!(
            "fewer than {} annual periods with a known ROE",
            TREND_MIN_PERIODS
        ))
    }

    fn net_margin_ttm(input: &CalculatorInput<'_>) -> Result<RawMetric, MetricsError> {
        let quarters = input.quarterly(Field::NetIncome)?.head(TTM_QUARTERS);
        let revenue = input.history.overview.revenue_ttm;

        let mut inputs = quarters.clone();
        inputs.resize(TTM_QUARTERS, None);
        inputs.push(revenue);
        let confidence = presence(&inputs);

        if quarters.len() < TTM_QUARTERS {
            return Ok(RawMetric::new(None, confidence)
                .or_reason(format!("only {} quarterly periods available", quarters.len())));
        }
        let trailing = finite(quarters.iter().copied().sum::<Option<f64>>());
        if let Some(r) = revenue {
            if r <= 0.0 {
                return Ok(RawMetric::invalid_domain(ids::NET_MARGIN_TTM, "revenue is not positive", confidence));
            }
        }
        Ok(RawMetric::new(safe_ratio(trailing, revenue), confidence))
    }
}

impl MetricCalculator for ProfitabilityCalculator {
    fn name(&self) -> &'static str {
        "profitability"
    }

    fn metric_ids(&self) -> &'static [&'static str] {
        &[
            ids::ROA,
            ids::ROE,
            ids::OCF_MARGIN,
            ids::AVERAGE_ROE,
            ids::NET_MARGIN_TTM,
            ids::ROE_CONSISTENCY,
            ids::ROE_TREND,
        ]
    }

    fn compute(&self, input: &CalculatorInput<'_>) -> Result<RawMetrics, MetricsError> {
        let mut metrics = RawMetrics::new();

        metrics.insert(
            ids::ROA,
            RawMetric::from_result(Self::return_on_average(input, ids::ROA, Field::TotalAssets)),
        );
        metrics.insert(
            ids::ROE,
            RawMetric::from_result(Self::return_on_average(input, ids::ROE, Field::TotalShareholderEquity)),
        );
        metrics.insert(ids::OCF_MARGIN, RawMetric::from_result(Self::ocf_margin(input)));
        metrics.insert(ids::NET_MARGIN_TTM, RawMetric::from_result(Self::net_margin_ttm(input)));

        let window = input.config.lookback.trailing_window;
        let roe = Self::annual_roe(input);
        metrics.insert(
            ids::AVERAGE_ROE,
            RawMetric::from_result(roe.as_deref().map(|r| Self::average_roe(r, window)).map_err(Clone::clone)),
        );
        metrics.insert(
            ids::ROE_CONSISTENCY,
            RawMetric::from_result(roe.as_deref().map(Self::roe_consistency).map_err(Clone::clone)),
        );
        metrics.insert(
            ids::ROE_TREND,
            RawMetric::from_result(roe.as_deref().map(Self::roe_trend).map_err(Clone::clone)),
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

    fn history() -> TickerHistory {
        let mut history = ticker();
        history.balance_sheet.annual = annual(
            StatementKind::BalanceSheet,
            2024,
            &[
                &[(Field::TotalAssets, Some(1100.0)), (Field::TotalShareholderEquity, Some(550.0))],
                &[(Field::TotalAssets, Some(900.0)), (Field::TotalShareholderEquity, Some(450.0))],
                &[(Field::TotalAssets, Some(800.0)), (Field::TotalShareholderEquity, Some(400.0))],
            ],
        );
        history.cash_flow.annual = annual(
            StatementKind::CashFlow,
            2024,
            &[
                &[(Field::NetIncome, Some(100.0)), (Field::OperatingCashflow, Some(130.0))],
                &[(Field::NetIncome, Some(90.0))],
                &[(Field::NetIncome, None)],
            ],
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
        ProfitabilityCalculator.compute(&input).unwrap()
    }

    #[test]
    fn test_roa_and_roe_use_average_base() {
        let metrics = run(&history());
        assert_relative_eq!(metrics[ids::ROA].value.unwrap(), 0.10, epsilon = 1e-12);
        assert_relative_eq!(metrics[ids::ROE].value.unwrap(), 0.20, epsilon = 1e-12);
        assert_eq!(metrics[ids::ROE].confidence, 1.0);
    }

    #[test]
    fn test_roe_without_prior_period_is_unknown() {
        let mut history = history();
        history.balance_sheet.annual.truncate(1);
        let metrics = run(&history);
        assert_eq!(metrics[ids::ROE].value, None);
        assert_relative_eq!(metrics[ids::ROE].confidence, 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ocf_margin_guards_non_positive_income() {
        let metrics = run(&history());
        assert_relative_eq!(metrics[ids::OCF_MARGIN].value.unwrap(), 1.3, epsilon = 1e-12);

        let mut loss = history();
        loss.cash_flow.annual[0] = loss.cash_flow.annual[0].clone().with(Field::NetIncome, -5.0);
        let metrics = run(&loss);
        assert_eq!(metrics[ids::OCF_MARGIN].value, None);
        assert!(metrics[ids::OCF_MARGIN].reason.is_some());
    }

    #[test]
    fn test_average_roe_skips_unknown_periods() {
        // (100/550 + 90/450) / 2, third year has no net income
        let metrics = run(&history());
        let expected = (100.0 / 550.0 + 90.0 / 450.0) / 2.0;
        assert_relative_eq!(metrics[ids::AVERAGE_ROE].value.unwrap(), expected, epsilon = 1e-12);
        assert_relative_eq!(metrics[ids::AVERAGE_ROE].confidence, 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_roe_consistency_and_trend() {
        let metrics = run(&history());
        // 100/550 and 90/450 both clear 15%, the third year is unknown
        assert_eq!(metrics[ids::ROE_CONSISTENCY].value, Some(1.0));
        assert_relative_eq!(metrics[ids::ROE_CONSISTENCY].confidence, 2.0 / 3.0, epsilon = 1e-12);
        assert_eq!(metrics[ids::ROE_TREND].value, None);

        let mut full = history();
        full.cash_flow.annual[2] = full.cash_flow.annual[2].clone().with(Field::NetIncome, 40.0);
        let metrics = run(&full);
        assert_relative_eq!(metrics[ids::ROE_CONSISTENCY].value.unwrap(), 2.0 / 3.0, epsilon = 1e-12);
        let recent = (100.0 / 550.0 + 90.0 / 450.0) / 2.0;
        let early = (90.0 / 450.0 + 40.0 / 400.0) / 2.0;
        assert_relative_eq!(metrics[ids::ROE_TREND].value.unwrap(), recent - early, epsilon = 1e-12);
    }

    #[test]
    fn test_mislabelled_balance_sheet_keeps_cash_flow_ratios() {
        let mut history = history();
        history.balance_sheet.kind = StatementKind::Earnings;
        let metrics = run(&history);
        assert_relative_eq!(metrics[ids::OCF_MARGIN].value.unwrap(), 1.3, epsilon = 1e-12);
        for id in [ids::ROA, ids::ROE, ids::AVERAGE_ROE, ids::ROE_CONSISTENCY, ids::ROE_TREND] {
            let metric = &metrics[id];
            assert_eq!(metric.value, None, "{}", id);
            assert!(metric.reason.as_deref().unwrap().contains("not part of"), "{}", id);
        }
    }

    #[test]
    fn test_net_margin_ttm_needs_four_quarters() {
        let mut history = history();
        history.overview.revenue_ttm = Some(1000.0);
        history.cash_flow.quarterly = Some(
            [(3, 31), (12, 31), (9, 30), (6, 30)]
                .iter()
                .enumerate()
                .map(|(i, (m, d))| {
                    let year = if i == 0 { 2025 } else { 2024 };
                    Period::new(date(year, *m, *d)).with(Field::NetIncome, 25.0)
                })
                .collect(),
        );
        let metrics = run(&history);
        assert_relative_eq!(metrics[ids::NET_MARGIN_TTM].value.unwrap(), 0.10, epsilon = 1e-12);

        history.cash_flow.quarterly.as_mut().unwrap().truncate(3);
        let metrics = run(&history);
        assert_eq!(metrics[ids::NET_MARGIN_TTM].value, None);
        assert_relative_eq!(metrics[ids::NET_MARGIN_TTM].confidence, 0.8, epsilon = 1e-12);
    }
}
