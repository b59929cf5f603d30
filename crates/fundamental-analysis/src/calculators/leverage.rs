use analysis_core::arithmetic::{finite, presence, safe_ratio, trend_shift, TREND_MIN_PERIODS};
use analysis_core::{Field, MetricsError, PeriodKind};

use super::{CalculatorInput, MetricCalculator, RawMetric, RawMetrics};
use crate::catalog::ids;

/// Debt load and debt service capacity
pub struct LeverageCalculator;

/// Equity-based ratios lose their meaning once book equity is wiped out.
fn over_equity(id: &str, numerator: Option<f64>, equity: Option<f64>) -> RawMetric {
    match equity {
        Some(e) if e <= 0.0 => RawMetric::invalid_domain(
            id,
            "shareholder equity is not positive",
            presence(&[numerator, equity]),
        ),
        _ => RawMetric::from_inputs(safe_ratio(numerator, equity), &[numerator, equity]),
    }
}

impl LeverageCalculator {
    fn balance_ratios(input: &CalculatorInput<'_>, metrics: &mut RawMetrics) -> Result<(), MetricsError> {
        let total_assets = input.latest(Field::TotalAssets)?;
        let equity = input.latest(Field::TotalShareholderEquity)?;
        let debt = input.total_debt_at(Some(0), input.config.ratio_period)?;

        metrics.insert(ids::DEBT_TO_EQUITY, over_equity(ids::DEBT_TO_EQUITY, debt, equity));
        metrics.insert(ids::EQUITY_MULTIPLIER, over_equity(ids::EQUITY_MULTIPLIER, total_assets, equity));
        metrics.insert(
            ids::DEBT_TO_ASSETS,
            RawMetric::from_inputs(safe_ratio(debt, total_assets), &[debt, total_assets]),
        );
        Ok(())
    }

    /// Interest is estimated from debt at the cash flow period's fiscal date.
    fn interest_coverage(input: &CalculatorInput<'_>) -> Result<RawMetric, MetricsError> {
        let period_kind = input.config.ratio_period;
        let ocf_series = input.series(Field::OperatingCashflow)?;
        let operating_cash_flow = ocf_series.latest();
        let position = input.balance_position(ocf_series.latest_date(), period_kind);
        let aligned_debt = input.total_debt_at(position, period_kind)?;
        let interest = finite(aligned_debt.map(|d| d * input.config.interest_rate_proxy));

        Ok(match interest {
            Some(i) if i == 0.0 => RawMetric::invalid_domain(
                ids::INTEREST_COVERAGE,
                "estimated interest expense is zero",
                presence(&[operating_cash_flow, aligned_debt]),
            ),
            _ => RawMetric::from_inputs(
                safe_ratio(operating_cash_flow, interest),
                &[operating_cash_flow, aligned_debt],
            ),
        })
    }

    /// Direction of debt to equity across the annual trailing window.
    fn debt_to_equity_trend(input: &CalculatorInput<'_>) -> Result<RawMetric, MetricsError> {
        let window = input.config.lookback.trailing_window;
        let equity = input.annual(Field::TotalShareholderEquity)?;

        let mut ratios = Vec::with_capacity(window);
        for i in 0..equity.len().min(window) {
            let debt = input.total_debt_at(Some(i), PeriodKind::Annual)?;
            let positive_equity = equity.at(i).filter(|e| *e > 0.0);
            ratios.push(safe_ratio(debt, positive_equity));
        }

        Ok(RawMetric::new(trend_shift(&ratios), presence(&ratios)).or_reason(format!(
            "fewer than {} annual periods with debt and positive equity",
            TREND_MIN_PERIODS
        )))
    }
}

impl MetricCalculator for LeverageCalculator {
    fn name(&self) -> &'static str {
        "leverage"
    }

    fn metric_ids(&self) -> &'static [&'static str] {
        &[
            ids::DEBT_TO_EQUITY,
            ids::DEBT_TO_ASSETS,
            ids::EQUITY_MULTIPLIER,
            ids::INTEREST_COVERAGE,
            ids::DEBT_TO_EQUITY_TREND,
        ]
    }

    fn compute(&self, input: &CalculatorInput<'_>) -> Result<RawMetrics, MetricsError> {
        let mut metrics = RawMetrics::new();
        if let Err(e) = Self::balance_ratios(input, &mut metrics) {
            for id in [ids::DEBT_TO_EQUITY, ids::DEBT_TO_ASSETS, ids::EQUITY_MULTIPLIER] {
                metrics.insert(id, RawMetric::unknown(e.to_string()));
            }
        }
        metrics.insert(ids::INTEREST_COVERAGE, RawMetric::from_result(Self::interest_coverage(input)));
        metrics.insert(
            ids::DEBT_TO_EQUITY_TREND,
            RawMetric::from_result(Self::debt_to_equity_trend(input)),
        );
        Ok(metrics)
    }
}
