use analysis_core::arithmetic::{difference, presence, safe_ratio};
use analysis_core::{Field, MetricsError};

use super::{CalculatorInput, MetricCalculator, RawMetric, RawMetrics};
use crate::catalog::ids;

/// Free cash flow and what is paid out of earnings
pub struct CashFlowCalculator;

impl CashFlowCalculator {
    fn free_cash_flow_and_yield(input: &CalculatorInput<'_>, metrics: &mut RawMetrics) -> Result<(), MetricsError> {
        let ocf_series = input.series(Field::OperatingCashflow)?;
        let operating_cash_flow = ocf_series.latest();
        // Providers disagree on the sign of capital expenditures
        let capex = input.latest(Field::CapitalExpenditures)?.map(f64::abs);
        let free_cash_flow = difference(operating_cash_flow, capex);
        metrics.insert(
            ids::FREE_CASH_FLOW,
            RawMetric::from_inputs(free_cash_flow, &[operating_cash_flow, capex]),
        );

        // Yield needs the balance sheet; a bad one must not take free cash flow down with it
        let yield_on_assets = input.series(Field::TotalAssets).map(|total_assets| {
            let assets = input
                .balance_position(ocf_series.latest_date(), input.config.ratio_period)
                .and_then(|p| total_assets.at(p));
            RawMetric::from_inputs(
                safe_ratio(free_cash_flow, assets),
                &[operating_cash_flow, capex, assets],
            )
        });
        metrics.insert(ids::FCF_YIELD, RawMetric::from_result(yield_on_assets));
        Ok(())
    }

    fn dividend_payout(input: &CalculatorInput<'_>) -> Result<RawMetric, MetricsError> {
        let net_income = input.latest(Field::NetIncome)?;
        let dividends = match input.latest(Field::DividendPayout)? {
            Some(d) => Some(d.abs()),
            None => input.latest(Field::DividendPayoutCommonStock)?.map(f64::abs),
        };
        Ok(match net_income {
            Some(ni) if ni <= 0.0 => RawMetric::invalid_domain(
                ids::DIVIDEND_PAYOUT_RATIO,
                "net income is not positive",
                presence(&[dividends, net_income]),
            ),
            _ => RawMetric::from_inputs(safe_ratio(dividends, net_income), &[dividends, net_income]),
        })
    }
}

impl MetricCalculator for CashFlowCalculator {
    fn name(&self) -> &'static str {
        "cash_flow"
    }

    fn metric_ids(&self) -> &'static [&'static str] {
        &[ids::FREE_CASH_FLOW, ids::FCF_YIELD, ids::DIVIDEND_PAYOUT_RATIO]
    }

    fn compute(&self, input: &CalculatorInput<'_>) -> Result<RawMetrics, MetricsError> {
        let mut metrics = RawMetrics::new();
        if let Err(e) = Self::free_cash_flow_and_yield(input, &mut metrics) {
            for id in [ids::FREE_CASH_FLOW, ids::FCF_YIELD] {
                metrics.insert(id, RawMetric::unknown(e.to_string()));
            }
        }
        metrics.insert(ids::DIVIDEND_PAYOUT_RATIO, RawMetric::from_result(Self::dividend_payout(input)));
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

    fn history(capex: f64) -> TickerHistory {
        let mut history = ticker();
        history.balance_sheet.annual = annual(
            StatementKind::BalanceSheet,
            2024,
            &[&[(Field::TotalAssets, Some(1000.0))]],
        );
        history.cash_flow.annual = annual(
            StatementKind::CashFlow,
            2024,
            &[&[
                (Field::OperatingCashflow, Some(120.0)),
                (Field::CapitalExpenditures, Some(capex)),
                (Field::NetIncome, Some(80.0)),
                (Field::DividendPayoutCommonStock, Some(20.0)),
            ]],
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
        CashFlowCalculator.compute(&input).unwrap()
    }

    #[test]
    fn test_free_cash_flow_ignores_capex_sign() {
        for capex in [70.0, -70.0] {
            let metrics = run(&history(capex));
            assert_relative_eq!(metrics[ids::FREE_CASH_FLOW].value.unwrap(), 50.0, epsilon = 1e-12);
            assert_relative_eq!(metrics[ids::FCF_YIELD].value.unwrap(), 0.05, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_dividend_payout_falls_back_to_common_stock_line() {
        let metrics = run(&history(70.0));
        assert_relative_eq!(metrics[ids::DIVIDEND_PAYOUT_RATIO].value.unwrap(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_capex_makes_fcf_unknown() {
        let mut history = history(70.0);
        history.cash_flow.annual[0].values.remove(&Field::CapitalExpenditures);
        let metrics = run(&history);
        assert_eq!(metrics[ids::FREE_CASH_FLOW].value, None);
        assert_eq!(metrics[ids::FREE_CASH_FLOW].confidence, 0.5);
        assert_eq!(metrics[ids::FCF_YIELD].value, None);
    }

    #[test]
    fn test_mislabelled_balance_sheet_only_degrades_yield() {
        let mut history = history(70.0);
        history.balance_sheet.kind = StatementKind::CashFlow;
        let metrics = run(&history);
        assert_relative_eq!(metrics[ids::FREE_CASH_FLOW].value.unwrap(), 50.0, epsilon = 1e-12);
        assert_relative_eq!(metrics[ids::DIVIDEND_PAYOUT_RATIO].value.unwrap(), 0.25, epsilon = 1e-12);
        let fcf_yield = &metrics[ids::FCF_YIELD];
        assert_eq!(fcf_yield.value, None);
        assert!(fcf_yield.reason.as_deref().unwrap().contains("total_assets"));
    }
}
