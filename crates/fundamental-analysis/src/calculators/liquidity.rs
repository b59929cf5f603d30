use analysis_core::arithmetic::{difference, finite, safe_ratio};
use analysis_core::{Field, MetricsError};

use super::{CalculatorInput, MetricCalculator, RawMetric, RawMetrics};
use crate::catalog::ids;
use crate::config::QuickRatioFormula;

/// Short-term solvency ratios from the latest balance sheet
pub struct LiquidityCalculator;

fn sum(values: &[Option<f64>]) -> Option<f64> {
    finite(values.iter().copied().sum::<Option<f64>>())
}

impl MetricCalculator for LiquidityCalculator {
    fn name(&self) -> &'static str {
        "liquidity"
    }

    fn metric_ids(&self) -> &'static [&'static str] {
        &[
            ids::CURRENT_RATIO,
            ids::QUICK_RATIO,
            ids::CASH_RATIO,
            ids::CASH_TO_ASSETS,
            ids::WORKING_CAPITAL,
        ]
    }

    fn compute(&self, input: &CalculatorInput<'_>) -> Result<RawMetrics, MetricsError> {
        let current_assets = input.latest(Field::TotalCurrentAssets)?;
        let current_liabilities = input.latest(Field::TotalCurrentLiabilities)?;
        let cash = input.latest(Field::CashAndCashEquivalents)?;

        // Reported combined line first, else the two components
        let cash_and_investments = match input.latest(Field::CashAndShortTermInvestments)? {
            Some(v) => Some(v),
            None => sum(&[cash, input.latest(Field::ShortTermInvestments)?]),
        };

        let quick_assets = match input.config.quick_ratio_formula {
            QuickRatioFormula::CashAndInvestments => cash_and_investments,
            QuickRatioFormula::CashInvestmentsReceivables => {
                sum(&[cash_and_investments, input.latest(Field::CurrentNetReceivables)?])
            }
            QuickRatioFormula::ExcludeInventory => {
                difference(current_assets, input.latest(Field::Inventory)?)
            }
        };

        let mut metrics = RawMetrics::new();
        metrics.insert(
            ids::CURRENT_RATIO,
            RawMetric::from_inputs(
                safe_ratio(current_assets, current_liabilities),
                &[current_assets, current_liabilities],
            ),
        );
        metrics.insert(
            ids::QUICK_RATIO,
            RawMetric::from_inputs(
                safe_ratio(quick_assets, current_liabilities),
                &[quick_assets, current_liabilities],
            ),
        );
        metrics.insert(
            ids::CASH_RATIO,
            RawMetric::from_inputs(safe_ratio(cash, current_liabilities), &[cash, current_liabilities]),
        );

        let total_assets = input.latest(Field::TotalAssets)?;
        metrics.insert(
            ids::CASH_TO_ASSETS,
            RawMetric::from_inputs(safe_ratio(cash, total_assets), &[cash, total_assets]),
        );
        metrics.insert(
            ids::WORKING_CAPITAL,
            RawMetric::from_inputs(
                difference(current_assets, current_liabilities),
                &[current_assets, current_liabilities],
            ),
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

    fn history() -> TickerHistory {
        let mut history = ticker();
        history.balance_sheet.annual = annual(
            StatementKind::BalanceSheet,
            2024,
            &[&[
                (Field::TotalCurrentAssets, Some(150.0)),
                (Field::TotalCurrentLiabilities, Some(100.0)),
                (Field::CashAndCashEquivalents, Some(30.0)),
                (Field::ShortTermInvestments, Some(20.0)),
                (Field::CurrentNetReceivables, Some(25.0)),
                (Field::Inventory, Some(40.0)),
                (Field::TotalAssets, Some(400.0)),
            ]],
        );
        history
    }

    fn run(history: &TickerHistory, config: &EngineConfig) -> RawMetrics {
        let statements = NormalizedStatements::from_history(history);
        let input = CalculatorInput {
            history,
            statements: &statements,
            config,
            as_of: year_end(2024),
        };
        LiquidityCalculator.compute(&input).unwrap()
    }

    #[test]
    fn test_current_and_cash_ratio() {
        let metrics = run(&history(), &EngineConfig::default());
        assert_relative_eq!(metrics[ids::CURRENT_RATIO].value.unwrap(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(metrics[ids::CASH_RATIO].value.unwrap(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_cash_to_assets_and_working_capital() {
        let metrics = run(&history(), &EngineConfig::default());
        assert_relative_eq!(metrics[ids::CASH_TO_ASSETS].value.unwrap(), 0.075, epsilon = 1e-12);
        assert_relative_eq!(metrics[ids::WORKING_CAPITAL].value.unwrap(), 50.0, epsilon = 1e-12);

        let mut thin = history();
        thin.balance_sheet.annual[0].values.remove(&Field::TotalAssets);
        let metrics = run(&thin, &EngineConfig::default());
        assert_eq!(metrics[ids::CASH_TO_ASSETS].value, None);
        assert_eq!(metrics[ids::CASH_TO_ASSETS].confidence, 0.5);
    }

    #[test]
    fn test_quick_ratio_variants() {
        let mut config = EngineConfig::default();
        let cases = [
            (QuickRatioFormula::CashAndInvestments, 0.5),
            (QuickRatioFormula::CashInvestmentsReceivables, 0.75),
            (QuickRatioFormula::ExcludeInventory, 1.1),
        ];
        for (formula, expected) in cases {
            config.quick_ratio_formula = formula;
            let metrics = run(&history(), &config);
            assert_relative_eq!(metrics[ids::QUICK_RATIO].value.unwrap(), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_liabilities_is_unknown() {
        let mut history = history();
        history.balance_sheet.annual[0] = history.balance_sheet.annual[0]
            .clone()
            .with(Field::TotalCurrentLiabilities, 0.0);
        let metrics = run(&history, &EngineConfig::default());
        assert_eq!(metrics[ids::CURRENT_RATIO].value, None);
        assert_eq!(metrics[ids::CURRENT_RATIO].confidence, 1.0);
    }

    #[test]
    fn test_missing_inventory_only_affects_exclude_inventory() {
        let mut history = history();
        history.balance_sheet.annual[0].values.remove(&Field::Inventory);
        let mut config = EngineConfig::default();
        config.quick_ratio_formula = QuickRatioFormula::ExcludeInventory;
        let metrics = run(&history, &config);
        assert_eq!(metrics[ids::QUICK_RATIO].value, None);
        assert_eq!(metrics[ids::QUICK_RATIO].confidence, 0.5);
        assert!(metrics[ids::CURRENT_RATIO].value.is_some());
    }
}
