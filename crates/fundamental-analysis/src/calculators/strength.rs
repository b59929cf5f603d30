use analysis_core::arithmetic::{oldest_known_pair, safe_ratio};
use analysis_core::{Field, MetricsError};
use tracing::debug;

use super::{CalculatorInput, MetricCalculator, RawMetric, RawMetrics};
use crate::catalog::ids;

/// Business quality as the share of five health checks that pass
pub struct StrengthCalculator;

const PROFITABLE_YEARS: usize = 3;
const LOW_DEBT_TO_EQUITY: f64 = 0.5;
const STRONG_CURRENT_RATIO: f64 = 1.5;

type Check = fn(&CalculatorInput<'_>) -> Result<Option<bool>, MetricsError>;

const CHECKS: [(&str, Check); 5] = [
    ("consistent profits", StrengthCalculator::consistently_profitable),
    ("growing book value", StrengthCalculator::growing_book_value),
    ("low debt", StrengthCalculator::low_debt),
    ("strong liquidity", StrengthCalculator::strong_liquidity),
    ("positive operating cash flow", StrengthCalculator::positive_operating_cash_flow),
];

impl StrengthCalculator {
    /// A single loss decides the check even when other years are missing.
    fn consistently_profitable(input: &CalculatorInput<'_>) -> Result<Option<bool>, MetricsError> {
        let recent = input.annual(Field::NetIncome)?.head(PROFITABLE_YEARS);
        let known: Vec<f64> = recent.iter().flatten().copied().collect();
        if known.iter().any(|ni| *ni <= 0.0) {
            return Ok(Some(false));
        }
        Ok((known.len() == PROFITABLE_YEARS).then_some(true))
    }

    fn growing_book_value(input: &CalculatorInput<'_>) -> Result<Option<bool>, MetricsError> {
        let equity = input.annual(Field::TotalShareholderEquity)?;
        let window = input.config.lookback.growth_periods.unwrap_or(equity.len());
        Ok(oldest_known_pair(&equity.values(), window).map(|(newest, oldest, _)| newest > oldest))
    }

    fn low_debt(input: &CalculatorInput<'_>) -> Result<Option<bool>, MetricsError> {
        let equity = input.latest(Field::TotalShareholderEquity)?;
        if equity.is_some_and(|e| e <= 0.0) {
            return Ok(Some(false));
        }
        let debt = input.total_debt_at(Some(0), input.config.ratio_period)?;
        Ok(safe_ratio(debt, equity).map(|de| de < LOW_DEBT_TO_EQUITY))
    }

    fn strong_liquidity(input: &CalculatorInput<'_>) -> Result<Option<bool>, MetricsError> {
        let current_assets = input.latest(Field::TotalCurrentAssets)?;
        let current_liabilities = input.latest(Field::TotalCurrentLiabilities)?;
        Ok(safe_ratio(current_assets, current_liabilities).map(|cr| cr > STRONG_CURRENT_RATIO))
    }

    fn positive_operating_cash_flow(input: &CalculatorInput<'_>) -> Result<Option<bool>, MetricsError> {
        Ok(input.latest(Field::OperatingCashflow)?.map(|ocf| ocf > 0.0))
    }
}

impl MetricCalculator for StrengthCalculator {
    fn name(&self) -> &'static str {
        "quality"
    }

    fn metric_ids(&self) -> &'static [&'static str] {
        &[ids::BUSINESS_QUALITY]
    }

    fn compute(&self, input: &CalculatorInput<'_>) -> Result<RawMetrics, MetricsError> {
        let mut passed = 0usize;
        let mut known = 0usize;
        for (label, check) in CHECKS {
            match check(input) {
                Ok(Some(pass)) => {
                    known += 1;
                    passed += usize::from(pass);
                }
                Ok(None) => {}
                Err(e) => debug!(check = label, error = %e, "quality check skipped"),
            }
        }

        let confidence = known as f64 / CHECKS.len() as f64;
        let value = (known > 0).then(|| passed as f64 / known as f64);
        let mut metrics = RawMetrics::new();
        metrics.insert(
            ids::BUSINESS_QUALITY,
            RawMetric::new(value, confidence).or_reason("no quality check could be evaluated"),
        );
        Ok(metrics)
    }
}
