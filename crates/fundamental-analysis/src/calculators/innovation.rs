use analysis_core::arithmetic::{presence, safe_ratio};
use analysis_core::{Field, MetricsError};

use super::{CalculatorInput, MetricCalculator, RawMetric, RawMetrics};
use crate::catalog::ids;

/// Intangible share of the balance sheet and reinvestment rate
pub struct InnovationCalculator;

impl InnovationCalculator {
    fn share_of_assets(input: &CalculatorInput<'_>, field: Field) -> Result<RawMetric, MetricsError> {
        let total_assets = input.latest(Field::TotalAssets)?;
        let part = input.latest(field)?;
        Ok(RawMetric::from_inputs(safe_ratio(part, total_assets), &[part, total_assets]))
    }

    fn capex_intensity(input: &CalculatorInput<'_>) -> Result<RawMetric, MetricsError> {
        let capex = input.latest(Field::CapitalExpenditures)?.map(f64::abs);
        let ocf = input.latest(Field::OperatingCashflow)?;
        Ok(match ocf {
            Some(o) if o <= 0.0 => RawMetric::invalid_domain(
                ids::CAPEX_INTENSITY,
                "operating cash flow is not positive",
                presence(&[capex, ocf]),
            ),
            _ => RawMetric::from_inputs(safe_ratio(capex, ocf), &[capex, ocf]),
        })
    }
}

impl MetricCalculator for InnovationCalculator {
    fn name(&self) -> &'static str {
        "innovation"
    }

    fn metric_ids(&self) -> &'static [&'static str] {
        &[ids::INTANGIBLES_TO_ASSETS, ids::GOODWILL_TO_ASSETS, ids::CAPEX_INTENSITY]
    }

    fn compute(&self, input: &CalculatorInput<'_>) -> Result<RawMetrics, MetricsError> {
        let mut metrics = RawMetrics::new();
        metrics.insert(
            ids::INTANGIBLES_TO_ASSETS,
            RawMetric::from_result(Self::share_of_assets(input, Field::IntangibleAssets)),
        );
        metrics.insert(
            ids::GOODWILL_TO_ASSETS,
            RawMetric::from_result(Self::share_of_assets(input, Field::Goodwill)),
        );
        metrics.insert(ids::CAPEX_INTENSITY, RawMetric::from_result(Self::capex_intensity(input)));
        Ok(metrics)
    }
}
