//! Category calculators
//!
//! Each calculator reads normalized series and emits raw metric values for
//! the ids it declares. Calculators do not depend on each other.

mod cash_flow;
mod earnings;
mod growth;
mod innovation;
mod insider;
mod leverage;
mod liquidity;
mod per_share;
mod profitability;
mod strength;

pub use cash_flow::CashFlowCalculator;
pub use earnings::EarningsCalculator;
pub use growth::GrowthCalculator;
pub use innovation::InnovationCalculator;
pub use insider::InsiderCalculator;
pub use leverage::LeverageCalculator;
pub use liquidity::LiquidityCalculator;
pub use per_share::PerShareCalculator;
pub use profitability::ProfitabilityCalculator;
pub use strength::StrengthCalculator;

use analysis_core::arithmetic::presence;
use analysis_core::{Field, MetricsError, PeriodKind, Series, TickerHistory};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::config::EngineConfig;

/// Raw value of one metric before scoring
#[derive(Debug, Clone, PartialEq)]
pub struct RawMetric {
    pub value: Option<f64>,
    pub confidence: f64,
    pub reason: Option<String>,
}

impl RawMetric {
    /// Value with confidence taken from how many `inputs` were known.
    pub fn from_inputs(value: Option<f64>, inputs: &[Option<f64>]) -> Self {
        Self::new(value, presence(inputs))
    }

    pub fn new(value: Option<f64>, confidence: f64) -> Self {
        let value = value.filter(|v| v.is_finite());
        let reason = match value {
            Some(_) => None,
            None if confidence >= 1.0 => Some("undefined for the given inputs".to_string()),
            None => Some("required input unknown".to_string()),
        };
        Self {
            value,
            confidence,
            reason,
        }
    }

    pub fn unknown(reason: impl Into<String>) -> Self {
        Self {
            value: None,
            confidence: 0.0,
            reason: Some(reason.into()),
        }
    }

    /// Inputs were present but violate a domain rule for `metric`.
    pub fn invalid_domain(metric: &str, reason: &str, confidence: f64) -> Self {
        Self {
            value: None,
            confidence,
            reason: Some(MetricsError::invalid_domain(metric, reason).to_string()),
        }
    }

    /// Settle one metric whose statement inputs could not be read. The error
    /// becomes that metric's reason so sibling metrics are unaffected.
    pub fn from_result(result: Result<RawMetric, MetricsError>) -> Self {
        result.unwrap_or_else(|e| Self::unknown(e.to_string()))
    }

    /// Replace the reason of an unknown value. Known values are untouched.
    pub fn or_reason(mut self, reason: impl Into<String>) -> Self {
        if self.value.is_none() {
            self.reason = Some(reason.into());
        }
        self
    }
}

pub type RawMetrics = BTreeMap<&'static str, RawMetric>;

pub trait MetricCalculator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Every id this calculator emits, in catalog order.
    fn metric_ids(&self) -> &'static [&'static str];

    fn compute(&self, input: &CalculatorInput<'_>) -> Result<RawMetrics, MetricsError>;
}

/// Every field of every statement extracted once per run.
///
/// A field whose statement fails schema validation keeps the error, so the
/// calculator asking for it fails instead of silently seeing no data.
#[derive(Debug, Clone, Default)]
pub struct NormalizedStatements {
    series: HashMap<(Field, PeriodKind), Result<Series, MetricsError>>,
}

static EMPTY_SERIES: Series = Series { points: Vec::new() };

impl NormalizedStatements {
    pub fn from_history(history: &TickerHistory) -> Self {
        let mut series = HashMap::with_capacity(Field::ALL.len() * 2);
        for field in Field::ALL {
            let statement = history.statement(field.statement());
            for period_kind in [PeriodKind::Annual, PeriodKind::Quarterly] {
                series.insert((field, period_kind), statement.series(field, period_kind));
            }
        }
        Self { series }
    }

    pub fn get(&self, field: Field, period_kind: PeriodKind) -> Result<&Series, MetricsError> {
        match self.series.get(&(field, period_kind)) {
            Some(Ok(series)) => Ok(series),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(&EMPTY_SERIES),
        }
    }
}

/// Read-only view handed to every calculator
pub struct CalculatorInput<'a> {
    pub history: &'a TickerHistory,
    pub statements: &'a NormalizedStatements,
    pub config: &'a EngineConfig,
    pub as_of: NaiveDate,
}

impl<'a> CalculatorInput<'a> {
    /// Series at the configured ratio period kind.
    pub fn series(&self, field: Field) -> Result<&'a Series, MetricsError> {
        self.statements.get(field, self.config.ratio_period)
    }

    pub fn annual(&self, field: Field) -> Result<&'a Series, MetricsError> {
        self.statements.get(field, PeriodKind::Annual)
    }

    pub fn quarterly(&self, field: Field) -> Result<&'a Series, MetricsError> {
        self.statements.get(field, PeriodKind::Quarterly)
    }

    /// Most recent value at the ratio period kind.
    pub fn latest(&self, field: Field) -> Result<Option<f64>, MetricsError> {
        Ok(self.series(field)?.latest())
    }

    /// Balance sheet position whose fiscal date matches `date`.
    ///
    /// Flow figures from the cash flow statement are paired with stock figures
    /// by date rather than by position.
    pub fn balance_position(&self, date: Option<NaiveDate>, period_kind: PeriodKind) -> Option<usize> {
        let periods = self.history.balance_sheet.periods(period_kind);
        let date = date?;
        periods.iter().position(|p| p.fiscal_date_ending == Some(date))
    }

    /// Total debt at a balance sheet position.
    ///
    /// Reported total, else short-term plus long-term when both are known.
    pub fn total_debt_at(&self, position: Option<usize>, period_kind: PeriodKind) -> Result<Option<f64>, MetricsError> {
        let Some(i) = position else {
            return Ok(None);
        };
        let reported = self.statements.get(Field::ShortLongTermDebtTotal, period_kind)?.at(i);
        if reported.is_some() {
            return Ok(reported);
        }
        let short = self.statements.get(Field::ShortTermDebt, period_kind)?.at(i);
        let long = self.statements.get(Field::LongTermDebt, period_kind)?.at(i);
        Ok(analysis_core::arithmetic::finite(short.zip(long).map(|(s, l)| s + l)))
    }
}

pub fn default_calculators() -> Vec<Box<dyn MetricCalculator>> {
    vec![
        Box::new(GrowthCalculator),
        Box::new(LiquidityCalculator),
        Box::new(LeverageCalculator),
        Box::new(ProfitabilityCalculator),
        Box::new(CashFlowCalculator),
        Box::new(InnovationCalculator),
        Box::new(EarningsCalculator),
        Box::new(InsiderCalculator),
        Box::new(PerShareCalculator),
        Box::new(StrengthCalculator),
    ]
}
