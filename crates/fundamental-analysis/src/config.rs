use analysis_core::{Field, InsiderWindow, MetricsError, PeriodKind};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::str::FromStr;

use crate::catalog::{default_catalog, ids, MetricDefinition};
use crate::scoring::{BenchmarkBand, ScoreScale};

pub const DEFAULT_CONFIG_VERSION: &str = "2025.1";

/// Tolerance for composite weights summing to one
const WEIGHT_EPSILON: f64 = 1e-6;

/// Which current assets count as "quick"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickRatioFormula {
    /// (cash + short-term investments) / current liabilities
    CashAndInvestments,
    /// (cash + short-term investments + receivables) / current liabilities
    CashInvestmentsReceivables,
    /// (current assets - inventory) / current liabilities
    ExcludeInventory,
}

impl FromStr for QuickRatioFormula {
    type Err = MetricsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash_and_investments" => Ok(QuickRatioFormula::CashAndInvestments),
            "cash_investments_receivables" => Ok(QuickRatioFormula::CashInvestmentsReceivables),
            "exclude_inventory" => Ok(QuickRatioFormula::ExcludeInventory),
            other => Err(MetricsError::configuration(format!(
                "unknown quick ratio formula '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lookback {
    /// Annual periods considered by growth metrics. `None` uses every available period.
    pub growth_periods: Option<usize>,
    /// Annual periods used by averages and volatility
    pub trailing_window: usize,
    /// Quarterly periods used by surprise metrics
    pub surprise_quarters: usize,
}

impl Default for Lookback {
    fn default() -> Self {
        Self {
            growth_periods: None,
            trailing_window: 5,
            surprise_quarters: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeComponent {
    pub metric: String,
    pub weight: f64,
}

/// Fixed-weight composite over previously defined metrics or composites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeSpec {
    pub id: String,
    pub components: Vec<CompositeComponent>,
}

impl CompositeSpec {
    pub fn new(id: &str, components: &[(&str, f64)]) -> Self {
        Self {
            id: id.to_string(),
            components: components
                .iter()
                .map(|(metric, weight)| CompositeComponent {
                    metric: metric.to_string(),
                    weight: *weight,
                })
                .collect(),
        }
    }
}

/// Versioned scoring configuration passed into the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub version: String,
    pub scale: ScoreScale,
    pub lookback: Lookback,
    pub quick_ratio_formula: QuickRatioFormula,
    /// Fraction of total debt assumed to be paid as interest each period
    pub interest_rate_proxy: f64,
    /// Cash flow field standing in for revenue in growth metrics
    pub revenue_proxy: Field,
    /// Period kind used by point-in-time ratios
    pub ratio_period: PeriodKind,
    pub insider_window: InsiderWindow,
    /// Band applied to the age of the latest fiscal period, in days
    pub freshness_band: BenchmarkBand,
    pub catalog: Vec<MetricDefinition>,
    pub composites: Vec<CompositeSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_CONFIG_VERSION.to_string(),
            scale: ScoreScale::default(),
            lookback: Lookback::default(),
            quick_ratio_formula: QuickRatioFormula::CashAndInvestments,
            interest_rate_proxy: 0.05,
            revenue_proxy: Field::OperatingCashflow,
            ratio_period: PeriodKind::Annual,
            insider_window: InsiderWindow::LastDays(180),
            freshness_band: BenchmarkBand::new(540.0, 180.0, 90.0),
            catalog: default_catalog(),
            composites: default_composites(),
        }
    }
}

/// Standard composites, category scores first and the investment score last.
pub fn default_composites() -> Vec<CompositeSpec> {
    vec![
        CompositeSpec::new(
            ids::GROWTH_SCORE,
            &[
                (ids::REVENUE_CAGR, 0.30),
                (ids::EPS_CAGR, 0.30),
                (ids::TOTAL_ASSETS_CAGR, 0.15),
                (ids::BOOK_VALUE_CAGR, 0.15),
                (ids::INTANGIBLE_ASSETS_CAGR, 0.10),
            ],
        ),
        CompositeSpec::new(
            ids::FINANCIAL_HEALTH_SCORE,
            &[
                (ids::CURRENT_RATIO, 0.20),
                (ids::QUICK_RATIO, 0.15),
                (ids::CASH_RATIO, 0.10),
                (ids::DEBT_TO_EQUITY, 0.25),
                (ids::DEBT_TO_ASSETS, 0.10),
                (ids::INTEREST_COVERAGE, 0.20),
            ],
        ),
        CompositeSpec::new(
            ids::PROFITABILITY_SCORE,
            &[
                (ids::ROE, 0.30),
                (ids::ROA, 0.25),
                (ids::OCF_MARGIN, 0.15),
                (ids::NET_MARGIN_TTM, 0.15),
                (ids::FCF_YIELD, 0.15),
            ],
        ),
        CompositeSpec::new(
            ids::INNOVATION_SCORE,
            &[
                (ids::INTANGIBLES_TO_ASSETS, 0.40),
                (ids::INTANGIBLE_ASSETS_CAGR, 0.30),
                (ids::CAPEX_INTENSITY, 0.30),
            ],
        ),
        CompositeSpec::new(
            ids::EARNINGS_QUALITY_SCORE,
            &[
                (ids::EPS_TREND_CONSISTENCY, 0.30),
                (ids::POSITIVE_SURPRISE_RATIO, 0.20),
                (ids::AVERAGE_SURPRISE, 0.20),
                (ids::EPS_VOLATILITY, 0.15),
                (ids::EPS_GROWTH_YOY, 0.15),
            ],
        ),
        CompositeSpec::new(
            ids::BUFFETT_SCORE,
            &[
                (ids::ROE, 0.30),
                (ids::DEBT_TO_EQUITY, 0.20),
                (ids::CURRENT_RATIO, 0.15),
                (ids::EPS_CAGR, 0.20),
                (ids::CASH_TO_ASSETS, 0.15),
            ],
        ),
        CompositeSpec::new(
            ids::INVESTMENT_SCORE,
            &[
                (ids::GROWTH_SCORE, 0.25),
                (ids::FINANCIAL_HEALTH_SCORE, 0.25),
                (ids::PROFITABILITY_SCORE, 0.25),
                (ids::EARNINGS_QUALITY_SCORE, 0.15),
                (ids::INNOVATION_SCORE, 0.10),
            ],
        ),
    ]
}

impl EngineConfig {
    /// Default configuration with knobs overridden from `METRICS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let growth_periods = match env::var("METRICS_GROWTH_LOOKBACK") {
            Ok(v) => Some(v.parse().context("METRICS_GROWTH_LOOKBACK must be an integer")?),
            Err(_) => defaults.lookback.growth_periods,
        };

        let insider_window = match (
            env::var("METRICS_INSIDER_LAST_TRANSACTIONS"),
            env::var("METRICS_INSIDER_LAST_DAYS"),
        ) {
            (Ok(n), _) => InsiderWindow::LastTransactions(
                n.parse()
                    .context("METRICS_INSIDER_LAST_TRANSACTIONS must be an integer")?,
            ),
            (Err(_), Ok(d)) => InsiderWindow::LastDays(
                d.parse().context("METRICS_INSIDER_LAST_DAYS must be an integer")?,
            ),
            _ => defaults.insider_window,
        };

        let config = Self {
            lookback: Lookback {
                growth_periods,
                trailing_window: env::var("METRICS_TRAILING_WINDOW")
                    .unwrap_or_else(|_| defaults.lookback.trailing_window.to_string())
                    .parse()
                    .context("METRICS_TRAILING_WINDOW must be an integer")?,
                surprise_quarters: env::var("METRICS_SURPRISE_QUARTERS")
                    .unwrap_or_else(|_| defaults.lookback.surprise_quarters.to_string())
                    .parse()
                    .context("METRICS_SURPRISE_QUARTERS must be an integer")?,
            },
            quick_ratio_formula: env::var("METRICS_QUICK_RATIO_FORMULA")
                .unwrap_or_else(|_| "cash_and_investments".to_string())
                .parse()?,
            interest_rate_proxy: env::var("METRICS_INTEREST_RATE_PROXY")
                .unwrap_or_else(|_| defaults.interest_rate_proxy.to_string())
                .parse()
                .context("METRICS_INTEREST_RATE_PROXY must be a number")?,
            insider_window,
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a full configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse engine config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn definition(&self, id: &str) -> Option<&MetricDefinition> {
        self.catalog.iter().find(|d| d.id == id)
    }

    /// Check bands, windows and composite weights. The only failure that
    /// prevents an engine from being built.
    pub fn validate(&self) -> std::result::Result<(), MetricsError> {
        self.scale.validate()?;
        self.freshness_band.validate("freshness")?;

        if let Some(n) = self.lookback.growth_periods {
            if n < 2 {
                return Err(MetricsError::configuration(format!(
                    "growth lookback needs at least 2 periods, got {}",
                    n
                )));
            }
        }
        if self.lookback.trailing_window == 0 || self.lookback.surprise_quarters == 0 {
            return Err(MetricsError::configuration("lookback windows must be positive"));
        }
        match self.insider_window {
            InsiderWindow::LastTransactions(0) => {
                return Err(MetricsError::configuration("insider window must be positive"));
            }
            InsiderWindow::LastDays(d) if d <= 0 => {
                return Err(MetricsError::configuration(format!(
                    "insider window must be positive, got {}",
                    self.insider_window
                )));
            }
            _ => {}
        }
        if !self.interest_rate_proxy.is_finite() || self.interest_rate_proxy < 0.0 {
            return Err(MetricsError::configuration(format!(
                "interest rate proxy must be a non-negative number, got {}",
                self.interest_rate_proxy
            )));
        }
        if self.revenue_proxy.statement() != analysis_core::StatementKind::CashFlow {
            return Err(MetricsError::configuration(format!(
                "revenue proxy must be a cash flow field, got {}",
                self.revenue_proxy
            )));
        }

        let mut seen = HashSet::new();
        for def in &self.catalog {
            if !seen.insert(def.id.as_str()) {
                return Err(MetricsError::configuration(format!("duplicate catalog id {}", def.id)));
            }
            if let Some(band) = &def.band {
                band.validate(&def.id)?;
            }
            if !def.weight.is_finite() || def.weight < 0.0 {
                return Err(MetricsError::configuration(format!(
                    "catalog weight for {} must be non-negative, got {}",
                    def.id, def.weight
                )));
            }
        }

        self.validate_composites()
    }

    fn validate_composites(&self) -> std::result::Result<(), MetricsError> {
        let composite_ids: HashSet<&str> = self.composites.iter().map(|c| c.id.as_str()).collect();
        // Raw metrics are visible to every composite; composites only to later ones.
        let mut defined: HashSet<&str> = self
            .catalog
            .iter()
            .map(|d| d.id.as_str())
            .filter(|id| !composite_ids.contains(id))
            .collect();

        for composite in &self.composites {
            if self.definition(&composite.id).is_none() {
                return Err(MetricsError::configuration(format!(
                    "composite {} has no catalog entry",
                    composite.id
                )));
            }
            if composite.components.is_empty() {
                return Err(MetricsError::configuration(format!(
                    "composite {} has no components",
                    composite.id
                )));
            }
            for component in &composite.components {
                if !defined.contains(component.metric.as_str()) {
                    return Err(MetricsError::configuration(format!(
                        "composite {} references {} which is unknown or defined later",
                        composite.id, component.metric
                    )));
                }
                if !component.weight.is_finite() || component.weight <= 0.0 {
                    return Err(MetricsError::configuration(format!(
                        "composite {} has non-positive weight for {}",
                        composite.id, component.metric
                    )));
                }
            }
            let total: f64 = composite.components.iter().map(|c| c.weight).sum();
            if (total - 1.0).abs() > WEIGHT_EPSILON {
                return Err(MetricsError::configuration(format!(
                    "composite {} weights sum to {}, expected 1",
                    composite.id, total
                )));
            }
            if !defined.insert(composite.id.as_str()) {
                return Err(MetricsError::configuration(format!(
                    "duplicate composite id {}",
                    composite.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_composite_weights_sum_to_one() {
        for composite in default_composites() {
            let total: f64 = composite.components.iter().map(|c| c.weight).sum();
            assert!((total - 1.0).abs() < 1e-9, "{}", composite.id);
        }
    }

    #[test]
    fn test_rejects_weights_not_summing_to_one() {
        let mut config = EngineConfig::default();
        config.composites[0].components[0].weight += 0.1;
        assert!(matches!(config.validate(), Err(MetricsError::Configuration(_))));
    }

    #[test]
    fn test_rejects_forward_composite_reference() {
        let mut config = EngineConfig::default();
        config.composites.swap(0, 6);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_band() {
        let mut config = EngineConfig::default();
        config.catalog[0].band = Some(BenchmarkBand::new(0.0, 0.5, 0.2));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_short_growth_lookback() {
        let mut config = EngineConfig::default();
        config.lookback.growth_periods = Some(1);
        assert!(config.validate().is_err());
        config.lookback.growth_periods = Some(2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_insider_window() {
        let mut config = EngineConfig::default();
        config.insider_window = InsiderWindow::LastTransactions(0);
        assert!(config.validate().is_err());
        config.insider_window = InsiderWindow::LastDays(-5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_quick_ratio_formula_parses() {
        assert_eq!(
            "exclude_inventory".parse::<QuickRatioFormula>().unwrap(),
            QuickRatioFormula::ExcludeInventory
        );
        assert!("acid".parse::<QuickRatioFormula>().is_err());
    }

    #[test]
    fn test_json_roundtrip_preserves_config() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.interest_rate_proxy = -0.01;
        let json = serde_json::to_string(&config).unwrap();
        assert!(EngineConfig::from_json_str(&json).is_err());
    }
}
