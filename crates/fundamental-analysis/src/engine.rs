use analysis_core::{MetricResult, MetricsError, MetricsReport, TickerHistory};
use chrono::{NaiveDate, Utc};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};

use crate::calculators::{default_calculators, CalculatorInput, MetricCalculator, NormalizedStatements, RawMetric};
use crate::config::EngineConfig;
use crate::quality;
use crate::scoring::weighted_composite;

/// Orchestrates one ticker through four phases:
/// normalize, compute raw, score, then composites and quality.
///
/// Each phase produces an owned value that is the only input of the next.
/// The engine holds no per-run state, so one instance can serve many threads.
pub struct MetricsEngine {
    config: EngineConfig,
    calculators: Vec<Box<dyn MetricCalculator>>,
}

impl MetricsEngine {
    pub fn new(config: EngineConfig) -> Result<Self, MetricsError> {
        Self::with_calculators(config, default_calculators())
    }

    /// Build with a custom calculator set. Every calculator id must have a
    /// catalog entry and every non-composite catalog entry must be computed.
    pub fn with_calculators(
        config: EngineConfig,
        calculators: Vec<Box<dyn MetricCalculator>>,
    ) -> Result<Self, MetricsError> {
        config.validate()?;

        let composite_ids: HashSet<&str> = config.composites.iter().map(|c| c.id.as_str()).collect();
        let mut emitted: HashSet<&str> = HashSet::new();
        for calculator in &calculators {
            for &id in calculator.metric_ids() {
                if !emitted.insert(id) {
                    return Err(MetricsError::configuration(format!(
                        "metric {} is emitted by more than one calculator",
                        id
                    )));
                }
                if config.definition(id).is_none() || composite_ids.contains(id) {
                    return Err(MetricsError::configuration(format!(
                        "calculator {} emits {} which has no catalog entry",
                        calculator.name(),
                        id
                    )));
                }
            }
        }
        for definition in &config.catalog {
            let id = definition.id.as_str();
            if !emitted.contains(id) && !composite_ids.contains(id) {
                return Err(MetricsError::configuration(format!(
                    "catalog entry {} is not computed by any calculator or composite",
                    id
                )));
            }
        }

        tracing::info!(
            "Metrics engine ready (config {}, {} calculators, {} catalog entries)",
            config.version,
            calculators.len(),
            config.catalog.len()
        );

        Ok(Self { config, calculators })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute the report as of today's UTC date.
    pub fn compute(&self, history: &TickerHistory) -> MetricsReport {
        self.compute_as_of(history, Utc::now().date_naive())
    }

    /// Compute the report as of `as_of`. Deterministic for a given input.
    pub fn compute_as_of(&self, history: &TickerHistory, as_of: NaiveDate) -> MetricsReport {
        tracing::info!("Computing fundamental metrics for {} as of {}", history.symbol, as_of);

        let statements = NormalizedStatements::from_history(history);
        let raw = self.compute_raw(history, &statements, as_of);
        let scored = self.score(raw);
        let metrics = self.aggregate(scored);

        let freshness = quality::freshness(history, as_of, &self.config.freshness_band, &self.config.scale);
        let coverage = quality::coverage(&metrics, &self.config.catalog);

        tracing::info!(
            "Computed {}/{} metrics for {} (confidence {:.1}%)",
            coverage.known,
            coverage.total,
            history.symbol,
            coverage.percent
        );

        MetricsReport {
            symbol: history.symbol.clone(),
            as_of,
            config_version: self.config.version.clone(),
            metrics,
            freshness,
            overall_confidence: coverage.percent,
            known_metrics: coverage.known,
            total_metrics: coverage.total,
            insider_window: self.config.insider_window,
        }
    }

    /// One report per history, in input order, computed on the rayon pool.
    pub fn compute_batch(&self, histories: &[TickerHistory]) -> Vec<MetricsReport> {
        self.compute_batch_as_of(histories, Utc::now().date_naive())
    }

    pub fn compute_batch_as_of(&self, histories: &[TickerHistory], as_of: NaiveDate) -> Vec<MetricsReport> {
        tracing::info!("Computing fundamental metrics for {} tickers", histories.len());
        histories
            .par_iter()
            .map(|history| self.compute_as_of(history, as_of))
            .collect()
    }

    /// Every declared id gets a value; a failing calculator degrades only its own ids.
    fn compute_raw(
        &self,
        history: &TickerHistory,
        statements: &NormalizedStatements,
        as_of: NaiveDate,
    ) -> BTreeMap<String, RawMetric> {
        let input = CalculatorInput {
            history,
            statements,
            config: &self.config,
            as_of,
        };

        let mut raw = BTreeMap::new();
        for calculator in &self.calculators {
            match calculator.compute(&input) {
                Ok(mut values) => {
                    for &id in calculator.metric_ids() {
                        let metric = values
                            .remove(id)
                            .unwrap_or_else(|| RawMetric::unknown("calculator produced no value"));
                        if let Some(reason) = &metric.reason {
                            tracing::debug!("{} {}: unknown ({})", history.symbol, id, reason);
                        }
                        raw.insert(id.to_string(), metric);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "{} calculator failed for {}: {}",
                        calculator.name(),
                        history.symbol,
                        e
                    );
                    for &id in calculator.metric_ids() {
                        tracing::warn!("{} {}: unknown ({})", history.symbol, id, e);
                        raw.insert(id.to_string(), RawMetric::unknown(e.to_string()));
                    }
                }
            }
        }
        raw
    }

    /// Map raw values onto the score scale. Metrics without a band stay informational.
    fn score(&self, raw: BTreeMap<String, RawMetric>) -> BTreeMap<String, MetricResult> {
        raw.into_iter()
            .map(|(id, metric)| {
                let band = self.config.definition(&id).and_then(|d| d.band);
                let normalized = metric
                    .value
                    .zip(band)
                    .map(|(value, band)| band.normalize(value, &self.config.scale));
                let result = MetricResult {
                    id: id.clone(),
                    raw: metric.value,
                    normalized,
                    confidence: metric.confidence,
                    reason: metric.reason,
                };
                (id, result)
            })
            .collect()
    }

    /// Add composites in configuration order so later composites can use earlier ones.
    fn aggregate(&self, mut metrics: BTreeMap<String, MetricResult>) -> BTreeMap<String, MetricResult> {
        for composite in &self.config.composites {
            let components: Vec<(Option<f64>, f64)> = composite
                .components
                .iter()
                .map(|c| (metrics.get(&c.metric).and_then(|m| m.normalized), c.weight))
                .collect();
            let (score, confidence) = weighted_composite(&components);
            let reason = score
                .is_none()
                .then(|| "every component score is unknown".to_string());

            metrics.insert(
                composite.id.clone(),
                MetricResult {
                    id: composite.id.clone(),
                    raw: score,
                    normalized: score,
                    confidence,
                    reason,
                },
            );
        }
        metrics
    }
}
