pub mod calculators;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod quality;
pub mod scoring;


pub use calculators::{default_calculators, CalculatorInput, MetricCalculator, RawMetric, RawMetrics};
pub use catalog::{default_catalog, ids, MetricCategory, MetricDefinition};
pub use config::{CompositeSpec, EngineConfig, Lookback, QuickRatioFormula};
pub use engine::MetricsEngine;
pub use scoring::{BenchmarkBand, ScoreScale};
