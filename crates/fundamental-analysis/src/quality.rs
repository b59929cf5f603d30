//! Data quality annotations: freshness of the statements and the share of
//! the report that resolved to known values.

use analysis_core::{Freshness, FreshnessBand, MetricResult, TickerHistory};
use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::catalog::MetricDefinition;
use crate::scoring::{BenchmarkBand, ScoreScale};

/// Age of the most recent fiscal period across every statement and period kind.
pub fn freshness(
    history: &TickerHistory,
    as_of: NaiveDate,
    band: &BenchmarkBand,
    scale: &ScoreScale,
) -> Freshness {
    let Some(latest) = history.latest_fiscal_date() else {
        return Freshness {
            latest_fiscal_date: None,
            age_days: None,
            score: None,
            band: None,
        };
    };

    let age_days = (as_of - latest).num_days();
    let score = band.normalize(age_days as f64, scale);
    let freshness_band = if score >= scale.mid {
        FreshnessBand::Current
    } else if score > scale.min {
        FreshnessBand::Acceptable
    } else {
        FreshnessBand::Stale
    };

    Freshness {
        latest_fiscal_date: Some(latest),
        age_days: Some(age_days),
        score: Some(score),
        band: Some(freshness_band),
    }
}

/// Summary of how much of a report is known
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coverage {
    /// Catalog-weighted share of known metrics, 0 to 100
    pub percent: f64,
    pub known: usize,
    pub total: usize,
}

/// Weighted share of emitted metrics (composites included) that are known.
///
/// Unknown metrics count as missing signal, never as a zero value.
pub fn coverage(metrics: &BTreeMap<String, MetricResult>, catalog: &[MetricDefinition]) -> Coverage {
    let weight_of = |id: &str| {
        catalog
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.weight)
            .unwrap_or(1.0)
    };

    let (known_weight, total_weight) = metrics.values().fold((0.0, 0.0), |(known, total), m| {
        let w = weight_of(&m.id);
        (if m.is_known() { known + w } else { known }, total + w)
    });
    let known = metrics.values().filter(|m| m.is_known()).count();

    let percent = if total_weight > 0.0 {
        known_weight / total_weight * 100.0
    } else {
        0.0
    };

    Coverage {
        percent,
        known,
        total: metrics.len(),
    }
}
