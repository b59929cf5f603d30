use analysis_core::arithmetic::finite;
use analysis_core::{InsiderTransaction, InsiderWindow, MetricsError, TransactionType};
use chrono::{Duration, NaiveDate};

use super::{CalculatorInput, MetricCalculator, RawMetric, RawMetrics};
use crate::catalog::ids;

/// Net insider buying and selling in the configured window
pub struct InsiderCalculator;

/// Transactions inside `window`, most recent first. Nothing dated after
/// `as_of` is ever included.
pub fn select_window(
    transactions: &[InsiderTransaction],
    window: InsiderWindow,
    as_of: NaiveDate,
) -> Vec<&InsiderTransaction> {
    let mut eligible: Vec<&InsiderTransaction> = transactions
        .iter()
        .filter(|t| t.transaction_date <= as_of)
        .collect();
    eligible.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));

    match window {
        InsiderWindow::LastTransactions(n) => eligible.into_iter().take(n).collect(),
        InsiderWindow::LastDays(days) => {
            // A window reaching past the earliest representable date has no lower bound
            let start = Duration::try_days(days).and_then(|span| as_of.checked_sub_signed(span));
            eligible
                .into_iter()
                .filter(|t| start.map_or(true, |start| t.transaction_date > start))
                .collect()
        }
    }
}

fn signed(t: &InsiderTransaction) -> f64 {
    match t.acquisition_or_disposal {
        TransactionType::Acquisition => 1.0,
        TransactionType::Disposal => -1.0,
    }
}

impl MetricCalculator for InsiderCalculator {
    fn name(&self) -> &'static str {
        "insider"
    }

    fn metric_ids(&self) -> &'static [&'static str] {
        &[ids::INSIDER_NET_SHARES, ids::INSIDER_NET_VALUE, ids::INSIDER_BULLISHNESS]
    }

    fn compute(&self, input: &CalculatorInput<'_>) -> Result<RawMetrics, MetricsError> {
        let window = input.config.insider_window;
        let selected = select_window(&input.history.insider_transactions, window, input.as_of);

        let mut metrics = RawMetrics::new();
        if selected.is_empty() {
            let reason = format!("no insider transactions in the {}", window);
            for id in self.metric_ids() {
                metrics.insert(*id, RawMetric::unknown(reason.clone()));
            }
            return Ok(metrics);
        }

        let net_shares: f64 = selected.iter().map(|t| signed(t) * t.shares).sum();
        let net_value: f64 = selected.iter().map(|t| signed(t) * t.shares * t.share_price).sum();
        let acquisitions = selected
            .iter()
            .filter(|t| t.acquisition_or_disposal == TransactionType::Acquisition)
            .count();

        metrics.insert(ids::INSIDER_NET_SHARES, RawMetric::new(finite(Some(net_shares)), 1.0));
        metrics.insert(ids::INSIDER_NET_VALUE, RawMetric::new(finite(Some(net_value)), 1.0));
        metrics.insert(
            ids::INSIDER_BULLISHNESS,
            RawMetric::new(Some(acquisitions as f64 / selected.len() as f64), 1.0),
        );
        Ok(metrics)
    }
}
