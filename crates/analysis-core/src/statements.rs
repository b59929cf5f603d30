//! Statement normalizer: turns a statement history into per-field series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::MetricsError;
use crate::types::{Field, PeriodKind, StatementHistory};

/// One position of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub fiscal_date: Option<NaiveDate>,
    pub value: Option<f64>,
}

/// Values of one field across periods, most-recent-first, one point per period.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Series {
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Value at a position; position 0 is the current period.
    pub fn at(&self, position: usize) -> Option<f64> {
        self.points.get(position).and_then(|p| p.value)
    }

    pub fn latest(&self) -> Option<f64> {
        self.at(0)
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.points.first().and_then(|p| p.fiscal_date)
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// First `n` values.
    pub fn head(&self, n: usize) -> Vec<Option<f64>> {
        self.points.iter().take(n).map(|p| p.value).collect()
    }

    pub fn known_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }

    /// Position of the period ending on `date`.
    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        self.points.iter().position(|p| p.fiscal_date == Some(date))
    }

    /// Value of the period ending on `date`.
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.position_of(date).and_then(|i| self.at(i))
    }
}

impl StatementHistory {
    /// Extract one field as a series.
    ///
    /// Fails with [`MetricsError::FieldNotInSchema`] when `field` belongs to a
    /// different statement. Periods without a fiscal date keep their position
    /// but contribute an unknown value.
    pub fn series(&self, field: Field, period_kind: PeriodKind) -> Result<Series, MetricsError> {
        if field.statement() != self.kind {
            return Err(MetricsError::FieldNotInSchema {
                field,
                statement: self.kind,
            });
        }

        let points = self
            .periods(period_kind)
            .iter()
            .enumerate()
            .map(|(position, period)| match period.fiscal_date_ending {
                Some(date) => SeriesPoint {
                    fiscal_date: Some(date),
                    value: period.get(field),
                },
                None => {
                    let missing = MetricsError::MissingInput {
                        field: "fiscal_date_ending".to_string(),
                        position,
                    };
                    tracing::debug!("{} ({} {:?}): {}", self.kind, field, period_kind, missing);
                    SeriesPoint {
                        fiscal_date: None,
                        value: None,
                    }
                }
            })
            .collect();

        Ok(Series { points })
    }
}
