use crate::global::{BASE_TABLE, RENORMALIZED_OUTCOME};
use crate::roll::{Outcome, OutcomeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TableError {
    #[error("table has no outcomes")]
    Empty,
    #[error("outcome {key} has non-positive weight {weight}")]
    NonPositiveWeight { key: u8, weight: f64 },
    #[error("outcome key {0} out of range")]
    KeyOutOfRange(u8),
    #[error("table weights sum to {0}")]
    TotalOverflow(f64),
}

impl From<OutcomeError> for TableError {
    fn from(e: OutcomeError) -> Self {
        match e {
            OutcomeError::OutOfRange(v) => TableError::KeyOutOfRange(v),
        }
    }
}

/// Weights keyed by outcome value. Weights are relative and need not sum to 1.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, Default)]
#[serde(transparent)]
pub struct OutcomeTable(BTreeMap<u8, f64>);

impl OutcomeTable {
    pub fn base() -> Self {
        Self::from_pairs(BASE_TABLE.iter().copied())
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u8, f64)>,
    {
        Self(pairs.into_iter().collect())
    }

    /// The base table with `current` excluded. Excluding the renormalized outcome rescales what is
    /// left to sum to 1; no other exclusion does. A `current` outside the base table excludes
    /// nothing.
    pub fn adjust(current: u8) -> Self {
        let mut table = Self::base();
        table.0.remove(&current);
        if current == RENORMALIZED_OUTCOME {
            let scale = 1.0 / table.total();
            for w in table.0.values_mut() {
                *w *= scale;
            }
        }
        table
    }

    pub fn get(&self, key: u8) -> Option<f64> {
        self.0.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.0.iter().map(|(k, w)| (*k, *w))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Check the table can be drawn from.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.is_empty() {
            return Err(TableError::Empty);
        }
        for (key, weight) in self.iter() {
            Outcome::new(key)?;
            // NaN fails this comparison too
            if !(weight > 0.0 && weight.is_finite()) {
                return Err(TableError::NonPositiveWeight { key, weight });
            }
        }
        let total = self.total();
        if !total.is_finite() {
            return Err(TableError::TotalOverflow(total));
        }
        Ok(())
    }
}
