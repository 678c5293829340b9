use crate::roll::Outcome;
use crate::table::OutcomeTable;
use serde::{Deserialize, Serialize};
use std::iter::FromIterator;

/// Pearson chi-square critical values at p = 0.001, indexed by degrees of freedom minus one.
pub const CHI_SQUARE_CRITICAL_001: [f64; 6] = [10.828, 13.816, 16.266, 18.467, 20.515, 22.458];

#[derive(Serialize, Deserialize, PartialEq, Debug, Default, Clone)]
pub struct OutcomeCounts {
    all: [u64; 7],
}

impl OutcomeCounts {
    pub fn add(&mut self, o: Outcome) {
        self.all[o.index()] += 1;
    }

    pub fn count(&self, o: Outcome) -> u64 {
        self.all[o.index()]
    }

    pub fn total(&self) -> u64 {
        self.all.iter().sum()
    }

    pub fn merge(&mut self, other: &OutcomeCounts) {
        for (a, b) in self.all.iter_mut().zip(other.all.iter()) {
            *a += b;
        }
    }

    /// Observed share of each outcome. All zero when nothing was counted.
    pub fn frequencies(&self) -> [f64; 7] {
        let total = self.total();
        let mut f = [0.0; 7];
        if total == 0 {
            return f;
        }
        for (out, c) in f.iter_mut().zip(self.all.iter()) {
            *out = *c as f64 / total as f64;
        }
        f
    }

    /// Observed counts as weights, leaving out outcomes never seen.
    pub fn to_table(&self) -> OutcomeTable {
        OutcomeTable::from_pairs(
            Outcome::all()
                .filter(|o| self.count(*o) > 0)
                .map(|o| (o.value(), self.count(o) as f64)),
        )
    }

    /// Pearson's chi-square statistic of these counts against `expected`, whose weights are
    /// normalized first. Any count on a key `expected` lacks makes the statistic infinite.
    pub fn chi_square(&self, expected: &OutcomeTable) -> f64 {
        let n = self.total() as f64;
        let total_weight = expected.total();
        let mut stat = 0.0;
        for o in Outcome::all() {
            let observed = self.count(o) as f64;
            match expected.get(o.value()) {
                Some(w) if w > 0.0 => {
                    let e = n * w / total_weight;
                    stat += (observed - e).powi(2) / e;
                }
                _ => {
                    if observed > 0.0 {
                        return std::f64::INFINITY;
                    }
                }
            }
        }
        stat
    }
}

impl FromIterator<Outcome> for OutcomeCounts {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        let mut counts = OutcomeCounts::default();
        for o in iter {
            counts.add(o);
        }
        counts
    }
}
