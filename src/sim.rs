use crate::randroll::{Roller, RollerError};
use crate::roll::Outcome;
use crate::rollcounts::OutcomeCounts;
use log::debug;
use rayon::prelude::*;
use serde::Serialize;

/// Every outcome one session showed as current: the opening draw, then one per re-roll.
pub type History = Vec<Outcome>;

/// Run independent sessions in parallel. With a `seed`, session `i` draws from a roller seeded
/// with `seed + i` and the whole run is reproducible.
pub fn run_sessions(
    num_sessions: u32,
    num_rerolls: u32,
    seed: Option<u64>,
) -> Result<Vec<History>, RollerError> {
    debug!(
        "Simulating {} sessions of {} rerolls (seed {:?})",
        num_sessions, num_rerolls, seed
    );
    (0..num_sessions)
        .into_par_iter()
        .map(|i| -> Result<History, RollerError> {
            let mut roller = match seed {
                Some(s) => Roller::seeded(s.wrapping_add(i as u64)),
                None => Roller::from_entropy(),
            };
            let mut state = roller.start()?;
            let mut history = Vec::with_capacity(num_rerolls as usize + 1);
            history.push(state.current());
            for _ in 0..num_rerolls {
                state = roller.reroll(state)?;
                history.push(state.current());
            }
            Ok(history)
        })
        .collect()
}

/// Tally of every re-rolled outcome. Opening draws are left out since they come from a different
/// table.
pub fn outcome_counts(histories: &[History]) -> OutcomeCounts {
    histories
        .iter()
        .flat_map(|h| h.iter().skip(1).copied())
        .collect()
}

/// `m[a][b]` counts re-rolls from outcome `a + 1` to outcome `b + 1`.
#[derive(Serialize, Debug, Default, PartialEq)]
pub struct TransitionCounts(pub [[u64; 7]; 7]);

pub fn transition_counts(histories: &[History]) -> TransitionCounts {
    let mut m = TransitionCounts::default();
    for h in histories {
        for w in h.windows(2) {
            m.0[w[0].index()][w[1].index()] += 1;
        }
    }
    m
}

/// Re-rolls each session needed before first showing the max outcome. `Some(0)` if it opened at
/// the max, `None` if it never got there.
pub fn rerolls_to_max(histories: &[History]) -> Vec<Option<u32>> {
    histories
        .iter()
        .map(|h| h.iter().position(|o| o.is_max()).map(|p| p as u32))
        .collect()
}

// (Copied from nightly-only rust https://doc.rust-lang.org/test/stats/trait.Stats.html)
// Helper function: extract a value representing the `pct` percentile of a sorted sample-set, using
// linear interpolation. If samples are not sorted, return nonsensical value.
pub fn percentile_of_sorted(sorted_samples: &[u32], pct: u8) -> u32 {
    assert!(!sorted_samples.is_empty());
    if sorted_samples.len() == 1 {
        return sorted_samples[0];
    }
    assert!(pct <= 100);
    if pct == 100 {
        return sorted_samples[sorted_samples.len() - 1];
    }
    let length = (sorted_samples.len() - 1) as f32;
    let rank = (pct as f32 / 100.0) * length;
    let lrank = rank.floor();
    let d = rank - lrank;
    let n = lrank as usize;
    let lo = sorted_samples[n];
    let hi = sorted_samples[n + 1];
    (lo as f32 + ((hi - lo) as f32 * d)) as u32
}
