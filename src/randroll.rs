use crate::roll::Outcome;
use crate::session::SessionState;
use crate::table::{OutcomeTable, TableError};
use log::trace;
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RollerError {
    #[error("invalid table: {0}")]
    InvalidTable(#[from] TableError),
    #[error("weighted draw failed: {0}")]
    Weights(#[from] WeightedError),
}

/// Draw one outcome from `table`. The chance of key `k` is `weight(k) / table.total()`.
pub fn sample<R>(table: &OutcomeTable, rng: &mut R) -> Result<Outcome, RollerError>
where
    R: Rng + ?Sized,
{
    table.validate()?;
    let keys: Vec<u8> = table.keys().collect();
    let d = WeightedIndex::new(table.iter().map(|(_, w)| w))?;
    let key = keys[d.sample(rng)];
    Outcome::new(key).map_err(|e| TableError::from(e).into())
}

/// Draws outcomes for sessions from an injected random source.
#[derive(Debug)]
pub struct Roller<R> {
    rng: R,
}

impl Roller<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Roller::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Roller::new(StdRng::from_entropy())
    }
}

impl<R> Roller<R>
where
    R: Rng,
{
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn sample(&mut self, table: &OutcomeTable) -> Result<Outcome, RollerError> {
        sample(table, &mut self.rng)
    }

    pub fn draw_many(
        &mut self,
        table: &OutcomeTable,
        count: usize,
    ) -> Result<Vec<Outcome>, RollerError> {
        table.validate()?;
        (0..count).map(|_| self.sample(table)).collect()
    }

    /// First draw of a session, from the unadjusted table.
    pub fn start(&mut self) -> Result<SessionState, RollerError> {
        let current = self.sample(&OutcomeTable::base())?;
        trace!("Session starts at {}", current);
        Ok(SessionState::new(current))
    }

    /// The re-roll action: redraw with the current outcome excluded.
    pub fn reroll(&mut self, state: SessionState) -> Result<SessionState, RollerError> {
        let table = OutcomeTable::adjust(state.current().value());
        let next = self.sample(&table)?;
        trace!("Reroll {} -> {}", state.current(), next);
        Ok(state.advance(next))
    }
}

#[cfg(test)]
mod tests {
    use super::{sample, Roller, RollerError};
    use crate::rollcounts::{OutcomeCounts, CHI_SQUARE_CRITICAL_001};
    use crate::roll::Outcome;
    use crate::session::SessionState;
    use crate::table::{OutcomeTable, TableError};
    use rand::rngs::mock::StepRng;

    #[test]
    fn always_same() {
        let t = OutcomeTable::from_pairs(vec![(4, 0.5)]);
        let mut r = Roller::seeded(1);
        for _ in 0..1000 {
            assert_eq!(r.sample(&t).unwrap(), Outcome::new(4).unwrap());
        }
    }

    #[test]
    fn zero_source_picks_first_key() {
        let t = OutcomeTable::from_pairs(vec![(2, 1.0), (5, 1.0), (6, 3.0)]);
        let mut rng = StepRng::new(0, 0);
        for _ in 0..100 {
            assert_eq!(sample(&t, &mut rng).unwrap(), Outcome::new(2).unwrap());
        }
    }

    #[test]
    fn always_valid() {
        let t = OutcomeTable::base();
        let mut r = Roller::from_entropy();
        for _ in 0..1000 {
            let o = r.sample(&t).unwrap();
            assert!(t.get(o.value()).is_some());
        }
    }

    #[test]
    fn invalid_tables() {
        let mut r = Roller::seeded(1);
        assert_eq!(
            r.sample(&OutcomeTable::default()),
            Err(RollerError::InvalidTable(TableError::Empty))
        );
        assert_eq!(
            r.sample(&OutcomeTable::from_pairs(vec![(1, 1.0), (3, 0.0)])),
            Err(RollerError::InvalidTable(TableError::NonPositiveWeight {
                key: 3,
                weight: 0.0
            }))
        );
        assert_eq!(
            r.sample(&OutcomeTable::from_pairs(vec![(1, 1e308), (2, 1e308)])),
            Err(RollerError::InvalidTable(TableError::TotalOverflow(
                std::f64::INFINITY
            )))
        );
        assert_eq!(
            r.draw_many(&OutcomeTable::from_pairs(vec![(9, 1.0)]), 0),
            Err(RollerError::InvalidTable(TableError::KeyOutOfRange(9)))
        );
    }

    #[test]
    fn seeded_is_reproducible() {
        let t = OutcomeTable::base();
        let a = Roller::seeded(42).draw_many(&t, 200).unwrap();
        let b = Roller::seeded(42).draw_many(&t, 200).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn fair_coin_chi_square() {
        let t = OutcomeTable::from_pairs(vec![(1, 1.0), (2, 1.0)]);
        let draws = Roller::seeded(7).draw_many(&t, 100_000).unwrap();
        let counts: OutcomeCounts = draws.into_iter().collect();
        assert_eq!(counts.total(), 100_000);
        let stat = counts.chi_square(&t);
        assert!(stat < CHI_SQUARE_CRITICAL_001[0], "chi-square {}", stat);
    }

    #[test]
    fn unnormalized_weights_chi_square() {
        // weights 1:3 behave like 0.25:0.75
        let t = OutcomeTable::from_pairs(vec![(6, 1.0), (7, 3.0)]);
        let draws = Roller::seeded(11).draw_many(&t, 100_000).unwrap();
        let counts: OutcomeCounts = draws.into_iter().collect();
        let stat = counts.chi_square(&OutcomeTable::from_pairs(vec![(6, 0.25), (7, 0.75)]));
        assert!(stat < CHI_SQUARE_CRITICAL_001[0], "chi-square {}", stat);
    }

    #[test]
    fn reroll_from_three_never_three() {
        let mut r = Roller::seeded(3);
        let three = Outcome::new(3).unwrap();
        let mut counts = OutcomeCounts::default();
        for _ in 0..60_000 {
            let s = r.reroll(SessionState::new(three)).unwrap();
            assert_eq!(s.previous(), Some(three));
            assert_ne!(s.current(), three);
            counts.add(s.current());
        }
        assert_eq!(counts.count(three), 0);
        // 6 outcomes, 5 degrees of freedom
        let stat = counts.chi_square(&OutcomeTable::adjust(3));
        assert!(stat < CHI_SQUARE_CRITICAL_001[4], "chi-square {}", stat);
    }

    #[test]
    fn reroll_never_repeats() {
        let mut r = Roller::seeded(5);
        let mut s = r.start().unwrap();
        assert_eq!(s.previous(), None);
        for _ in 0..5000 {
            let before = s.current();
            s = r.reroll(s).unwrap();
            assert_eq!(s.previous(), Some(before));
            assert_ne!(s.current(), before);
        }
    }
}
