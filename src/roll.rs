use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum OutcomeError {
    #[error("val {0} out of range")]
    OutOfRange(u8),
}

/// One of the seven potential slot values.
#[derive(Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Debug)]
#[serde(try_from = "u8", into = "u8")]
pub struct Outcome(u8);

impl Outcome {
    pub const MIN: Outcome = Outcome(1);
    pub const MAX: Outcome = Outcome(7);

    pub fn new(value: u8) -> Result<Self, OutcomeError> {
        if value < Self::MIN.0 || value > Self::MAX.0 {
            Err(OutcomeError::OutOfRange(value))
        } else {
            Ok(Self(value))
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).and_then(|d| Self::new(d as u8).ok())
    }

    pub fn all() -> impl Iterator<Item = Outcome> {
        (Self::MIN.0..=Self::MAX.0).map(Outcome)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Zero-based position, for array-backed tallies.
    pub(crate) fn index(self) -> usize {
        (self.0 - Self::MIN.0) as usize
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }
}

impl TryFrom<u8> for Outcome {
    type Error = OutcomeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Outcome::new(value)
    }
}

impl From<Outcome> for u8 {
    fn from(o: Outcome) -> u8 {
        o.0
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "Outcome<{}>", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Outcome;
    use super::OutcomeError;

    #[test]
    fn new_ok() {
        for v in 1..=7 {
            let o = Outcome::new(v);
            assert!(o.is_ok());
            assert_eq!(o.unwrap().value(), v);
        }
    }

    #[test]
    fn new_err_oor() {
        for v in [0, 8, 10, 100, 255].iter() {
            let o = Outcome::new(*v);
            assert_eq!(o.unwrap_err(), OutcomeError::OutOfRange(*v));
        }
    }

    #[test]
    fn from_char() {
        assert_eq!(Outcome::from_char('1'), Some(Outcome::MIN));
        assert_eq!(Outcome::from_char('7'), Some(Outcome::MAX));
        for c in ['0', '8', '9', 'a', ' ', ','].iter() {
            assert_eq!(Outcome::from_char(*c), None);
        }
    }

    #[test]
    fn all_in_order() {
        let v: Vec<u8> = Outcome::all().map(|o| o.value()).collect();
        assert_eq!(v, vec![1, 2, 3, 4, 5, 6, 7]);
        let idx: Vec<usize> = Outcome::all().map(|o| o.index()).collect();
        assert_eq!(idx, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn max() {
        for o in Outcome::all() {
            assert_eq!(o.is_max(), o.value() == 7);
        }
    }

    #[test]
    fn serde_bare_integer() {
        let o = Outcome::new(5).unwrap();
        assert_eq!(serde_json::to_string(&o).unwrap(), "5");
        assert_eq!(serde_json::from_str::<Outcome>("5").unwrap(), o);
        assert!(serde_json::from_str::<Outcome>("0").is_err());
        assert!(serde_json::from_str::<Outcome>("8").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Outcome::new(3).unwrap().to_string(), "Outcome<3>");
    }
}
