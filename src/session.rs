use crate::roll::Outcome;
use serde::{Deserialize, Serialize};

/// What one user sees: the outcome before the last re-roll and the one after it.
///
/// `previous` is empty until the first re-roll. Each session owns its own state; nothing here is
/// shared between sessions.
#[derive(Serialize, Deserialize, PartialEq, Copy, Clone, Debug)]
pub struct SessionState {
    previous: Option<Outcome>,
    current: Outcome,
}

impl SessionState {
    pub fn new(current: Outcome) -> Self {
        Self {
            previous: None,
            current,
        }
    }

    pub fn previous(&self) -> Option<Outcome> {
        self.previous
    }

    pub fn current(&self) -> Outcome {
        self.current
    }

    /// The outcome to show as "previous". Before any re-roll this is the current outcome.
    pub fn displayed_previous(&self) -> Outcome {
        self.previous.unwrap_or(self.current)
    }

    #[must_use]
    pub fn advance(self, next: Outcome) -> Self {
        Self {
            previous: Some(self.current),
            current: next,
        }
    }

    pub fn is_max(&self) -> bool {
        self.current.is_max()
    }
}

#[cfg(test)]
mod tests {
    use super::SessionState;
    use crate::roll::Outcome;

    fn o(v: u8) -> Outcome {
        Outcome::new(v).unwrap()
    }

    #[test]
    fn first_render_shows_current_twice() {
        let s = SessionState::new(o(4));
        assert_eq!(s.previous(), None);
        assert_eq!(s.displayed_previous(), o(4));
        assert_eq!(s.current(), o(4));
    }

    #[test]
    fn advance_shifts() {
        let s = SessionState::new(o(3)).advance(o(6));
        assert_eq!(s.previous(), Some(o(3)));
        assert_eq!(s.displayed_previous(), o(3));
        assert_eq!(s.current(), o(6));
        let s = s.advance(o(7));
        assert_eq!(s.previous(), Some(o(6)));
        assert!(s.is_max());
    }

    #[test]
    fn serde() {
        let s = SessionState::new(o(2)).advance(o(5));
        let j = serde_json::to_string(&s).unwrap();
        assert_eq!(j, r#"{"previous":2,"current":5}"#);
        assert_eq!(serde_json::from_str::<SessionState>(&j).unwrap(), s);
        let fresh: SessionState = serde_json::from_str(r#"{"previous":null,"current":1}"#).unwrap();
        assert_eq!(fresh, SessionState::new(o(1)));
    }
}
