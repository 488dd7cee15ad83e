use serde::{Serialize, Deserialize};
use crate::models::{AggregateEntry, Choice};

/// Running yes/no counts for one word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub yes: u64,
    pub no: u64,
}

/// Result of applying a vote transition to a [`Tally`].
///
/// `clamped` names the counter that was already zero when a decrement was
/// requested. The counter stays at zero; callers decide how to report it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeltaOutcome {
    pub clamped: Option<Choice>,
}

impl Tally {
    pub const fn new(yes: u64, no: u64) -> Self {
        Self { yes, no }
    }

    pub fn count(&self, choice: Choice) -> u64 {
        match choice {
            Choice::Yes => self.yes,
            Choice::No => self.no,
        }
    }

    pub fn total(&self) -> u64 {
        self.yes + self.no
    }

    fn counter_mut(&mut self, choice: Choice) -> &mut u64 {
        match choice {
            Choice::Yes => &mut self.yes,
            Choice::No => &mut self.no,
        }
    }

    /// Moves one vote from `old` to `new`. Either side may be absent: a first
    /// vote has no `old`, a removal has no `new`. Counters never go below zero.
    pub fn apply(&mut self, old: Option<Choice>, new: Option<Choice>) -> DeltaOutcome {
        let mut outcome = DeltaOutcome::default();

        if let Some(old) = old {
            let counter = self.counter_mut(old);
            match counter.checked_sub(1) {
                Some(decremented) => *counter = decremented,
                None => outcome.clamped = Some(old),
            }
        }

        if let Some(new) = new {
            let counter = self.counter_mut(new);
            *counter = counter.saturating_add(1);
        }

        outcome
    }

    pub fn to_entry(self, word: impl Into<String>) -> AggregateEntry {
        AggregateEntry {
            word: word.into(),
            yes_votes: self.yes,
            no_votes: self.no,
        }
    }
}

impl From<&AggregateEntry> for Tally {
    fn from(entry: &AggregateEntry) -> Self {
        Self::new(entry.yes_votes, entry.no_votes)
    }
}
