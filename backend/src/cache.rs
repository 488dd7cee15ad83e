//! In-memory aggregate counts per word.
//!
//! Derived entirely from the vote store: rebuilt in one swap by the bootstrap
//! loader, then kept current by `apply_delta` after each committed write.
//! Entries are never removed; a word that loses its last vote keeps a zero
//! entry until the next rebuild.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use shared::models::{AggregateEntry, Choice};
use shared::tally::{DeltaOutcome, Tally};
use tracing::warn;

#[derive(Debug, Default)]
pub struct AggregateCache {
    entries: RwLock<BTreeMap<String, Tally>>,
    clamp_events: AtomicU64,
}

impl AggregateCache {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic mid-update cannot leave a Tally half-written, so a poisoned
    // lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Tally>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Tally>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves one vote on `word` from `old` to `new`, creating the entry if
    /// needed. A decrement of a zero counter is clamped, counted and logged.
    pub fn apply_delta(&self, word: &str, old: Option<Choice>, new: Option<Choice>) -> DeltaOutcome {
        let outcome = {
            let mut entries = self.write();
            entries.entry(word.to_string()).or_default().apply(old, new)
        };

        if let Some(counter) = outcome.clamped {
            self.clamp_events.fetch_add(1, Ordering::Relaxed);
            warn!(word, counter = %counter, "Vote counter already at zero; clamped");
        }

        outcome
    }

    /// All entries ordered by word.
    pub fn snapshot(&self) -> Vec<AggregateEntry> {
        self.read()
            .iter()
            .map(|(word, tally)| tally.to_entry(word.as_str()))
            .collect()
    }

    pub fn get(&self, word: &str) -> Option<Tally> {
        self.read().get(word).copied()
    }

    pub fn words(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Swaps in a fully built map. Readers see either the old or the new one.
    pub fn replace(&self, entries: BTreeMap<String, Tally>) {
        *self.write() = entries;
    }

    pub fn clamp_events(&self) -> u64 {
        self.clamp_events.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_vote_creates_entry() {
        let cache = AggregateCache::new();
        assert!(cache.get("cromulent").is_none());

        cache.apply_delta("cromulent", None, Some(Choice::Yes));
        assert_eq!(cache.get("cromulent"), Some(Tally::new(1, 0)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn removal_keeps_zero_entry() {
        let cache = AggregateCache::new();
        cache.apply_delta("cromulent", None, Some(Choice::No));
        cache.apply_delta("cromulent", Some(Choice::No), None);

        assert_eq!(cache.snapshot(), vec![AggregateEntry {
            word: "cromulent".into(),
            yes_votes: 0,
            no_votes: 0,
        }]);
    }

    #[test]
    fn duplicate_decrements_are_clamped_and_counted() {
        let cache = AggregateCache::new();
        cache.apply_delta("embiggen", None, Some(Choice::Yes));
        cache.apply_delta("embiggen", Some(Choice::Yes), None);
        let outcome = cache.apply_delta("embiggen", Some(Choice::Yes), None);

        assert_eq!(outcome.clamped, Some(Choice::Yes));
        assert_eq!(cache.get("embiggen"), Some(Tally::new(0, 0)));
        assert_eq!(cache.clamp_events(), 1);
    }

    #[test]
    fn snapshot_is_ordered_by_word() {
        let cache = AggregateCache::new();
        for word in ["zebra", "apple", "mango"] {
            cache.apply_delta(word, None, Some(Choice::Yes));
        }
        let words: Vec<_> = cache.snapshot().into_iter().map(|e| e.word).collect();
        assert_eq!(words, ["apple", "mango", "zebra"]);
    }

    #[test]
    fn replace_discards_previous_entries() {
        let cache = AggregateCache::new();
        cache.apply_delta("stale", None, Some(Choice::No));

        let mut fresh = BTreeMap::new();
        fresh.insert("fresh".to_string(), Tally::new(2, 1));
        cache.replace(fresh);

        assert!(cache.get("stale").is_none());
        assert_eq!(cache.get("fresh"), Some(Tally::new(2, 1)));
    }
}
