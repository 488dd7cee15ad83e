//! Vote record storage: the source of truth for who voted what.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rocket::async_trait;
use shared::models::*;
use shared::tally::Tally;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Vote store unavailable: {0}")]
    Unavailable(String),
    #[error("Vote store call timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    pub fn unavailable(err: impl Display) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Durable storage of the single current vote per (user, word).
#[async_trait]
pub trait VoteRecordStore: Send + Sync {
    async fn get(&self, user: &str, word: &str) -> Result<Option<VoteRecord>, StoreError>;

    /// Insert-or-replace keyed on (user, word). Safe to retry.
    async fn put(&self, record: &VoteRecord) -> Result<(), StoreError>;

    /// Removes the record and returns it, or `None` if there was none.
    async fn delete(&self, user: &str, word: &str) -> Result<Option<VoteRecord>, StoreError>;

    /// Yes/no counts per word, computed in one consistent read.
    async fn aggregate_all(&self) -> Result<Vec<AggregateEntry>, StoreError>;

    async fn list_for_user(&self, user: &str) -> Result<Vec<VoteRecord>, StoreError>;
}

type PairKey = (String, String);

/// Mutex-guarded map store for tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryVoteStore {
    records: Mutex<HashMap<PairKey, VoteRecord>>,
    unavailable: AtomicBool,
    latency: Option<Duration>,
}

impl MemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `latency` before touching the map.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// While set, every call fails with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn ready(&self) -> Result<(), StoreError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".into()));
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<PairKey, VoteRecord>>, StoreError> {
        self.records.lock().map_err(StoreError::unavailable)
    }
}

#[async_trait]
impl VoteRecordStore for MemoryVoteStore {
    async fn get(&self, user: &str, word: &str) -> Result<Option<VoteRecord>, StoreError> {
        self.ready().await?;
        let records = self.lock()?;
        Ok(records.get(&(user.to_string(), word.to_string())).cloned())
    }

    async fn put(&self, record: &VoteRecord) -> Result<(), StoreError> {
        self.ready().await?;
        let mut records = self.lock()?;
        records.insert((record.user_id.clone(), record.word.clone()), record.clone());
        Ok(())
    }

    async fn delete(&self, user: &str, word: &str) -> Result<Option<VoteRecord>, StoreError> {
        self.ready().await?;
        let mut records = self.lock()?;
        Ok(records.remove(&(user.to_string(), word.to_string())))
    }

    async fn aggregate_all(&self) -> Result<Vec<AggregateEntry>, StoreError> {
        self.ready().await?;
        let records = self.lock()?;
        let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
        for record in records.values() {
            tallies.entry(record.word.as_str()).or_default().apply(None, Some(record.choice));
        }
        Ok(tallies
            .into_iter()
            .map(|(word, tally)| tally.to_entry(word))
            .collect())
    }

    async fn list_for_user(&self, user: &str) -> Result<Vec<VoteRecord>, StoreError> {
        self.ready().await?;
        let records = self.lock()?;
        let mut votes: Vec<VoteRecord> = records
            .values()
            .filter(|record| record.user_id == user)
            .cloned()
            .collect();
        votes.sort_by(|a, b| a.word.cmp(&b.word));
        Ok(votes)
    }
}
