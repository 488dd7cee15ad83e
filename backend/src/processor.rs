use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use shared::models::*;
use shared::validation::{normalize_user, validate_removal, validate_vote, VoteKey};
use time::OffsetDateTime;
use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tracing::{debug, error, info, instrument};

use crate::bootstrap::{BootstrapError, BootstrapLoader, BootstrapReport};
use crate::cache::AggregateCache;
use crate::error::VoteError;
use crate::store::{StoreError, VoteRecordStore};

const PAIR_LOCK_STRIPES: usize = 64;

/// Applies vote transitions to the store first and the cache second.
///
/// A (user, word) pair is always handled under the same stripe lock, so two
/// submissions for one pair cannot both see "no prior vote". Writers share
/// `reload_gate`; a reload takes it exclusively so no delta lands between the
/// store read and the cache swap.
pub struct VoteService {
    store: Arc<dyn VoteRecordStore>,
    cache: AggregateCache,
    loader: BootstrapLoader,
    store_timeout: Duration,
    pair_locks: Vec<Mutex<()>>,
    reload_gate: RwLock<()>,
}

impl VoteService {
    /// Builds the service with an empty cache. Call [`VoteService::reload`]
    /// before serving, or use [`VoteService::start`].
    pub fn new(store: Arc<dyn VoteRecordStore>, loader: BootstrapLoader, store_timeout: Duration) -> Self {
        Self {
            store,
            cache: AggregateCache::new(),
            loader,
            store_timeout,
            pair_locks: (0..PAIR_LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
            reload_gate: RwLock::new(()),
        }
    }

    pub async fn start(
        store: Arc<dyn VoteRecordStore>,
        loader: BootstrapLoader,
        store_timeout: Duration,
    ) -> Result<Self, BootstrapError> {
        let service = Self::new(store, loader, store_timeout);
        service.reload().await?;
        Ok(service)
    }

    pub fn cache(&self) -> &AggregateCache {
        &self.cache
    }

    fn pair_lock(&self, key: &VoteKey) -> &Mutex<()> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.pair_locks[(hasher.finish() as usize) % self.pair_locks.len()]
    }

    async fn timed<T>(&self, call: impl Future<Output = Result<T, StoreError>>) -> Result<T, StoreError> {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.store_timeout)),
        }
    }

    /// Writers share the gate; a running reload holds it exclusively. The
    /// wait is bounded by the store timeout like any store call.
    async fn enter_write(&self) -> Result<RwLockReadGuard<'_, ()>, StoreError> {
        tokio::time::timeout(self.store_timeout, self.reload_gate.read())
            .await
            .map_err(|_| StoreError::Timeout(self.store_timeout))
    }

    /// Records `user`'s vote on `word`, replacing any earlier vote. Returns
    /// the normalized word.
    #[instrument(skip(self, user))]
    pub async fn submit_vote(&self, user: &str, word: &str, vote: &str) -> Result<String, VoteError> {
        let (key, choice) = validate_vote(user, word, vote).inspect_err(|e| debug!("Rejected vote: {}", e))?;

        let _gate = self
            .enter_write()
            .await
            .inspect_err(|e| error!("Vote write blocked by reload: {}", e))?;
        let _pair = self.pair_lock(&key).lock().await;

        let prior = self
            .timed(self.store.get(&key.user, &key.word))
            .await
            .inspect_err(|e| error!("Failed to read prior vote: {}", e))?;

        let record = VoteRecord {
            user_id: key.user.clone(),
            word: key.word.clone(),
            choice,
            timestamp: OffsetDateTime::now_utc(),
        };
        self.timed(self.store.put(&record))
            .await
            .inspect_err(|e| error!("Failed to store vote: {}", e))?;

        let old = prior.map(|record| record.choice);
        self.cache.apply_delta(&key.word, old, Some(choice));
        info!("✓ Vote {} on '{}' (was {:?})", choice, key.word, old);

        Ok(key.word)
    }

    /// Deletes `user`'s vote on `word`. Fails with `NotFound` if there was none.
    #[instrument(skip(self, user))]
    pub async fn remove_vote(&self, user: &str, word: &str) -> Result<String, VoteError> {
        let key = validate_removal(user, word).inspect_err(|e| debug!("Rejected removal: {}", e))?;

        let _gate = self
            .enter_write()
            .await
            .inspect_err(|e| error!("Vote write blocked by reload: {}", e))?;
        let _pair = self.pair_lock(&key).lock().await;

        let removed = self
            .timed(self.store.delete(&key.user, &key.word))
            .await
            .inspect_err(|e| error!("Failed to delete vote: {}", e))?;

        let Some(removed) = removed else {
            return Err(VoteError::NotFound { user: key.user, word: key.word });
        };

        self.cache.apply_delta(&key.word, Some(removed.choice), None);
        info!("✓ Removed {} vote on '{}'", removed.choice, key.word);

        Ok(key.word)
    }

    /// Cached counts for every word. With a user, each entry also carries that
    /// user's current vote, read from the store.
    pub async fn read_aggregates(&self, user: Option<&str>) -> Result<Vec<WordVotes>, VoteError> {
        let user = match user.map(str::trim).filter(|u| !u.is_empty()) {
            Some(user) => Some(normalize_user(user)?),
            None => None,
        };

        let own_votes: HashMap<String, Choice> = match &user {
            Some(user) => self
                .timed(self.store.list_for_user(user))
                .await?
                .into_iter()
                .map(|record| (record.word, record.choice))
                .collect(),
            None => HashMap::new(),
        };

        Ok(self
            .cache
            .snapshot()
            .into_iter()
            .map(|entry| WordVotes {
                user_vote: own_votes.get(&entry.word).copied(),
                word: entry.word,
                yes_votes: entry.yes_votes,
                no_votes: entry.no_votes,
            })
            .collect())
    }

    pub fn snapshot(&self) -> Vec<AggregateEntry> {
        self.cache.snapshot()
    }

    /// Rebuilds the cache from the store. Blocks vote writes until done.
    pub async fn reload(&self) -> Result<BootstrapReport, BootstrapError> {
        let _gate = self.reload_gate.write().await;
        self.loader.load(self.store.as_ref(), &self.cache).await
    }
}
