use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use shared::tally::Tally;
use shared::validation::normalize_word;
use thiserror::Error;
use tracing::{debug, info};

use crate::cache::AggregateCache;
use crate::store::{StoreError, VoteRecordStore};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Failed to aggregate stored votes: {0}")]
    Store(#[from] StoreError),
    #[error("Failed to read seed list {path}: {source}")]
    SeedList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapReport {
    pub entries: usize,
    pub records: u64,
}

/// Rebuilds the aggregate cache from the vote store.
///
/// Seed words, and words the cache already holds, get a zero entry even when
/// no stored vote references them.
#[derive(Debug, Clone, Default)]
pub struct BootstrapLoader {
    seed_words: Vec<String>,
}

impl BootstrapLoader {
    pub fn new(seed_words: impl IntoIterator<Item = String>) -> Self {
        Self {
            seed_words: seed_words.into_iter().collect(),
        }
    }

    /// One word per line; blank lines and over-long words are skipped.
    pub fn parse_seed_list(text: &str) -> Vec<String> {
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match normalize_word(line) {
                Ok(word) => Some(word),
                Err(e) => {
                    debug!("Skipping seed entry {:?}: {}", line, e);
                    None
                }
            })
            .collect()
    }

    pub async fn from_seed_file(path: Option<&Path>) -> Result<Self, BootstrapError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| BootstrapError::SeedList {
                path: path.to_path_buf(),
                source,
            })?;

        let seed_words = Self::parse_seed_list(&text);
        info!("🌱 Loaded {} seed words from {}", seed_words.len(), path.display());
        Ok(Self { seed_words })
    }

    pub fn seed_words(&self) -> &[String] {
        &self.seed_words
    }

    /// Queries the store, builds the full map, then swaps it into `cache`.
    /// On error the cache is left exactly as it was.
    pub async fn load(
        &self,
        store: &dyn VoteRecordStore,
        cache: &AggregateCache,
    ) -> Result<BootstrapReport, BootstrapError> {
        let aggregates = store.aggregate_all().await?;

        // Words already cached stay as zero entries even once their last
        // vote is gone.
        let mut entries: BTreeMap<String, Tally> = self
            .seed_words
            .iter()
            .cloned()
            .chain(cache.words())
            .map(|word| (word, Tally::default()))
            .collect();

        let mut records = 0;
        for aggregate in &aggregates {
            records += aggregate.total();
            entries.insert(aggregate.word.clone(), Tally::from(aggregate));
        }

        let report = BootstrapReport {
            entries: entries.len(),
            records,
        };
        cache.replace(entries);

        info!("📦 Aggregate cache loaded: {} words from {} votes", report.entries, report.records);
        Ok(report)
    }
}
