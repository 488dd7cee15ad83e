use serde::{Serialize, Deserialize};
use std::fmt;
use time::OffsetDateTime;

/// A single yes/no vote. Persisted as `1` for yes and `0` for no.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(sqlx::Type))]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum Choice {
    No = 0,
    Yes = 1,
}

impl Choice {
    pub const fn as_str(self) -> &'static str {
        match self {
            Choice::Yes => "yes",
            Choice::No => "no",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The current vote of one user on one word. At most one exists per pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub user_id: String,
    pub word: String,
    pub choice: Choice,
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AggregateEntry {
    pub word: String,
    pub yes_votes: u64,
    pub no_votes: u64,
}

impl AggregateEntry {
    pub fn total(&self) -> u64 {
        self.yes_votes + self.no_votes
    }
}

/// Aggregate counts for a word, joined with the requesting user's own vote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WordVotes {
    pub word: String,
    pub yes_votes: u64,
    pub no_votes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_vote: Option<Choice>,
}

// Fields default to empty so a missing field is reported by validation
// instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub vote: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub status: String,
    pub word: String,
    pub message: String,
}

impl VoteResponse {
    pub fn recorded(word: impl Into<String>) -> Self {
        let word = word.into();
        Self {
            status: "success".into(),
            message: format!("Vote for '{}' recorded", word),
            word,
        }
    }

    pub fn removed(word: impl Into<String>) -> Self {
        let word = word.into();
        Self {
            status: "success".into(),
            message: format!("Vote for '{}' removed", word),
            word,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReloadResponse {
    pub entries: usize,
    pub records: u64,
    pub clamp_events: u64,
}
