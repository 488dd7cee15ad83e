use std::fmt;
use crate::models::Choice;

pub const MAX_USER_LENGTH: usize = 100;
pub const MAX_WORD_LENGTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    User,
    Word,
    Vote,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::User => "user",
            Field::Word => "word",
            Field::Vote => "vote",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing {0}")]
    Missing(Field),
    #[error("{0} exceeds maximum length of {1}")]
    TooLong(Field, usize),
    #[error("Invalid vote {0:?} (must be yes or no)")]
    InvalidChoice(String),
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Missing(field) | ValidationError::TooLong(field, _) => *field,
            ValidationError::InvalidChoice(_) => Field::Vote,
        }
    }
}

/// A validated (user, word) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoteKey {
    pub user: String,
    pub word: String,
}

fn check_length(field: Field, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong(field, max));
    }
    Ok(())
}

/// Trims and lowercases a word so `" Cromulent"` and `"cromulent"` share a tally.
pub fn normalize_word(raw: &str) -> Result<String, ValidationError> {
    let word = raw.trim().to_lowercase();
    if word.is_empty() { return Err(ValidationError::Missing(Field::Word)); }
    check_length(Field::Word, &word, MAX_WORD_LENGTH)?;
    Ok(word)
}

/// User identifiers are opaque; only surrounding whitespace is stripped.
pub fn normalize_user(raw: &str) -> Result<String, ValidationError> {
    let user = raw.trim();
    if user.is_empty() { return Err(ValidationError::Missing(Field::User)); }
    check_length(Field::User, user, MAX_USER_LENGTH)?;
    Ok(user.to_string())
}

pub fn parse_choice(raw: &str) -> Result<Choice, ValidationError> {
    let vote = raw.trim();
    if vote.is_empty() { return Err(ValidationError::Missing(Field::Vote)); }
    if vote.eq_ignore_ascii_case("yes") {
        Ok(Choice::Yes)
    } else if vote.eq_ignore_ascii_case("no") {
        Ok(Choice::No)
    } else {
        Err(ValidationError::InvalidChoice(vote.to_string()))
    }
}

pub fn validate_vote(user: &str, word: &str, vote: &str) -> Result<(VoteKey, Choice), ValidationError> {
    let word = normalize_word(word)?;
    let choice = parse_choice(vote)?;
    let user = normalize_user(user)?;
    Ok((VoteKey { user, word }, choice))
}

pub fn validate_removal(user: &str, word: &str) -> Result<VoteKey, ValidationError> {
    let word = normalize_word(word)?;
    let user = normalize_user(user)?;
    Ok(VoteKey { user, word })
}
