#[cfg(test)]
mod tests {
    use crate::models::{AggregateEntry, Choice, VoteRequest, VoteResponse, WordVotes};
    use crate::tally::{DeltaOutcome, Tally};
    use crate::validation::*;

    #[test]
    fn test_choice_parsing() {
        assert_eq!(parse_choice("yes"), Ok(Choice::Yes));
        assert_eq!(parse_choice(" NO "), Ok(Choice::No));
        assert_eq!(parse_choice(""), Err(ValidationError::Missing(Field::Vote)));
        assert!(matches!(
            parse_choice("maybe"),
            Err(ValidationError::InvalidChoice(ref v)) if v == "maybe"
        ));
    }

    #[test]
    fn test_word_normalization() {
        assert_eq!(normalize_word("  Cromulent \n").unwrap(), "cromulent");
        assert_eq!(normalize_word("   "), Err(ValidationError::Missing(Field::Word)));

        let long = "a".repeat(MAX_WORD_LENGTH + 1);
        assert_eq!(normalize_word(&long), Err(ValidationError::TooLong(Field::Word, MAX_WORD_LENGTH)));
        assert!(normalize_word(&"a".repeat(MAX_WORD_LENGTH)).is_ok());
    }

    #[test]
    fn test_user_is_opaque() {
        assert_eq!(normalize_user(" Alice-42 ").unwrap(), "Alice-42");
        assert_eq!(normalize_user(""), Err(ValidationError::Missing(Field::User)));
    }

    #[test]
    fn test_validation_names_offending_field() {
        let err = validate_vote("alice", "", "yes").unwrap_err();
        assert_eq!(err.field(), Field::Word);

        let err = validate_vote("alice", "cromulent", "perhaps").unwrap_err();
        assert_eq!(err.field(), Field::Vote);

        let err = validate_vote("  ", "cromulent", "no").unwrap_err();
        assert_eq!(err.field(), Field::User);
        assert_eq!(err.to_string(), "Missing user");

        let (key, choice) = validate_vote("bob", "Embiggen", "Yes").unwrap();
        assert_eq!(key, VoteKey { user: "bob".into(), word: "embiggen".into() });
        assert_eq!(choice, Choice::Yes);

        assert_eq!(validate_removal("bob", "").unwrap_err().field(), Field::Word);
    }

    #[test]
    fn test_tally_transitions() {
        let mut tally = Tally::default();
        assert_eq!(tally.apply(None, Some(Choice::Yes)), DeltaOutcome::default());
        assert_eq!(tally, Tally::new(1, 0));

        tally.apply(Some(Choice::Yes), Some(Choice::No));
        assert_eq!(tally, Tally::new(0, 1));

        // resubmitting the same choice is a no-op
        tally.apply(Some(Choice::No), Some(Choice::No));
        assert_eq!(tally, Tally::new(0, 1));

        tally.apply(Some(Choice::No), None);
        assert_eq!(tally, Tally::new(0, 0));
        assert_eq!(tally.total(), 0);
    }

    #[test]
    fn test_tally_clamps_at_zero() {
        let mut tally = Tally::new(0, 2);
        let outcome = tally.apply(Some(Choice::Yes), None);
        assert_eq!(outcome.clamped, Some(Choice::Yes));
        assert_eq!(tally, Tally::new(0, 2));

        // the increment still lands when the decrement clamps
        let outcome = tally.apply(Some(Choice::Yes), Some(Choice::No));
        assert_eq!(outcome.clamped, Some(Choice::Yes));
        assert_eq!(tally, Tally::new(0, 3));

        for _ in 0..10 {
            tally.apply(Some(Choice::No), None);
        }
        assert_eq!(tally, Tally::new(0, 0));
    }

    #[test]
    fn test_entry_round_trip_through_tally() {
        let entry = AggregateEntry { word: "cromulent".into(), yes_votes: 3, no_votes: 4 };
        let tally = Tally::from(&entry);
        assert_eq!(tally.count(Choice::No), 4);
        assert_eq!(tally.to_entry("cromulent"), entry);
        assert_eq!(entry.total(), 7);
    }

    #[test]
    fn test_wire_format() {
        let request: VoteRequest = serde_json::from_str(r#"{"word":"cromulent","vote":"yes"}"#).unwrap();
        assert_eq!(request.user, "");
        assert_eq!(request.vote, "yes");

        let votes = WordVotes { word: "cromulent".into(), yes_votes: 1, no_votes: 0, user_vote: None };
        let json = serde_json::to_value(&votes).unwrap();
        assert_eq!(json, serde_json::json!({"word": "cromulent", "yesVotes": 1, "noVotes": 0}));

        let votes = WordVotes { user_vote: Some(Choice::No), ..votes };
        assert_eq!(serde_json::to_value(&votes).unwrap()["userVote"], "no");

        let response = VoteResponse::recorded("cromulent");
        assert_eq!(response.message, "Vote for 'cromulent' recorded");
    }
}
