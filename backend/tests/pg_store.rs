//! Postgres adapter tests. Need a database: `DATABASE_URL=... cargo test -- --ignored`.

use std::sync::Arc;
use std::time::Duration;

use backend::bootstrap::BootstrapLoader;
use backend::processor::VoteService;
use backend::queries::PgVoteStore;
use backend::store::VoteRecordStore;
use backend::{AggregateEntry, Choice, VoteRecord};
use sqlx::PgPool;
use time::OffsetDateTime;

fn record(user: &str, word: &str, choice: Choice) -> VoteRecord {
    VoteRecord {
        user_id: user.into(),
        word: word.into(),
        choice,
        timestamp: OffsetDateTime::now_utc(),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn put_replaces_existing_vote(pool: PgPool) {
    let store = PgVoteStore::new(pool.clone());

    store.put(&record("alice", "cromulent", Choice::Yes)).await.unwrap();
    store.put(&record("alice", "cromulent", Choice::No)).await.unwrap();

    let stored = store.get("alice", "cromulent").await.unwrap().unwrap();
    assert_eq!(stored.choice, Choice::No);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM word_votes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn delete_returns_removed_record(pool: PgPool) {
    let store = PgVoteStore::new(pool);
    store.put(&record("bob", "embiggen", Choice::Yes)).await.unwrap();

    let removed = store.delete("bob", "embiggen").await.unwrap().unwrap();
    assert_eq!(removed.choice, Choice::Yes);
    assert!(store.delete("bob", "embiggen").await.unwrap().is_none());
    assert!(store.get("bob", "embiggen").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn aggregates_and_user_listing(pool: PgPool) {
    let store = PgVoteStore::new(pool);
    store.put(&record("alice", "cromulent", Choice::Yes)).await.unwrap();
    store.put(&record("bob", "cromulent", Choice::No)).await.unwrap();
    store.put(&record("bob", "embiggen", Choice::Yes)).await.unwrap();

    assert_eq!(store.aggregate_all().await.unwrap(), vec![
        AggregateEntry { word: "cromulent".into(), yes_votes: 1, no_votes: 1 },
        AggregateEntry { word: "embiggen".into(), yes_votes: 1, no_votes: 0 },
    ]);

    let bob: Vec<_> = store
        .list_for_user("bob")
        .await
        .unwrap()
        .into_iter()
        .map(|r| (r.word, r.choice))
        .collect();
    assert_eq!(bob, [("cromulent".to_string(), Choice::No), ("embiggen".to_string(), Choice::Yes)]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn restart_rebuilds_cache_from_table(pool: PgPool) {
    let timeout = Duration::from_secs(5);
    let first = VoteService::start(Arc::new(PgVoteStore::new(pool.clone())), BootstrapLoader::default(), timeout)
        .await
        .unwrap();
    first.submit_vote("alice", "cromulent", "yes").await.unwrap();
    first.submit_vote("bob", "cromulent", "no").await.unwrap();
    first.submit_vote("alice", "cromulent", "no").await.unwrap();
    let before = first.snapshot();
    drop(first);

    let loader = BootstrapLoader::new(["aardvark".to_string()]);
    let second = VoteService::start(Arc::new(PgVoteStore::new(pool)), loader, timeout)
        .await
        .unwrap();
    let after = second.snapshot();

    assert_eq!(after[0], AggregateEntry { word: "aardvark".into(), yes_votes: 0, no_votes: 0 });
    assert_eq!(&after[1..], before.as_slice());
}
