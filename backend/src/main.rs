use std::sync::Arc;

use backend::bootstrap::BootstrapLoader;
use backend::build_rocket;
use backend::config::ServiceConfig;
use backend::processor::VoteService;
use backend::queries::PgVoteStore;
use backend::routes::AppState;
use shuttle_runtime::CustomError;
use sqlx::PgPool;
use tracing::info;

#[shuttle_runtime::main]
async fn rocket(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secret_store: shuttle_runtime::SecretStore,
) -> shuttle_rocket::ShuttleRocket {
    info!("🚀 Starting word vote server");

    let config = ServiceConfig::from_lookup(|key| secret_store.get(key));

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(CustomError::new)?;

    info!("📋 Migrations complete");

    let loader = BootstrapLoader::from_seed_file(config.seed_list_path.as_deref())
        .await
        .map_err(CustomError::new)?;

    // No traffic is accepted until the cache is fully loaded.
    let votes = VoteService::start(Arc::new(PgVoteStore::new(pool)), loader, config.store_timeout)
        .await
        .map_err(CustomError::new)?;

    let rocket = build_rocket(AppState::new(votes, &config), &config);

    Ok(rocket.into())
}
