pub mod bootstrap;
pub mod cache;
pub mod catchers;
pub mod config;
pub mod cors;
pub mod error;
pub mod processor;
pub mod queries;
pub mod rate_limiter;
pub mod routes;
pub mod store;
pub mod utils;

pub use shared::{models::*, error::{Error, ErrorCode}};
pub use shared::tally::{DeltaOutcome, Tally};

use rocket::{Build, Rocket};

use crate::catchers::{bad_request, forbidden, internal_error, not_found, too_many_requests, unavailable, unprocessable};
use crate::config::ServiceConfig;
use crate::cors::Cors;
use crate::routes::{all_options, list_votes, reload, remove_vote, submit_vote, user_votes_csv, AppState};

/// Assembles the Rocket instance around an already bootstrapped service.
pub fn build_rocket(state: AppState, config: &ServiceConfig) -> Rocket<Build> {
    rocket::build()
        .attach(Cors::new(config.allowed_origin.clone()))
        .manage(state)
        .mount(
            "/api",
            rocket::routes![
                list_votes,
                user_votes_csv,
                submit_vote,
                remove_vote,
                reload,
                all_options
            ],
        )
        .register(
            "/",
            rocket::catchers![
                bad_request,
                forbidden,
                not_found,
                unprocessable,
                too_many_requests,
                internal_error,
                unavailable
            ],
        )
}
