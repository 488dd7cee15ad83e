use rocket::http::{ContentType, Status};
use rocket::request::{FromRequest, Outcome};
use rocket::serde::json::Json;
use rocket::{delete, get, post, Request, State};
use shared::models::*;
use tracing::{debug, info, instrument, warn};

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::processor::VoteService;
use crate::rate_limiter::RateLimiter;
use crate::utils::render_votes_csv;

pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

pub struct AppState {
    pub votes: VoteService,
    pub vote_limiter: RateLimiter,
    admin_token: Option<String>,
}

impl AppState {
    pub fn new(votes: VoteService, config: &ServiceConfig) -> Self {
        Self {
            votes,
            vote_limiter: RateLimiter::new(config.vote_rate_limit, config.vote_rate_window),
            admin_token: config.admin_token.clone(),
        }
    }

    // Anonymous requests are rejected by validation, so they are not counted.
    fn check_rate_limit(&self, user: &str) -> Result<(), ApiError> {
        if user.trim().is_empty() {
            return Ok(());
        }
        self.vote_limiter
            .check(&format!("vote:{}", user.trim()))
            .map_err(|retry_after_secs| ApiError::RateLimited { retry_after_secs })
    }
}

/// Request guard for operator endpoints: the `X-Admin-Token` header must
/// match the configured token. Without a configured token it always fails.
pub struct AdminToken;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminToken {
    type Error = ApiError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let expected = req
            .rocket()
            .state::<AppState>()
            .and_then(|state| state.admin_token.as_deref());
        let provided = req.headers().get_one(ADMIN_TOKEN_HEADER);

        match (expected, provided) {
            (Some(expected), Some(provided)) if expected == provided => Outcome::Success(AdminToken),
            _ => {
                warn!("Rejected admin request to {}", req.uri());
                Outcome::Error((Status::Forbidden, ApiError::Unauthorized))
            }
        }
    }
}

#[get("/votes?<user>")]
pub async fn list_votes(state: &State<AppState>, user: Option<&str>) -> Result<Json<Vec<WordVotes>>, ApiError> {
    Ok(Json(state.votes.read_aggregates(user).await?))
}

#[get("/user_votes")]
pub async fn user_votes_csv(state: &State<AppState>) -> (ContentType, String) {
    (ContentType::CSV, render_votes_csv(&state.votes.snapshot()))
}

#[instrument(skip(state, request))]
#[post("/vote", format = "json", data = "<request>")]
pub async fn submit_vote(state: &State<AppState>, request: Json<VoteRequest>) -> Result<Json<VoteResponse>, ApiError> {
    let request = request.into_inner();
    debug!("POST /api/vote - word={:?} vote={:?}", request.word, request.vote);

    state.check_rate_limit(&request.user)?;
    let word = state.votes.submit_vote(&request.user, &request.word, &request.vote).await?;
    Ok(Json(VoteResponse::recorded(word)))
}

#[instrument(skip(state, user))]
#[delete("/vote/<word>?<user>")]
pub async fn remove_vote(state: &State<AppState>, word: &str, user: Option<&str>) -> Result<Json<VoteResponse>, ApiError> {
    let user = user.unwrap_or_default();

    state.check_rate_limit(user)?;
    let word = state.votes.remove_vote(user, word).await?;
    Ok(Json(VoteResponse::removed(word)))
}

#[post("/admin/reload")]
pub async fn reload(state: &State<AppState>, _admin: AdminToken) -> Result<Json<ReloadResponse>, ApiError> {
    let report = state.votes.reload().await?;
    info!("🔄 Admin reload complete: {} words", report.entries);

    Ok(Json(ReloadResponse {
        entries: report.entries,
        records: report.records,
        clamp_events: state.votes.cache().clamp_events(),
    }))
}

#[rocket::options("/<_..>")]
pub async fn all_options() -> Status {
    Status::Ok
}
