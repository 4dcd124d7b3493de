use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::error::ApiError;
use crate::state::AppState;
use crate::users::{dto::LookupRequest, repo_types::User};

pub fn lookup_routes() -> Router<AppState> {
    Router::new().route("/users/lookup", post(lookup_user))
}

/// Returns the user record minus the password hash and timestamps.
#[instrument(skip(state, payload))]
pub async fn lookup_user(
    State(state): State<AppState>,
    Json(payload): Json<LookupRequest>,
) -> Result<Json<User>, ApiError> {
    let user = User::find_by_email(&state.db, &payload.email).await?;
    // Not-found surfaces as 400 here, not 404: clients already depend on
    // that status, so it stays.
    let user = user.ok_or_else(|| {
        warn!(email = %payload.email, "lookup for unknown email");
        ApiError::BadRequest("User not found!".into())
    })?;
    Ok(Json(user))
}
