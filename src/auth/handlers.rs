use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    auth::dto::{AccessToken, LoginRequest},
    error::AppResult,
    extract::JsonBody,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<Json<AccessToken>> {
    let payload = payload.validate()?;
    let token = state.auth.sign_in(&payload.email, &payload.password).await?;
    Ok(Json(token))
}
