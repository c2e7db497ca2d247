use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::AppResult,
    extract::{JsonBody, PathParam, QueryParams},
    state::AppState,
    users::{
        dto::{CreateUserRequest, Pagination, UpdateUserRequest},
        repo_types::{User, UserPage},
    },
};

pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let new_user = payload.validate()?;
    let user = state.users.create(new_user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(p): QueryParams<Pagination>,
) -> AppResult<Json<UserPage>> {
    let (page, page_size) = p.validate()?;
    let page = state.users.find_all(Some(page), Some(page_size)).await?;
    Ok(Json(page))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> AppResult<Json<User>> {
    Ok(Json(state.users.find_one(id).await?))
}

#[instrument(skip(state, auth, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<i64>,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    auth.ensure_owner(id)?;
    let update = payload.validate()?;
    Ok(Json(state.users.update(id, update).await?))
}

#[instrument(skip(state, auth))]
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<i64>,
) -> AppResult<StatusCode> {
    auth.ensure_owner(id)?;
    state.users.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
