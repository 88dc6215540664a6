use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequestParts, Path, State, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{
        CreatedResponse, DbVersionResponse, HealthResponse, MessageResponse, MovieLogEntry,
        TablesResponse,
    },
    validation,
};

/// A positive movie id taken from the `{id}` path segment. Anything else
/// matches no entry and is answered with 404.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovieId(pub i32);

impl<S: Send + Sync> FromRequestParts<S> for MovieId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) =
            Path::<String>::from_request_parts(parts, state).await.map_err(|_| AppError::NotFound)?;

        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::NotFound);
        }
        raw.parse::<i32>().ok().filter(|id| *id > 0).map(MovieId).ok_or(AppError::NotFound)
    }
}

/// Missing or malformed JSON is treated like an absent payload.
fn payload(body: Result<Json<Value>, JsonRejection>) -> Value {
    match body {
        Ok(Json(value)) => value,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "unreadable request body");
            Value::Null
        },
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy", message: "Server is running" })
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<MovieLogEntry>>> {
    Ok(Json(state.store.list().await?))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    MovieId(movie_id): MovieId,
) -> AppResult<Json<MovieLogEntry>> {
    Ok(Json(state.store.get(movie_id).await?))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let movie = validation::validate_create(&payload(body))?;
    let movie_name = movie.movie_name.clone();

    let movie_id = state.store.create(movie).await?;
    info!(movie_id, movie_name = %movie_name, "movie review created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { message: "Movie review created successfully", movie_id }),
    ))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    MovieId(movie_id): MovieId,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let assignments = validation::build_update(&payload(body))?;
    let fields = assignments.len();

    state.store.update(movie_id, assignments).await?;
    info!(movie_id, fields, "movie review updated");

    Ok(Json(MessageResponse { message: "Movie review updated successfully" }))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    MovieId(movie_id): MovieId,
) -> AppResult<Json<MessageResponse>> {
    state.store.delete(movie_id).await?;
    info!(movie_id, "movie review deleted");

    Ok(Json(MessageResponse { message: "Movie review deleted successfully" }))
}

pub async fn test_db(State(state): State<Arc<AppState>>) -> AppResult<Json<DbVersionResponse>> {
    let version = state.store.server_version().await?;
    Ok(Json(DbVersionResponse { message: "Database connected successfully", version }))
}

pub async fn debug_tables(State(state): State<Arc<AppState>>) -> AppResult<Json<TablesResponse>> {
    Ok(Json(TablesResponse { tables: state.store.table_names().await? }))
}

pub async fn create_table(State(state): State<Arc<AppState>>) -> AppResult<Json<MessageResponse>> {
    state.store.create_table_with_samples().await?;
    info!("movie_log table ensured with sample data");
    Ok(Json(MessageResponse { message: "Table created successfully with sample data" }))
}
