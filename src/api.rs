//! HTTP adapter over [`GameService`].

use axum::{
    Json, Router,
    body::Body,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tracing::{debug, error, info, instrument, warn};

use crate::error::GameError;
use crate::game::{ActionSubmission, GameId, GameStatus, LineupDefinition, Role, Side};
use crate::roster::{RosterResolver, TeamId};
use crate::service::GameService;
use crate::store::{GameStore, StoreError};

/// Body of `POST /game`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDefinition {
    /// Team batting first.
    pub visiting_team_id: TeamId,
    /// Team batting last.
    pub home_team_id: TeamId,
}

/// Response of `POST /game`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedGame {
    /// Id of the new game.
    pub id: GameId,
}

/// Optional version token on mutating routes.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct VersionQuery {
    /// Version the caller last read.
    pub version: Option<i64>,
}

/// A [`GameError`] rendered as an HTTP response.
#[derive(Debug, Display, From)]
pub struct ApiError(GameError);

impl ApiError {
    /// Status code for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            GameError::NotFound { .. } => StatusCode::NOT_FOUND,
            GameError::Validation(_) | GameError::UnknownRole(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            GameError::GameClosed(_) | GameError::Conflict { .. } => StatusCode::CONFLICT,
            GameError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection, "Malformed request body");
        Self(GameError::validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        warn!(error = %rejection, "Malformed request path");
        Self(GameError::validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        warn!(error = %rejection, "Malformed query string");
        Self(GameError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        } else {
            debug!(status = %status, error = %self.0, "Request rejected");
        }
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Builds the router for a service.
pub fn router<S, R>(service: GameService<S, R>) -> Router
where
    S: GameStore + 'static,
    R: RosterResolver + 'static,
{
    Router::new()
        .route("/game", get(list_games::<S, R>).post(create_game::<S, R>))
        .route("/game/{id}", get(get_game::<S, R>))
        .route("/game/{id}/lineup/{side}", put(put_lineup::<S, R>))
        .route("/game/{id}/strategy/{role}", post(post_strategy::<S, R>))
        .route("/game/{id}/action", post(append_action::<S, R>))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(service)
}

/// Runs a blocking service call off the async runtime.
async fn blocking<T, F>(call: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, GameError> + Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| {
            warn!(error = %e, "Blocking task failed");
            ApiError(GameError::Store(StoreError::new(format!(
                "Worker task failed: {}",
                e
            ))))
        })?
        .map_err(ApiError::from)
}

#[instrument(skip(service))]
async fn list_games<S, R>(
    State(service): State<GameService<S, R>>,
) -> Result<Json<Vec<GameStatus>>, ApiError>
where
    S: GameStore + 'static,
    R: RosterResolver + 'static,
{
    blocking(move || service.list_games()).await.map(Json)
}

// Extractors are taken as `Result` so rejections render through `ApiError`.

#[instrument(skip_all)]
async fn get_game<S, R>(
    State(service): State<GameService<S, R>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<GameStatus>, ApiError>
where
    S: GameStore + 'static,
    R: RosterResolver + 'static,
{
    let Path(id) = path?;
    debug!(game_id = id, "Get game");
    blocking(move || service.get_game(GameId::from(id)))
        .await
        .map(Json)
}

#[instrument(skip_all)]
async fn create_game<S, R>(
    State(service): State<GameService<S, R>>,
    body: Result<Json<GameDefinition>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedGame>), ApiError>
where
    S: GameStore + 'static,
    R: RosterResolver + 'static,
{
    let Json(definition) = body?;
    debug!(?definition, "Create game");
    let id = blocking(move || {
        service.create_game(definition.visiting_team_id, definition.home_team_id)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(CreatedGame { id })))
}

#[instrument(skip_all)]
async fn put_lineup<S, R>(
    State(service): State<GameService<S, R>>,
    path: Result<Path<(i32, String)>, PathRejection>,
    query: Result<Query<VersionQuery>, QueryRejection>,
    body: Result<Json<LineupDefinition>, JsonRejection>,
) -> Result<Json<GameStatus>, ApiError>
where
    S: GameStore + 'static,
    R: RosterResolver + 'static,
{
    let Path((id, side)) = path?;
    let Query(query) = query?;
    let Json(definition) = body?;
    debug!(game_id = id, side = %side, entries = definition.participants.len(), "Put lineup");
    let side = Side::parse(&side)?;
    blocking(move || {
        service.put_lineup(
            GameId::from(id),
            side,
            &definition.participants,
            query.version,
        )
    })
    .await
    .map(Json)
}

#[instrument(skip_all)]
async fn post_strategy<S, R>(
    State(service): State<GameService<S, R>>,
    path: Result<Path<(i32, String)>, PathRejection>,
    query: Result<Query<VersionQuery>, QueryRejection>,
    directive: String,
) -> Result<Json<GameStatus>, ApiError>
where
    S: GameStore + 'static,
    R: RosterResolver + 'static,
{
    let Path((id, role)) = path?;
    let Query(query) = query?;
    debug!(game_id = id, role = %role, "Post strategy");
    let role = Role::parse(&role)?;
    blocking(move || service.post_strategy(GameId::from(id), role, directive, query.version))
        .await
        .map(Json)
}

#[instrument(skip_all)]
async fn append_action<S, R>(
    State(service): State<GameService<S, R>>,
    path: Result<Path<i32>, PathRejection>,
    query: Result<Query<VersionQuery>, QueryRejection>,
    body: Result<Json<ActionSubmission>, JsonRejection>,
) -> Result<Json<GameStatus>, ApiError>
where
    S: GameStore + 'static,
    R: RosterResolver + 'static,
{
    let Path(id) = path?;
    let Query(query) = query?;
    let Json(action) = body?;
    debug!(game_id = id, outcome = %action.outcome, "Append action");
    blocking(move || service.append_action(GameId::from(id), action, query.version))
        .await
        .map(Json)
}
