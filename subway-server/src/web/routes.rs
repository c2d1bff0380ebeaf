//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{Distance, LineColor, LineId, LineName, StationId, StationName, ValidationError};
use crate::store::{LineUpdate, NewLine, StoreError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(list_stations).post(create_station))
        .route("/stations/:id", get(show_station).delete(delete_station))
        .route("/lines", get(list_lines).post(create_line))
        .route(
            "/lines/:id",
            get(show_line).put(update_line).delete(delete_line),
        )
        .route("/lines/:id/sections", post(add_section).delete(remove_section))
        .route("/lines/:id/stations", get(line_stations))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse a JSON body ourselves so malformed input gets our error shape.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest {
        message: format!("Invalid JSON: {e}"),
    })
}

/// Unwrap a numeric path id so malformed ids get our error shape too.
fn path_id(path: Result<Path<u64>, PathRejection>) -> Result<u64, AppError> {
    path.map(|Path(id)| id).map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })
}

fn created(location: String, body: impl serde::Serialize) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    )
        .into_response()
}

// --- stations ---

async fn create_station(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: StationRequest = parse_body(&body)?;
    let name = StationName::parse(&req.name)?;

    let station = state.store.create_station(name).await?;

    Ok(created(
        format!("/stations/{}", station.id),
        StationResponse::from(&station),
    ))
}

async fn list_stations(State(state): State<AppState>) -> Json<Vec<StationResponse>> {
    let stations = state.store.list_stations().await;
    Json(stations.iter().map(StationResponse::from).collect())
}

async fn show_station(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<StationResponse>, AppError> {
    let id = path_id(path)?;
    let station = state.store.station(StationId(id)).await?;
    Ok(Json(StationResponse::from(&station)))
}

async fn delete_station(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = path_id(path)?;
    state.store.delete_station(StationId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- lines ---

async fn create_line(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let req: LineRequest = parse_body(&body)?;
    let new = NewLine {
        name: LineName::parse(&req.name)?,
        color: LineColor::parse(&req.color)?,
        up_station: StationId(req.up_station_id),
        down_station: StationId(req.down_station_id),
        distance: Distance::new(req.distance)?,
    };

    let view = state.store.create_line(new).await?;

    Ok(created(
        format!("/lines/{}", view.line.id),
        LineResponse::from_view(&view),
    ))
}

async fn list_lines(State(state): State<AppState>) -> Result<Json<Vec<LineResponse>>, AppError> {
    let views = state.store.list_lines().await?;
    Ok(Json(views.iter().map(LineResponse::from_view).collect()))
}

async fn show_line(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<LineResponse>, AppError> {
    let id = path_id(path)?;
    let view = state.store.line(LineId(id)).await?;
    Ok(Json(LineResponse::from_view(&view)))
}

async fn update_line(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    body: Bytes,
) -> Result<Json<LineResponse>, AppError> {
    let id = path_id(path)?;
    let req: LineUpdateRequest = parse_body(&body)?;
    let update = LineUpdate {
        name: req.name.as_deref().map(LineName::parse).transpose()?,
        color: req.color.as_deref().map(LineColor::parse).transpose()?,
    };

    let view = state.store.update_line(LineId(id), update).await?;
    Ok(Json(LineResponse::from_view(&view)))
}

async fn delete_line(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = path_id(path)?;
    state.store.delete_line(LineId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- sections ---

/// Append a section at the line's terminus.
///
/// Responds with the updated line so the caller sees the new section list.
async fn add_section(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    body: Bytes,
) -> Result<Json<LineResponse>, AppError> {
    let id = path_id(path)?;
    let req: SectionRequest = parse_body(&body)?;
    let distance = Distance::new(req.distance)?;

    let view = state
        .store
        .append_section(
            LineId(id),
            StationId(req.up_station_id),
            StationId(req.down_station_id),
            distance,
        )
        .await?;

    Ok(Json(LineResponse::from_view(&view)))
}

/// Remove the line's terminal station: `DELETE /lines/{id}/sections?stationId=`.
async fn remove_section(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    query: Result<Query<RemoveSectionQuery>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let id = path_id(path)?;
    let Query(query) = query.map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })?;

    state
        .store
        .remove_terminus(LineId(id), StationId(query.station_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn line_stations(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<Vec<StationResponse>>, AppError> {
    let id = path_id(path)?;
    let stations = state.store.path(LineId(id)).await?;
    Ok(Json(stations.iter().map(StationResponse::from).collect()))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        let message = e.to_string();
        match e {
            StoreError::Validation(_) => AppError::BadRequest { message },
            StoreError::NotFound { .. } => AppError::NotFound { message },
            StoreError::Conflict(_) => AppError::Conflict { message },
            StoreError::IdsExhausted(_) | StoreError::Persistence(_) => {
                AppError::Internal { message }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { message });
        (status, body).into_response()
    }
}
