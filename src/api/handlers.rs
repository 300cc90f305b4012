use crate::api::responses::{
    ErrorCode, ErrorResponse, GarageSummaryResponse, GaragesSuccessResponse, HealthStatus,
    HealthSuccessResponse, HistorySuccessResponse, IngestSuccessResponse,
    PredictionSuccessResponse, SampleResponse,
};
use crate::feed::{FeedError, FeedSnapshot, ingest_snapshot};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{error, warn};

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
enum TimestampError {
    Format(time::error::Format),
}

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampError::Format(err) => write!(f, "timestamp format error: {err}"),
        }
    }
}

pub enum ApiResponse<T> {
    Success(T),
    Error {
        status: StatusCode,
        body: ErrorResponse,
    },
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self {
            ApiResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            ApiResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictionQuery {
    pub horizon_minutes: Option<u32>,
}

pub async fn get_health(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    build_health_response(state, SystemTime::now())
}

pub async fn list_garages(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    build_garages_response(state, SystemTime::now())
}

pub async fn get_history(
    State(state): State<Arc<RwLock<AppState>>>,
    Path(garage_id): Path<String>,
) -> impl IntoResponse {
    build_history_response(state, &garage_id, SystemTime::now())
}

pub async fn get_prediction(
    State(state): State<Arc<RwLock<AppState>>>,
    Path(garage_id): Path<String>,
    Query(query): Query<PredictionQuery>,
) -> impl IntoResponse {
    build_prediction_response(state, &garage_id, query.horizon_minutes, SystemTime::now())
}

pub async fn post_feed(
    State(state): State<Arc<RwLock<AppState>>>,
    payload: String,
) -> impl IntoResponse {
    build_ingest_response(state, &payload, SystemTime::now())
}

fn build_health_response(
    state: Arc<RwLock<AppState>>,
    now: SystemTime,
) -> ApiResponse<HealthSuccessResponse> {
    if state.read().is_err() {
        return internal_error("/health", "state lock poisoned while checking health");
    }

    match format_timestamp(now) {
        Ok(timestamp) => ApiResponse::Success(HealthSuccessResponse {
            status: HealthStatus::Ok,
            timestamp,
        }),
        Err(_) => internal_error("/health", "timestamp formatting failure"),
    }
}

fn build_garages_response(
    state: Arc<RwLock<AppState>>,
    now: SystemTime,
) -> ApiResponse<GaragesSuccessResponse> {
    let guard = match state.read() {
        Ok(guard) => guard,
        Err(_) => {
            return internal_error("/api/garages", "state lock poisoned while listing garages");
        }
    };

    let horizon_minutes = guard.default_horizon_minutes();
    let garages: Vec<GarageSummaryResponse> = guard
        .registry()
        .sorted_by_name()
        .into_iter()
        .map(|garage| {
            let latest = guard.history().latest(&garage.id);
            GarageSummaryResponse {
                garage_id: garage.id.clone(),
                name: garage.name.clone(),
                lat: garage.lat,
                lng: garage.lng,
                capacity: garage.capacity,
                available_now: latest.map(|sample| sample.available),
                occupied_now: latest.map(|sample| sample.occupied),
                predicted_available: guard.predict(&garage.id, horizon_minutes),
                updated_at: latest.map(|sample| sample.timestamp),
            }
        })
        .collect();
    let updated_at = guard.last_ingest().map(|report| report.modified.clone());
    drop(guard);

    match format_timestamp(now) {
        Ok(generated_at) => ApiResponse::Success(GaragesSuccessResponse {
            updated_at,
            horizon_minutes,
            count: garages.len(),
            garages,
            generated_at,
        }),
        Err(_) => internal_error("/api/garages", "timestamp formatting failure"),
    }
}

fn build_history_response(
    state: Arc<RwLock<AppState>>,
    garage_id: &str,
    now: SystemTime,
) -> ApiResponse<HistorySuccessResponse> {
    let guard = match state.read() {
        Ok(guard) => guard,
        Err(_) => {
            return internal_error("/api/garages/history", "state lock poisoned while reading history");
        }
    };

    if !guard.registry().contains(garage_id) {
        drop(guard);
        return not_found(ErrorCode::UnknownGarage, "Unknown garage id", now);
    }
    let history = guard.get_history(garage_id);
    drop(guard);

    ApiResponse::Success(HistorySuccessResponse {
        garage_id: garage_id.to_string(),
        count: history.len(),
        samples: history.into_iter().map(SampleResponse::from).collect(),
    })
}

fn build_prediction_response(
    state: Arc<RwLock<AppState>>,
    garage_id: &str,
    horizon_minutes: Option<u32>,
    now: SystemTime,
) -> ApiResponse<PredictionSuccessResponse> {
    let guard = match state.read() {
        Ok(guard) => guard,
        Err(_) => {
            return internal_error(
                "/api/garages/prediction",
                "state lock poisoned while reading history",
            );
        }
    };

    let Some(garage) = guard.registry().get(garage_id) else {
        drop(guard);
        return not_found(ErrorCode::UnknownGarage, "Unknown garage id", now);
    };
    let capacity = garage.capacity;
    let horizon_minutes = horizon_minutes.unwrap_or(guard.default_horizon_minutes());
    let history = guard.get_history(garage_id);
    let model = Arc::clone(guard.model());
    drop(guard);

    let (Some(latest), Some(predicted_available)) = (
        history.last(),
        model.predict(&history, capacity, horizon_minutes),
    ) else {
        return not_found(ErrorCode::NoHistory, "No history for this garage", now);
    };

    ApiResponse::Success(PredictionSuccessResponse {
        garage_id: garage_id.to_string(),
        current_available: latest.available,
        predicted_available,
        horizon_minutes,
        timestamp: latest.timestamp,
    })
}

fn build_ingest_response(
    state: Arc<RwLock<AppState>>,
    payload: &str,
    now: SystemTime,
) -> ApiResponse<IngestSuccessResponse> {
    let snapshot = match FeedSnapshot::from_json(payload) {
        Ok(snapshot) => snapshot,
        Err(err) => return invalid_feed(&err, now),
    };

    let mut guard = match state.write() {
        Ok(guard) => guard,
        Err(_) => {
            return internal_error("/api/feed", "state lock poisoned while ingesting feed");
        }
    };

    let result = ingest_snapshot(&mut guard, &snapshot);
    drop(guard);

    match result {
        Ok(report) => ApiResponse::Success(IngestSuccessResponse {
            timestamp: report.timestamp,
            modified: report.modified,
            count: report.count,
        }),
        Err(err) => invalid_feed(&err, now),
    }
}

fn invalid_feed<T>(err: &FeedError, now: SystemTime) -> ApiResponse<T> {
    warn!(error = %err, "Rejected feed snapshot");
    error_response(StatusCode::BAD_REQUEST, ErrorCode::InvalidFeed, &err.to_string(), now)
}

fn not_found<T>(code: ErrorCode, message: &str, now: SystemTime) -> ApiResponse<T> {
    error_response(StatusCode::NOT_FOUND, code, message, now)
}

fn error_response<T>(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
    now: SystemTime,
) -> ApiResponse<T> {
    match format_timestamp(now) {
        Ok(timestamp) => ApiResponse::Error {
            status,
            body: ErrorResponse {
                error_code: code,
                error_message: message.to_string(),
                timestamp,
            },
        },
        Err(_) => internal_error("api", "timestamp formatting failure"),
    }
}

fn internal_error<T>(route: &str, message: &str) -> ApiResponse<T> {
    error!(route = route, message = message, "Internal error while handling request");
    let formatted = format_timestamp(SystemTime::now()).unwrap_or_else(|err| {
        error!(error = %err, "Failed to format internal error timestamp");
        OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
    });
    ApiResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: ErrorResponse {
            error_code: ErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: formatted,
        },
    }
}

fn format_timestamp(timestamp: SystemTime) -> Result<String, TimestampError> {
    let datetime = OffsetDateTime::from(timestamp);
    datetime.format(&Rfc3339).map_err(TimestampError::Format)
}
