use crate::history::Sample;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ErrorResponse {
    pub error_code: ErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    UnknownGarage,
    NoHistory,
    InvalidFeed,
    InternalError,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthSuccessResponse {
    pub status: HealthStatus,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GarageSummaryResponse {
    pub garage_id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub capacity: Option<u32>,
    pub available_now: Option<u32>,
    pub occupied_now: Option<u32>,
    pub predicted_available: Option<u32>,
    pub updated_at: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GaragesSuccessResponse {
    pub updated_at: Option<String>,
    pub horizon_minutes: u32,
    pub count: usize,
    pub garages: Vec<GarageSummaryResponse>,
    pub generated_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HistorySuccessResponse {
    pub garage_id: String,
    pub count: usize,
    pub samples: Vec<SampleResponse>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SampleResponse {
    pub timestamp: i64,
    pub available: u32,
    pub occupied: u32,
}

impl From<Sample> for SampleResponse {
    fn from(sample: Sample) -> Self {
        Self {
            timestamp: sample.timestamp,
            available: sample.available,
            occupied: sample.occupied,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PredictionSuccessResponse {
    pub garage_id: String,
    pub current_available: u32,
    pub predicted_available: u32,
    pub horizon_minutes: u32,
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct IngestSuccessResponse {
    pub timestamp: i64,
    pub modified: String,
    pub count: usize,
}
