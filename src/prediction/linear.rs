use crate::history::Sample;
use crate::prediction::model::AvailabilityModel;

pub const MODEL_NAME: &str = "linear_trend";

/// Extrapolates the straight line through the oldest and newest samples.
pub fn predict_available(
    history: &[Sample],
    capacity: Option<u32>,
    horizon_minutes: u32,
) -> Option<u32> {
    let last = history.last()?;
    let current = i64::from(last.available);

    let first = match history.first() {
        Some(first) if history.len() >= 2 => first,
        _ => return Some(clamp(current, capacity)),
    };

    let elapsed_secs = match last.timestamp.checked_sub(first.timestamp) {
        Some(elapsed) if elapsed > 0 => elapsed,
        _ => return Some(clamp(current, capacity)),
    };

    let rate_per_sec = (current - i64::from(first.available)) as f64 / elapsed_secs as f64;
    let horizon_secs = f64::from(horizon_minutes) * 60.0;
    let projected = current as f64 + rate_per_sec * horizon_secs;

    Some(clamp(projected.round() as i64, capacity))
}

/// Bounds a value to `[0, capacity]`; only the lower bound applies without a capacity.
pub fn clamp(value: i64, capacity: Option<u32>) -> u32 {
    if value < 0 {
        return 0;
    }
    match capacity {
        Some(capacity) if value > i64::from(capacity) => capacity,
        _ => u32::try_from(value).unwrap_or(u32::MAX),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrendModel;

impl LinearTrendModel {
    pub fn new() -> Self {
        Self
    }
}

impl AvailabilityModel for LinearTrendModel {
    fn name(&self) -> &'static str {
        MODEL_NAME
    }

    fn predict(
        &self,
        history: &[Sample],
        capacity: Option<u32>,
        horizon_minutes: u32,
    ) -> Option<u32> {
        predict_available(history, capacity, horizon_minutes)
    }
}
