//! Availability model trait for swappable short-horizon forecasts.
//!
//! The active model is chosen by `[prediction].model` in `config.toml`.

use crate::history::Sample;

/// Forecasts available spaces for one garage from its buffered history.
pub trait AvailabilityModel: Send + Sync + std::fmt::Debug {
    /// Identifier used in configuration and logs.
    fn name(&self) -> &'static str;

    /// Projected availability `horizon_minutes` after the newest sample, or
    /// `None` when the history is empty.
    fn predict(
        &self,
        history: &[Sample],
        capacity: Option<u32>,
        horizon_minutes: u32,
    ) -> Option<u32>;
}
