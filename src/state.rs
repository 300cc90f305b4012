use crate::feed::IngestReport;
use crate::garage::GarageRegistry;
use crate::history::{HistoryStore, Sample};
use crate::prediction::DEFAULT_HORIZON_MINUTES;
use crate::prediction::model::AvailabilityModel;
use std::sync::Arc;
use time::UtcOffset;

/// Process-wide service state, shared behind one `RwLock`.
#[derive(Debug)]
pub struct AppState {
    registry: GarageRegistry,
    history: HistoryStore,
    model: Arc<dyn AvailabilityModel>,
    feed_offset: UtcOffset,
    default_horizon_minutes: u32,
    last_ingest: Option<IngestReport>,
}

impl AppState {
    pub fn new(
        registry: GarageRegistry,
        history_capacity: usize,
        model: Arc<dyn AvailabilityModel>,
        feed_offset: UtcOffset,
    ) -> Self {
        let history = HistoryStore::new(registry.ids(), history_capacity);
        Self {
            registry,
            history,
            model,
            feed_offset,
            default_horizon_minutes: DEFAULT_HORIZON_MINUTES,
            last_ingest: None,
        }
    }

    pub fn with_default_horizon(mut self, minutes: u32) -> Self {
        self.default_horizon_minutes = minutes;
        self
    }

    pub fn default_horizon_minutes(&self) -> u32 {
        self.default_horizon_minutes
    }

    pub fn registry(&self) -> &GarageRegistry {
        &self.registry
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn add_sample(&mut self, sample: Sample) {
        self.history.add_sample(sample);
    }

    pub fn get_history(&self, garage_id: &str) -> Vec<Sample> {
        self.history.get_history(garage_id)
    }

    pub fn model(&self) -> &Arc<dyn AvailabilityModel> {
        &self.model
    }

    /// Forecast for a garage using its registry capacity. `None` when the
    /// garage is unknown or has no samples yet.
    pub fn predict(&self, garage_id: &str, horizon_minutes: u32) -> Option<u32> {
        let history = self.history.get_history(garage_id);
        self.model
            .predict(&history, self.registry.capacity(garage_id), horizon_minutes)
    }

    pub fn feed_offset(&self) -> UtcOffset {
        self.feed_offset
    }

    pub fn last_feed_timestamp(&self) -> Option<i64> {
        self.last_ingest.as_ref().map(|report| report.timestamp)
    }

    pub fn last_ingest(&self) -> Option<&IngestReport> {
        self.last_ingest.as_ref()
    }

    pub fn record_ingest(&mut self, report: IngestReport) {
        self.last_ingest = Some(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::garage::Garage;
    use crate::prediction::linear::LinearTrendModel;

    fn test_state() -> AppState {
        let registry = GarageRegistry::new(vec![Garage {
            id: "5".to_string(),
            name: "State Street Campus Garage".to_string(),
            lat: 43.0737,
            lng: -89.3966,
            capacity: Some(200),
        }])
        .expect("build registry");
        AppState::new(
            registry,
            180,
            Arc::new(LinearTrendModel::new()),
            UtcOffset::UTC,
        )
    }

    #[test]
    fn buffers_exist_for_every_registered_garage() {
        let state = test_state();

        assert_eq!(state.history().capacity(), 180);
        assert_eq!(state.default_horizon_minutes(), 30);
        assert!(state.get_history("5").is_empty());
    }

    #[test]
    fn predict_uses_registry_capacity() {
        let mut state = test_state();
        state.add_sample(Sample::new("5", 0, 100, 100));
        state.add_sample(Sample::new("5", 3600, 190, 10));

        assert_eq!(state.predict("5", 30), Some(200));
    }

    #[test]
    fn predict_is_none_for_unknown_or_empty_garage() {
        let state = test_state();

        assert_eq!(state.predict("5", 30), None);
        assert_eq!(state.predict("404", 30), None);
    }

    #[test]
    fn record_ingest_tracks_last_feed_timestamp() {
        let mut state = test_state();
        let report = IngestReport {
            timestamp: 1_700_000_000,
            modified: "2023-11-14T22:13:20Z".to_string(),
            count: 1,
        };

        state.record_ingest(report.clone());

        assert_eq!(state.last_ingest(), Some(&report));
        assert_eq!(state.last_feed_timestamp(), Some(1_700_000_000));
    }
}
