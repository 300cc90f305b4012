//! Upstream availability feed: payload shape, timestamp handling and ingestion
//! into the history store.

use crate::history::Sample;
use crate::state::AppState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use tracing::{debug, info};

/// The city feed publishes naive local times in US Central time.
pub const DEFAULT_FEED_UTC_OFFSET_HOURS: i8 = -6;

/// Parsed upstream payload. Unrecognized fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub modified: String,
    #[serde(default)]
    pub vacancies: BTreeMap<String, u32>,
}

impl FeedSnapshot {
    pub fn from_json(payload: &str) -> Result<Self, FeedError> {
        Ok(serde_json::from_str(payload)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub timestamp: i64,
    pub modified: String,
    pub count: usize,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to parse feed payload: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unrecognized feed timestamp: {0:?}")]
    InvalidTimestamp(String),
}

/// Converts the feed's `modified` field to epoch seconds. RFC 3339 input keeps
/// its own offset; naive input is read in `offset`.
pub fn parse_modified(text: &str, offset: UtcOffset) -> Result<i64, FeedError> {
    let text = text.trim();
    if let Ok(datetime) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(datetime.unix_timestamp());
    }

    let naive = PrimitiveDateTime::parse(
        text,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            text,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )
    })
    .map_err(|_| FeedError::InvalidTimestamp(text.to_string()))?;

    Ok(naive.assume_offset(offset).unix_timestamp())
}

/// Pushes one sample per registered garage in the snapshot. A snapshot whose
/// timestamp matches the previous ingest is skipped entirely.
pub fn ingest_snapshot(
    state: &mut AppState,
    snapshot: &FeedSnapshot,
) -> Result<IngestReport, FeedError> {
    let timestamp = parse_modified(&snapshot.modified, state.feed_offset())?;

    if state.last_feed_timestamp() == Some(timestamp) {
        debug!(timestamp, "Feed not refreshed since last ingest");
        return Ok(IngestReport {
            timestamp,
            modified: snapshot.modified.clone(),
            count: 0,
        });
    }

    let mut count = 0;
    for (garage_id, &available) in &snapshot.vacancies {
        let Some(garage) = state.registry().get(garage_id) else {
            debug!(garage_id = %garage_id, "Skipping garage missing from registry");
            continue;
        };
        let occupied = garage
            .capacity
            .map_or(0, |capacity| capacity.saturating_sub(available));
        state.add_sample(Sample::new(garage_id.as_str(), timestamp, available, occupied));
        count += 1;
    }

    let report = IngestReport {
        timestamp,
        modified: snapshot.modified.clone(),
        count,
    };
    state.record_ingest(report.clone());
    info!(timestamp, count, "Feed snapshot ingested");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::garage::{Garage, GarageRegistry};
    use crate::prediction::linear::LinearTrendModel;
    use std::sync::Arc;

    fn central() -> UtcOffset {
        UtcOffset::from_hms(DEFAULT_FEED_UTC_OFFSET_HOURS, 0, 0).expect("valid offset")
    }

    fn test_state() -> AppState {
        let registry = GarageRegistry::new(vec![
            Garage {
                id: "1".to_string(),
                name: "Overture Center Garage".to_string(),
                lat: 43.0735,
                lng: -89.3898,
                capacity: Some(607),
            },
            Garage {
                id: "7".to_string(),
                name: "Unmetered Lot".to_string(),
                lat: 43.07,
                lng: -89.38,
                capacity: None,
            },
        ])
        .expect("build registry");
        AppState::new(registry, 10, Arc::new(LinearTrendModel::new()), central())
    }

    fn snapshot(modified: &str, vacancies: &[(&str, u32)]) -> FeedSnapshot {
        FeedSnapshot {
            modified: modified.to_string(),
            vacancies: vacancies
                .iter()
                .map(|(id, available)| (id.to_string(), *available))
                .collect(),
        }
    }

    #[test]
    fn naive_timestamp_uses_configured_offset() {
        let parsed = parse_modified("1970-01-01 00:00:00", central()).expect("parse");

        assert_eq!(parsed, 6 * 3600);
    }

    #[test]
    fn naive_timestamp_accepts_t_separator() {
        let parsed = parse_modified("1970-01-01T00:01:00", central()).expect("parse");

        assert_eq!(parsed, 6 * 3600 + 60);
    }

    #[test]
    fn rfc3339_timestamp_keeps_its_own_offset() {
        let parsed = parse_modified("1970-01-01T01:00:00Z", central()).expect("parse");

        assert_eq!(parsed, 3600);
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        let result = parse_modified("yesterday-ish", central());

        assert!(matches!(result, Err(FeedError::InvalidTimestamp(_))));
    }

    #[test]
    fn snapshot_parses_upstream_shape_and_ignores_extra_fields() {
        let parsed = FeedSnapshot::from_json(
            r#"{"modified":"2026-01-11 12:30:00","vacancies":{"1":120,"2":33},"source":"city"}"#,
        )
        .expect("parse snapshot");

        assert_eq!(parsed.modified, "2026-01-11 12:30:00");
        assert_eq!(parsed.vacancies.get("2"), Some(&33));
    }

    #[test]
    fn ingest_stores_known_garages_and_computes_occupied() {
        let mut state = test_state();

        let report = ingest_snapshot(
            &mut state,
            &snapshot("1970-01-01 00:00:00", &[("1", 100), ("7", 12), ("99", 5)]),
        )
        .expect("ingest");

        assert_eq!(report.count, 2);
        assert_eq!(report.timestamp, 6 * 3600);
        assert_eq!(
            state.get_history("1"),
            vec![Sample::new("1", 6 * 3600, 100, 507)]
        );
        assert_eq!(state.get_history("7"), vec![Sample::new("7", 6 * 3600, 12, 0)]);
        assert!(state.get_history("99").is_empty());
    }

    #[test]
    fn repeated_snapshot_timestamp_is_skipped() {
        let mut state = test_state();
        ingest_snapshot(&mut state, &snapshot("1970-01-01 00:00:00", &[("1", 100)]))
            .expect("first ingest");

        let report = ingest_snapshot(&mut state, &snapshot("1970-01-01 00:00:00", &[("1", 90)]))
            .expect("second ingest");

        assert_eq!(report.count, 0);
        assert_eq!(state.get_history("1").len(), 1);
        assert_eq!(state.last_ingest().map(|r| r.count), Some(1));
    }

    #[test]
    fn available_above_capacity_saturates_occupied() {
        let mut state = test_state();

        ingest_snapshot(&mut state, &snapshot("1970-01-01 00:00:00", &[("1", 700)]))
            .expect("ingest");

        assert_eq!(state.get_history("1")[0].occupied, 0);
    }

    #[test]
    fn invalid_timestamp_leaves_state_untouched() {
        let mut state = test_state();

        let result = ingest_snapshot(&mut state, &snapshot("not a time", &[("1", 100)]));

        assert!(result.is_err());
        assert!(state.get_history("1").is_empty());
        assert_eq!(state.last_feed_timestamp(), None);
    }
}
