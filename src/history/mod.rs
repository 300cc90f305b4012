//! Bounded per-garage sample history.
//!
//! Each known garage owns one ring buffer of the most recent samples. Samples
//! for unknown garages are dropped silently, and a sample whose timestamp
//! matches the newest buffered entry is treated as a re-read of an upstream
//! feed that has not refreshed yet.

use crate::garage::GarageId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

pub const HISTORY_CAPACITY: usize = 180;

/// One observation of a garage: epoch seconds plus space counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub garage_id: GarageId,
    pub timestamp: i64,
    pub available: u32,
    pub occupied: u32,
}

impl Sample {
    pub fn new(garage_id: impl Into<GarageId>, timestamp: i64, available: u32, occupied: u32) -> Self {
        Self {
            garage_id: garage_id.into(),
            timestamp,
            available,
            occupied,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl HistoryBuffer {
    /// A zero capacity is bumped to one so the newest sample is always kept.
    /// Storage grows on push up to the cap.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Appends unless the newest entry carries the same timestamp.
    /// Returns whether the sample was stored.
    pub fn push(&mut self, sample: Sample) -> bool {
        if let Some(last) = self.samples.back()
            && last.timestamp == sample.timestamp
        {
            return false;
        }
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        true
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    buffers: HashMap<GarageId, HistoryBuffer>,
    capacity: usize,
}

impl HistoryStore {
    pub fn new<I, S>(garage_ids: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<GarageId>,
    {
        let buffers = garage_ids
            .into_iter()
            .map(|id| (id.into(), HistoryBuffer::with_capacity(capacity)))
            .collect();
        Self { buffers, capacity }
    }

    pub fn add_sample(&mut self, sample: Sample) {
        let Some(buffer) = self.buffers.get_mut(&sample.garage_id) else {
            tracing::debug!(garage_id = %sample.garage_id, "Ignoring sample for unknown garage");
            return;
        };
        let garage_id = sample.garage_id.clone();
        let timestamp = sample.timestamp;
        if !buffer.push(sample) {
            tracing::debug!(
                garage_id = %garage_id,
                timestamp,
                "Ignoring sample with duplicate timestamp"
            );
        }
    }

    /// Oldest first. Empty for unknown garages.
    pub fn get_history(&self, garage_id: &str) -> Vec<Sample> {
        self.buffers
            .get(garage_id)
            .map(HistoryBuffer::to_vec)
            .unwrap_or_default()
    }

    pub fn latest(&self, garage_id: &str) -> Option<&Sample> {
        self.buffers.get(garage_id).and_then(HistoryBuffer::latest)
    }

    pub fn len(&self, garage_id: &str) -> usize {
        self.buffers.get(garage_id).map_or(0, HistoryBuffer::len)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
