use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type GarageId = String;

/// A parking ramp known to the service. Only `capacity` matters for prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Garage {
    pub id: GarageId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub capacity: Option<u32>,
}

/// Fixed set of garages supplied at startup.
#[derive(Debug, Clone, Default)]
pub struct GarageRegistry {
    garages: Vec<Garage>,
    index: HashMap<GarageId, usize>,
}

impl GarageRegistry {
    pub fn new(garages: Vec<Garage>) -> Result<Self, AppError> {
        let mut index = HashMap::with_capacity(garages.len());
        for (position, garage) in garages.iter().enumerate() {
            if garage.id.trim().is_empty() {
                return Err(AppError::EmptyGarageId);
            }
            if index.insert(garage.id.clone(), position).is_some() {
                return Err(AppError::DuplicateGarage(garage.id.clone()));
            }
        }
        Ok(Self { garages, index })
    }

    pub fn get(&self, id: &str) -> Option<&Garage> {
        self.index.get(id).map(|&position| &self.garages[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn capacity(&self, id: &str) -> Option<u32> {
        self.get(id).and_then(|garage| garage.capacity)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.garages.iter().map(|garage| garage.id.as_str())
    }

    /// Garages ordered by display name, ties broken by id.
    pub fn sorted_by_name(&self) -> Vec<&Garage> {
        let mut sorted: Vec<&Garage> = self.garages.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        sorted
    }

    pub fn len(&self) -> usize {
        self.garages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.garages.is_empty()
    }
}
