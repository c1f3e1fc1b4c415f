//! Recorded match: the sequence of entity snapshots, one list per tick.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::core::error::Result;

/// Serialized as a bare JSON array of ticks, each an array of entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplayLog {
    pub ticks: Vec<Vec<Entity>>,
}

impl ReplayLog {
    /// Load a replay from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Entity]> {
        self.ticks.iter().map(Vec::as_slice)
    }
}
