//! Named filter presets persisted under a single store key.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::criteria::FilterCriterion;
use crate::error::{FilterError, FilterResult};
use crate::store::KeyValueStore;

/// Store key holding the JSON array of presets.
pub const PRESETS_KEY: &str = "lit-graph.filter-presets";

/// A saved, named list of criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPreset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub criteria: Vec<FilterCriterion>,
    pub created_at: SystemTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<SystemTime>,
}

/// Partial update applied by [`PresetManager::update_preset`].
#[derive(Debug, Clone, Default)]
pub struct PresetUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub criteria: Option<Vec<FilterCriterion>>,
}

/// CRUD over presets in a [`KeyValueStore`].
///
/// Every mutation reads the full list, applies the change and writes the
/// list back.
#[derive(Debug, Clone)]
pub struct PresetManager<S> {
    store: S,
}

impl<S: KeyValueStore> PresetManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All presets in save order. A missing key yields an empty list.
    pub fn load_presets(&self) -> FilterResult<Vec<FilterPreset>> {
        match self.store.get(PRESETS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_presets(&mut self, presets: &[FilterPreset]) -> FilterResult<()> {
        let json = serde_json::to_string_pretty(presets)?;
        self.store.set(PRESETS_KEY, &json)?;
        debug!(count = presets.len(), "Persisted filter presets");
        Ok(())
    }

    /// Save a new preset and return it.
    pub fn save_preset(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        criteria: Vec<FilterCriterion>,
    ) -> FilterResult<FilterPreset> {
        let mut presets = self.load_presets()?;
        let created_at = SystemTime::now();
        let preset = FilterPreset {
            id: next_id(&presets, created_at),
            name: name.into(),
            description: description.into(),
            criteria,
            created_at,
            last_used: None,
        };
        presets.push(preset.clone());
        self.write_presets(&presets)?;

        info!(
            id = %preset.id,
            name = %preset.name,
            criteria = preset.criteria.len(),
            "Saved filter preset"
        );
        Ok(preset)
    }

    pub fn get_preset(&self, id: &str) -> FilterResult<Option<FilterPreset>> {
        Ok(self.load_presets()?.into_iter().find(|p| p.id == id))
    }

    /// First preset whose name matches exactly.
    pub fn find_by_name(&self, name: &str) -> FilterResult<Option<FilterPreset>> {
        Ok(self.load_presets()?.into_iter().find(|p| p.name == name))
    }

    pub fn update_preset(&mut self, id: &str, update: PresetUpdate) -> FilterResult<FilterPreset> {
        self.modify(id, |preset| {
            if let Some(name) = update.name {
                preset.name = name;
            }
            if let Some(description) = update.description {
                preset.description = description;
            }
            if let Some(criteria) = update.criteria {
                preset.criteria = criteria;
            }
        })
    }

    pub fn update_last_used(&mut self, id: &str) -> FilterResult<FilterPreset> {
        self.modify(id, |preset| preset.last_used = Some(SystemTime::now()))
    }

    pub fn delete_preset(&mut self, id: &str) -> FilterResult<FilterPreset> {
        let mut presets = self.load_presets()?;
        let position = presets
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| FilterError::preset_not_found(id))?;
        let removed = presets.remove(position);
        self.write_presets(&presets)?;

        info!(id = %removed.id, name = %removed.name, "Deleted filter preset");
        Ok(removed)
    }

    fn modify(
        &mut self,
        id: &str,
        change: impl FnOnce(&mut FilterPreset),
    ) -> FilterResult<FilterPreset> {
        let mut presets = self.load_presets()?;
        let preset = presets
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| FilterError::preset_not_found(id))?;
        change(preset);
        let updated = preset.clone();
        self.write_presets(&presets)?;
        Ok(updated)
    }
}

/// Time-derived id, suffixed when it collides with an existing preset.
fn next_id(existing: &[FilterPreset], now: SystemTime) -> String {
    let millis = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let base = format!("preset-{millis}");
    let taken = |candidate: &str| existing.iter().any(|p| p.id == candidate);

    if !taken(&base) {
        return base;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
