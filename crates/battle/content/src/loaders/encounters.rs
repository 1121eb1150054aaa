//! Stage and world boss catalog loader.

use std::path::Path;

use battle_core::env::{StageRow, WorldBossRow};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Encounter catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterCatalog {
    pub stages: Vec<StageRow>,
    pub world_bosses: Vec<WorldBossRow>,
}

/// Loader for encounter catalogs from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load an encounter catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<EncounterCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EncounterCatalog> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter catalog RON: {}", e))
    }
}
