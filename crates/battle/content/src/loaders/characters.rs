//! Character, skill and buff catalog loader.

use std::path::Path;

use battle_core::env::{BuffRow, CharacterRow, SkillRow};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Character catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterCatalog {
    pub characters: Vec<CharacterRow>,
    pub skills: Vec<SkillRow>,
    pub buffs: Vec<BuffRow>,
}

/// Loader for character catalogs from RON files.
pub struct CharacterLoader;

impl CharacterLoader {
    /// Load a character catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<CharacterCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CharacterCatalog> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse character catalog RON: {}", e))
    }
}
