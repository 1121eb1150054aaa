//! Equipment and crafting catalog loader.

use std::path::Path;

use battle_core::env::{
    CostumeStatRow, EquipmentItemRow, OptionRow, RecipeRow, SetEffectRow, SubRecipeRow,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemCatalog {
    pub equipment_items: Vec<EquipmentItemRow>,
    pub set_effects: Vec<SetEffectRow>,
    pub costume_stats: Vec<CostumeStatRow>,
    pub recipes: Vec<RecipeRow>,
    pub sub_recipes: Vec<SubRecipeRow>,
    pub options: Vec<OptionRow>,
}

/// Loader for item catalogs from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load an item catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ItemCatalog> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))
    }
}
