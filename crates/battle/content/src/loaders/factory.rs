//! Content factory for building the battle oracle from data files.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, TablesSnapshot};

use crate::loaders::{
    CharacterCatalog, CharacterLoader, ConfigLoader, EncounterCatalog, EncounterLoader,
    ItemCatalog, ItemLoader, LoadResult, TablesLoader,
};

/// Content factory that loads all balance data from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── characters.ron
/// ├── items.ron
/// └── encounters.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load characters, skills and buffs from `characters.ron`.
    pub fn load_characters(&self) -> LoadResult<CharacterCatalog> {
        CharacterLoader::load(&self.data_dir.join("characters.ron"))
    }

    /// Load equipment and crafting rows from `items.ron`.
    pub fn load_items(&self) -> LoadResult<ItemCatalog> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load stages and world bosses from `encounters.ron`.
    pub fn load_encounters(&self) -> LoadResult<EncounterCatalog> {
        EncounterLoader::load(&self.data_dir.join("encounters.ron"))
    }

    /// Load and merge every catalog into one snapshot.
    pub fn load_tables(&self) -> LoadResult<TablesSnapshot> {
        TablesLoader::build(
            self.load_characters()?,
            self.load_items()?,
            self.load_encounters()?,
        )
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let factory = ContentFactory::new("/nonexistent/battle-data");
        let err = factory.load_config().unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
