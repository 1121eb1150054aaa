//! Content loaders for reading balance data from files.
//!
//! Each loader turns one RON/TOML file into plain `battle-core` rows;
//! [`TablesLoader`] merges the catalogs into a single oracle.

pub mod characters;
pub mod config;
pub mod encounters;
pub mod factory;
pub mod items;
pub mod tables;

pub use characters::{CharacterCatalog, CharacterLoader};
pub use config::ConfigLoader;
pub use encounters::{EncounterCatalog, EncounterLoader};
pub use factory::ContentFactory;
pub use items::{ItemCatalog, ItemLoader};
pub use tables::TablesLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
