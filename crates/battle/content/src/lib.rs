//! Data-driven balance tables and loaders.
//!
//! This crate reads the externally authored game data into the types the
//! battle engine consumes:
//! - Characters, skills and buffs (RON)
//! - Equipment, set effects, costumes and crafting recipes (RON)
//! - Stages and world bosses (RON)
//! - Battle configuration (TOML)
//!
//! Everything loaded here ends up inside a [`battle_core::TablesSnapshot`],
//! which is the oracle the engine reads from. Content never appears in
//! battle state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CharacterCatalog, CharacterLoader, ConfigLoader, ContentFactory, EncounterCatalog,
    EncounterLoader, ItemCatalog, ItemLoader, LoadResult, TablesLoader,
};
