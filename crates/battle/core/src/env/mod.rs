//! Traits describing read-only game-balance data.
//!
//! Oracles expose the character, skill, set-effect, costume, crafting and
//! encounter tables. [`TablesOracle`] bundles them so battle and crafting can
//! reach everything they need without coupling to a concrete store; the
//! [`TablesSnapshot`] is the in-memory implementation loaders produce.
mod error;
mod rng;
mod snapshot;
mod tables;

pub use error::OracleError;
pub use rng::{PcgRandom, RandomSource, compute_seed};
pub use snapshot::TablesSnapshot;
pub use tables::{
    BaseStats, BossId, BossWaveRow, BuffGroupId, BuffId, BuffRow, BuffTarget, CharacterId,
    CharacterRow, CostumeId, CostumeStatRow, EnemySpawn, EquipmentItemId, EquipmentItemRow,
    OptionEffect, OptionId, OptionRow, OptionWeight, RecipeId, RecipeRow, SetEffectRow, SetId,
    SkillGrant, SkillId, SkillKind, SkillRow, StageId, StageRow, StatProgression, SubRecipeId,
    SubRecipeRow, WorldBossRow,
};

/// Character rows (level progression and innate skills).
pub trait CharacterOracle: Send + Sync {
    fn character(&self, id: CharacterId) -> Option<&CharacterRow>;
}

/// Equipment set bonuses.
pub trait SetEffectOracle: Send + Sync {
    fn set_effect(&self, set_id: SetId) -> Option<&SetEffectRow>;
}

/// Skill and buff definitions.
pub trait SkillOracle: Send + Sync {
    fn skill(&self, id: SkillId) -> Option<&SkillRow>;
    fn buff(&self, id: BuffId) -> Option<&BuffRow>;
}

/// Costume stat rows. A costume may grant several channels.
pub trait CostumeOracle: Send + Sync {
    /// Rows for `id`; empty when the costume grants nothing.
    fn costume_stats(&self, id: CostumeId) -> &[CostumeStatRow];
}

/// Recipe, option and equipment-item tables used by crafting.
pub trait CraftingOracle: Send + Sync {
    fn recipe(&self, id: RecipeId) -> Option<&RecipeRow>;
    fn sub_recipe(&self, id: SubRecipeId) -> Option<&SubRecipeRow>;
    fn option(&self, id: OptionId) -> Option<&OptionRow>;
    fn equipment_item(&self, id: EquipmentItemId) -> Option<&EquipmentItemRow>;
}

/// Stage and world-boss wave layouts.
pub trait EncounterOracle: Send + Sync {
    fn stage(&self, id: StageId) -> Option<&StageRow>;
    fn world_boss(&self, id: BossId) -> Option<&WorldBossRow>;
}

/// Every table the engine reads.
pub trait TablesOracle:
    CharacterOracle
    + SetEffectOracle
    + SkillOracle
    + CostumeOracle
    + CraftingOracle
    + EncounterOracle
{
}

impl<T> TablesOracle for T where
    T: CharacterOracle
        + SetEffectOracle
        + SkillOracle
        + CostumeOracle
        + CraftingOracle
        + EncounterOracle
        + ?Sized
{
}
