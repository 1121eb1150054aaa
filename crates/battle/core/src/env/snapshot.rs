//! In-memory table snapshot.
//!
//! Every table is a `BTreeMap` keyed by row id so iteration order, and with it
//! any serialized form, is identical on every node.

use std::collections::BTreeMap;

use super::tables::{
    BossId, BuffId, BuffRow, CharacterId, CharacterRow, CostumeId, CostumeStatRow,
    EquipmentItemId, EquipmentItemRow, OptionId, OptionRow, RecipeId, RecipeRow, SetEffectRow,
    SetId, SkillId, SkillRow, StageId, StageRow, SubRecipeId, SubRecipeRow, WorldBossRow,
};
use super::{
    CharacterOracle, CostumeOracle, CraftingOracle, EncounterOracle, SetEffectOracle, SkillOracle,
};

/// Snapshot of all balance tables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TablesSnapshot {
    pub characters: BTreeMap<CharacterId, CharacterRow>,
    pub skills: BTreeMap<SkillId, SkillRow>,
    pub buffs: BTreeMap<BuffId, BuffRow>,
    pub set_effects: BTreeMap<SetId, SetEffectRow>,
    pub costume_stats: BTreeMap<CostumeId, Vec<CostumeStatRow>>,
    pub equipment_items: BTreeMap<EquipmentItemId, EquipmentItemRow>,
    pub recipes: BTreeMap<RecipeId, RecipeRow>,
    pub sub_recipes: BTreeMap<SubRecipeId, SubRecipeRow>,
    pub options: BTreeMap<OptionId, OptionRow>,
    pub stages: BTreeMap<StageId, StageRow>,
    pub world_bosses: BTreeMap<BossId, WorldBossRow>,
}

impl TablesSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_character(mut self, row: CharacterRow) -> Self {
        self.characters.insert(row.id, row);
        self
    }

    pub fn with_skill(mut self, row: SkillRow) -> Self {
        self.skills.insert(row.id, row);
        self
    }

    pub fn with_buff(mut self, row: BuffRow) -> Self {
        self.buffs.insert(row.id, row);
        self
    }

    pub fn with_set_effect(mut self, row: SetEffectRow) -> Self {
        self.set_effects.insert(row.set_id, row);
        self
    }

    /// Costume rows accumulate; one costume may carry several channels.
    pub fn with_costume_stat(mut self, row: CostumeStatRow) -> Self {
        self.costume_stats
            .entry(row.costume_id)
            .or_default()
            .push(row);
        self
    }

    pub fn with_equipment_item(mut self, row: EquipmentItemRow) -> Self {
        self.equipment_items.insert(row.id, row);
        self
    }

    pub fn with_recipe(mut self, row: RecipeRow) -> Self {
        self.recipes.insert(row.id, row);
        self
    }

    pub fn with_sub_recipe(mut self, row: SubRecipeRow) -> Self {
        self.sub_recipes.insert(row.id, row);
        self
    }

    pub fn with_option(mut self, row: OptionRow) -> Self {
        self.options.insert(row.id, row);
        self
    }

    pub fn with_stage(mut self, row: StageRow) -> Self {
        self.stages.insert(row.id, row);
        self
    }

    pub fn with_world_boss(mut self, row: WorldBossRow) -> Self {
        self.world_bosses.insert(row.id, row);
        self
    }

    /// Total number of rows across every table.
    pub fn row_count(&self) -> usize {
        self.characters.len()
            + self.skills.len()
            + self.buffs.len()
            + self.set_effects.len()
            + self.costume_stats.values().map(Vec::len).sum::<usize>()
            + self.equipment_items.len()
            + self.recipes.len()
            + self.sub_recipes.len()
            + self.options.len()
            + self.stages.len()
            + self.world_bosses.len()
    }
}

impl CharacterOracle for TablesSnapshot {
    fn character(&self, id: CharacterId) -> Option<&CharacterRow> {
        self.characters.get(&id)
    }
}

impl SetEffectOracle for TablesSnapshot {
    fn set_effect(&self, set_id: SetId) -> Option<&SetEffectRow> {
        self.set_effects.get(&set_id)
    }
}

impl SkillOracle for TablesSnapshot {
    fn skill(&self, id: SkillId) -> Option<&SkillRow> {
        self.skills.get(&id)
    }

    fn buff(&self, id: BuffId) -> Option<&BuffRow> {
        self.buffs.get(&id)
    }
}

impl CostumeOracle for TablesSnapshot {
    fn costume_stats(&self, id: CostumeId) -> &[CostumeStatRow] {
        self.costume_stats.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl CraftingOracle for TablesSnapshot {
    fn recipe(&self, id: RecipeId) -> Option<&RecipeRow> {
        self.recipes.get(&id)
    }

    fn sub_recipe(&self, id: SubRecipeId) -> Option<&SubRecipeRow> {
        self.sub_recipes.get(&id)
    }

    fn option(&self, id: OptionId) -> Option<&OptionRow> {
        self.options.get(&id)
    }

    fn equipment_item(&self, id: EquipmentItemId) -> Option<&EquipmentItemRow> {
        self.equipment_items.get(&id)
    }
}

impl EncounterOracle for TablesSnapshot {
    fn stage(&self, id: StageId) -> Option<&StageRow> {
        self.stages.get(&id)
    }

    fn world_boss(&self, id: BossId) -> Option<&WorldBossRow> {
        self.world_bosses.get(&id)
    }
}
