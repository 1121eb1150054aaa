//! Row types of the game-balance tables.
//!
//! Rows are immutable, externally loaded data. The core never validates that
//! a table is complete; lookups that come back empty are reported to the
//! caller as [`OracleError`](super::OracleError) or, where the rules say so,
//! silently skipped.

use std::collections::BTreeMap;

use crate::stats::{StatBundle, StatModifier, StatType};

pub type CharacterId = u32;
pub type SkillId = u32;
pub type BuffId = u32;
pub type BuffGroupId = u32;
pub type SetId = u32;
pub type CostumeId = u32;
pub type EquipmentItemId = u32;
pub type RecipeId = u32;
pub type SubRecipeId = u32;
pub type OptionId = u32;
pub type StageId = u32;
pub type BossId = u32;

/// Plain six-channel stat row as it appears in tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub hp: i32,
    pub atk: i32,
    pub def: i32,
    pub cri: i32,
    pub hit: i32,
    pub spd: i32,
}

impl BaseStats {
    pub const fn new(hp: i32, atk: i32, def: i32, cri: i32, hit: i32, spd: i32) -> Self {
        Self {
            hp,
            atk,
            def,
            cri,
            hit,
            spd,
        }
    }

    pub fn get(&self, stat: StatType) -> i32 {
        match stat {
            StatType::HP => self.hp,
            StatType::ATK => self.atk,
            StatType::DEF => self.def,
            StatType::CRI => self.cri,
            StatType::HIT => self.hit,
            StatType::SPD => self.spd,
        }
    }

    pub fn to_bundle(&self) -> StatBundle {
        StatBundle::new(self.hp, self.atk, self.def, self.cri, self.hit, self.spd)
    }
}

/// Level progression: `base + growth × (level − 1) / 100` per channel.
///
/// Growth is expressed in hundredths so that fractional per-level growth stays
/// exact; the product is truncated toward zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatProgression {
    pub base: BaseStats,
    pub growth: BaseStats,
}

impl StatProgression {
    /// Progression without growth, used for fixed stat blocks (raid waves).
    pub const fn fixed(base: BaseStats) -> Self {
        Self {
            base,
            growth: BaseStats::new(0, 0, 0, 0, 0, 0),
        }
    }

    /// Level layer for the given level. Every channel is marked set.
    pub fn to_stats(&self, level: u32) -> StatBundle {
        let steps = i64::from(level.saturating_sub(1));
        let mut bundle = StatBundle::empty();
        for stat in [
            StatType::HP,
            StatType::ATK,
            StatType::DEF,
            StatType::CRI,
            StatType::HIT,
            StatType::SPD,
        ] {
            let grown =
                i64::from(self.base.get(stat)) + i64::from(self.growth.get(stat)) * steps / 100;
            bundle.set(stat, grown.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32);
        }
        bundle
    }
}

/// An innate skill of a character row (monsters, bosses).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillGrant {
    pub skill_id: SkillId,
    pub power: i32,
    pub chance: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterRow {
    pub id: CharacterId,
    pub progression: StatProgression,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<SkillGrant>,
}

/// What a skill does when cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SkillKind {
    /// Hits the first living target.
    Attack,
    /// Hits every living target.
    AreaAttack,
    /// Restores the caster's HP.
    Heal,
    /// Only applies the skill's buffs.
    Buff,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillRow {
    pub id: SkillId,
    pub kind: SkillKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub buffs: Vec<BuffId>,
}

/// Who receives a buff applied by a skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BuffTarget {
    Caster,
    Targets,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffRow {
    pub id: BuffId,
    /// Buffs sharing a group replace each other instead of stacking.
    pub group_id: BuffGroupId,
    pub target: BuffTarget,
    /// Number of the holder's own turns the buff lasts.
    pub duration: u32,
    pub modifier: StatModifier,
}

/// Set bonuses keyed by the number of equipped pieces required.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetEffectRow {
    pub set_id: SetId,
    pub effects: BTreeMap<u32, Vec<StatModifier>>,
}

impl SetEffectRow {
    /// Modifiers unlocked with `equipped` pieces, lowest threshold first.
    pub fn modifiers_for(&self, equipped: u32) -> impl Iterator<Item = &StatModifier> {
        self.effects
            .range(..=equipped)
            .flat_map(|(_, modifiers)| modifiers.iter())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostumeStatRow {
    pub costume_id: CostumeId,
    pub stat: StatType,
    pub value: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentItemRow {
    pub id: EquipmentItemId,
    pub set_id: SetId,
    pub stat: StatType,
    pub value: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecipeRow {
    pub id: RecipeId,
    pub result_equipment_id: EquipmentItemId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sub_recipe_ids: Vec<SubRecipeId>,
}

/// Candidate option of a sub-recipe with its selection weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionWeight {
    pub id: OptionId,
    pub ratio: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubRecipeRow {
    pub id: SubRecipeId,
    pub options: Vec<OptionWeight>,
    pub max_option_limit: u32,
}

/// Effect granted by a crafting option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionEffect {
    Stat {
        stat: StatType,
        min: i32,
        max: i32,
    },
    Skill {
        skill_id: SkillId,
        damage_min: i32,
        damage_max: i32,
        chance_min: i32,
        chance_max: i32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionRow {
    pub id: OptionId,
    pub effect: OptionEffect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemySpawn {
    pub character_id: CharacterId,
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default = "default_spawn_count"))]
    pub count: u32,
}

#[cfg(feature = "serde")]
fn default_spawn_count() -> u32 {
    1
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageRow {
    pub id: StageId,
    pub waves: Vec<Vec<EnemySpawn>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossWaveRow {
    pub level: u32,
    pub stats: BaseStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<SkillGrant>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldBossRow {
    pub id: BossId,
    pub character_id: CharacterId,
    pub waves: Vec<BossWaveRow>,
}
