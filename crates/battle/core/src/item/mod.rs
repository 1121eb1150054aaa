//! Inventory items that feed the stat layers and the battle skill pool.

use core::fmt;
use std::collections::BTreeMap;

use crate::env::{
    BuffId, CostumeId, EquipmentItemId, SetEffectOracle, SetId, SkillId, SkillKind,
};
use crate::stats::{StatMap, StatModifier};

/// 16-byte unique item identifier drawn from the random stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemUid([u8; 16]);

impl ItemUid {
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for ItemUid {
    /// `8-4-4-4-12` lowercase hex groups.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Skill a combatant can cast, with its rolled magnitudes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillInstance {
    pub skill_id: SkillId,
    pub kind: SkillKind,
    pub power: i32,
    /// Percent chance of being chosen over the normal attack.
    pub chance: i32,
    pub buffs: Vec<BuffId>,
}

impl SkillInstance {
    /// Id of the implicit single-target attack every combatant owns.
    pub const NORMAL_ATTACK_ID: SkillId = 100000;

    pub fn normal_attack() -> Self {
        Self {
            skill_id: Self::NORMAL_ATTACK_ID,
            kind: SkillKind::Attack,
            power: 0,
            chance: 0,
            buffs: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub uid: ItemUid,
    pub item_id: EquipmentItemId,
    pub set_id: SetId,
    pub level: u32,
    pub stats: StatMap,
    pub skills: Vec<SkillInstance>,
}

impl Equipment {
    pub fn new(uid: ItemUid, item_id: EquipmentItemId, set_id: SetId, stats: StatMap) -> Self {
        Self {
            uid,
            item_id,
            set_id,
            level: 0,
            stats,
            skills: Vec::new(),
        }
    }

    pub fn with_skill(mut self, skill: SkillInstance) -> Self {
        self.skills.push(skill);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Consumable {
    pub item_id: u32,
    pub stats: StatMap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Costume {
    pub costume_id: CostumeId,
}

/// Set-effect modifiers granted by the whole equipped set.
///
/// Pieces are counted per `set_id`; sets are visited in ascending id and each
/// set contributes every effect whose threshold is at most its piece count,
/// lowest threshold first. Sets without a table row contribute nothing.
pub fn set_effect_modifiers<O>(equipments: &[Equipment], oracle: &O) -> Vec<StatModifier>
where
    O: SetEffectOracle + ?Sized,
{
    let mut counts: BTreeMap<SetId, u32> = BTreeMap::new();
    for equipment in equipments {
        *counts.entry(equipment.set_id).or_default() += 1;
    }

    counts
        .into_iter()
        .filter_map(|(set_id, count)| oracle.set_effect(set_id).map(|row| (row, count)))
        .flat_map(|(row, count)| row.modifiers_for(count).copied().collect::<Vec<_>>())
        .collect()
}
