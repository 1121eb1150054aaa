//! Combatants on the battle field.

use core::fmt;
use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::env::{BuffGroupId, BuffId, BuffRow, CharacterId};
use crate::item::SkillInstance;
use crate::stats::{CharacterStats, StatType};

/// Field-local identifier assigned at spawn. The player is always `0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl CombatantId {
    pub const PLAYER: Self = Self(0);
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

/// A buff currently held by a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveBuff {
    pub buff_id: BuffId,
    pub remaining: u32,
}

pub type Targets = ArrayVec<CombatantId, { BattleConfig::MAX_TARGETS }>;

/// Character template resolved from tables, before it is placed on the field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatantSpec {
    pub character_id: CharacterId,
    pub stats: CharacterStats,
    /// Castable skills besides the normal attack, ascending skill id.
    pub skills: Vec<SkillInstance>,
}

impl CombatantSpec {
    pub fn new(
        character_id: CharacterId,
        stats: CharacterStats,
        mut skills: Vec<SkillInstance>,
    ) -> Self {
        skills.sort_by_key(|skill| skill.skill_id);
        Self {
            character_id,
            stats,
            skills,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Combatant {
    pub id: CombatantId,
    pub side: Side,
    pub character_id: CharacterId,
    pub wave: u32,
    stats: CharacterStats,
    current_hp: i32,
    targets: Targets,
    buffs: BTreeMap<BuffGroupId, ActiveBuff>,
    skills: Vec<SkillInstance>,
}

impl Combatant {
    /// Places `spec` on the field at full HP.
    pub fn spawn(id: CombatantId, side: Side, wave: u32, spec: CombatantSpec) -> Self {
        let current_hp = spec.stats.get(StatType::HP);
        Self {
            id,
            side,
            character_id: spec.character_id,
            wave,
            stats: spec.stats,
            current_hp,
            targets: Targets::new(),
            buffs: BTreeMap::new(),
            skills: spec.skills,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn is_dead(&self) -> bool {
        !self.is_alive()
    }

    pub fn current_hp(&self) -> i32 {
        self.current_hp
    }

    pub fn max_hp(&self) -> i32 {
        self.stats.get(StatType::HP)
    }

    pub fn stats(&self) -> &CharacterStats {
        &self.stats
    }

    pub fn get(&self, stat: StatType) -> i32 {
        self.stats.get(stat)
    }

    pub fn skills(&self) -> &[SkillInstance] {
        &self.skills
    }

    pub fn targets(&self) -> &[CombatantId] {
        &self.targets
    }

    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }

    /// Adds a target. Returns `false` when the target list is full.
    pub fn add_target(&mut self, id: CombatantId) -> bool {
        if self.targets.contains(&id) {
            return true;
        }
        self.targets.try_push(id).is_ok()
    }

    pub fn remove_target(&mut self, id: CombatantId) {
        self.targets.retain(|target| *target != id);
    }

    /// Applies damage and returns the HP actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let dealt = amount.max(0).min(self.current_hp.max(0));
        self.current_hp -= dealt;
        dealt
    }

    /// Restores HP up to the current maximum and returns the HP gained.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.current_hp;
        self.current_hp = self
            .current_hp
            .saturating_add(amount.max(0))
            .min(self.max_hp());
        (self.current_hp - before).max(0)
    }

    pub fn buffs(&self) -> impl Iterator<Item = (BuffGroupId, &ActiveBuff)> + '_ {
        self.buffs.iter().map(|(group, buff)| (*group, buff))
    }

    /// Installs `row`, replacing any buff of the same group.
    pub fn apply_buff(&mut self, row: &BuffRow) {
        self.buffs.insert(
            row.group_id,
            ActiveBuff {
                buff_id: row.id,
                remaining: row.duration,
            },
        );
        self.stats.add_buff(row.group_id, row.modifier);
        self.cap_hp();
    }

    /// Counts one turn off every held buff.
    pub fn tick_buffs(&mut self) {
        for buff in self.buffs.values_mut() {
            buff.remaining = buff.remaining.saturating_sub(1);
        }
    }

    /// Drops buffs with no turns left and returns their ids, ascending group.
    pub fn expire_buffs(&mut self) -> Vec<BuffId> {
        let expired: Vec<(BuffGroupId, BuffId)> = self
            .buffs
            .iter()
            .filter(|(_, buff)| buff.remaining == 0)
            .map(|(group, buff)| (*group, buff.buff_id))
            .collect();
        if expired.is_empty() {
            return Vec::new();
        }

        self.stats.batch(|sources| {
            for (group, _) in &expired {
                sources.remove_buff(*group);
            }
        });
        for (group, _) in &expired {
            self.buffs.remove(group);
        }
        self.cap_hp();
        expired.into_iter().map(|(_, id)| id).collect()
    }

    fn cap_hp(&mut self) {
        if self.is_alive() {
            self.current_hp = self.current_hp.min(self.max_hp().max(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BaseStats, BuffTarget, StatProgression};
    use crate::stats::StatModifier;

    fn combatant() -> Combatant {
        let stats = CharacterStats::from_progression(
            StatProgression::fixed(BaseStats::new(100, 20, 5, 0, 10, 10)),
            1,
        );
        Combatant::spawn(CombatantId(1), Side::Enemy, 1, CombatantSpec::new(7, stats, vec![]))
    }

    fn hp_buff(id: BuffId, group_id: BuffGroupId, value: i32, duration: u32) -> BuffRow {
        BuffRow {
            id,
            group_id,
            target: BuffTarget::Caster,
            duration,
            modifier: StatModifier::percentage(StatType::HP, value),
        }
    }

    #[test]
    fn damage_and_heal_stay_in_bounds() {
        let mut unit = combatant();
        assert_eq!(unit.take_damage(30), 30);
        assert_eq!(unit.heal(500), 30);
        assert_eq!(unit.take_damage(1000), 100);
        assert!(unit.is_dead());
        assert_eq!(unit.take_damage(5), 0);
    }

    #[test]
    fn buffs_replace_tick_and_expire() {
        let mut unit = combatant();
        unit.apply_buff(&hp_buff(1, 9, 50, 2));
        unit.apply_buff(&hp_buff(2, 9, -50, 1));
        assert_eq!(unit.buffs().count(), 1);
        assert_eq!(unit.max_hp(), 50);
        assert_eq!(unit.current_hp(), 50);

        unit.tick_buffs();
        assert_eq!(unit.expire_buffs(), vec![2]);
        assert_eq!(unit.max_hp(), 100);
        assert_eq!(unit.buffs().count(), 0);
    }

    #[test]
    fn targets_are_bounded_and_unique() {
        let mut unit = combatant();
        for id in 0..BattleConfig::MAX_TARGETS as u32 {
            assert!(unit.add_target(CombatantId(100 + id)));
        }
        assert!(unit.add_target(CombatantId(100)));
        assert!(!unit.add_target(CombatantId(999)));

        unit.remove_target(CombatantId(100));
        assert_eq!(unit.targets().len(), BattleConfig::MAX_TARGETS - 1);
    }
}
