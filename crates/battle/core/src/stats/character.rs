//! Stateful per-character stats.
//!
//! [`CharacterStats`] owns the modifier sources of one character and keeps the
//! five layers current. Every mutation marks the lowest layer it touched and
//! the pure pipeline in [`layers`](super::layers) is re-run from there upward,
//! so the result never depends on the order setters were called in.

use std::collections::BTreeMap;

use crate::env::{
    BuffGroupId, CharacterRow, CostumeOracle, SetEffectOracle, StatProgression,
};
use crate::item::{Consumable, Costume, Equipment, set_effect_modifiers};

use super::bundle::{StatBundle, StatType};
use super::layers::{LayerSources, LayeredStats, StatLayer};
use super::modifier::StatModifier;

/// Modifier inputs of the four modifier-driven layers.
///
/// Mutators only record which layer became stale; recomputation happens when
/// the owning [`CharacterStats`] flushes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatSources {
    equipment: Vec<StatModifier>,
    consumable: Vec<StatModifier>,
    buffs: BTreeMap<BuffGroupId, StatModifier>,
    optional: Vec<StatModifier>,
    dirty: Option<StatLayer>,
}

impl StatSources {
    fn mark(&mut self, layer: StatLayer) {
        self.dirty = Some(self.dirty.map_or(layer, |current| current.min(layer)));
    }

    /// Lowest layer changed since the last flush.
    pub fn dirty(&self) -> Option<StatLayer> {
        self.dirty
    }

    /// One `Add` per stat-map channel of every piece, then the set effects of
    /// the whole equipped set.
    pub fn set_equipments<O>(&mut self, equipments: &[Equipment], oracle: &O)
    where
        O: SetEffectOracle + ?Sized,
    {
        self.equipment = equipments
            .iter()
            .flat_map(|equipment| equipment.stats.to_modifiers())
            .chain(set_effect_modifiers(equipments, oracle))
            .collect();
        self.mark(StatLayer::Equipment);
    }

    pub fn set_equipment_modifiers(&mut self, modifiers: impl IntoIterator<Item = StatModifier>) {
        self.equipment = modifiers.into_iter().collect();
        self.mark(StatLayer::Equipment);
    }

    pub fn set_consumables(&mut self, consumables: &[Consumable]) {
        self.consumable = consumables
            .iter()
            .flat_map(|consumable| consumable.stats.to_modifiers())
            .collect();
        self.mark(StatLayer::Consumable);
    }

    pub fn set_consumable_modifiers(&mut self, modifiers: impl IntoIterator<Item = StatModifier>) {
        self.consumable = modifiers.into_iter().collect();
        self.mark(StatLayer::Consumable);
    }

    /// Installs a buff, replacing any buff of the same group.
    pub fn add_buff(&mut self, group_id: BuffGroupId, modifier: StatModifier) {
        self.buffs.insert(group_id, modifier);
        self.mark(StatLayer::Buff);
    }

    pub fn remove_buff(&mut self, group_id: BuffGroupId) -> Option<StatModifier> {
        let removed = self.buffs.remove(&group_id);
        if removed.is_some() {
            self.mark(StatLayer::Buff);
        }
        removed
    }

    /// Replaces every buff. Later entries win within a group.
    pub fn set_buffs(&mut self, buffs: impl IntoIterator<Item = (BuffGroupId, StatModifier)>) {
        self.buffs = buffs.into_iter().collect();
        self.mark(StatLayer::Buff);
    }

    /// Clears the optional layer and installs `modifiers`.
    pub fn set_option(&mut self, modifiers: impl IntoIterator<Item = StatModifier>) {
        self.optional = modifiers.into_iter().collect();
        self.mark(StatLayer::Optional);
    }

    pub fn add_option(&mut self, modifiers: impl IntoIterator<Item = StatModifier>) {
        self.optional.extend(modifiers);
        self.mark(StatLayer::Optional);
    }

    /// Costume stats occupy the optional layer as flat additions.
    pub fn set_costumes<O>(&mut self, costumes: &[Costume], oracle: &O)
    where
        O: CostumeOracle + ?Sized,
    {
        let modifiers: Vec<_> = costumes
            .iter()
            .flat_map(|costume| oracle.costume_stats(costume.costume_id))
            .map(|row| StatModifier::add(row.stat, row.value))
            .collect();
        self.set_option(modifiers);
    }

    pub fn equipment(&self) -> &[StatModifier] {
        &self.equipment
    }

    pub fn consumable(&self) -> &[StatModifier] {
        &self.consumable
    }

    pub fn buffs(&self) -> impl Iterator<Item = (BuffGroupId, &StatModifier)> + '_ {
        self.buffs.iter().map(|(group, modifier)| (*group, modifier))
    }

    pub fn optional(&self) -> &[StatModifier] {
        &self.optional
    }
}

/// Level-driven stats of one character plus its modifier sources.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterStats {
    progression: StatProgression,
    level: u32,
    level_stats: StatBundle,
    sources: StatSources,
    stats: LayeredStats,
}

impl CharacterStats {
    pub fn new(row: &CharacterRow, level: u32) -> Self {
        Self::from_progression(row.progression, level)
    }

    pub fn from_progression(progression: StatProgression, level: u32) -> Self {
        let mut stats = Self {
            progression,
            level,
            level_stats: progression.to_stats(level),
            sources: StatSources::default(),
            stats: LayeredStats::default(),
        };
        stats.sources.mark(StatLayer::Level);
        stats.flush();
        stats
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Changing the level re-derives the level layer and everything above it.
    pub fn set_level(&mut self, level: u32) {
        if level == self.level {
            return;
        }
        self.level = level;
        self.level_stats = self.progression.to_stats(level);
        self.sources.mark(StatLayer::Level);
        self.flush();
    }

    pub fn set_equipments<O>(&mut self, equipments: &[Equipment], oracle: &O)
    where
        O: SetEffectOracle + ?Sized,
    {
        self.batch(|sources| sources.set_equipments(equipments, oracle));
    }

    pub fn set_consumables(&mut self, consumables: &[Consumable]) {
        self.batch(|sources| sources.set_consumables(consumables));
    }

    pub fn add_buff(&mut self, group_id: BuffGroupId, modifier: StatModifier) {
        self.batch(|sources| sources.add_buff(group_id, modifier));
    }

    pub fn remove_buff(&mut self, group_id: BuffGroupId) -> Option<StatModifier> {
        self.batch(|sources| sources.remove_buff(group_id))
    }

    pub fn set_buffs(&mut self, buffs: impl IntoIterator<Item = (BuffGroupId, StatModifier)>) {
        self.batch(|sources| sources.set_buffs(buffs));
    }

    pub fn set_option(&mut self, modifiers: impl IntoIterator<Item = StatModifier>) {
        self.batch(|sources| sources.set_option(modifiers));
    }

    pub fn add_option(&mut self, modifiers: impl IntoIterator<Item = StatModifier>) {
        self.batch(|sources| sources.add_option(modifiers));
    }

    pub fn set_costumes<O>(&mut self, costumes: &[Costume], oracle: &O)
    where
        O: CostumeOracle + ?Sized,
    {
        self.batch(|sources| sources.set_costumes(costumes, oracle));
    }

    /// Applies several source mutations and recomputes once, from the lowest
    /// layer any of them touched.
    pub fn batch<R>(&mut self, mutate: impl FnOnce(&mut StatSources) -> R) -> R {
        let result = mutate(&mut self.sources);
        self.flush();
        result
    }

    /// Replaces level, equipment, consumables and costumes in one recompute.
    pub fn set_all<O>(
        &mut self,
        level: u32,
        equipments: &[Equipment],
        consumables: &[Consumable],
        costumes: &[Costume],
        oracle: &O,
    ) where
        O: SetEffectOracle + CostumeOracle + ?Sized,
    {
        if level != self.level {
            self.level = level;
            self.level_stats = self.progression.to_stats(level);
            self.sources.mark(StatLayer::Level);
        }
        self.batch(|sources| {
            sources.set_equipments(equipments, oracle);
            sources.set_consumables(consumables);
            sources.set_costumes(costumes, oracle);
        });
    }

    fn flush(&mut self) {
        let Some(from) = self.sources.dirty.take() else {
            return;
        };
        let buff: Vec<StatModifier> = self.sources.buffs.values().copied().collect();
        let sources = LayerSources {
            equipment: &self.sources.equipment,
            consumable: &self.sources.consumable,
            buff: &buff,
            optional: &self.sources.optional,
        };
        self.stats.recompute_from(from, &self.level_stats, &sources);
    }

    pub fn sources(&self) -> &StatSources {
        &self.sources
    }

    pub fn layered(&self) -> &LayeredStats {
        &self.stats
    }

    /// Clamped total used by combat.
    pub fn total(&self) -> &StatBundle {
        self.stats.total()
    }

    pub fn layer(&self, layer: StatLayer) -> &StatBundle {
        self.stats.layer(layer)
    }

    pub fn level_stats(&self) -> &StatBundle {
        self.layer(StatLayer::Level)
    }

    pub fn equipment_stats(&self) -> &StatBundle {
        self.layer(StatLayer::Equipment)
    }

    pub fn consumable_stats(&self) -> &StatBundle {
        self.layer(StatLayer::Consumable)
    }

    pub fn buff_stats(&self) -> &StatBundle {
        self.layer(StatLayer::Buff)
    }

    pub fn optional_stats(&self) -> &StatBundle {
        self.layer(StatLayer::Optional)
    }

    pub fn get(&self, stat: StatType) -> i32 {
        self.total().get(stat)
    }

    /// Level-layer values per channel.
    pub fn base_stats(&self, ignore_zero: bool) -> Vec<(StatType, i32)> {
        self.level_stats()
            .iter()
            .filter(|(_, value)| !ignore_zero || *value != 0)
            .collect()
    }

    /// `total − level` per channel.
    pub fn additional_stats(&self, ignore_zero: bool) -> Vec<(StatType, i32)> {
        self.base_and_additional_stats(ignore_zero)
            .into_iter()
            .map(|(stat, _, additional)| (stat, additional))
            .filter(|(_, value)| !ignore_zero || *value != 0)
            .collect()
    }

    /// `(channel, base, additional)`. With `ignore_zero` a channel is dropped
    /// only when both parts are zero.
    pub fn base_and_additional_stats(&self, ignore_zero: bool) -> Vec<(StatType, i32, i32)> {
        self.level_stats()
            .iter()
            .map(|(stat, base)| (stat, base, self.get(stat).saturating_sub(base)))
            .filter(|(_, base, additional)| !ignore_zero || *base != 0 || *additional != 0)
            .collect()
    }

    pub fn has_additional_stats(&self) -> bool {
        self.level_stats()
            .iter()
            .any(|(stat, base)| self.get(stat) != base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BaseStats, CostumeStatRow, SetEffectRow, TablesSnapshot};
    use crate::item::ItemUid;
    use crate::stats::{StatMap, layers::recompute};

    fn progression() -> StatProgression {
        StatProgression {
            base: BaseStats::new(100, 10, 40, 5, 10, 10),
            growth: BaseStats::new(1000, 100, 0, 0, 0, 0),
        }
    }

    fn sword(atk: i32, set_id: u32) -> Equipment {
        Equipment::new(
            ItemUid::default(),
            10100000,
            set_id,
            StatMap::with_base(StatType::ATK, atk),
        )
    }

    #[test]
    fn same_group_buff_replaces() {
        let mut stats = CharacterStats::from_progression(progression(), 1);
        stats.add_buff(7, StatModifier::percentage(StatType::ATK, 50));
        stats.add_buff(7, StatModifier::percentage(StatType::ATK, 20));

        // 20% of 10, the first buff is gone
        assert_eq!(stats.buff_stats().atk(), 2);
        assert_eq!(stats.sources().buffs().count(), 1);

        assert!(stats.remove_buff(7).is_some());
        assert_eq!(stats.get(StatType::ATK), 10);
        assert!(stats.remove_buff(7).is_none());
    }

    #[test]
    fn crushing_buffs_clamp_every_channel() {
        use strum::IntoEnumIterator;

        let mut stats = CharacterStats::from_progression(progression(), 1);
        for (group, stat) in StatType::iter().enumerate() {
            stats.add_buff(group as u32, StatModifier::percentage(stat, -1000));
        }

        for stat in StatType::iter() {
            assert!(stats.buff_stats().get(stat) < 0, "{stat}");
            assert_eq!(stats.get(stat), 0, "{stat}");
        }

        for group in 0..StatType::COUNT as u32 {
            stats.remove_buff(group);
        }
        assert_eq!(*stats.total(), stats.level_stats().clamped_non_negative());
    }

    #[test]
    fn optional_percentage_doubles_def() {
        let mut stats = CharacterStats::from_progression(progression(), 1);
        stats.set_option([StatModifier::percentage(StatType::DEF, 100)]);
        assert_eq!(stats.get(StatType::DEF), 80);

        // set_option clears, add_option appends
        stats.add_option([StatModifier::add(StatType::DEF, 1)]);
        assert_eq!(stats.get(StatType::DEF), 81);
        stats.set_option([]);
        assert_eq!(stats.get(StatType::DEF), 40);
    }

    #[test]
    fn equipment_change_cascades_upward() {
        let tables = TablesSnapshot::new();
        let mut stats = CharacterStats::from_progression(progression(), 1);
        stats.add_buff(1, StatModifier::percentage(StatType::ATK, 100));
        assert_eq!(stats.get(StatType::ATK), 20);

        let level_before = *stats.level_stats();
        stats.set_equipments(&[sword(30, 0)], &tables);

        assert_eq!(*stats.level_stats(), level_before);
        // buff now doubles level + equipment
        assert_eq!(stats.buff_stats().atk(), 40);
        assert_eq!(stats.get(StatType::ATK), 80);
        assert_eq!(
            *stats.total(),
            stats.layered().raw_total().clamped_non_negative()
        );
    }

    #[test]
    fn set_effects_enter_equipment_layer() {
        let tables = TablesSnapshot::new().with_set_effect(SetEffectRow {
            set_id: 3,
            effects: BTreeMap::from([(2, vec![StatModifier::percentage(StatType::HP, 10)])]),
        });
        let mut stats = CharacterStats::from_progression(progression(), 1);

        stats.set_equipments(&[sword(1, 3)], &tables);
        assert_eq!(stats.equipment_stats().hp(), 0);

        stats.set_equipments(&[sword(1, 3), sword(1, 3)], &tables);
        assert_eq!(stats.equipment_stats().hp(), 10);
        assert_eq!(stats.equipment_stats().atk(), 2);
    }

    #[test]
    fn stateful_matches_pure_recompute() {
        let tables = TablesSnapshot::new().with_costume_stat(CostumeStatRow {
            costume_id: 5,
            stat: StatType::SPD,
            value: 3,
        });
        let consumable = Consumable {
            item_id: 1,
            stats: StatMap::with_base(StatType::HP, -500),
        };

        let mut stats = CharacterStats::from_progression(progression(), 1);
        stats.add_buff(2, StatModifier::percentage(StatType::DEF, -30));
        stats.set_all(
            3,
            &[sword(12, 0)],
            &[consumable],
            &[Costume { costume_id: 5 }],
            &tables,
        );

        let sources = stats.sources();
        let buff: Vec<_> = sources.buffs().map(|(_, m)| *m).collect();
        let pure = recompute(
            &progression().to_stats(3),
            &LayerSources {
                equipment: sources.equipment(),
                consumable: sources.consumable(),
                buff: &buff,
                optional: sources.optional(),
            },
        );

        assert_eq!(stats.layered(), &pure);
        assert_eq!(stats.get(StatType::HP), 0);
        assert_eq!(stats.get(StatType::SPD), 13);
    }

    #[test]
    fn level_change_and_queries() {
        let mut stats = CharacterStats::from_progression(progression(), 1);
        assert!(!stats.has_additional_stats());
        assert!(stats.additional_stats(true).is_empty());

        stats.set_level(2);
        assert_eq!(stats.get(StatType::HP), 110);
        assert_eq!(stats.get(StatType::ATK), 11);

        stats.batch(|sources| {
            sources.set_consumable_modifiers([StatModifier::add(StatType::CRI, 4)]);
            sources.add_buff(1, StatModifier::add(StatType::HIT, -2));
        });
        assert!(stats.sources().dirty().is_none());
        assert!(stats.has_additional_stats());
        assert_eq!(
            stats.additional_stats(true),
            vec![(StatType::CRI, 4), (StatType::HIT, -2)]
        );
        assert_eq!(stats.base_stats(false).len(), StatType::COUNT);
    }
}
