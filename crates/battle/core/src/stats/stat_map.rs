//! Per-item stat maps.
//!
//! Items carry their own stats as `base + additional` per channel. Crafting
//! options roll into the additional part; the equipment layer only ever sees
//! the per-channel total as an `Add` modifier.

use std::collections::BTreeMap;

use super::bundle::StatType;
use super::modifier::StatModifier;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatMapEntry {
    pub base_value: i32,
    pub additional_value: i32,
}

impl StatMapEntry {
    pub fn total(&self) -> i32 {
        self.base_value.saturating_add(self.additional_value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatMap {
    entries: BTreeMap<StatType, StatMapEntry>,
}

impl StatMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map with a single base value, as created from an item row.
    pub fn with_base(stat: StatType, value: i32) -> Self {
        let mut map = Self::new();
        map.add_base(stat, value);
        map
    }

    pub fn add_base(&mut self, stat: StatType, value: i32) {
        let entry = self.entries.entry(stat).or_default();
        entry.base_value = entry.base_value.saturating_add(value);
    }

    pub fn add_additional(&mut self, stat: StatType, value: i32) {
        let entry = self.entries.entry(stat).or_default();
        entry.additional_value = entry.additional_value.saturating_add(value);
    }

    pub fn has(&self, stat: StatType) -> bool {
        self.entries.contains_key(&stat)
    }

    pub fn entry(&self, stat: StatType) -> Option<&StatMapEntry> {
        self.entries.get(&stat)
    }

    pub fn total(&self, stat: StatType) -> i32 {
        self.entries.get(&stat).map_or(0, StatMapEntry::total)
    }

    pub fn additional(&self, stat: StatType) -> i32 {
        self.entries.get(&stat).map_or(0, |e| e.additional_value)
    }

    /// One `Add` modifier per present channel, in channel order.
    pub fn to_modifiers(&self) -> impl Iterator<Item = StatModifier> + '_ {
        self.entries
            .iter()
            .map(|(stat, entry)| StatModifier::add(*stat, entry.total()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
