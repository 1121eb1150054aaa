//! Rolling crafting options onto a freshly made equipment piece.

use std::collections::BTreeSet;

use tracing::debug;

use crate::env::{
    CraftingOracle, OptionEffect, OptionId, OptionRow, RandomSource, SkillOracle, SubRecipeRow,
};
use crate::item::{Equipment, SkillInstance};

use super::selector::{EmptySelection, WeightedSelector};

/// Options granted by one roll.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionSelection {
    /// Ids of every drawn option, including skill options whose skill row was
    /// missing and therefore attached nothing.
    pub option_ids: BTreeSet<OptionId>,
    /// Set when nothing was drawn.
    pub empty: Option<EmptySelection>,
}

impl OptionSelection {
    pub fn len(&self) -> usize {
        self.option_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.option_ids.is_empty()
    }
}

/// Draws up to `max_option_limit` options of `sub_recipe` and applies them to
/// `equipment`.
///
/// Option ids without a table row are dropped before sampling. Drawn rows are
/// applied in ascending id order:
/// - a stat option rolls `next_inclusive(min, max)` into the stat map's
///   additional value;
/// - a skill option looks the skill up first and, when it is missing, consumes
///   no randomness; otherwise it rolls damage, then chance.
pub fn select_options<O, R>(
    tables: &O,
    sub_recipe: &SubRecipeRow,
    rng: &mut R,
    equipment: &mut Equipment,
) -> OptionSelection
where
    O: CraftingOracle + SkillOracle + ?Sized,
    R: RandomSource + ?Sized,
{
    let mut selector = WeightedSelector::new();
    for candidate in &sub_recipe.options {
        if let Some(row) = tables.option(candidate.id) {
            selector.add(row, candidate.ratio);
        }
    }

    let selection = selector.select(sub_recipe.max_option_limit as usize, rng);
    if let Some(reason) = selection.empty_reason() {
        debug!(sub_recipe = sub_recipe.id, %reason, "no options drawn");
        return OptionSelection {
            option_ids: BTreeSet::new(),
            empty: Some(reason),
        };
    }

    let mut rows = selection.into_vec();
    rows.sort_by_key(|row| row.id);

    let mut option_ids = BTreeSet::new();
    for row in rows {
        apply_option(tables, row, rng, equipment);
        option_ids.insert(row.id);
    }

    debug!(sub_recipe = sub_recipe.id, options = ?option_ids, "options drawn");
    OptionSelection {
        option_ids,
        empty: None,
    }
}

fn apply_option<O, R>(tables: &O, row: &OptionRow, rng: &mut R, equipment: &mut Equipment)
where
    O: SkillOracle + ?Sized,
    R: RandomSource + ?Sized,
{
    match row.effect {
        OptionEffect::Stat { stat, min, max } => {
            let value = rng.next_inclusive(min, max);
            equipment.stats.add_additional(stat, value);
        }
        OptionEffect::Skill {
            skill_id,
            damage_min,
            damage_max,
            chance_min,
            chance_max,
        } => {
            let Some(skill) = tables.skill(skill_id) else {
                debug!(option = row.id, skill_id, "option skill not in tables");
                return;
            };
            let power = rng.next_inclusive(damage_min, damage_max);
            let chance = rng.next_inclusive(chance_min, chance_max);
            equipment.skills.push(SkillInstance {
                skill_id,
                kind: skill.kind,
                power,
                chance,
                buffs: skill.buffs.clone(),
            });
        }
    }
}
