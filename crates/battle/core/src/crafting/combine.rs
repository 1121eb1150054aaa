//! Equipment combination: recipe lookup, item creation and option roll.

use tracing::debug;

use crate::env::{
    CraftingOracle, EquipmentItemId, RandomSource, RecipeId, SkillOracle, SubRecipeId,
};
use crate::error::{ErrorSeverity, GameError};
use crate::item::Equipment;
use crate::stats::StatMap;

use super::options::{OptionSelection, select_options};

/// Errors raised by [`combine_equipment`]. All are caller mistakes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CraftError {
    #[error("recipe {0} not found")]
    UnknownRecipe(RecipeId),

    #[error("sub-recipe {0} not found")]
    UnknownSubRecipe(SubRecipeId),

    #[error("sub-recipe {sub_recipe_id} does not belong to recipe {recipe_id}")]
    SubRecipeNotInRecipe {
        recipe_id: RecipeId,
        sub_recipe_id: SubRecipeId,
    },

    #[error("equipment item {0} not found")]
    UnknownEquipment(EquipmentItemId),
}

impl GameError for CraftError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownRecipe(_) => "CRAFT_UNKNOWN_RECIPE",
            Self::UnknownSubRecipe(_) => "CRAFT_UNKNOWN_SUB_RECIPE",
            Self::SubRecipeNotInRecipe { .. } => "CRAFT_SUB_RECIPE_NOT_IN_RECIPE",
            Self::UnknownEquipment(_) => "CRAFT_UNKNOWN_EQUIPMENT",
        }
    }
}

/// Crafted equipment and the options it unlocked.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CraftOutcome {
    pub recipe_id: RecipeId,
    pub sub_recipe_id: Option<SubRecipeId>,
    pub equipment: Equipment,
    pub options: OptionSelection,
}

impl CraftOutcome {
    /// Unlocked option ids in ascending order.
    pub fn unlocked_options(&self) -> impl Iterator<Item = u32> + '_ {
        self.options.option_ids.iter().copied()
    }
}

/// Creates the result equipment of `recipe_id`.
///
/// The uid is the first thing drawn from `rng`; options follow when a
/// sub-recipe is given. Without a sub-recipe the piece carries only its base
/// stat.
pub fn combine_equipment<O, R>(
    tables: &O,
    recipe_id: RecipeId,
    sub_recipe_id: Option<SubRecipeId>,
    rng: &mut R,
) -> Result<CraftOutcome, CraftError>
where
    O: CraftingOracle + SkillOracle + ?Sized,
    R: RandomSource + ?Sized,
{
    let recipe = tables
        .recipe(recipe_id)
        .ok_or(CraftError::UnknownRecipe(recipe_id))?;

    let sub_recipe = match sub_recipe_id {
        Some(id) => {
            if !recipe.sub_recipe_ids.contains(&id) {
                return Err(CraftError::SubRecipeNotInRecipe {
                    recipe_id,
                    sub_recipe_id: id,
                });
            }
            Some(
                tables
                    .sub_recipe(id)
                    .ok_or(CraftError::UnknownSubRecipe(id))?,
            )
        }
        None => None,
    };

    let item = tables
        .equipment_item(recipe.result_equipment_id)
        .ok_or(CraftError::UnknownEquipment(recipe.result_equipment_id))?;

    let mut equipment = Equipment::new(
        rng.unique_id(),
        item.id,
        item.set_id,
        StatMap::with_base(item.stat, item.value),
    );

    let options = match sub_recipe {
        Some(sub_recipe) => select_options(tables, sub_recipe, rng, &mut equipment),
        None => OptionSelection::default(),
    };

    debug!(
        recipe_id,
        uid = %equipment.uid,
        options = options.len(),
        "equipment combined"
    );

    Ok(CraftOutcome {
        recipe_id,
        sub_recipe_id,
        equipment,
        options,
    })
}
