//! Balance tables loader.
//!
//! Merges the character, item and encounter catalogs into one
//! [`TablesSnapshot`] and rejects data the engine could never run: duplicate
//! row ids, and references from recipes or encounters to rows that do not
//! exist. Skill and option references are left alone because the engine
//! skips those by rule.

use std::collections::BTreeMap;
use std::path::Path;

use battle_core::TablesSnapshot;

use crate::loaders::{
    CharacterCatalog, CharacterLoader, EncounterCatalog, EncounterLoader, ItemCatalog, ItemLoader,
    LoadResult,
};

/// Loader for the merged balance tables.
pub struct TablesLoader;

impl TablesLoader {
    /// Load and merge the three catalog files.
    pub fn load(characters: &Path, items: &Path, encounters: &Path) -> LoadResult<TablesSnapshot> {
        let characters = CharacterLoader::load(characters)?;
        let items = ItemLoader::load(items)?;
        let encounters = EncounterLoader::load(encounters)?;
        Self::build(characters, items, encounters)
    }

    /// Merge already parsed catalogs into a snapshot.
    pub fn build(
        characters: CharacterCatalog,
        items: ItemCatalog,
        encounters: EncounterCatalog,
    ) -> LoadResult<TablesSnapshot> {
        let mut tables = TablesSnapshot::new();

        for row in characters.characters {
            insert_unique(&mut tables.characters, row.id, row, "character")?;
        }
        for row in characters.skills {
            insert_unique(&mut tables.skills, row.id, row, "skill")?;
        }
        for row in characters.buffs {
            insert_unique(&mut tables.buffs, row.id, row, "buff")?;
        }

        for row in items.equipment_items {
            insert_unique(&mut tables.equipment_items, row.id, row, "equipment item")?;
        }
        for row in items.set_effects {
            insert_unique(&mut tables.set_effects, row.set_id, row, "set effect")?;
        }
        for row in items.recipes {
            insert_unique(&mut tables.recipes, row.id, row, "recipe")?;
        }
        for row in items.sub_recipes {
            insert_unique(&mut tables.sub_recipes, row.id, row, "sub-recipe")?;
        }
        for row in items.options {
            insert_unique(&mut tables.options, row.id, row, "option")?;
        }
        // several stat rows per costume
        for row in items.costume_stats {
            tables = tables.with_costume_stat(row);
        }

        for row in encounters.stages {
            insert_unique(&mut tables.stages, row.id, row, "stage")?;
        }
        for row in encounters.world_bosses {
            insert_unique(&mut tables.world_bosses, row.id, row, "world boss")?;
        }

        Self::check_references(&tables)?;
        Ok(tables)
    }

    fn check_references(tables: &TablesSnapshot) -> LoadResult<()> {
        for recipe in tables.recipes.values() {
            anyhow::ensure!(
                tables
                    .equipment_items
                    .contains_key(&recipe.result_equipment_id),
                "Recipe {} produces unknown equipment {}",
                recipe.id,
                recipe.result_equipment_id
            );
            for sub_recipe_id in &recipe.sub_recipe_ids {
                anyhow::ensure!(
                    tables.sub_recipes.contains_key(sub_recipe_id),
                    "Recipe {} lists unknown sub-recipe {}",
                    recipe.id,
                    sub_recipe_id
                );
            }
        }

        for stage in tables.stages.values() {
            for spawn in stage.waves.iter().flatten() {
                anyhow::ensure!(
                    tables.characters.contains_key(&spawn.character_id),
                    "Stage {} spawns unknown character {}",
                    stage.id,
                    spawn.character_id
                );
            }
        }

        for boss in tables.world_bosses.values() {
            anyhow::ensure!(
                tables.characters.contains_key(&boss.character_id),
                "World boss {} uses unknown character {}",
                boss.id,
                boss.character_id
            );
        }

        Ok(())
    }
}

fn insert_unique<T>(table: &mut BTreeMap<u32, T>, id: u32, row: T, kind: &str) -> LoadResult<()> {
    if table.insert(id, row).is_some() {
        anyhow::bail!("Duplicate {} id {}", kind, id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn characters() -> CharacterCatalog {
        CharacterLoader::parse(r#"(characters: [(id: 1, progression: (base: (hp: 10)))])"#)
            .unwrap()
    }

    #[test]
    fn merges_catalogs() {
        let items = ItemLoader::parse(
            r#"(
                costume_stats: [
                    (costume_id: 40100000, stat: ATK, value: 5),
                    (costume_id: 40100000, stat: HIT, value: 3),
                ],
            )"#,
        )
        .unwrap();
        let encounters =
            EncounterLoader::parse(r#"(stages: [(id: 7, waves: [[(character_id: 1, level: 1)]])])"#)
                .unwrap();

        let tables = TablesLoader::build(characters(), items, encounters).unwrap();
        assert_eq!(tables.characters.len(), 1);
        assert_eq!(tables.costume_stats[&40100000].len(), 2);
        assert!(tables.stages.contains_key(&7));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let characters = CharacterLoader::parse(
            r#"(characters: [
                (id: 1, progression: (base: (hp: 10))),
                (id: 1, progression: (base: (hp: 20))),
            ])"#,
        )
        .unwrap();

        let err =
            TablesLoader::build(characters, ItemCatalog::default(), EncounterCatalog::default())
                .unwrap_err();
        assert!(err.to_string().contains("Duplicate character id 1"));
    }

    #[test]
    fn dangling_stage_spawn_is_rejected() {
        let encounters =
            EncounterLoader::parse(r#"(stages: [(id: 7, waves: [[(character_id: 2, level: 1)]])])"#)
                .unwrap();

        let err =
            TablesLoader::build(characters(), ItemCatalog::default(), encounters).unwrap_err();
        assert!(err.to_string().contains("unknown character 2"));
    }

    #[test]
    fn dangling_recipe_is_rejected() {
        let items = ItemLoader::parse(
            r#"(
                equipment_items: [(id: 10100000, set_id: 1, stat: ATK, value: 10)],
                recipes: [(id: 1, result_equipment_id: 10100000, sub_recipe_ids: [99])],
            )"#,
        )
        .unwrap();

        let err =
            TablesLoader::build(CharacterCatalog::default(), items, EncounterCatalog::default())
                .unwrap_err();
        assert!(err.to_string().contains("unknown sub-recipe 99"));
    }
}
