#![allow(dead_code)]

use std::collections::BTreeMap;

use battle_core::env::{
    BaseStats, BossWaveRow, BuffRow, BuffTarget, CharacterRow, EnemySpawn, EquipmentItemRow,
    OptionEffect, OptionRow, OptionWeight, RecipeRow, SetEffectRow, SkillGrant, SkillKind,
    SkillRow, StageRow, StatProgression, SubRecipeRow, WorldBossRow,
};
use battle_core::{
    BattleConfig, BattleEvent, BattleLog, CharacterStats, CombatRules, CombatantId, CombatantSpec,
    StatModifier, StatType, TablesSnapshot,
};

pub const PLAYER: u32 = 100010;
pub const SLIME: u32 = 201000;
pub const GOLEM: u32 = 201001;
pub const BRUTE: u32 = 201002;

pub const AREA_SKILL: u32 = 110000;
pub const HEAL_SKILL: u32 = 120000;

pub const SLIME_STAGE: u32 = 1;
pub const GOLEM_STAGE: u32 = 2;
pub const BRUTE_STAGE: u32 = 3;
pub const BOSS: u32 = 900001;

pub const RECIPE: u32 = 1;
pub const SUB_RECIPE: u32 = 10;

fn row(id: u32, base: BaseStats, skills: Vec<SkillGrant>) -> CharacterRow {
    CharacterRow {
        id,
        progression: StatProgression::fixed(base),
        skills,
    }
}

fn spawn(character_id: u32, count: u32) -> EnemySpawn {
    EnemySpawn {
        character_id,
        level: 1,
        count,
    }
}

pub fn tables() -> TablesSnapshot {
    TablesSnapshot::new()
        .with_character(CharacterRow {
            id: PLAYER,
            progression: StatProgression {
                base: BaseStats::new(300, 20, 10, 10, 20, 10),
                growth: BaseStats::new(1000, 100, 0, 0, 0, 0),
            },
            skills: vec![],
        })
        .with_character(row(SLIME, BaseStats::new(1, 1, 0, 0, 0, 5), vec![]))
        .with_character(row(
            GOLEM,
            BaseStats::new(100_000, 1, 1000, 0, 0, 8),
            vec![SkillGrant {
                skill_id: AREA_SKILL,
                power: 0,
                chance: 30,
            }],
        ))
        .with_character(row(BRUTE, BaseStats::new(10_000, 1000, 0, 0, 100, 50), vec![]))
        .with_skill(SkillRow {
            id: AREA_SKILL,
            kind: SkillKind::AreaAttack,
            buffs: vec![1],
        })
        .with_skill(SkillRow {
            id: HEAL_SKILL,
            kind: SkillKind::Heal,
            buffs: vec![2],
        })
        .with_buff(BuffRow {
            id: 1,
            group_id: 10,
            target: BuffTarget::Targets,
            duration: 2,
            modifier: StatModifier::percentage(StatType::DEF, -50),
        })
        .with_buff(BuffRow {
            id: 2,
            group_id: 20,
            target: BuffTarget::Caster,
            duration: 1,
            modifier: StatModifier::add(StatType::ATK, 10),
        })
        .with_stage(StageRow {
            id: SLIME_STAGE,
            waves: vec![vec![spawn(SLIME, 1)], vec![spawn(SLIME, 2)]],
        })
        .with_stage(StageRow {
            id: GOLEM_STAGE,
            waves: vec![vec![spawn(GOLEM, 1)]],
        })
        .with_stage(StageRow {
            id: BRUTE_STAGE,
            waves: vec![vec![spawn(BRUTE, 1)]],
        })
        .with_world_boss(WorldBossRow {
            id: BOSS,
            character_id: 205007,
            waves: vec![
                BossWaveRow {
                    level: 1,
                    stats: BaseStats::new(60, 3, 0, 0, 0, 6),
                    skills: vec![SkillGrant {
                        skill_id: AREA_SKILL,
                        power: 1,
                        chance: 50,
                    }],
                },
                BossWaveRow {
                    level: 2,
                    stats: BaseStats::new(90, 5, 5, 5, 5, 9),
                    skills: vec![],
                },
            ],
        })
        .with_set_effect(SetEffectRow {
            set_id: 1,
            effects: BTreeMap::from([(2, vec![StatModifier::percentage(StatType::ATK, 20)])]),
        })
        .with_equipment_item(EquipmentItemRow {
            id: 10110000,
            set_id: 1,
            stat: StatType::ATK,
            value: 15,
        })
        .with_recipe(RecipeRow {
            id: RECIPE,
            result_equipment_id: 10110000,
            sub_recipe_ids: vec![SUB_RECIPE],
        })
        .with_sub_recipe(SubRecipeRow {
            id: SUB_RECIPE,
            options: vec![
                OptionWeight { id: 1, ratio: 50 },
                OptionWeight { id: 2, ratio: 30 },
                OptionWeight { id: 3, ratio: 20 },
            ],
            max_option_limit: 2,
        })
        .with_option(OptionRow {
            id: 1,
            effect: OptionEffect::Stat {
                stat: StatType::ATK,
                min: 2,
                max: 6,
            },
        })
        .with_option(OptionRow {
            id: 2,
            effect: OptionEffect::Stat {
                stat: StatType::SPD,
                min: 1,
                max: 3,
            },
        })
        .with_option(OptionRow {
            id: 3,
            effect: OptionEffect::Skill {
                skill_id: HEAL_SKILL,
                damage_min: 5,
                damage_max: 10,
                chance_min: 10,
                chance_max: 20,
            },
        })
}

/// Every attack lands.
pub fn sure_hit() -> BattleConfig {
    BattleConfig::new().with_combat(CombatRules {
        hit_chance_min: 100,
        hit_chance_max: 100,
        ..CombatRules::default()
    })
}

/// Bare combatant with the given HP, ATK and SPD.
pub fn fighter(character_id: u32, hp: i32, atk: i32, spd: i32) -> CombatantSpec {
    CombatantSpec::new(
        character_id,
        CharacterStats::from_progression(
            StatProgression::fixed(BaseStats::new(hp, atk, 0, 0, 0, spd)),
            1,
        ),
        vec![],
    )
}

pub fn turn_actors(log: &BattleLog) -> Vec<CombatantId> {
    log.iter()
        .filter_map(|event| match event {
            BattleEvent::TurnEnd { actor, .. } => Some(*actor),
            _ => None,
        })
        .collect()
}
