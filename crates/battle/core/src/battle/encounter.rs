//! Rosters: the player avatar and the waves it faces.
//!
//! Stage, arena and raid battles share one scheduler; they only differ in how
//! their waves are built from tables.

use tracing::debug;

use crate::config::BattleConfig;
use crate::env::{
    BossId, CharacterId, CharacterOracle, CostumeOracle, OracleError, SetEffectOracle,
    SkillGrant, SkillOracle, StageId, StatProgression, TablesOracle,
};
use crate::item::{Consumable, Costume, Equipment, SkillInstance};
use crate::stats::{CharacterStats, StatModifier};

use super::combatant::CombatantSpec;

/// Everything needed to put an avatar on the field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AvatarDigest {
    pub character_id: CharacterId,
    pub level: u32,
    pub equipments: Vec<Equipment>,
    pub costumes: Vec<Costume>,
    pub consumables: Vec<Consumable>,
    /// Extra optional-layer modifiers, e.g. raid bonuses.
    pub extra_modifiers: Vec<StatModifier>,
}

impl AvatarDigest {
    pub fn new(character_id: CharacterId, level: u32) -> Self {
        Self {
            character_id,
            level,
            ..Self::default()
        }
    }

    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipments.push(equipment);
        self
    }

    pub fn with_costume(mut self, costume: Costume) -> Self {
        self.costumes.push(costume);
        self
    }

    pub fn with_consumable(mut self, consumable: Consumable) -> Self {
        self.consumables.push(consumable);
        self
    }

    pub fn with_extra_modifier(mut self, modifier: StatModifier) -> Self {
        self.extra_modifiers.push(modifier);
        self
    }

    /// Resolves stats and equipment skills.
    ///
    /// Costumes and extra modifiers share the optional layer; costumes first.
    pub fn to_spec<O>(&self, tables: &O) -> Result<CombatantSpec, OracleError>
    where
        O: CharacterOracle + SetEffectOracle + CostumeOracle + ?Sized,
    {
        let row = tables
            .character(self.character_id)
            .ok_or(OracleError::UnknownCharacter(self.character_id))?;

        let mut stats = CharacterStats::new(row, self.level);
        stats.batch(|sources| {
            sources.set_equipments(&self.equipments, tables);
            sources.set_consumables(&self.consumables);
            sources.set_costumes(&self.costumes, tables);
            sources.add_option(self.extra_modifiers.iter().copied());
        });

        let skills = self
            .equipments
            .iter()
            .flat_map(|equipment| equipment.skills.iter().cloned())
            .collect();
        Ok(CombatantSpec::new(self.character_id, stats, skills))
    }
}

/// Which table an encounter was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EncounterKind {
    Stage(StageId),
    Arena,
    Raid(BossId),
}

/// Waves of enemies, spawned one after another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encounter {
    kind: EncounterKind,
    waves: Vec<Vec<CombatantSpec>>,
}

impl Encounter {
    /// Validates wave shapes; every wave needs between 1 and
    /// [`BattleConfig::MAX_TARGETS`] enemies.
    pub fn new(kind: EncounterKind, waves: Vec<Vec<CombatantSpec>>) -> Result<Self, OracleError> {
        if waves.is_empty() {
            return Err(OracleError::EmptyEncounter);
        }
        for (index, wave) in waves.iter().enumerate() {
            let number = index as u32 + 1;
            if wave.is_empty() {
                return Err(OracleError::EmptyWave(number));
            }
            if wave.len() > BattleConfig::MAX_TARGETS {
                return Err(OracleError::TooManyCombatants {
                    wave: number,
                    count: wave.len(),
                    max: BattleConfig::MAX_TARGETS,
                });
            }
        }
        Ok(Self { kind, waves })
    }

    /// Monster waves of a stage.
    pub fn stage<O>(tables: &O, stage_id: StageId) -> Result<Self, OracleError>
    where
        O: TablesOracle + ?Sized,
    {
        let stage = tables
            .stage(stage_id)
            .ok_or(OracleError::UnknownStage(stage_id))?;

        let mut waves = Vec::with_capacity(stage.waves.len());
        for wave in &stage.waves {
            let mut enemies = Vec::new();
            for spawn in wave {
                let row = tables
                    .character(spawn.character_id)
                    .ok_or(OracleError::UnknownCharacter(spawn.character_id))?;
                for _ in 0..spawn.count {
                    enemies.push(CombatantSpec::new(
                        row.id,
                        CharacterStats::new(row, spawn.level),
                        resolve_grants(&row.skills, tables),
                    ));
                }
            }
            waves.push(enemies);
        }

        debug!(stage_id, waves = waves.len(), "stage encounter built");
        Self::new(EncounterKind::Stage(stage_id), waves)
    }

    /// A single wave holding the opposing avatar.
    pub fn arena<O>(tables: &O, enemy: &AvatarDigest) -> Result<Self, OracleError>
    where
        O: TablesOracle + ?Sized,
    {
        Self::new(EncounterKind::Arena, vec![vec![enemy.to_spec(tables)?]])
    }

    /// One wave per boss stat block, in table order.
    pub fn raid<O>(tables: &O, boss_id: BossId) -> Result<Self, OracleError>
    where
        O: TablesOracle + ?Sized,
    {
        let boss = tables
            .world_boss(boss_id)
            .ok_or(OracleError::UnknownWorldBoss(boss_id))?;

        let waves = boss
            .waves
            .iter()
            .map(|wave| {
                vec![CombatantSpec::new(
                    boss.character_id,
                    CharacterStats::from_progression(
                        StatProgression::fixed(wave.stats),
                        wave.level,
                    ),
                    resolve_grants(&wave.skills, tables),
                )]
            })
            .collect();

        debug!(boss_id, "raid encounter built");
        Self::new(EncounterKind::Raid(boss_id), waves)
    }

    pub fn kind(&self) -> EncounterKind {
        self.kind
    }

    /// Id recorded in the battle log: stage or boss id, `0` for arena.
    pub fn log_id(&self) -> u32 {
        match self.kind {
            EncounterKind::Stage(id) | EncounterKind::Raid(id) => id,
            EncounterKind::Arena => 0,
        }
    }

    pub fn wave_count(&self) -> u32 {
        self.waves.len() as u32
    }

    pub fn wave(&self, index: usize) -> Option<&[CombatantSpec]> {
        self.waves.get(index).map(Vec::as_slice)
    }
}

/// Innate skills with their table kinds. Grants without a skill row are dropped.
fn resolve_grants<O>(grants: &[SkillGrant], tables: &O) -> Vec<SkillInstance>
where
    O: SkillOracle + ?Sized,
{
    grants
        .iter()
        .filter_map(|grant| {
            tables.skill(grant.skill_id).map(|row| SkillInstance {
                skill_id: grant.skill_id,
                kind: row.kind,
                power: grant.power,
                chance: grant.chance,
                buffs: row.buffs.clone(),
            })
        })
        .collect()
}
