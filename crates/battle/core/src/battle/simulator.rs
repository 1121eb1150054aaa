//! Turn scheduler and battle loop.
//!
//! ```text
//! Spawning ──► Running ──► Win | Lose | TimeOver
//! ```
//!
//! Each iteration of the loop:
//!
//! 1. `turn > max_turn` ends the battle in `TimeOver`
//! 2. the lowest-priority combatant is dequeued and acts
//! 3. a dead player ends the battle in `Lose`
//! 4. a player without targets clears the wave; the next wave spawns, or the
//!    battle ends in `Win`
//! 5. every waiting entry decays by 0.6 and the actor is re-enqueued at
//!    `turn_priority / SPD`

use tracing::{debug, info, trace, warn};

use crate::config::BattleConfig;
use crate::env::{BuffTarget, OracleError, RandomSource, SkillKind, TablesOracle};
use crate::item::SkillInstance;
use crate::log::{BattleEvent, BattleLog, BattleOutcome, SkillHit};
use crate::stats::StatType;

use super::combatant::{Combatant, CombatantId, CombatantSpec, Side};
use super::encounter::{AvatarDigest, Encounter};
use super::priority::Priority;
use super::queue::TurnQueue;
use super::skill::{choose_skill, heal_amount, resolve_strike};

/// Final log plus the field as it stood when the battle ended.
#[derive(Clone, Debug)]
pub struct BattleReport {
    pub log: BattleLog,
    pub combatants: Vec<Combatant>,
}

impl BattleReport {
    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.log.result()
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(id.0 as usize)
    }

    pub fn player(&self) -> Option<&Combatant> {
        self.combatant(CombatantId::PLAYER)
    }
}

/// Runs one battle of `player` against `encounter`.
///
/// # Errors
///
/// Returns [`OracleError::UnknownCharacter`] when the avatar's character row
/// is missing. Nothing is drawn from `rng` in that case.
pub fn simulate<O, R>(
    tables: &O,
    config: &BattleConfig,
    player: &AvatarDigest,
    encounter: &Encounter,
    rng: &mut R,
) -> Result<BattleReport, OracleError>
where
    O: TablesOracle + ?Sized,
    R: RandomSource + ?Sized,
{
    let player = player.to_spec(tables)?;
    Ok(BattleSimulator::new(tables, config, encounter, rng).run(player))
}

/// Owns the field, the turn queue and the log for one battle.
pub struct BattleSimulator<'a, O, R>
where
    O: TablesOracle + ?Sized,
    R: RandomSource + ?Sized,
{
    tables: &'a O,
    config: &'a BattleConfig,
    encounter: &'a Encounter,
    rng: &'a mut R,
    field: Vec<Combatant>,
    queue: TurnQueue,
    log: BattleLog,
    turn: u32,
    wave: u32,
}

impl<'a, O, R> BattleSimulator<'a, O, R>
where
    O: TablesOracle + ?Sized,
    R: RandomSource + ?Sized,
{
    pub fn new(
        tables: &'a O,
        config: &'a BattleConfig,
        encounter: &'a Encounter,
        rng: &'a mut R,
    ) -> Self {
        Self {
            tables,
            config,
            encounter,
            rng,
            field: Vec::new(),
            queue: TurnQueue::new(),
            log: BattleLog::new(encounter.log_id(), encounter.wave_count()),
            turn: 1,
            wave: 0,
        }
    }

    pub fn run(mut self, player: CombatantSpec) -> BattleReport {
        info!(
            encounter = %self.encounter.kind(),
            waves = self.encounter.wave_count(),
            max_turn = self.config.max_turn,
            "battle started"
        );

        self.spawn(Side::Player, player);
        self.spawn_wave(0);

        let outcome = loop {
            if self.turn > self.config.max_turn {
                break BattleOutcome::TimeOver;
            }

            let Some(entry) = self.queue.pop() else {
                warn!(turn = self.turn, "turn queue exhausted");
                break BattleOutcome::TimeOver;
            };

            self.act(entry.id);

            if self.player().is_dead() {
                break BattleOutcome::Lose;
            }

            let cleared = !self.has_living_targets(CombatantId::PLAYER);
            if cleared {
                self.log.push(BattleEvent::WaveCleared { wave: self.wave });
                self.log.set_cleared_wave_number(self.wave);
                if self.wave >= self.encounter.wave_count() {
                    break BattleOutcome::Win;
                }
            }

            self.queue.decay_all();
            self.requeue(entry.id);

            if cleared {
                self.spawn_wave(self.wave as usize);
            }
        };

        self.log.finish(outcome);
        info!(
            %outcome,
            turns = self.turn - 1,
            cleared_wave = self.log.cleared_wave_number(),
            "battle finished"
        );

        BattleReport {
            log: self.log,
            combatants: self.field,
        }
    }

    fn player(&self) -> &Combatant {
        &self.field[CombatantId::PLAYER.0 as usize]
    }

    fn combatant(&self, id: CombatantId) -> &Combatant {
        &self.field[id.0 as usize]
    }

    fn combatant_mut(&mut self, id: CombatantId) -> &mut Combatant {
        &mut self.field[id.0 as usize]
    }

    fn has_living_targets(&self, id: CombatantId) -> bool {
        self.combatant(id)
            .targets()
            .iter()
            .any(|target| self.combatant(*target).is_alive())
    }

    fn requeue(&mut self, id: CombatantId) {
        let combatant = self.combatant(id);
        if combatant.is_alive() {
            let priority = Priority::for_speed(
                self.config.turn_priority,
                combatant.get(StatType::SPD),
            );
            self.queue.push(id, priority);
        }
    }

    fn spawn(&mut self, side: Side, spec: CombatantSpec) -> CombatantId {
        let id = CombatantId(self.field.len() as u32);
        let combatant = Combatant::spawn(id, side, self.wave, spec);
        self.log.push(BattleEvent::Spawn {
            id,
            side,
            character_id: combatant.character_id,
            level: combatant.stats().level(),
            hp: combatant.current_hp(),
        });
        self.field.push(combatant);
        self.requeue(id);
        id
    }

    fn spawn_wave(&mut self, index: usize) {
        let encounter = self.encounter;
        let Some(specs) = encounter.wave(index) else {
            return;
        };

        self.wave = index as u32 + 1;
        self.log.push(BattleEvent::WaveStart { wave: self.wave });
        debug!(wave = self.wave, enemies = specs.len(), "wave spawned");

        for spec in specs {
            let id = self.spawn(Side::Enemy, spec.clone());
            // clamped HP can leave a combatant dead on arrival
            if self.combatant(id).is_dead() {
                self.kill(id);
                continue;
            }
            self.combatant_mut(id).add_target(CombatantId::PLAYER);
            self.combatant_mut(CombatantId::PLAYER).add_target(id);
        }
    }

    fn act(&mut self, actor: CombatantId) {
        self.combatant_mut(actor).tick_buffs();

        let skill = choose_skill(self.field[actor.0 as usize].skills(), &mut *self.rng);
        let attacker = *self.combatant(actor).stats().total();
        let rules = self.config.combat;

        let living: Vec<CombatantId> = self
            .combatant(actor)
            .targets()
            .iter()
            .copied()
            .filter(|target| self.combatant(*target).is_alive())
            .collect();
        let affected: Vec<CombatantId> = match skill.kind {
            SkillKind::Attack => living.first().copied().into_iter().collect(),
            SkillKind::AreaAttack => living.clone(),
            SkillKind::Heal | SkillKind::Buff => Vec::new(),
        };

        let mut hits = Vec::with_capacity(affected.len().max(1));
        match skill.kind {
            SkillKind::Attack | SkillKind::AreaAttack => {
                for &target in &affected {
                    let defender = *self.combatant(target).stats().total();
                    let strike =
                        resolve_strike(&attacker, &defender, skill.power, &rules, &mut *self.rng);
                    let victim = self.combatant_mut(target);
                    let amount = if strike.hit {
                        victim.take_damage(strike.damage)
                    } else {
                        0
                    };
                    hits.push(SkillHit {
                        target,
                        hit: strike.hit,
                        critical: strike.critical,
                        amount,
                        remaining_hp: victim.current_hp(),
                    });
                }
            }
            SkillKind::Heal => {
                let caster = self.combatant_mut(actor);
                let amount = caster.heal(heal_amount(&attacker, skill.power));
                hits.push(SkillHit {
                    target: actor,
                    hit: true,
                    critical: false,
                    amount,
                    remaining_hp: caster.current_hp(),
                });
            }
            SkillKind::Buff => {}
        }

        self.log.push(BattleEvent::SkillCast {
            caster: actor,
            skill_id: skill.skill_id,
            kind: skill.kind,
            hits,
        });

        let buff_targets = match skill.kind {
            SkillKind::Attack | SkillKind::AreaAttack => affected.clone(),
            SkillKind::Heal | SkillKind::Buff => living,
        };
        self.apply_buffs(actor, &skill, &buff_targets);

        for target in affected {
            if self.combatant(target).is_dead() {
                self.kill(target);
            }
        }

        for buff_id in self.combatant_mut(actor).expire_buffs() {
            self.log.push(BattleEvent::BuffExpired {
                target: actor,
                buff_id,
            });
        }

        trace!(
            turn = self.turn,
            actor = %actor,
            skill = skill.skill_id,
            "turn resolved"
        );
        self.log.push(BattleEvent::TurnEnd {
            turn: self.turn,
            actor,
        });
        self.turn += 1;
    }

    /// Buffs without a table row are skipped.
    fn apply_buffs(&mut self, actor: CombatantId, skill: &SkillInstance, targets: &[CombatantId]) {
        let tables = self.tables;
        for buff_id in &skill.buffs {
            let Some(row) = tables.buff(*buff_id) else {
                continue;
            };
            let recipients: &[CombatantId] = match row.target {
                BuffTarget::Caster => core::slice::from_ref(&actor),
                BuffTarget::Targets => targets,
            };
            for &recipient in recipients {
                let holder = self.combatant_mut(recipient);
                if holder.is_dead() {
                    continue;
                }
                holder.apply_buff(row);
                self.log.push(BattleEvent::BuffApplied {
                    target: recipient,
                    buff_id: row.id,
                });
            }
        }
    }

    fn kill(&mut self, id: CombatantId) {
        debug!(combatant = %id, turn = self.turn, "combatant died");
        self.log.push(BattleEvent::Dead { id });
        self.queue.remove(id);
        for combatant in &mut self.field {
            combatant.remove_target(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::EncounterKind;
    use crate::config::CombatRules;
    use crate::env::{BaseStats, BuffRow, PcgRandom, SkillRow, StatProgression, TablesSnapshot};
    use crate::log::BattleEventKind;
    use crate::stats::{CharacterStats, StatModifier};

    fn spec(
        character_id: u32,
        hp: i32,
        atk: i32,
        spd: i32,
        skills: Vec<SkillInstance>,
    ) -> CombatantSpec {
        CombatantSpec::new(
            character_id,
            CharacterStats::from_progression(
                StatProgression::fixed(BaseStats::new(hp, atk, 0, 0, 0, spd)),
                1,
            ),
            skills,
        )
    }

    fn tables() -> TablesSnapshot {
        TablesSnapshot::new()
            .with_skill(SkillRow {
                id: 120000,
                kind: SkillKind::Heal,
                buffs: vec![2, 404],
            })
            .with_buff(BuffRow {
                id: 2,
                group_id: 20,
                target: BuffTarget::Caster,
                duration: 3,
                modifier: StatModifier::add(StatType::ATK, 10),
            })
    }

    fn heal() -> SkillInstance {
        SkillInstance {
            skill_id: 120000,
            kind: SkillKind::Heal,
            power: 5,
            chance: 100,
            buffs: vec![2, 404],
        }
    }

    #[test]
    fn heal_buffs_caster_and_skips_unknown_buffs() {
        let tables = tables();
        let config = BattleConfig::new().with_max_turn(1);
        let encounter =
            Encounter::new(EncounterKind::Arena, vec![vec![spec(2, 100, 1, 1, vec![])]])
                .expect("encounter");

        let mut rng = PcgRandom::new(4);
        let report = BattleSimulator::new(&tables, &config, &encounter, &mut rng)
            .run(spec(1, 100, 10, 10, vec![heal()]));

        let cast = report
            .log
            .iter()
            .find(|event| event.kind() == BattleEventKind::SkillCast);
        assert!(matches!(
            cast,
            Some(BattleEvent::SkillCast {
                kind: SkillKind::Heal,
                ..
            })
        ));
        assert_eq!(report.log.count_of(BattleEventKind::BuffApplied), 1);
        assert!(report.log.iter().any(|event| *event
            == BattleEvent::BuffApplied {
                target: CombatantId::PLAYER,
                buff_id: 2,
            }));
        assert_eq!(report.player().map(|p| p.get(StatType::ATK)), Some(20));
    }

    #[test]
    fn next_wave_spawns_after_clear() {
        let tables = TablesSnapshot::new();
        let config = BattleConfig::new().with_combat(CombatRules {
            hit_chance_min: 100,
            hit_chance_max: 100,
            ..CombatRules::default()
        });
        let encounter = Encounter::new(
            EncounterKind::Stage(1),
            vec![vec![spec(2, 1, 1, 1, vec![])], vec![spec(3, 1, 1, 1, vec![])]],
        )
        .expect("encounter");

        let mut rng = PcgRandom::new(0);
        let report = BattleSimulator::new(&tables, &config, &encounter, &mut rng)
            .run(spec(1, 100, 10, 10, vec![]));

        assert_eq!(report.outcome(), Some(BattleOutcome::Win));
        assert_eq!(report.log.cleared_wave_number(), 2);
        assert_eq!(report.combatants.len(), 3);
        assert_eq!(report.combatant(CombatantId(2)).map(|c| c.wave), Some(2));
        assert!(report.combatants.iter().skip(1).all(Combatant::is_dead));
    }

    #[test]
    fn enemy_spawned_at_zero_hp_dies_on_arrival() {
        let tables = TablesSnapshot::new();
        let config = BattleConfig::new()
            .with_max_turn(50)
            .with_combat(CombatRules {
                hit_chance_min: 100,
                hit_chance_max: 100,
                ..CombatRules::default()
            });

        let mut doomed = spec(2, 100, 1, 5, vec![]);
        doomed.stats.set_option([StatModifier::add(StatType::HP, -500)]);
        assert_eq!(doomed.stats.get(StatType::HP), 0);
        let encounter =
            Encounter::new(EncounterKind::Arena, vec![vec![doomed]]).expect("encounter");

        let mut rng = PcgRandom::new(0);
        let report = BattleSimulator::new(&tables, &config, &encounter, &mut rng)
            .run(spec(1, 100, 10, 10, vec![]));

        assert_eq!(report.outcome(), Some(BattleOutcome::Win));
        assert_eq!(report.log.count_of(BattleEventKind::TurnEnd), 1);
        assert_eq!(report.log.count_of(BattleEventKind::Dead), 1);
        let dead = BattleEvent::Dead { id: CombatantId(1) };
        assert!(report.log.iter().any(|event| *event == dead));
        assert_eq!(report.log.cleared_wave_number(), 1);
        assert_eq!(report.player().map(Combatant::has_targets), Some(false));
    }
}
