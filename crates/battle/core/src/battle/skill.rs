//! Skill choice, hit and damage resolution.
//!
//! Pure functions over stat bundles and combat rules. The only side effect is
//! consuming values from the random source, in this order per action:
//!
//! 1. skill choice (one roll, only when the actor has castable skills)
//! 2. per affected target: hit roll, then a critical roll if it hit

use crate::config::CombatRules;
use crate::env::RandomSource;
use crate::item::SkillInstance;
use crate::stats::StatBundle;

/// Picks the skill to cast.
///
/// One roll in `[0, 100)` is compared against the cumulative chances of
/// `skills` in slice order; the first skill whose cumulative chance exceeds the
/// roll is cast, otherwise the normal attack.
pub fn choose_skill<R>(skills: &[SkillInstance], rng: &mut R) -> SkillInstance
where
    R: RandomSource + ?Sized,
{
    if skills.is_empty() {
        return SkillInstance::normal_attack();
    }

    let roll = rng.next(0, 100);
    let mut cumulative = 0i32;
    for skill in skills {
        cumulative = cumulative.saturating_add(skill.chance.max(0));
        if roll < cumulative {
            return skill.clone();
        }
    }
    SkillInstance::normal_attack()
}

/// Hit chance in percent.
///
/// # Formula
///
/// ```text
/// hit_chance = base + (attacker_hit - defender_hit) / divisor
/// clamped to [min, max]
/// ```
pub fn hit_chance(attacker_hit: i32, defender_hit: i32, rules: &CombatRules) -> i32 {
    let divisor = rules.hit_chance_divisor.max(1);
    let diff = attacker_hit.saturating_sub(defender_hit) / divisor;
    rules
        .hit_chance_base
        .saturating_add(diff)
        .clamp(rules.hit_chance_min, rules.hit_chance_max)
}

/// Critical chance in percent: the attacker's CRI, capped.
pub fn critical_chance(attacker_cri: i32, rules: &CombatRules) -> i32 {
    attacker_cri.clamp(0, rules.crit_chance_max)
}

/// Damage of one landed hit.
///
/// # Formula
///
/// ```text
/// damage = max(ATK + power - DEF, minimum)
/// if critical: damage = damage * multiplier / 100
/// ```
pub fn calculate_damage(
    attacker: &StatBundle,
    defender: &StatBundle,
    power: i32,
    critical: bool,
    rules: &CombatRules,
) -> i32 {
    let raw = i64::from(attacker.atk()) + i64::from(power) - i64::from(defender.def());
    let mut damage = raw.max(i64::from(rules.minimum_damage));
    if critical {
        damage = damage * i64::from(rules.crit_multiplier) / 100;
    }
    damage.clamp(0, i64::from(i32::MAX)) as i32
}

/// HP restored by a heal skill before capping at max HP.
pub fn heal_amount(caster: &StatBundle, power: i32) -> i32 {
    power.max(0).saturating_add(caster.atk().max(0) / 2)
}

/// Result of one attack against one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    pub hit: bool,
    pub critical: bool,
    pub damage: i32,
}

/// Rolls hit and critical for one target and computes the damage.
pub fn resolve_strike<R>(
    attacker: &StatBundle,
    defender: &StatBundle,
    power: i32,
    rules: &CombatRules,
    rng: &mut R,
) -> Strike
where
    R: RandomSource + ?Sized,
{
    let hit = rng.next(0, 100) < hit_chance(attacker.hit(), defender.hit(), rules);
    if !hit {
        return Strike {
            hit: false,
            critical: false,
            damage: 0,
        };
    }

    let critical = rng.next(0, 100) < critical_chance(attacker.cri(), rules);
    Strike {
        hit,
        critical,
        damage: calculate_damage(attacker, defender, power, critical, rules),
    }
}
