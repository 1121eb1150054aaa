/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Upper bound on scheduler iterations. Once the turn counter exceeds this
    /// value the battle ends in `TimeOver`.
    pub max_turn: u32,

    /// Numerator of the scheduling priority (`turn_priority / SPD`).
    pub turn_priority: u32,

    /// Hit, critical and damage rules used when a combatant acts.
    pub combat: CombatRules,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of targets a single combatant may track, and with it the
    /// largest wave an encounter may spawn.
    pub const MAX_TARGETS: usize = 16;

    // ===== fixed scheduling arithmetic =====
    /// Decay factor applied to every waiting entry each tick, as a fraction (6/10).
    pub const DECAY_NUMERATOR: u128 = 6;
    pub const DECAY_DENOMINATOR: u128 = 10;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_TURN: u32 = 200;
    pub const DEFAULT_TURN_PRIORITY: u32 = 100;

    pub fn new() -> Self {
        Self {
            max_turn: Self::DEFAULT_MAX_TURN,
            turn_priority: Self::DEFAULT_TURN_PRIORITY,
            combat: CombatRules::default(),
        }
    }

    pub fn with_max_turn(mut self, max_turn: u32) -> Self {
        self.max_turn = max_turn;
        self
    }

    pub fn with_turn_priority(mut self, turn_priority: u32) -> Self {
        self.turn_priority = turn_priority;
        self
    }

    pub fn with_combat(mut self, combat: CombatRules) -> Self {
        self.combat = combat;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Balance parameters for attack resolution.
///
/// All values are integers; percentages are whole percent points so that the
/// arithmetic stays exact on every node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatRules {
    /// Hit chance when attacker HIT equals defender HIT.
    pub hit_chance_base: i32,
    /// HIT difference needed for one percent point of hit chance.
    pub hit_chance_divisor: i32,
    pub hit_chance_min: i32,
    pub hit_chance_max: i32,
    /// Upper bound on the effective critical chance (CRI is a percent).
    pub crit_chance_max: i32,
    /// Critical damage multiplier in percent (150 = ×1.5).
    pub crit_multiplier: i32,
    /// Floor applied to every damaging hit.
    pub minimum_damage: i32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            hit_chance_base: 90,
            hit_chance_divisor: 5,
            hit_chance_min: 50,
            hit_chance_max: 100,
            crit_chance_max: 100,
            crit_multiplier: 150,
            minimum_damage: 1,
        }
    }
}
